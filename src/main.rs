use clap::{Parser, Subcommand};
use spray_index::converter::VtfCmd;
use spray_index::{config, output, pipeline};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Called once per process, so the leak is bounded
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "spray-index")]
#[command(about = "Convert VTF sprays to JPEG and index them by Steam ID")]
#[command(long_about = "\
Convert VTF sprays to JPEG and index them by Steam ID

Expected layout (all names configurable in spray-index.toml):

  ./
  ├── spray-index.toml         # Optional config
  ├── VTFCmd.exe               # Converter + the libraries it loads
  ├── VTFLib.dll
  ├── HLLib.dll
  ├── DevIL.dll
  ├── sr_sprays/               # Uploaded sprays: <steamid>_<spray>.vtf
  ├── sr_sprays_jpg/           # Converted JPEGs (generated)
  └── sr_sprays_api.json       # {\"<steamid>\": [\"<spray>.jpg\", ...]} (generated)

Run 'spray-index gen-config' to generate a documented spray-index.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (missing file = defaults)
    #[arg(long, default_value = "spray-index.toml", global = true)]
    config: PathBuf,

    /// Directory that relative paths resolve against
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: check → clean → convert → index (default)
    Build,
    /// Check required files and the source directory without changing anything
    Check,
    /// Rebuild the JSON index from the existing JPEG directory, without converting
    Index,
    /// Print a stock spray-index.toml with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        println!("{err}");
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut on_event = |event: pipeline::PipelineEvent| output::print_event(&event);

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let (cfg, paths) = load(&cli.root, &cli.config)?;
            let converter = VtfCmd::new(&paths.converter)
                .with_pattern(&cfg.converter.pattern)
                .with_export_format(&cfg.converter.export_format);
            let summary = pipeline::run(&paths, &cfg.index, &converter, &mut on_event)?;
            output::print_summary(&summary);
        }
        Command::Check => {
            let (_, paths) = load(&cli.root, &cli.config)?;
            pipeline::check(&paths, &mut on_event)?;
            println!("==> Ready to convert");
        }
        Command::Index => {
            let (cfg, paths) = load(&cli.root, &cli.config)?;
            let summary = pipeline::reindex(&paths, &cfg.index, &mut on_event)?;
            output::print_summary(&summary);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file (resolved against `root`) and derive concrete paths.
fn load(
    root: &Path,
    config_file: &Path,
) -> Result<(config::SprayConfig, config::ResolvedPaths), config::ConfigError> {
    let cfg = config::load_config(&root.join(config_file))?;
    let paths = config::ResolvedPaths::resolve(&cfg, root);
    Ok((cfg, paths))
}
