//! # spray-index
//!
//! Converts a game server's uploaded spray textures (VTF) to JPEG and
//! publishes a JSON index of which Steam ID owns which sprays.
//!
//! # Architecture: Five-Stage Pipeline
//!
//! ```text
//! 1. Preflight  VTFCmd toolchain + sr_sprays/ present?
//! 2. Cleanup    sr_sprays/ bigger than sr_sprays_jpg/?  → delete sr_sprays_jpg/
//! 3. Convert    VTFCmd.exe: sr_sprays/*.vtf → sr_sprays_jpg/*.jpg
//! 4. Aggregate  <steamid>_<spray>.jpg filenames → SprayIndex
//! 5. Emit       SprayIndex → sr_sprays_api.json
//! ```
//!
//! Stages are strictly sequential and the first failure ends the run. The
//! only external collaborator is the converter executable, which sits behind
//! the [`converter::Converter`] trait so everything else can be tested
//! against temporary directories.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `spray-index.toml` loading, validation, and path resolution |
//! | [`preflight`] | Stage 1: required files and source directory |
//! | [`cleanup`] | Stage 2: size-based stale output invalidation |
//! | [`converter`] | Stage 3: `Converter` trait and the `VtfCmd` implementation |
//! | [`index`] | Stages 4–5: `SprayIndex`, filename splitting, JSON read/write |
//! | [`pipeline`] | Sequences the stages and reports progress events |
//! | [`output`] | CLI output formatting for pipeline events |
//!
//! # Design Decisions
//!
//! ## Filenames Are the Database
//!
//! The game server already encodes ownership in the upload filename
//! (`<steamid>_<spray>.vtf`) and VTFCmd keeps the stem. The index is derived
//! purely from the converted filenames; nothing inspects image contents.
//!
//! ## Sorted Keys
//!
//! [`index::SprayIndex`] is backed by a `BTreeMap`, so the emitted JSON has
//! sorted keys and an unchanged output directory always produces the same
//! bytes. Consumers diffing or caching the file see no spurious changes.
//!
//! ## Coarse Invalidation
//!
//! VTFCmd does not delete output it produced earlier. Rather than track
//! individual files, the cleanup stage compares directory byte totals and
//! rebuilds from scratch when the source has grown. See [`cleanup`] for the
//! known blind spots.

pub mod cleanup;
pub mod config;
pub mod converter;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod preflight;
