#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod extractor;
pub mod flags;
pub mod manifest;
pub mod models;
pub mod resolution;

pub use config::ExtractorConfig;
pub use extractor::WitPathExtractor;
pub use manifest::{ManifestError, load_manifest};
pub use models::{ExtractionReport, ManifestEntry, ResolvedWitPath, UnresolvedPackage};
pub use resolution::{NodeModulesResolver, PackageResolver, ResolveError};
