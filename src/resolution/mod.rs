//! Locating installed packages and turning manifest paths into absolute paths.
//!
//! Package lookup sits behind [`PackageResolver`] so the extractor can be driven by the
//! Node-style resolver in production and by plain closures in tests. Specifier parsing and
//! path normalisation live in their own submodules so they can be tested without touching
//! the filesystem.

mod node;
mod paths;
mod specifier;

use std::path::PathBuf;

pub use node::NodeModulesResolver;
pub use paths::{normalize_lexically, resolve_against};
pub use specifier::{Specifier, parse_specifier};

/// Maps a package identifier to the directory holding its resolved entry module.
pub trait PackageResolver {
  /// Return the package root for `name`.
  fn package_root(&self, name: &str) -> Result<PathBuf, ResolveError>;
}

impl<F> PackageResolver for F
where
  F: Fn(&str) -> Result<PathBuf, ResolveError>,
{
  fn package_root(&self, name: &str) -> Result<PathBuf, ResolveError> {
    self(name)
  }
}

/// Reasons a package could not be resolved.
#[derive(Debug)]
pub enum ResolveError {
  /// The identifier is not a valid package specifier.
  InvalidSpecifier {
    /// Offending specifier.
    specifier: String,
  },
  /// No installed module matched the specifier.
  NotFound {
    /// Specifier that was looked up.
    specifier: String,
    /// Module directories that were searched, in order.
    searched: Vec<PathBuf>,
  },
  /// The package restricts its entry points and does not export the requested path.
  NotExported {
    /// Specifier that was looked up.
    specifier: String,
    /// Directory of the package that rejected it.
    package_dir: PathBuf,
  },
  /// A `package.json` on the lookup path is malformed.
  PackageJson {
    /// Path of the offending file.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// Reading from disk failed.
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failure reported by an externally supplied resolver.
  Other(String),
}

impl std::fmt::Display for ResolveError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::InvalidSpecifier { specifier } => {
        write!(f, "invalid package specifier '{}'", specifier)
      }
      Self::NotFound { specifier, searched } => {
        write!(f, "Cannot find module '{}'", specifier)?;
        if !searched.is_empty() {
          write!(f, " (searched {})", join_paths(searched))?;
        }
        Ok(())
      }
      Self::NotExported {
        specifier,
        package_dir,
      } => write!(
        f,
        "'{}' is not exported by the package at {}",
        specifier,
        package_dir.display()
      ),
      Self::PackageJson { path, source } => {
        write!(f, "failed to parse {}: {}", path.display(), source)
      }
      Self::Io { path, source } => {
        write!(f, "failed to read {}: {}", path.display(), source)
      }
      Self::Other(message) => f.write_str(message),
    }
  }
}

impl std::error::Error for ResolveError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::PackageJson { source, .. } => Some(source),
      Self::Io { source, .. } => Some(source),
      _ => None,
    }
  }
}

fn join_paths(paths: &[PathBuf]) -> String {
  paths
    .iter()
    .map(|path| path.display().to_string())
    .collect::<Vec<_>>()
    .join(", ")
}
