//! Loading the `componentizejs.json` manifest.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ManifestEntry;

/// File name of the manifest looked up next to the program.
pub const DEFAULT_MANIFEST_FILE: &str = "componentizejs.json";

/// Errors that can occur while loading the manifest.
#[derive(Debug)]
pub enum ManifestError {
  /// The manifest file does not exist.
  Missing {
    /// Path that was checked.
    path: PathBuf,
  },
  /// The manifest exists but could not be read.
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// The manifest is not a JSON array of `{name, witPath}` objects.
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
}

impl ManifestError {
  /// Path of the manifest the error refers to.
  pub fn path(&self) -> &Path {
    match self {
      Self::Missing { path } | Self::Io { path, .. } | Self::Parse { path, .. } => path,
    }
  }
}

/// Read and parse the manifest at `path`, preserving entry order.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<ManifestEntry>, ManifestError> {
  let path = path.as_ref();
  let contents = match fs::read_to_string(path) {
    Ok(contents) => contents,
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
      return Err(ManifestError::Missing {
        path: path.to_path_buf(),
      });
    }
    Err(err) => {
      return Err(ManifestError::Io {
        path: path.to_path_buf(),
        source: err,
      });
    }
  };

  parse_manifest(&contents).map_err(|err| ManifestError::Parse {
    path: path.to_path_buf(),
    source: err,
  })
}

/// Parse manifest JSON that has already been read into memory.
pub fn parse_manifest(contents: &str) -> Result<Vec<ManifestEntry>, serde_json::Error> {
  serde_json::from_str(contents)
}

impl std::fmt::Display for ManifestError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Missing { path } => write!(f, "File {} does not exist.", path.display()),
      Self::Io { path, source } => {
        write!(f, "failed to read {}: {}", path.display(), source)
      }
      Self::Parse { path, source } => {
        write!(f, "failed to parse {}: {}", path.display(), source)
      }
    }
  }
}

impl std::error::Error for ManifestError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Missing { .. } => None,
      Self::Io { source, .. } => Some(source),
      Self::Parse { source, .. } => Some(source),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn missing_manifest_names_the_path() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join(DEFAULT_MANIFEST_FILE);

    let err = load_manifest(&path).expect_err("missing manifest must fail");

    assert!(matches!(err, ManifestError::Missing { .. }));
    assert_eq!(err.path(), path.as_path());
    assert!(err.to_string().contains(&path.display().to_string()));
  }

  #[test]
  fn reads_entries_in_order() -> std::io::Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join(DEFAULT_MANIFEST_FILE);
    fs::write(
      &path,
      r#"[
        {"name": "zeta", "witPath": "wit"},
        {"name": "@scope/alpha", "witPath": "../wit/deps"}
      ]"#,
    )?;

    let entries = load_manifest(&path).expect("manifest should load");

    let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "@scope/alpha"]);
    assert_eq!(entries[1].wit_path, "../wit/deps");
    Ok(())
  }

  #[test]
  fn empty_array_is_valid() {
    assert!(parse_manifest("[]").expect("empty array parses").is_empty());
  }

  #[test]
  fn malformed_json_is_reported() -> std::io::Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join(DEFAULT_MANIFEST_FILE);
    fs::write(&path, r#"[{"name": "pkg""#)?;

    let err = load_manifest(&path).expect_err("malformed manifest must fail");

    assert!(matches!(err, ManifestError::Parse { .. }));
    assert!(err.to_string().starts_with("failed to parse"));
    Ok(())
  }

  #[test]
  fn entries_missing_wit_path_are_rejected() {
    assert!(parse_manifest(r#"[{"name": "pkg"}]"#).is_err());
  }
}
