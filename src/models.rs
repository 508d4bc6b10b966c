//! Data structures read from the manifest and produced while resolving it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::flags::render_flag_line;
use crate::resolution::ResolveError;

/// A single package entry listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
  /// Package identifier handed to the resolver, e.g. `@scope/pkg`.
  pub name: String,
  /// Path relative to the package root pointing at the WIT files.
  pub wit_path: String,
}

/// Absolute WIT path computed for a manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWitPath {
  /// Package the path belongs to.
  pub name: String,
  /// Absolute, normalised path.
  pub path: PathBuf,
}

/// Manifest entry skipped because its package could not be located.
#[derive(Debug)]
pub struct UnresolvedPackage {
  /// Package identifier from the manifest.
  pub name: String,
  /// Why resolution failed.
  pub reason: ResolveError,
}

impl UnresolvedPackage {
  /// Diagnostic line reported for the skipped entry.
  pub fn diagnostic(&self) -> String {
    format!(
      "Could not resolve path for package: {} :{}",
      self.name, self.reason
    )
  }
}

/// Outcome of a single extraction run, in manifest order.
#[derive(Debug, Default)]
pub struct ExtractionReport {
  /// Entries that resolved to an absolute WIT path.
  pub resolved: Vec<ResolvedWitPath>,
  /// Entries that were skipped.
  pub unresolved: Vec<UnresolvedPackage>,
}

impl ExtractionReport {
  /// Render the resolved paths as a single flag line using `flag` as the option name.
  pub fn to_flag_line(&self, flag: &str) -> String {
    render_flag_line(flag, self.resolved.iter().map(|entry| entry.path.as_path()))
  }

  /// Names of the packages that were skipped.
  pub fn unresolved_names(&self) -> Vec<&str> {
    self
      .unresolved
      .iter()
      .map(|entry| entry.name.as_str())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserialises_camel_case_entries() {
    let entries: Vec<ManifestEntry> =
      serde_json::from_str(r#"[{"name": "@scope/pkg", "witPath": "wit/deps"}]"#)
        .expect("manifest should parse");

    assert_eq!(entries, vec![ManifestEntry {
      name: "@scope/pkg".into(),
      wit_path: "wit/deps".into(),
    }]);
  }

  #[test]
  fn report_lists_skipped_packages_in_order() {
    let report = ExtractionReport {
      resolved: vec![ResolvedWitPath {
        name: "a".into(),
        path: PathBuf::from("/pkg/a/wit"),
      }],
      unresolved: vec![
        UnresolvedPackage {
          name: "b".into(),
          reason: ResolveError::Other("gone".into()),
        },
        UnresolvedPackage {
          name: "c".into(),
          reason: ResolveError::Other("gone".into()),
        },
      ],
    };

    assert_eq!(report.unresolved_names(), vec!["b", "c"]);
    assert_eq!(
      report.unresolved[0].diagnostic(),
      "Could not resolve path for package: b :gone"
    );
    assert_eq!(report.to_flag_line("--wit-path"), "--wit-path /pkg/a/wit ");
  }
}
