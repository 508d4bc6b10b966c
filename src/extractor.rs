//! The single pass over the manifest that turns package entries into `--wit-path` flags.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::flags::DEFAULT_FLAG;
use crate::manifest::{ManifestError, load_manifest};
use crate::models::{ExtractionReport, ManifestEntry, ResolvedWitPath, UnresolvedPackage};
use crate::resolution::{PackageResolver, ResolveError, resolve_against};

/// Resolves every manifest entry through a [`PackageResolver`] and renders the flag line.
pub struct WitPathExtractor<R> {
  manifest_path: PathBuf,
  resolver: R,
  flag: String,
}

impl<R: PackageResolver> WitPathExtractor<R> {
  /// Create an extractor for the manifest at `manifest_path`.
  pub fn new(manifest_path: impl Into<PathBuf>, resolver: R) -> Self {
    Self {
      manifest_path: manifest_path.into(),
      resolver,
      flag: DEFAULT_FLAG.to_string(),
    }
  }

  /// Emit `flag` instead of `--wit-path`.
  pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
    self.flag = flag.into();
    self
  }

  /// Manifest this extractor reads.
  pub fn manifest_path(&self) -> &Path {
    &self.manifest_path
  }

  /// Load the manifest and resolve every entry.
  ///
  /// Only manifest problems are errors; packages that fail to resolve end up in
  /// [`ExtractionReport::unresolved`].
  pub fn extract(&self) -> Result<ExtractionReport, ManifestError> {
    let entries = load_manifest(&self.manifest_path)?;
    Ok(self.resolve_entries(&entries))
  }

  /// Resolve already-loaded entries, preserving their order.
  pub fn resolve_entries(&self, entries: &[ManifestEntry]) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    for entry in entries {
      match self.resolve_entry(entry) {
        Ok(path) => {
          log::debug!("{} -> {}", entry.name, path.display());
          report.resolved.push(ResolvedWitPath {
            name: entry.name.clone(),
            path,
          });
        }
        Err(reason) => {
          let skipped = UnresolvedPackage {
            name: entry.name.clone(),
            reason,
          };
          log::error!("{}", skipped.diagnostic());
          report.unresolved.push(skipped);
        }
      }
    }

    report
  }

  fn resolve_entry(&self, entry: &ManifestEntry) -> Result<PathBuf, ResolveError> {
    let package_root = self.resolver.package_root(&entry.name)?;
    resolve_against(&package_root, &entry.wit_path).map_err(|source| ResolveError::Io {
      path: package_root.join(&entry.wit_path),
      source,
    })
  }

  /// Render the flag line for the current manifest.
  pub fn flag_line(&self) -> Result<String, ManifestError> {
    Ok(self.extract()?.to_flag_line(&self.flag))
  }

  /// Resolve the manifest and write the flag line to `out`.
  ///
  /// Nothing is written when the manifest is missing or malformed.
  pub fn run(&self, out: &mut impl Write) -> Result<ExtractionReport> {
    let report = self.extract()?;
    writeln!(out, "{}", report.to_flag_line(&self.flag)).context("failed to write flag line")?;
    Ok(report)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  use crate::manifest::DEFAULT_MANIFEST_FILE;

  fn fixed_roots(name: &str) -> Result<PathBuf, ResolveError> {
    match name {
      "alpha" => Ok(PathBuf::from("/pkg/alpha")),
      "@scope/beta" => Ok(PathBuf::from("/pkg/scope/beta/dist")),
      "gamma" => Ok(PathBuf::from("/pkg/gamma")),
      other => Err(ResolveError::Other(format!("Cannot find module '{other}'"))),
    }
  }

  fn write_manifest(dir: &Path, contents: &str) -> std::io::Result<PathBuf> {
    let path = dir.join(DEFAULT_MANIFEST_FILE);
    fs::write(&path, contents)?;
    Ok(path)
  }

  #[test]
  fn emits_one_token_per_entry_in_order() -> std::io::Result<()> {
    let temp = tempdir()?;
    let manifest = write_manifest(
      temp.path(),
      r#"[
        {"name": "gamma", "witPath": "wit"},
        {"name": "alpha", "witPath": "wit/deps"},
        {"name": "@scope/beta", "witPath": "../wit"}
      ]"#,
    )?;

    let extractor = WitPathExtractor::new(manifest, fixed_roots);
    let line = extractor.flag_line().expect("manifest should resolve");

    assert_eq!(
      line,
      "--wit-path /pkg/gamma/wit --wit-path /pkg/alpha/wit/deps --wit-path /pkg/scope/beta/wit "
    );
    Ok(())
  }

  #[test]
  fn unresolvable_packages_are_skipped() -> std::io::Result<()> {
    let temp = tempdir()?;
    let manifest = write_manifest(
      temp.path(),
      r#"[
        {"name": "alpha", "witPath": "wit"},
        {"name": "missing", "witPath": "wit"},
        {"name": "gamma", "witPath": "wit"}
      ]"#,
    )?;

    let extractor = WitPathExtractor::new(manifest, fixed_roots);
    let report = extractor.extract().expect("manifest should load");

    assert_eq!(report.resolved.len(), 2);
    assert_eq!(report.unresolved_names(), vec!["missing"]);
    assert_eq!(
      report.unresolved[0].diagnostic(),
      "Could not resolve path for package: missing :Cannot find module 'missing'"
    );
    assert_eq!(
      report.to_flag_line("--wit-path"),
      "--wit-path /pkg/alpha/wit --wit-path /pkg/gamma/wit "
    );
    Ok(())
  }

  #[test]
  fn missing_manifest_writes_nothing() {
    let temp = tempdir().unwrap();
    let manifest = temp.path().join(DEFAULT_MANIFEST_FILE);
    let extractor = WitPathExtractor::new(&manifest, fixed_roots);

    let mut out = Vec::new();
    let err = extractor.run(&mut out).expect_err("missing manifest must fail");

    assert!(out.is_empty());
    assert!(matches!(
      err.downcast_ref::<ManifestError>(),
      Some(ManifestError::Missing { .. })
    ));
    assert!(err.to_string().contains(&manifest.display().to_string()));
  }

  #[test]
  fn empty_manifest_prints_empty_line() -> std::io::Result<()> {
    let temp = tempdir()?;
    let manifest = write_manifest(temp.path(), "[]")?;
    let extractor = WitPathExtractor::new(manifest, fixed_roots);

    let mut out = Vec::new();
    extractor.run(&mut out).expect("empty manifest is valid");

    assert_eq!(out, b"\n");
    Ok(())
  }

  #[test]
  fn repeated_runs_are_identical() -> std::io::Result<()> {
    let temp = tempdir()?;
    let manifest = write_manifest(
      temp.path(),
      r#"[{"name": "alpha", "witPath": "wit"}, {"name": "nope", "witPath": "wit"}]"#,
    )?;
    let extractor = WitPathExtractor::new(manifest, fixed_roots);

    let mut first = Vec::new();
    let mut second = Vec::new();
    extractor.run(&mut first).unwrap();
    extractor.run(&mut second).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, b"--wit-path /pkg/alpha/wit \n");
    Ok(())
  }

  #[test]
  fn custom_flag_is_used() -> std::io::Result<()> {
    let temp = tempdir()?;
    let manifest = write_manifest(temp.path(), r#"[{"name": "alpha", "witPath": "wit"}]"#)?;
    let extractor = WitPathExtractor::new(&manifest, fixed_roots).with_flag("-d");

    assert_eq!(extractor.manifest_path(), manifest.as_path());
    assert_eq!(extractor.flag_line().unwrap(), "-d /pkg/alpha/wit ");
    Ok(())
  }
}
