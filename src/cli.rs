//! Command-line entry point wiring configuration, resolver and extractor together.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::config::ExtractorConfig;
use crate::extractor::WitPathExtractor;
use crate::models::ExtractionReport;
use crate::resolution::NodeModulesResolver;

/// Print `--wit-path` flags for the WIT directories listed in `componentizejs.json`.
#[derive(Parser, Debug, Default)]
#[command(name = "wit-path-extractor", version, about, long_about = None)]
pub struct Args {
  /// Manifest to read (default: componentizejs.json next to the executable)
  #[arg(long, value_name = "PATH")]
  pub manifest: Option<PathBuf>,

  /// Directory packages are resolved from (default: the manifest's directory)
  #[arg(long, value_name = "DIR")]
  pub base_dir: Option<PathBuf>,

  /// Flag printed before every path (default: --wit-path)
  #[arg(long, value_name = "FLAG", allow_hyphen_values = true)]
  pub flag: Option<String>,

  /// Configuration file (default: wit-paths.config.json next to the manifest)
  #[arg(long, value_name = "PATH")]
  pub config: Option<PathBuf>,
}

/// Directory holding the running executable.
pub fn program_dir() -> Result<PathBuf> {
  let exe = std::env::current_exe().context("failed to locate the running executable")?;
  exe
    .parent()
    .map(Path::to_path_buf)
    .ok_or_else(|| anyhow!("{} has no parent directory", exe.display()))
}

/// Execute one extraction run for `args`, writing the flag line to `out`.
///
/// `program_dir` stands in for the executable's directory when no manifest is given.
pub fn run(args: Args, program_dir: &Path, out: &mut impl Write) -> Result<ExtractionReport> {
  let cwd = std::env::current_dir().context("failed to read the current directory")?;
  let absolute = |path: PathBuf| if path.is_absolute() { path } else { cwd.join(path) };

  let manifest_dir = args
    .manifest
    .as_deref()
    .and_then(Path::parent)
    .map(|dir| absolute(dir.to_path_buf()))
    .unwrap_or_else(|| program_dir.to_path_buf());

  let (config, config_dir) = match args.config {
    Some(path) => {
      let path = absolute(path);
      let config = ExtractorConfig::load(&path)?;
      let dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.clone());
      (config, dir)
    }
    None => (ExtractorConfig::discover(&manifest_dir), manifest_dir.clone()),
  };

  let manifest_path = match args.manifest {
    Some(path) => absolute(path),
    None => config.manifest_path(&manifest_dir),
  };
  let base_dir = match args.base_dir {
    Some(dir) => absolute(dir),
    None => manifest_path
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| manifest_dir.clone()),
  };
  log::debug!(
    "manifest {}, resolving from {}",
    manifest_path.display(),
    base_dir.display()
  );

  let resolver =
    NodeModulesResolver::from_env(base_dir).with_search_paths(config.node_path_dirs(&config_dir));
  let flag = args.flag.unwrap_or(config.flag);

  WitPathExtractor::new(manifest_path, resolver)
    .with_flag(flag)
    .run(out)
}
