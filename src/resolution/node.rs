//! Node-compatible lookup of installed packages.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::specifier::{Specifier, parse_specifier};
use super::{PackageResolver, ResolveError};

const NODE_MODULES: &str = "node_modules";
const PACKAGE_JSON: &str = "package.json";
const EXTENSIONS: [&str; 3] = ["js", "json", "node"];
const EXPORT_CONDITIONS: [&str; 3] = ["require", "node", "default"];

/// The fields of `package.json` that influence entry resolution.
#[derive(Debug, Default, Deserialize)]
struct PackageJson {
  #[serde(default)]
  main: Option<String>,
  #[serde(default)]
  exports: Option<Value>,
}

/// Resolves packages the way `require.resolve` does from a fixed base directory.
///
/// `node_modules` directories are searched from `base_dir` upwards, followed by any extra
/// search directories (the `NODE_PATH` equivalent). The package root is the directory that
/// contains the resolved entry module.
#[derive(Debug, Clone)]
pub struct NodeModulesResolver {
  base_dir: PathBuf,
  search_paths: Vec<PathBuf>,
}

impl NodeModulesResolver {
  /// Create a resolver that looks up packages relative to `base_dir`.
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      base_dir: base_dir.into(),
      search_paths: Vec::new(),
    }
  }

  /// Create a resolver that also honours the `NODE_PATH` environment variable.
  pub fn from_env(base_dir: impl Into<PathBuf>) -> Self {
    let search_paths: Vec<PathBuf> = std::env::var_os("NODE_PATH")
      .map(|value| {
        std::env::split_paths(&value)
          .filter(|path| !path.as_os_str().is_empty())
          .collect()
      })
      .unwrap_or_default();
    Self::new(base_dir).with_search_paths(search_paths)
  }

  /// Append extra directories searched after the `node_modules` hierarchy.
  pub fn with_search_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
    self.search_paths.extend(paths);
    self
  }

  /// Module directories searched for bare package names, in lookup order.
  pub fn module_dirs(&self) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = self
      .base_dir
      .ancestors()
      .filter(|dir| dir.file_name().is_none_or(|name| name != NODE_MODULES))
      .map(|dir| dir.join(NODE_MODULES))
      .collect();
    dirs.extend(self.search_paths.iter().cloned());
    dirs
  }

  /// Resolve `specifier` to the absolute path of its entry module.
  pub fn resolve_entry(&self, specifier: &str) -> Result<PathBuf, ResolveError> {
    let entry = match parse_specifier(specifier)? {
      Specifier::Path(path) => {
        let target = self.base_dir.join(path);
        let found = match load_as_file(&target) {
          Some(entry) => Some(entry),
          None => load_as_directory(&target)?,
        };
        found.ok_or_else(|| ResolveError::NotFound {
          specifier: specifier.to_string(),
          searched: vec![target],
        })?
      }
      Specifier::Package { name, subpath } => {
        self.resolve_package_entry(specifier, name, subpath)?
      }
    };

    Ok(fs::canonicalize(&entry).unwrap_or(entry))
  }

  fn resolve_package_entry(
    &self,
    specifier: &str,
    name: &str,
    subpath: Option<&str>,
  ) -> Result<PathBuf, ResolveError> {
    let searched = self.module_dirs();
    for modules_dir in &searched {
      let package_dir = modules_dir.join(name);
      if !package_dir.is_dir() {
        continue;
      }
      log::trace!("probing {} for '{}'", package_dir.display(), specifier);

      if let Some(entry) = resolve_in_package(specifier, &package_dir, subpath)? {
        return Ok(entry);
      }
    }

    Err(ResolveError::NotFound {
      specifier: specifier.to_string(),
      searched,
    })
  }
}

impl PackageResolver for NodeModulesResolver {
  fn package_root(&self, name: &str) -> Result<PathBuf, ResolveError> {
    let entry = self.resolve_entry(name)?;
    entry
      .parent()
      .map(Path::to_path_buf)
      .ok_or_else(|| ResolveError::Other(format!("{} has no parent directory", entry.display())))
  }
}

fn resolve_in_package(
  specifier: &str,
  package_dir: &Path,
  subpath: Option<&str>,
) -> Result<Option<PathBuf>, ResolveError> {
  let manifest = read_package_json(package_dir)?;

  if let Some(exports) = manifest.as_ref().and_then(|pkg| pkg.exports.as_ref()) {
    let key = match subpath {
      Some(subpath) => format!("./{subpath}"),
      None => ".".to_string(),
    };
    let target = export_target(exports, &key).ok_or_else(|| ResolveError::NotExported {
      specifier: specifier.to_string(),
      package_dir: package_dir.to_path_buf(),
    })?;
    let entry = package_dir.join(target);
    return Ok(entry.is_file().then_some(entry));
  }

  match subpath {
    Some(subpath) => {
      let target = package_dir.join(subpath);
      match load_as_file(&target) {
        Some(entry) => Ok(Some(entry)),
        None => load_as_directory(&target),
      }
    }
    None => load_as_directory(package_dir),
  }
}

fn read_package_json(dir: &Path) -> Result<Option<PackageJson>, ResolveError> {
  let path = dir.join(PACKAGE_JSON);
  let contents = match fs::read_to_string(&path) {
    Ok(contents) => contents,
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
    Err(source) => return Err(ResolveError::Io { path, source }),
  };
  serde_json::from_str(&contents)
    .map(Some)
    .map_err(|source| ResolveError::PackageJson { path, source })
}

/// Pick the target for `key` (`.` or `./sub`) from a package's `exports` field.
fn export_target<'a>(exports: &'a Value, key: &str) -> Option<&'a str> {
  match exports {
    Value::Object(map) if map.keys().any(|k| k.starts_with('.')) => {
      map.get(key).and_then(conditional_target)
    }
    _ if key == "." => conditional_target(exports),
    _ => None,
  }
}

fn conditional_target(target: &Value) -> Option<&str> {
  match target {
    Value::String(path) => Some(path.as_str()),
    Value::Object(conditions) => conditions
      .iter()
      .filter(|(condition, _)| EXPORT_CONDITIONS.contains(&condition.as_str()))
      .find_map(|(_, nested)| conditional_target(nested)),
    Value::Array(fallbacks) => fallbacks.iter().find_map(conditional_target),
    _ => None,
  }
}

fn load_as_file(path: &Path) -> Option<PathBuf> {
  if path.is_file() {
    return Some(path.to_path_buf());
  }

  EXTENSIONS.iter().find_map(|extension| {
    let mut candidate = OsString::from(path.as_os_str());
    candidate.push(".");
    candidate.push(extension);
    let candidate = PathBuf::from(candidate);
    candidate.is_file().then_some(candidate)
  })
}

fn load_index(dir: &Path) -> Option<PathBuf> {
  EXTENSIONS
    .iter()
    .map(|extension| dir.join(format!("index.{extension}")))
    .find(|candidate| candidate.is_file())
}

fn load_as_directory(dir: &Path) -> Result<Option<PathBuf>, ResolveError> {
  if !dir.is_dir() {
    return Ok(None);
  }

  if let Some(main) = read_package_json(dir)?.and_then(|pkg| pkg.main) {
    let main_path = dir.join(main);
    if let Some(entry) = load_as_file(&main_path).or_else(|| load_index(&main_path)) {
      return Ok(Some(entry));
    }
  }

  Ok(load_index(dir))
}
