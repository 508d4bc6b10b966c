use regex::Regex;

use super::ResolveError;

/// A module specifier split the way Node's resolver interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier<'a> {
  /// A bare package name with an optional subpath, e.g. `@scope/pkg/wit`.
  Package {
    /// `pkg` or `@scope/pkg`.
    name: &'a str,
    /// Remainder after the package name, without the leading slash.
    subpath: Option<&'a str>,
  },
  /// A relative or absolute filesystem path.
  Path(&'a str),
}

fn package_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"^(?P<name>@[^/@\\][^/\\]*/[^/\\]+|[^/@\\.][^/\\]*)(?:/(?P<subpath>.*))?$")
      .expect("invalid package specifier regex")
  })
}

/// Split a specifier into its package name and subpath.
pub fn parse_specifier(specifier: &str) -> Result<Specifier<'_>, ResolveError> {
  if is_path_like(specifier) {
    return Ok(Specifier::Path(specifier));
  }

  let invalid = || ResolveError::InvalidSpecifier {
    specifier: specifier.to_string(),
  };
  let captures = package_pattern().captures(specifier).ok_or_else(invalid)?;
  let name = captures.name("name").ok_or_else(invalid)?.as_str();
  let subpath = captures
    .name("subpath")
    .map(|m| m.as_str().trim_end_matches('/'))
    .filter(|subpath| !subpath.is_empty());

  Ok(Specifier::Package { name, subpath })
}

fn is_path_like(specifier: &str) -> bool {
  specifier == "."
    || specifier == ".."
    || specifier.starts_with("./")
    || specifier.starts_with("../")
    || std::path::Path::new(specifier).is_absolute()
}
