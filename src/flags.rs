//! Rendering of resolved paths into command-line flags.

use std::path::Path;

/// Flag emitted in front of every resolved path unless configured otherwise.
pub const DEFAULT_FLAG: &str = "--wit-path";

/// Render a single `<flag> <path> ` token, trailing space included.
pub fn render_flag(flag: &str, path: &Path) -> String {
  format!("{} {} ", flag, path.display())
}

/// Concatenate one token per path, preserving order.
pub fn render_flag_line<'a>(flag: &str, paths: impl IntoIterator<Item = &'a Path>) -> String {
  paths
    .into_iter()
    .map(|path| render_flag(flag, path))
    .collect()
}
