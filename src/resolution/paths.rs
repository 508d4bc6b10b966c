use std::path::{Component, Path, PathBuf};

/// Resolve `relative` against `root` the way `path.resolve(root, relative)` does.
///
/// An absolute `relative` replaces the root. A relative root is anchored at the current
/// working directory. The result is normalised lexically, so `..` segments are folded
/// without consulting the filesystem and may point outside `root`.
pub fn resolve_against(root: &Path, relative: &str) -> std::io::Result<PathBuf> {
    let joined = root.join(relative);
    let absolute = if joined.is_absolute() {
        joined
    } else {
        std::env::current_dir()?.join(joined)
    };
    Ok(normalize_lexically(&absolute))
}

/// Drop `.` segments and fold `..` into their parent without touching the filesystem.
///
/// `..` at the root stays at the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => normalized.push(".."),
            },
            Component::Normal(segment) => normalized.push(segment),
        }
    }
    normalized
}
