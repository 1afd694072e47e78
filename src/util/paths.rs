//! Lexical path normalization
//!
//! Project files reference each other with paths such as `..\Lib\Lib.csproj`.
//! Matching compares paths by exact equality, so every path that enters the
//! workspace model goes through [`normalize_path`] first.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path without touching the file system
///
/// - Windows separators (`\`) become `/`
/// - `.` components are dropped
/// - `..` pops the previous normal component (leading `..` on a relative path is kept)
/// - trailing separators are removed
///
/// # Example
///
/// ```
/// use mutorch::util::normalize_path;
/// use std::path::PathBuf;
///
/// assert_eq!(
///     normalize_path("/repo/tests/../src/./App.csproj"),
///     PathBuf::from("/repo/src/App.csproj")
/// );
/// assert_eq!(normalize_path(r"src\Lib\Lib.csproj"), PathBuf::from("src/Lib/Lib.csproj"));
/// ```
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let unified = path.as_ref().to_string_lossy().replace('\\', "/");
    let mut normalized = PathBuf::new();

    for component in Path::new(&unified).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Normalized parent directory of `path`, if it has one
pub fn normalized_parent(path: impl AsRef<Path>) -> Option<PathBuf> {
    normalize_path(path).parent().map(Path::to_path_buf)
}

/// Resolves `relative` against `base_dir` and normalizes the result
///
/// Absolute `relative` paths are normalized as-is.
pub fn resolve_relative(base_dir: &Path, relative: &str) -> PathBuf {
    let unified = relative.replace('\\', "/");
    let candidate = Path::new(&unified);
    if candidate.is_absolute() {
        normalize_path(candidate)
    } else {
        normalize_path(base_dir.join(candidate))
    }
}
