//! Path normalization shared by handlers and the condition evaluator.
//!
//! Plans routinely carry `~/...` and relative paths produced by humans or
//! planners. Every filesystem-touching operation normalizes first: expand a
//! leading `~`, make the path absolute against the current directory, and
//! resolve `.`/`..` lexically. The target does not have to exist (copy and
//! screenshot targets usually don't), so this never hits the filesystem.

use std::path::{Component, Path, PathBuf};

/// Normalize a path to an absolute, lexically cleaned form.
pub fn normalize(path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(&expanded),
            Err(_) => expanded,
        }
    };
    clean(&absolute)
}

/// Expand a leading `~` component to the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Home directory from the platform environment.
fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let var = std::env::var("HOME");
    var.ok().map(PathBuf::from)
}

/// Resolve `.` and `..` components without touching the filesystem.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above the root stays at the root; in a relative
                // path with nothing left to pop it is kept verbatim.
                if !out.pop() && out.components().next().is_none() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_unchanged() {
        assert_eq!(normalize(Path::new("/tmp/file.txt")), PathBuf::from("/tmp/file.txt"));
    }

    #[test]
    fn test_relative_path_becomes_absolute() {
        let normalized = normalize(Path::new("some/file.txt"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("some/file.txt"));
    }

    #[test]
    fn test_dot_components_removed() {
        assert_eq!(
            normalize(Path::new("/tmp/./a/./b.txt")),
            PathBuf::from("/tmp/a/b.txt")
        );
    }

    #[test]
    fn test_parent_components_resolved() {
        assert_eq!(
            normalize(Path::new("/tmp/a/../b/c/../d.txt")),
            PathBuf::from("/tmp/b/d.txt")
        );
    }

    #[test]
    fn test_tilde_expansion() {
        #[cfg(not(target_os = "windows"))]
        std::env::set_var("HOME", "/home/tester");
        #[cfg(target_os = "windows")]
        std::env::set_var("USERPROFILE", "/home/tester");

        let normalized = normalize(Path::new("~/docs/report.txt"));
        assert_eq!(normalized, PathBuf::from("/home/tester/docs/report.txt"));
    }

    #[test]
    fn test_tilde_mid_path_not_expanded() {
        let normalized = normalize(Path::new("/tmp/~/file.txt"));
        assert_eq!(normalized, PathBuf::from("/tmp/~/file.txt"));
    }

    #[test]
    fn test_nonexistent_path_still_normalizes() {
        // Normalization is lexical; the path does not need to exist.
        assert_eq!(
            normalize(Path::new("/definitely/not/../a/real/path.png")),
            PathBuf::from("/definitely/a/real/path.png")
        );
    }
}
