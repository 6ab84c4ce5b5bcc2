use std::path::{Component, Path, PathBuf};

/// Containment guard run before a plugin directory is deleted.
///
/// A directory is contained when its path relative to the plugins root can be
/// computed and does not escape the root through a parent-traversal segment.
/// Both paths are lexically normalized first, so `root/foo/../../etc` resolves
/// to `/etc` and is rejected.
pub fn is_within_plugins_root(root: &Path, dir: &Path) -> bool {
    match normalize(dir).strip_prefix(normalize(root)) {
        Ok(rel) => !matches!(rel.components().next(), Some(Component::ParentDir)),
        Err(_) => false,
    }
}

/// Fold `.` and `..` segments without touching the filesystem. A `..` that
/// cannot pop a preceding segment is kept, which makes the prefix check fail.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(Component::ParentDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn descendant_is_contained() {
        assert!(is_within_plugins_root(
            Path::new("/plugins"),
            Path::new("/plugins/foo")
        ));
        assert!(is_within_plugins_root(
            Path::new("/plugins"),
            Path::new("/plugins/foo/nested")
        ));
    }

    #[test]
    fn unrelated_path_is_rejected() {
        assert!(!is_within_plugins_root(
            Path::new("/plugins"),
            Path::new("/etc/passwd-dir")
        ));
    }

    #[test]
    fn sibling_with_shared_prefix_is_rejected() {
        assert!(!is_within_plugins_root(
            Path::new("/plugins"),
            Path::new("/plugins-evil/foo")
        ));
    }

    #[test]
    fn leading_traversal_is_rejected() {
        let dir: PathBuf = ["/plugins", "..", "etc"].iter().collect();
        assert!(!is_within_plugins_root(Path::new("/plugins"), &dir));
    }

    #[test]
    fn interior_traversal_escaping_the_root_is_rejected() {
        let dir: PathBuf = ["/plugins", "foo", "..", "..", "etc"].iter().collect();
        assert!(!is_within_plugins_root(Path::new("/plugins"), &dir));
    }

    #[test]
    fn interior_traversal_staying_inside_is_contained() {
        let dir: PathBuf = ["/plugins", "foo", "..", "bar"].iter().collect();
        assert!(is_within_plugins_root(Path::new("/plugins"), &dir));
    }

    #[test]
    fn current_dir_segments_are_ignored() {
        let dir: PathBuf = ["/plugins", ".", "foo"].iter().collect();
        assert!(is_within_plugins_root(Path::new("/plugins"), &dir));
    }

    #[test]
    fn root_itself_is_contained() {
        assert!(is_within_plugins_root(
            Path::new("/plugins"),
            Path::new("/plugins")
        ));
    }
}
