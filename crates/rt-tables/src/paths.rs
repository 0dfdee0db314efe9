//! Resolving table references to file paths.

use std::path::{Component, Path, PathBuf};

/// Resolve `target` against `base_dir`.
///
/// Absolute targets are used as given. Relative targets are joined onto
/// `base_dir`; the result is canonicalized when the file exists, otherwise
/// `.` and `..` are folded lexically so that two spellings of the same path
/// compare equal.
pub fn resolve_table_path(target: &str, base_dir: &Path) -> PathBuf {
    let target = Path::new(target);
    let joined = if target.is_absolute() {
        target.to_path_buf()
    } else {
        base_dir.join(target)
    };
    joined
        .canonicalize()
        .unwrap_or_else(|_| normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
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

    #[test]
    fn relative_targets_join_base() {
        let resolved = resolve_table_path("loot.table", Path::new("/no/such/dir"));
        assert_eq!(resolved, PathBuf::from("/no/such/dir/loot.table"));
    }

    #[test]
    fn absolute_targets_ignore_base() {
        let resolved = resolve_table_path("/no/such/loot.table", Path::new("/elsewhere"));
        assert_eq!(resolved, PathBuf::from("/no/such/loot.table"));
    }

    #[test]
    fn dots_fold_lexically() {
        let resolved = resolve_table_path("./sub/../gems.list", Path::new("/no/such/dir"));
        assert_eq!(resolved, PathBuf::from("/no/such/dir/gems.list"));
    }

    #[test]
    fn existing_files_canonicalize() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("loot.table"), "a").unwrap();
        let from_sub = resolve_table_path("../loot.table", &dir.path().join("sub"));
        let direct = resolve_table_path("loot.table", dir.path());
        assert_eq!(from_sub, direct);
    }
}
