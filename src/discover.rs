use crate::error::{CtxpackError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One discovered filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the walk root, `/`-separated on every platform, with
    /// no leading or trailing slash.
    pub path: String,
    /// Directory entries are needed so directory-only ignore patterns can
    /// prune whole subtrees before any file beneath them is considered.
    pub is_dir: bool,
}

impl FileEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// Walks `root` depth-first and returns every directory and file beneath it.
///
/// Children of each directory are visited in lexicographic name order, so two
/// walks of an unchanged tree produce identical sequences. Symbolic links are
/// followed, but each canonical directory is entered at most once; a link
/// cycle is skipped silently instead of recursing forever. A directory that
/// cannot be read is skipped with its subtree and the walk continues.
///
/// # Errors
///
/// `CtxpackError::RootNotFound` if `root` does not exist or is not a
/// directory. No other error aborts the walk.
pub fn walk(root: &Path) -> Result<Vec<FileEntry>> {
    if !root.is_dir() {
        return Err(CtxpackError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut entries = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            match entry.path().canonicalize() {
                // Entering an already-visited real directory means a link
                // cycle; descending again would never terminate.
                Ok(real) => visited.insert(real),
                Err(err) => {
                    warn!(path = %entry.path().display(), %err, "skipping unresolvable directory");
                    false
                }
            }
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "skipping unreadable entry");
                continue;
            }
        };

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if relative.as_os_str().is_empty() {
            // The walk yields the root itself first.
            continue;
        }

        entries.push(FileEntry {
            path: to_slash_path(relative),
            is_dir: entry.file_type().is_dir(),
        });
    }

    debug!(root = %root.display(), entries = entries.len(), "walk complete");
    Ok(entries)
}

/// Joins path components with `/` regardless of the host separator.
fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/c.txt"), "c").unwrap();
        fs::write(dir.path().join("a/z.txt"), "z").unwrap();
        dir
    }

    #[test]
    fn test_walk_emits_dirs_and_files_in_order() {
        let dir = create_project();
        let entries = walk(dir.path()).unwrap();

        let expected = vec![
            FileEntry::dir("a"),
            FileEntry::file("a/c.txt"),
            FileEntry::file("a/z.txt"),
            FileEntry::file("b.txt"),
        ];
        assert_eq!(entries, expected);
    }

    #[test]
    fn test_walk_is_deterministic() {
        let dir = create_project();
        let first = walk(dir.path()).unwrap();
        let second = walk(dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_walk_uses_forward_slashes() {
        let dir = create_project();
        let entries = walk(dir.path()).unwrap();
        assert!(entries.iter().all(|e| !e.path.contains('\\')));
        assert!(entries.iter().any(|e| e.path == "a/c.txt"));
    }

    #[test]
    fn test_walk_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let result = walk(&missing);
        assert!(matches!(result, Err(CtxpackError::RootNotFound { .. })));
    }

    #[test]
    fn test_walk_root_must_be_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let result = walk(&file);
        assert!(matches!(result, Err(CtxpackError::RootNotFound { .. })));
    }

    #[test]
    fn test_walk_empty_root() {
        let dir = TempDir::new().unwrap();
        let entries = walk(dir.path()).unwrap();
        assert!(entries.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_symlink_cycle() {
        let dir = create_project();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("a/loop")).unwrap();

        // Terminates, and the cycle contributes nothing below itself.
        let entries = walk(dir.path()).unwrap();
        assert!(entries.iter().all(|e| !e.path.starts_with("a/loop/")));
        assert!(entries.iter().any(|e| e.path == "b.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_follows_symlink_to_directory_once() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        fs::write(dir.path().join("real/file.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let entries = walk(dir.path()).unwrap();
        // The canonical directory is entered exactly once; which name wins is
        // decided by lexicographic visit order ("link" < "real").
        let dirs: Vec<_> = entries.iter().filter(|e| e.is_dir).collect();
        assert_eq!(dirs.len(), 1);
        let files: Vec<_> = entries.iter().filter(|e| !e.is_dir).collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("file.txt"));
    }
}
