use crate::discover::FileEntry;
use crate::pattern::PatternSet;
use tracing::debug;

/// Applies `patterns` to a discovered entry list and returns the files that
/// survive, in the original traversal order.
///
/// An excluded directory prunes its whole subtree without consulting the
/// patterns again; directory exclusion is transitive, so this is purely a
/// shortcut. Directory entries never appear in the result.
pub fn filter_entries(entries: &[FileEntry], patterns: &PatternSet) -> Vec<FileEntry> {
    let mut excluded_dirs: Vec<String> = Vec::new();
    let mut included = Vec::new();

    for entry in entries {
        if excluded_dirs.iter().any(|dir| is_under(&entry.path, dir)) {
            continue;
        }
        if patterns.is_excluded(&entry.path, entry.is_dir) {
            if entry.is_dir {
                excluded_dirs.push(entry.path.clone());
            }
            continue;
        }
        if !entry.is_dir {
            included.push(entry.clone());
        }
    }

    debug!(
        total = entries.len(),
        included = included.len(),
        "filter applied"
    );
    included
}

/// True when `path` lies strictly beneath the directory `dir`.
fn is_under(path: &str, dir: &str) -> bool {
    path.strip_prefix(dir)
        .is_some_and(|rest| rest.starts_with('/'))
}
