//! Renders the included files as a connector-glyph directory tree.

use crate::discover::FileEntry;
use std::cmp::Ordering;

/// Transient node used while building the tree. The hierarchy is rebuilt from
/// the flat file list on every render call and discarded with it.
#[derive(Debug, Default)]
struct TreeNode {
    name: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Interior nodes come from path segments shared with other entries, so
    /// they are directories; only leaves are files.
    fn is_dir(&self) -> bool {
        !self.children.is_empty()
    }

    fn insert(&mut self, segments: &[&str]) {
        let Some((first, rest)) = segments.split_first() else {
            return;
        };
        let index = match self.children.iter().position(|child| child.name == *first) {
            Some(index) => index,
            None => {
                self.children.push(TreeNode {
                    name: (*first).to_string(),
                    children: Vec::new(),
                });
                self.children.len() - 1
            }
        };
        self.children[index].insert(rest);
    }
}

/// Renders `files` as a classic tree diagram, one line per node.
///
/// The root project directory name is the single top line; below it,
/// directories sort before files and each group is alphabetical, which may
/// differ from the traversal order used for content emission. Zero files
/// render the root line only.
pub fn render_tree(root_name: &str, files: &[FileEntry]) -> String {
    let mut root = TreeNode::default();
    for entry in files {
        let segments: Vec<&str> = entry.path.split('/').collect();
        root.insert(&segments);
    }

    let mut lines = vec![format!("{root_name}/")];
    render_children(&root, "", &mut lines);
    lines.join("\n")
}

fn render_children(node: &TreeNode, prefix: &str, lines: &mut Vec<String>) {
    let mut ordered: Vec<&TreeNode> = node.children.iter().collect();
    ordered.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });

    let last = ordered.len().saturating_sub(1);
    for (i, child) in ordered.iter().enumerate() {
        let connector = if i == last { "└── " } else { "├── " };
        lines.push(format!("{prefix}{connector}{}", child.name));

        if child.is_dir() {
            let extension = if i == last { "    " } else { "│   " };
            render_children(child, &format!("{prefix}{extension}"), lines);
        }
    }
}
