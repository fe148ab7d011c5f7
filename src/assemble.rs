//! Assembles the final Markdown context document from the included files.

use crate::discover::FileEntry;
use crate::tree;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Fixed extension-to-label mapping for code fences. Anything unknown is
/// labelled `text`.
const LANGUAGE_MAP: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("html", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("md", "markdown"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("sh", "shell"),
    ("rb", "ruby"),
    ("java", "java"),
    ("go", "go"),
    ("rs", "rust"),
    ("c", "c"),
    ("cpp", "cpp"),
    ("txt", "text"),
    ("sql", "sql"),
    ("php", "php"),
    ("xml", "xml"),
];

/// Code-fence label for a relative path, by file extension.
pub fn language_for(path: &str) -> &'static str {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            LANGUAGE_MAP
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, label)| *label)
        })
        .unwrap_or("text")
}

/// Header fields for the assembled document.
#[derive(Debug, Clone)]
pub struct PackOptions {
    pub project_name: String,
    pub summary: String,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            project_name: "Unnamed Project".to_string(),
            summary: "No project summary provided.".to_string(),
        }
    }
}

/// Builds the full Markdown context document: project header, fenced
/// directory tree, then one fenced block per included file, in the order the
/// files were discovered.
///
/// Files that vanished since discovery, files with non-UTF-8 content and
/// files that fail to read are skipped with a warning; assembly continues.
pub fn assemble_context(root: &Path, included: &[FileEntry], options: &PackOptions) -> String {
    let root_name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut doc = String::new();
    doc.push_str(&format!("# Project Context: {}\n\n", options.project_name));
    doc.push_str(&format!("## Project Goal\n\n{}\n\n", options.summary));
    doc.push_str("## Directory Structure\n\n");
    doc.push_str(&format!(
        "```\n{}\n```\n\n",
        tree::render_tree(&root_name, included)
    ));
    doc.push_str("## File Contents\n\n");
    doc.push_str("Below is the content of each relevant text file in the project.\n");

    let mut packed = 0usize;
    for entry in included {
        let absolute = root.join(&entry.path);
        let bytes = match fs::read(&absolute) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %entry.path, %err, "skipping unreadable file");
                continue;
            }
        };
        let Ok(content) = String::from_utf8(bytes) else {
            warn!(path = %entry.path, "skipping non-text (binary) file");
            continue;
        };

        let language = language_for(&entry.path);
        doc.push_str(&format!(
            "\n---\n\n### `{}`\n\n```{language}\n{content}\n```\n",
            entry.path
        ));
        packed += 1;
    }

    info!(files = packed, "context assembled");
    doc
}
