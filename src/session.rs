//! On-disk session state shared between `explore` and later invocations.
//!
//! `explore` walks the project once and persists what it found; `list` and
//! `pack` re-filter that persisted list against the current ignore file
//! without ever re-walking the filesystem, so pattern edits stay cheap.

use crate::discover::FileEntry;
use crate::error::{CtxpackError, Result};
use crate::pattern::PatternSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Name of the session directory created in the working directory.
pub const SESSION_DIR: &str = ".ctxpack";

const PATHS_FILE: &str = "file_paths.txt";
const IGNORE_FILE: &str = ".pathsignore";
const ROOT_FILE: &str = "project_root.txt";

/// Default output file name for `pack`.
pub const OUTPUT_FILE: &str = "context.md";

/// Patterns seeded into a freshly created ignore file.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "# Add patterns to ignore files or directories, one per line.",
    ".git",
    ".vscode",
    "__pycache__",
    ".env",
    "node_modules",
    ".DS_Store",
    "*.pyc",
    "*.log",
    SESSION_DIR,
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.webp",
    "*.svg",
    "*.ico",
    "*.mp3",
    "*.mp4",
    "*.avi",
    "*.mov",
    "*.flv",
    "*.wmv",
    "*.zip",
    "*.tar",
    "*.gz",
    "*.rar",
    "*.7z",
    "*.pdf",
    "*.doc",
    "*.docx",
    "*.xls",
    "*.xlsx",
    "*.ppt",
    "*.pptx",
    "*.o",
    "*.so",
    "*.a",
    "*.dll",
    "*.exe",
    "*.iso",
];

/// Handle to a `.ctxpack` session directory.
#[derive(Debug, Clone)]
pub struct Session {
    dir: PathBuf,
}

impl Session {
    /// Points at the session directory under `base` (usually the working
    /// directory). Nothing is created until [`Session::initialize`].
    pub fn new(base: &Path) -> Self {
        Self {
            dir: base.join(SESSION_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the user-editable ignore file.
    pub fn ignore_path(&self) -> PathBuf {
        self.dir.join(IGNORE_FILE)
    }

    /// Default path for the packed context document.
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(OUTPUT_FILE)
    }

    /// Creates the session directory and seeds a default ignore file if none
    /// exists yet. An existing ignore file is never overwritten.
    ///
    /// # Errors
    ///
    /// `CtxpackError::Io` if the directory or the ignore file cannot be
    /// written.
    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let ignore_path = self.ignore_path();
        if !ignore_path.exists() {
            let mut contents = DEFAULT_IGNORE_PATTERNS.join("\n");
            contents.push('\n');
            fs::write(&ignore_path, contents)?;
            info!(path = %ignore_path.display(), "created default ignore file");
        }
        Ok(())
    }

    /// Records the absolute project root for later invocations.
    pub fn write_root(&self, root: &Path) -> Result<()> {
        fs::write(self.dir.join(ROOT_FILE), root.display().to_string())?;
        Ok(())
    }

    /// Reads the project root recorded by `explore`.
    ///
    /// # Errors
    ///
    /// `CtxpackError::MissingSession` if no root has been recorded.
    pub fn read_root(&self) -> Result<PathBuf> {
        let path = self.dir.join(ROOT_FILE);
        if !path.exists() {
            return Err(CtxpackError::MissingSession {
                path: self.dir.clone(),
            });
        }
        let contents = fs::read_to_string(path)?;
        Ok(PathBuf::from(contents.trim()))
    }

    /// Persists the discovered entry list, one root-relative path per line.
    /// Directory entries carry a trailing `/` so they can drive pruning when
    /// the list is re-filtered.
    pub fn write_entries(&self, entries: &[FileEntry]) -> Result<()> {
        let mut out = String::new();
        for entry in entries {
            out.push_str(&entry.path);
            if entry.is_dir {
                out.push('/');
            }
            out.push('\n');
        }
        fs::write(self.dir.join(PATHS_FILE), out)?;
        Ok(())
    }

    /// Re-reads the persisted entry list without re-walking the filesystem.
    ///
    /// # Errors
    ///
    /// `CtxpackError::MissingSession` if `explore` has not produced a list
    /// yet.
    pub fn read_entries(&self) -> Result<Vec<FileEntry>> {
        let path = self.dir.join(PATHS_FILE);
        if !path.exists() {
            return Err(CtxpackError::MissingSession {
                path: self.dir.clone(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let entries = contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| match line.strip_suffix('/') {
                Some(dir) => FileEntry::dir(dir),
                None => FileEntry::file(line),
            })
            .collect();
        Ok(entries)
    }

    /// Loads and compiles the ignore patterns. An unreadable or missing
    /// pattern file yields an empty set and therefore no exclusions; it is
    /// never a fatal error.
    pub fn load_patterns(&self) -> PatternSet {
        match fs::read_to_string(self.ignore_path()) {
            Ok(source) => PatternSet::parse(&source),
            Err(err) => {
                warn!(%err, "ignore file unreadable, applying no exclusions");
                PatternSet::default()
            }
        }
    }
}

#[cfg(test)]
#[allow(unused)]
const _: () = {};
