//! # ctxpack
//!
//! Packs a project's text files into a single Markdown document for use as
//! language-model context. The core discovers every path under a project
//! root, filters it through a user-editable ignore-pattern file and renders
//! the survivors as a directory tree followed by their contents.
//!
//! ## Pipeline
//!
//! - [`walk`] produces the ordered entry list (files and directories, depth
//!   first, lexicographic per directory)
//! - [`PatternSet`] compiles the ignore file once into matchable rules
//! - [`filter_entries`] applies the rules, pruning excluded directories
//! - [`render_tree`] and [`assemble_context`] turn the surviving files into
//!   the final document
//!
//! Between invocations the entry list, project root and ignore file persist
//! in a [`Session`] directory, so editing patterns never requires re-walking
//! the filesystem.
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use ctxpack::{filter_entries, render_tree, walk, PatternSet};
//! use std::path::Path;
//!
//! fn main() -> ctxpack::Result<()> {
//!     let entries = walk(Path::new("/path/to/project"))?;
//!     let patterns = PatternSet::parse("node_modules\n*.log\nbuild/\n");
//!     let included = filter_entries(&entries, &patterns);
//!     println!("{}", render_tree("project", &included));
//!     Ok(())
//! }
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Record every file path of a project
//! ctxpack explore /path/to/project
//!
//! # Preview what survives the ignore patterns
//! ctxpack list
//!
//! # Write the Markdown context document
//! ctxpack pack --name "My Project" --summary "A web crawler."
//! ```

pub mod assemble;
pub mod discover;
pub mod error;
pub mod filter;
pub mod pattern;
pub mod session;
pub mod tree;

// Re-export main types and functions for convenience
pub use assemble::{assemble_context, language_for, PackOptions};
pub use discover::{walk, FileEntry};
pub use error::{CtxpackError, Result};
pub use filter::filter_entries;
pub use pattern::PatternSet;
pub use session::Session;
pub use tree::render_tree;
