use globset::{Glob, GlobMatcher};
use tracing::{trace, warn};

/// How a pattern's text is compared against a path.
#[derive(Debug, Clone)]
enum MatchKind {
    /// Verbatim text, compared against whole segments and the full path.
    Literal(String),
    /// Compiled shell glob, tested against the full path and each segment.
    Wildcard(GlobMatcher),
}

/// One compiled rule from the ignore file.
///
/// The rule kind is decided once at compile time: the presence of `*`, `?` or
/// `[` selects glob matching, a trailing `/` restricts the rule to directories
/// (and everything beneath them), and a leading `/` anchors it to the project
/// root.
#[derive(Debug, Clone)]
struct Pattern {
    /// Original line from the ignore file, kept for match tracing.
    raw: String,
    kind: MatchKind,
    dir_only: bool,
    anchored: bool,
}

impl Pattern {
    /// Compiles one ignore-file line. Returns `None` for comments, blank
    /// lines and malformed globs (which must never match anything).
    fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let raw = trimmed.to_string();
        let mut text = trimmed.replace('\\', "/");

        let dir_only = text.ends_with('/');
        while text.ends_with('/') {
            text.pop();
        }
        let anchored = text.starts_with('/');
        let text = text.trim_start_matches('/').to_string();
        if text.is_empty() {
            return None;
        }

        let kind = if text.contains(['*', '?', '[']) {
            match Glob::new(&text) {
                Ok(glob) => MatchKind::Wildcard(glob.compile_matcher()),
                Err(err) => {
                    warn!(pattern = %raw, %err, "malformed glob pattern will never match");
                    return None;
                }
            }
        } else {
            MatchKind::Literal(text)
        };

        Some(Self {
            raw,
            kind,
            dir_only,
            anchored,
        })
    }

    fn matches(&self, path: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            // A directory-only rule touches a file only transitively, through
            // a matching ancestor directory segment.
            return self.matches_ancestor(path);
        }
        self.matches_path(path)
    }

    fn matches_path(&self, path: &str) -> bool {
        match &self.kind {
            MatchKind::Literal(lit) => {
                if self.anchored {
                    path == lit || is_path_prefix(path, lit)
                } else {
                    path == lit || path.split('/').any(|segment| segment == lit)
                }
            }
            MatchKind::Wildcard(glob) => {
                if glob.is_match(path) {
                    return true;
                }
                !self.anchored && path.split('/').any(|segment| glob.is_match(segment))
            }
        }
    }

    /// True when some ancestor directory of `path` (every segment except the
    /// last) matches this pattern.
    fn matches_ancestor(&self, path: &str) -> bool {
        match &self.kind {
            MatchKind::Literal(lit) => {
                if self.anchored {
                    is_path_prefix(path, lit)
                } else {
                    let segments: Vec<&str> = path.split('/').collect();
                    segments[..segments.len() - 1]
                        .iter()
                        .any(|segment| segment == lit)
                }
            }
            MatchKind::Wildcard(glob) => {
                let segments: Vec<&str> = path.split('/').collect();
                let ancestors = &segments[..segments.len() - 1];
                if self.anchored {
                    // Progressively longer leading prefixes: "a", "a/b", ...
                    let mut prefix = String::new();
                    for segment in ancestors {
                        if !prefix.is_empty() {
                            prefix.push('/');
                        }
                        prefix.push_str(segment);
                        if glob.is_match(&prefix) {
                            return true;
                        }
                    }
                    false
                } else {
                    ancestors.iter().any(|segment| glob.is_match(segment))
                }
            }
        }
    }
}

/// True when `path` starts with `prefix` at a segment boundary, i.e. `path`
/// lies strictly beneath the directory named by `prefix`.
fn is_path_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// An ordered, immutable set of compiled ignore patterns.
///
/// One pattern per source line; `#`-prefixed lines and blank lines never
/// compile into patterns, and a malformed glob is dropped with a warning
/// instead of failing the whole set. There is no negation support: the first
/// matching pattern excludes the path and later patterns are not consulted.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compiles ignore-file text into a pattern set.
    pub fn parse(source: &str) -> Self {
        Self {
            patterns: source.lines().filter_map(Pattern::parse).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Decides exclusion for one root-relative `/`-separated path. Matching
    /// is case-sensitive and pure: identical arguments always give the same
    /// answer.
    pub fn is_excluded(&self, path: &str, is_dir: bool) -> bool {
        match self
            .patterns
            .iter()
            .find(|pattern| pattern.matches(path, is_dir))
        {
            Some(pattern) => {
                trace!(path, pattern = %pattern.raw, "path excluded");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(unused)]
const _: () = {};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blanks_skipped() {
        let set = PatternSet::parse("# a comment\n\n   \nnode_modules\n");
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_empty_source() {
        let set = PatternSet::parse("");
        assert!(set.is_empty());
        assert!(!set.is_excluded("anything", false));
    }

    #[test]
    fn test_literal_matches_any_segment() {
        let set = PatternSet::parse("node_modules");
        assert!(set.is_excluded("node_modules", true));
        assert!(set.is_excluded("node_modules/lib.js", false));
        assert!(set.is_excluded("web/node_modules/lib.js", false));
        assert!(!set.is_excluded("node_modules2/lib.js", false));
        assert!(!set.is_excluded("my_node_modules", false));
    }

    #[test]
    fn test_literal_matches_full_path() {
        let set = PatternSet::parse("src/generated.rs");
        assert!(set.is_excluded("src/generated.rs", false));
        // Not a single segment of the path, and not the full path either.
        assert!(!set.is_excluded("other/src/generated.rs", false));
        assert!(!set.is_excluded("src/generated.rs.bak", false));
    }

    #[test]
    fn test_anchored_literal_matches_from_root_only() {
        let set = PatternSet::parse("/build");
        assert!(set.is_excluded("build", true));
        assert!(set.is_excluded("build/output.bin", false));
        assert!(!set.is_excluded("src/build", true));
        assert!(!set.is_excluded("src/build/output.bin", false));
        assert!(!set.is_excluded("buildtools", true));
    }

    #[test]
    fn test_anchored_multi_segment_literal() {
        let set = PatternSet::parse("/docs/internal");
        assert!(set.is_excluded("docs/internal", true));
        assert!(set.is_excluded("docs/internal/notes.md", false));
        assert!(!set.is_excluded("docs/internals", true));
    }

    #[test]
    fn test_glob_matches_name_and_path() {
        let set = PatternSet::parse("*.log");
        assert!(set.is_excluded("run.log", false));
        assert!(set.is_excluded("logs/run.log", false));
        assert!(!set.is_excluded("run.txt", false));
    }

    #[test]
    fn test_glob_with_path_separator() {
        let set = PatternSet::parse("src/*.rs");
        assert!(set.is_excluded("src/main.rs", false));
        assert!(!set.is_excluded("src/main.py", false));
    }

    #[test]
    fn test_question_mark_and_class_globs() {
        let set = PatternSet::parse("file?.txt\n[ab].md");
        assert!(set.is_excluded("file1.txt", false));
        assert!(set.is_excluded("docs/file2.txt", false));
        assert!(!set.is_excluded("file10.txt", false));
        assert!(set.is_excluded("a.md", false));
        assert!(set.is_excluded("b.md", false));
        assert!(!set.is_excluded("c.md", false));
    }

    #[test]
    fn test_anchored_glob() {
        let set = PatternSet::parse("/bu*");
        assert!(set.is_excluded("build", true));
        assert!(set.is_excluded("buildtools", true));
        assert!(!set.is_excluded("src/build", true));
    }

    #[test]
    fn test_dir_only_pattern() {
        let set = PatternSet::parse("build/");
        // Matches the directory itself and files nested beneath it.
        assert!(set.is_excluded("build", true));
        assert!(set.is_excluded("build/output.bin", false));
        assert!(set.is_excluded("src/build", true));
        assert!(set.is_excluded("src/build/obj/a.o", false));
        // Never a bare file of the same name, and never a name prefix.
        assert!(!set.is_excluded("build", false));
        assert!(!set.is_excluded("buildtools", true));
        assert!(!set.is_excluded("buildtools/readme.md", false));
    }

    #[test]
    fn test_dir_only_glob_pattern() {
        let set = PatternSet::parse("target*/");
        assert!(set.is_excluded("target", true));
        assert!(set.is_excluded("target-debug", true));
        assert!(set.is_excluded("target/debug/app", false));
        assert!(!set.is_excluded("target", false));
    }

    #[test]
    fn test_anchored_dir_only_pattern() {
        let set = PatternSet::parse("/dist/");
        assert!(set.is_excluded("dist", true));
        assert!(set.is_excluded("dist/bundle.js", false));
        assert!(!set.is_excluded("packages/dist", true));
        assert!(!set.is_excluded("packages/dist/bundle.js", false));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let set = PatternSet::parse("Build");
        assert!(set.is_excluded("Build", true));
        assert!(!set.is_excluded("build", true));
    }

    #[test]
    fn test_malformed_glob_is_dropped() {
        let set = PatternSet::parse("[\n*.log");
        assert_eq!(set.len(), 1);
        assert!(!set.is_excluded("[", false));
        assert!(set.is_excluded("run.log", false));
    }

    #[test]
    fn test_negation_syntax_is_literal() {
        // `!pattern` has no special meaning; the line is an ordinary literal
        // and cannot re-include anything.
        let set = PatternSet::parse("*.log\n!important.log");
        assert!(set.is_excluded("important.log", false));
        assert!(set.is_excluded("!important.log", false));
    }

    #[test]
    fn test_matching_is_pure() {
        let set = PatternSet::parse("node_modules\n*.log");
        for _ in 0..3 {
            assert!(set.is_excluded("node_modules/a.js", false));
            assert!(!set.is_excluded("src/main.rs", false));
        }
    }

    #[test]
    fn test_backslashes_normalized() {
        let set = PatternSet::parse("build\\cache");
        assert!(set.is_excluded("build/cache", true));
    }

    #[test]
    fn test_lone_slash_compiles_to_nothing() {
        let set = PatternSet::parse("/");
        assert!(set.is_empty());
    }
}
