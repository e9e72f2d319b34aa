//! Comment detection strategies, keyed by file type.
//!
//! Detection is line-local: a diff only shows the changed lines of a file,
//! so there is no reliable way to know whether a line sits inside a block
//! comment opened elsewhere. Each strategy answers one question for one
//! trimmed line: is it nothing but comment?

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Decides whether a single source line is comment-only.
pub trait CommentStrategy: Send + Sync {
    /// `line` has trailing whitespace already removed; leading whitespace
    /// is still present.
    fn is_comment_only(&self, line: &str) -> bool;
}

/// `#`-comment languages: Python, shell, RPM spec, Makefile, TOML, YAML.
///
/// A `#!` shebang line is not treated as a comment.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashComments;

impl CommentStrategy for HashComments {
    fn is_comment_only(&self, line: &str) -> bool {
        let t = line.trim_start();
        t.starts_with('#') && !t.starts_with("#!")
    }
}

/// C-family languages: `//` line comments and `/* */` blocks.
///
/// Comment-only lines are:
/// - `// ...`
/// - a complete `/* ... */` with nothing after the first `*/`
/// - an opener `/* ...` that does not close on the same line
/// - a closer `... */` with no `/*` on the line
/// - a `*` continuation: `*` alone, `* text`, or `*/`
///
/// A line with code before a trailing comment is never comment-only.
#[derive(Clone, Copy, Debug, Default)]
pub struct CFamilyComments;

impl CommentStrategy for CFamilyComments {
    fn is_comment_only(&self, line: &str) -> bool {
        let t = line.trim();
        if t.is_empty() {
            return false;
        }
        if t.starts_with("//") {
            return true;
        }
        if let Some(rest) = t.strip_prefix("/*") {
            return match rest.find("*/") {
                None => true,
                Some(end) => rest[end + 2..].trim().is_empty(),
            };
        }
        if t == "*" || t.starts_with("* ") || t.starts_with("*/") {
            return true;
        }
        t.ends_with("*/") && !t.contains("/*")
    }
}

/// Maps file extensions and well-known file names to comment strategies.
///
/// Lookups fall back to "no comments" for anything unregistered, which
/// makes the comment-stripping step a no-op for that file.
#[derive(Clone, Default)]
pub struct CommentRegistry {
    by_extension: HashMap<String, Arc<dyn CommentStrategy>>,
    by_file_name: HashMap<String, Arc<dyn CommentStrategy>>,
}

impl CommentRegistry {
    /// An empty registry: no file type has comments stripped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in set of hash-comment and C-family file types.
    pub fn with_defaults() -> Self {
        let hash: Arc<dyn CommentStrategy> = Arc::new(HashComments);
        let c_family: Arc<dyn CommentStrategy> = Arc::new(CFamilyComments);

        let mut registry = Self::empty();
        for ext in [
            "py", "pyi", "pyw", "sh", "bash", "zsh", "spec", "toml", "yaml", "yml", "cfg",
            "conf", "mk", "cmake", "pl", "rb",
        ] {
            registry.by_extension.insert(ext.to_string(), hash.clone());
        }
        for name in ["Makefile", "GNUmakefile", "Dockerfile", "CMakeLists.txt"] {
            registry.by_file_name.insert(name.to_string(), hash.clone());
        }
        for ext in [
            "c", "h", "cc", "cpp", "cxx", "hh", "hpp", "hxx", "m", "rs", "go", "java", "js",
            "ts", "cs", "swift", "kt", "scala",
        ] {
            registry.by_extension.insert(ext.to_string(), c_family.clone());
        }
        registry
    }

    /// Register (or replace) the strategy for a file extension, without the
    /// leading dot. Extensions are matched case-insensitively.
    pub fn register_extension(
        &mut self,
        ext: impl Into<String>,
        strategy: Arc<dyn CommentStrategy>,
    ) -> &mut Self {
        self.by_extension.insert(ext.into().to_ascii_lowercase(), strategy);
        self
    }

    /// Register (or replace) the strategy for an exact file name.
    pub fn register_file_name(
        &mut self,
        name: impl Into<String>,
        strategy: Arc<dyn CommentStrategy>,
    ) -> &mut Self {
        self.by_file_name.insert(name.into(), strategy);
        self
    }

    /// The strategy for `path`, if its file type is known.
    pub fn strategy_for(&self, path: &str) -> Option<&dyn CommentStrategy> {
        let path = Path::new(path);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if let Some(s) = self.by_file_name.get(name) {
                return Some(s.as_ref());
            }
        }
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.by_extension.get(&ext).map(|s| s.as_ref())
    }

    /// Whether `line` of the file at `path` is comment-only.
    pub fn is_comment_only(&self, path: &str, line: &str) -> bool {
        self.strategy_for(path)
            .is_some_and(|s| s.is_comment_only(line))
    }
}

impl std::fmt::Debug for CommentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut exts: Vec<_> = self.by_extension.keys().collect();
        exts.sort();
        let mut names: Vec<_> = self.by_file_name.keys().collect();
        names.sort();
        f.debug_struct("CommentRegistry")
            .field("extensions", &exts)
            .field("file_names", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_comments() {
        let s = HashComments;
        assert!(s.is_comment_only("# comment"));
        assert!(s.is_comment_only("    # indented"));
        assert!(s.is_comment_only("#"));
        assert!(!s.is_comment_only("x = 1  # trailing"));
        assert!(!s.is_comment_only("#!/usr/bin/env python3"));
        assert!(!s.is_comment_only(""));
    }

    #[test]
    fn c_line_comments() {
        let s = CFamilyComments;
        assert!(s.is_comment_only("// note"));
        assert!(s.is_comment_only("    // indented"));
        assert!(!s.is_comment_only("x++; // trailing"));
        assert!(!s.is_comment_only("url = \"http://x\";"));
    }

    #[test]
    fn c_block_comments() {
        let s = CFamilyComments;
        assert!(s.is_comment_only("/* whole */"));
        assert!(s.is_comment_only("/* opener without close"));
        assert!(s.is_comment_only("/**"));
        assert!(s.is_comment_only(" * continuation"));
        assert!(s.is_comment_only(" *"));
        assert!(s.is_comment_only(" */"));
        assert!(s.is_comment_only("   end of block */"));
    }

    #[test]
    fn c_code_around_block_comments_is_code() {
        let s = CFamilyComments;
        assert!(!s.is_comment_only("/* a */ int x;"));
        assert!(!s.is_comment_only("int x; /* a */"));
        assert!(!s.is_comment_only("*p = 1;"));
        assert!(!s.is_comment_only("x = a */* b */ c;"));
        assert!(!s.is_comment_only("}"));
    }

    #[test]
    fn token_inside_comment_is_still_comment() {
        // A block comment quoting code stays a comment line by line.
        let s = CFamilyComments;
        assert!(s.is_comment_only(" * if (x) { return -1; }"));
        assert!(s.is_comment_only("/* return 0; */"));
    }

    #[test]
    fn registry_lookup_by_extension_and_name() {
        let registry = CommentRegistry::with_defaults();
        assert!(registry.is_comment_only("Lib/os.py", "# c"));
        assert!(registry.is_comment_only("Python/ceval.C", "// c"));
        assert!(registry.is_comment_only("Makefile", "# c"));
        assert!(!registry.is_comment_only("Python/ceval.c", "# c"));
        assert!(!registry.is_comment_only("README.rst", "# heading"));
        assert!(registry.strategy_for("no_extension").is_none());
    }

    #[test]
    fn registry_is_extensible() {
        let mut registry = CommentRegistry::empty();
        assert!(!registry.is_comment_only("a.lua", "-- c"));

        struct Lua;
        impl CommentStrategy for Lua {
            fn is_comment_only(&self, line: &str) -> bool {
                line.trim_start().starts_with("--")
            }
        }
        registry.register_extension("LUA", Arc::new(Lua));
        assert!(registry.is_comment_only("a.lua", "-- c"));
    }
}
