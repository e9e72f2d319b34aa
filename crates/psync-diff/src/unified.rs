//! Unified-diff rendering in the layout `git diff` produces.

use std::fmt::Write;

use crate::model::{DiffHunk, DiffLine, FileDiff, FileStatus};

/// Render a whole change set as one unified diff.
pub fn render_unified(files: &[FileDiff]) -> String {
    let mut out = String::new();
    for file in files {
        out.push_str(&render_file(file));
    }
    out
}

/// Render one file's change, including its `diff --git` preamble.
pub fn render_file(file: &FileDiff) -> String {
    let old = file.old_path.as_deref().unwrap_or(file.path());
    let new = file.new_path.as_deref().unwrap_or(file.path());

    let mut out = String::new();
    let _ = writeln!(out, "diff --git a/{old} b/{new}");
    match file.status {
        FileStatus::Added => out.push_str("new file mode 100644\n"),
        FileStatus::Deleted => out.push_str("deleted file mode 100644\n"),
        FileStatus::Renamed => {
            let _ = writeln!(out, "rename from {old}");
            let _ = writeln!(out, "rename to {new}");
        }
        FileStatus::Modified => {}
    }

    if file.binary.is_some() {
        let _ = writeln!(
            out,
            "Binary files {} and {} differ",
            side("a", &file.old_path),
            side("b", &file.new_path)
        );
        return out;
    }
    if file.hunks.is_empty() {
        return out;
    }

    let _ = writeln!(out, "--- {}", side("a", &file.old_path));
    let _ = writeln!(out, "+++ {}", side("b", &file.new_path));
    for hunk in &file.hunks {
        render_hunk(&mut out, hunk);
    }
    out
}

fn side(prefix: &str, path: &Option<String>) -> String {
    match path {
        Some(p) => format!("{prefix}/{p}"),
        None => "/dev/null".to_string(),
    }
}

fn render_hunk(out: &mut String, hunk: &DiffHunk) {
    let _ = write!(
        out,
        "@@ -{} +{} @@",
        range(hunk.old_start, hunk.old_count),
        range(hunk.new_start, hunk.new_count)
    );
    if !hunk.section.is_empty() {
        let _ = write!(out, " {}", hunk.section);
    }
    out.push('\n');

    for line in &hunk.lines {
        match line {
            DiffLine::Context(t) => {
                let _ = writeln!(out, " {t}");
            }
            DiffLine::Added(t) => {
                let _ = writeln!(out, "+{t}");
            }
            DiffLine::Removed(t) => {
                let _ = writeln!(out, "-{t}");
            }
            DiffLine::NoNewlineAtEof => out.push_str("\\ No newline at end of file\n"),
        }
    }
}

// `git diff` omits the count when it is exactly one.
fn range(start: usize, count: usize) -> String {
    if count == 1 {
        start.to_string()
    } else {
        format!("{start},{count}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob_diff::diff_file;

    #[test]
    fn modified_file_layout() {
        let diff = diff_file(
            "Lib/os.py",
            "Lib/os.py",
            Some(b"a\nb\nc\n".as_slice()),
            Some(b"a\nB\nc\n".as_slice()),
        )
        .unwrap();
        let text = render_file(&diff);
        assert_eq!(
            text,
            "diff --git a/Lib/os.py b/Lib/os.py\n\
             --- a/Lib/os.py\n\
             +++ b/Lib/os.py\n\
             @@ -1,3 +1,3 @@\n \
             a\n\
             -b\n\
             +B\n \
             c\n"
        );
    }

    #[test]
    fn added_file_uses_dev_null() {
        let diff = diff_file("new.txt", "new.txt", None, Some(b"hello\n".as_slice())).unwrap();
        let text = render_file(&diff);
        assert!(text.contains("new file mode 100644\n"));
        assert!(text.contains("--- /dev/null\n+++ b/new.txt\n"));
        assert!(text.contains("@@ -0,0 +1 @@\n+hello\n"));
    }

    #[test]
    fn pure_rename_has_no_hunks() {
        let diff = diff_file("a.txt", "b.txt", Some(b"x\n".as_slice()), Some(b"x\n".as_slice())).unwrap();
        let text = render_file(&diff);
        assert!(text.contains("rename from a.txt\nrename to b.txt\n"));
        assert!(!text.contains("@@"));
    }

    #[test]
    fn section_heading_is_kept() {
        let mut diff = diff_file("m.c", "m.c", Some(b"a\n".as_slice()), Some(b"b\n".as_slice())).unwrap();
        diff.hunks[0].section = "int main(void)".into();
        assert!(render_file(&diff).contains("@@ -1 +1 @@ int main(void)\n"));
    }

    #[test]
    fn no_newline_marker_rendered() {
        let diff = diff_file("f", "f", Some(b"a\n".as_slice()), Some(b"a\nb".as_slice())).unwrap();
        assert!(render_file(&diff).ends_with("+b\n\\ No newline at end of file\n"));
    }
}
