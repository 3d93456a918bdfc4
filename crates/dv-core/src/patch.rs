//! Unified diff parsing

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PatchError {
    #[error("line {line}: invalid hunk header {text:?}")]
    InvalidHunkHeader { line: usize, text: String },
    #[error("line {line}: hunk line outside of a file")]
    OrphanHunkLine { line: usize },
}

/// Change status of a file in a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileStatus {
    #[default]
    Modified,
    Added,
    Deleted,
    Renamed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    Context,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub old_line: Option<usize>,
    pub new_line: Option<usize>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    /// Full `@@ ... @@` header line
    pub header: String,
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

/// One file's worth of a unified diff
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffFile {
    pub display_path: String,
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub status: FileStatus,
    pub hunks: Vec<DiffHunk>,
    pub additions: usize,
    pub deletions: usize,
    pub is_binary: bool,
}

impl DiffFile {
    fn finish(mut self) -> Option<Self> {
        let path = self.new_path.clone().or_else(|| self.old_path.clone())?;
        self.display_path = path;
        if self.status == FileStatus::Modified {
            match (&self.old_path, &self.new_path) {
                (None, Some(_)) => self.status = FileStatus::Added,
                (Some(_), None) => self.status = FileStatus::Deleted,
                (Some(old), Some(new)) if old != new => self.status = FileStatus::Renamed,
                _ => {}
            }
        }
        Some(self)
    }
}

struct HunkCursor {
    old_line: usize,
    new_line: usize,
    old_remaining: usize,
    new_remaining: usize,
}

impl HunkCursor {
    fn is_open(&self) -> bool {
        self.old_remaining > 0 || self.new_remaining > 0
    }
}

/// Parse `git diff` / `diff -u` output into per-file records
pub fn parse_unified_diff(text: &str) -> Result<Vec<DiffFile>, PatchError> {
    let mut files = Vec::new();
    let mut current: Option<DiffFile> = None;
    let mut hunk: Option<HunkCursor> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if let Some(cursor) = hunk.as_mut().filter(|c| c.is_open()) {
            let file = current
                .as_mut()
                .ok_or(PatchError::OrphanHunkLine { line: line_no })?;
            if push_hunk_line(file, cursor, line) {
                continue;
            }
        }

        if let Some(rest) = line.strip_prefix("diff --git ") {
            files.extend(current.take().and_then(DiffFile::finish));
            hunk = None;
            let (old, new) = split_git_header_paths(rest);
            current = Some(DiffFile {
                old_path: old,
                new_path: new,
                ..DiffFile::default()
            });
            continue;
        }

        if let Some(rest) = line.strip_prefix("--- ") {
            // Plain `diff -u` output has no `diff --git` line between files
            let starts_new = current
                .as_ref()
                .map(|file| !file.hunks.is_empty())
                .unwrap_or(true);
            if starts_new {
                files.extend(current.take().and_then(DiffFile::finish));
                current = Some(DiffFile::default());
            }
            hunk = None;
            if let Some(file) = current.as_mut() {
                file.old_path = header_path(rest);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("+++ ") {
            if let Some(file) = current.as_mut() {
                file.new_path = header_path(rest);
            }
            continue;
        }

        if line.starts_with("@@") {
            let file = current
                .as_mut()
                .ok_or(PatchError::OrphanHunkLine { line: line_no })?;
            let parsed = parse_hunk_header(line).ok_or_else(|| PatchError::InvalidHunkHeader {
                line: line_no,
                text: line.to_string(),
            })?;
            hunk = Some(HunkCursor {
                old_line: parsed.old_start,
                new_line: parsed.new_start,
                old_remaining: parsed.old_count,
                new_remaining: parsed.new_count,
            });
            file.hunks.push(parsed);
            continue;
        }

        let Some(file) = current.as_mut() else {
            continue;
        };
        if line.starts_with("new file mode") {
            file.status = FileStatus::Added;
            file.old_path = None;
        } else if line.starts_with("deleted file mode") {
            file.status = FileStatus::Deleted;
            file.new_path = None;
        } else if let Some(path) = line.strip_prefix("rename from ") {
            file.status = FileStatus::Renamed;
            file.old_path = Some(path.to_string());
        } else if let Some(path) = line.strip_prefix("rename to ") {
            file.status = FileStatus::Renamed;
            file.new_path = Some(path.to_string());
        } else if line.starts_with("Binary files ") || line.starts_with("GIT binary patch") {
            file.is_binary = true;
        }
    }

    files.extend(current.take().and_then(DiffFile::finish));
    Ok(files)
}

/// Returns false when the line does not belong to the hunk body
fn push_hunk_line(file: &mut DiffFile, cursor: &mut HunkCursor, line: &str) -> bool {
    let (kind, text) = match line.chars().next() {
        Some('+') => (DiffLineKind::Added, &line[1..]),
        Some('-') => (DiffLineKind::Removed, &line[1..]),
        Some(' ') => (DiffLineKind::Context, &line[1..]),
        // Some tools strip the single space from blank context lines
        None => (DiffLineKind::Context, ""),
        Some('\\') => return true,
        Some(_) => return false,
    };

    let (old_line, new_line) = match kind {
        DiffLineKind::Added => {
            let new = cursor.new_line;
            cursor.new_line += 1;
            cursor.new_remaining = cursor.new_remaining.saturating_sub(1);
            file.additions += 1;
            (None, Some(new))
        }
        DiffLineKind::Removed => {
            let old = cursor.old_line;
            cursor.old_line += 1;
            cursor.old_remaining = cursor.old_remaining.saturating_sub(1);
            file.deletions += 1;
            (Some(old), None)
        }
        DiffLineKind::Context => {
            let pair = (cursor.old_line, cursor.new_line);
            cursor.old_line += 1;
            cursor.new_line += 1;
            cursor.old_remaining = cursor.old_remaining.saturating_sub(1);
            cursor.new_remaining = cursor.new_remaining.saturating_sub(1);
            (Some(pair.0), Some(pair.1))
        }
    };

    if let Some(hunk) = file.hunks.last_mut() {
        hunk.lines.push(DiffLine {
            kind,
            old_line,
            new_line,
            text: text.to_string(),
        });
    }
    true
}

fn parse_hunk_header(line: &str) -> Option<DiffHunk> {
    let rest = line.strip_prefix("@@ ")?;
    let end = rest.find(" @@")?;
    let mut ranges = rest[..end].split_whitespace();
    let (old_start, old_count) = parse_range(ranges.next()?.strip_prefix('-')?)?;
    let (new_start, new_count) = parse_range(ranges.next()?.strip_prefix('+')?)?;
    if ranges.next().is_some() {
        return None;
    }
    Some(DiffHunk {
        header: line.to_string(),
        old_start,
        old_count,
        new_start,
        new_count,
        lines: Vec::new(),
    })
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

fn split_git_header_paths(rest: &str) -> (Option<String>, Option<String>) {
    let rest = rest.trim();
    match rest.rfind(" b/") {
        Some(pos) => (
            strip_side_prefix(&rest[..pos]),
            strip_side_prefix(&rest[pos + 1..]),
        ),
        None => (None, None),
    }
}

fn header_path(rest: &str) -> Option<String> {
    // `diff -u` appends a tab and a timestamp
    let path = rest.split('\t').next().unwrap_or(rest).trim();
    if path == "/dev/null" {
        return None;
    }
    strip_side_prefix(path)
}

fn strip_side_prefix(path: &str) -> Option<String> {
    let path = path.trim().trim_matches('"');
    let path = path
        .strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path);
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
index 1111111..2222222 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,4 @@ fn main
 keep
-old
+new
+extra
 tail
diff --git a/docs/new.md b/docs/new.md
new file mode 100644
--- /dev/null
+++ b/docs/new.md
@@ -0,0 +1 @@
+hello
";

    #[test]
    fn test_parses_files_and_counts() {
        let files = parse_unified_diff(SAMPLE).unwrap();
        assert_eq!(files.len(), 2);

        let lib = &files[0];
        assert_eq!(lib.display_path, "src/lib.rs");
        assert_eq!(lib.status, FileStatus::Modified);
        assert_eq!((lib.additions, lib.deletions), (2, 1));
        assert_eq!(lib.hunks.len(), 1);
        let lines = &lib.hunks[0].lines;
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1].kind, DiffLineKind::Removed);
        assert_eq!(lines[1].old_line, Some(2));
        assert_eq!(lines[1].new_line, None);
        assert_eq!(lines[3].new_line, Some(3));
        assert_eq!(lines[4].old_line, Some(3));
        assert_eq!(lines[4].new_line, Some(4));

        let added = &files[1];
        assert_eq!(added.display_path, "docs/new.md");
        assert_eq!(added.status, FileStatus::Added);
        assert_eq!(added.additions, 1);
    }

    #[test]
    fn test_removed_line_starting_with_dashes_stays_in_hunk() {
        let text = "\
--- a/x.txt
+++ b/x.txt
@@ -1,2 +1 @@
--- not a header
 keep
";
        let files = parse_unified_diff(text).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].deletions, 1);
        assert_eq!(files[0].hunks[0].lines[0].text, "-- not a header");
    }

    #[test]
    fn test_deleted_file_uses_old_path() {
        let text = "\
diff --git a/gone.txt b/gone.txt
deleted file mode 100644
--- a/gone.txt
+++ /dev/null
@@ -1 +0,0 @@
-bye
";
        let files = parse_unified_diff(text).unwrap();
        assert_eq!(files[0].display_path, "gone.txt");
        assert_eq!(files[0].status, FileStatus::Deleted);
    }

    #[test]
    fn test_rename_without_hunks() {
        let text = "\
diff --git a/old.rs b/new.rs
similarity index 100%
rename from old.rs
rename to new.rs
";
        let files = parse_unified_diff(text).unwrap();
        assert_eq!(files[0].display_path, "new.rs");
        assert_eq!(files[0].status, FileStatus::Renamed);
        assert!(files[0].hunks.is_empty());
    }

    #[test]
    fn test_binary_file_flag() {
        let text = "\
diff --git a/img.png b/img.png
Binary files a/img.png and b/img.png differ
";
        let files = parse_unified_diff(text).unwrap();
        assert!(files[0].is_binary);
    }

    #[test]
    fn test_invalid_hunk_header_reports_line() {
        let text = "\
diff --git a/a.txt b/a.txt
--- a/a.txt
+++ b/a.txt
@@ -x +1 @@
";
        let err = parse_unified_diff(text).unwrap_err();
        assert!(matches!(err, PatchError::InvalidHunkHeader { line: 4, .. }));
    }

    #[test]
    fn test_orphan_hunk_is_an_error() {
        let err = parse_unified_diff("@@ -1 +1 @@\n-a\n+b\n").unwrap_err();
        assert_eq!(err, PatchError::OrphanHunkLine { line: 1 });
    }

    #[test]
    fn test_empty_input_has_no_files() {
        assert!(parse_unified_diff("").unwrap().is_empty());
    }
}
