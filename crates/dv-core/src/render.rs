//! Row projections of a parsed file: unified and side-by-side
//!
//! Both projections carry per-row line classification and old/new line
//! numbers, which is what scroll anchoring reads. Visual row counts account
//! for wrapping at a given viewport width.

use crate::patch::{DiffFile, DiffLine, DiffLineKind};
use std::ops::RangeInclusive;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TAB_WIDTH: usize = 4;

/// Left pane share of an evenly split side-by-side view
pub const EVEN_SPLIT: f64 = 0.5;

/// Classification of a rendered row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Context,
    Added,
    Removed,
    /// `@@` hunk header
    Hunk,
    /// Messages and summaries
    Meta,
}

impl From<DiffLineKind> for LineKind {
    fn from(kind: DiffLineKind) -> Self {
        match kind {
            DiffLineKind::Context => LineKind::Context,
            DiffLineKind::Added => LineKind::Added,
            DiffLineKind::Removed => LineKind::Removed,
        }
    }
}

/// Content identity of a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollAnchor {
    pub kind: LineKind,
    pub old_line: Option<usize>,
    pub new_line: Option<usize>,
}

/// Byte range of the changed part of a paired line
pub type Emphasis = Option<(usize, usize)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedRow {
    pub kind: LineKind,
    pub old_line: Option<usize>,
    pub new_line: Option<usize>,
    pub text: String,
    pub emphasis: Emphasis,
}

impl UnifiedRow {
    fn meta(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            old_line: None,
            new_line: None,
            text: text.into(),
            emphasis: None,
        }
    }

    pub fn anchor(&self) -> ScrollAnchor {
        ScrollAnchor {
            kind: self.kind,
            old_line: self.old_line,
            new_line: self.new_line,
        }
    }
}

/// One half of a side-by-side row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideCell {
    pub kind: LineKind,
    pub line_number: Option<usize>,
    pub text: String,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SideBySideRow {
    pub left: Option<SideCell>,
    pub right: Option<SideCell>,
    /// Spans both panes (hunk headers, messages)
    pub shared: Option<UnifiedRow>,
}

impl SideBySideRow {
    fn shared(row: UnifiedRow) -> Self {
        Self {
            shared: Some(row),
            ..Self::default()
        }
    }

    /// None for a row with no content on either side
    pub fn anchor(&self) -> Option<ScrollAnchor> {
        if let Some(shared) = &self.shared {
            return Some(shared.anchor());
        }
        if self.left.is_none() && self.right.is_none() {
            return None;
        }

        let mut anchor = ScrollAnchor {
            kind: LineKind::Context,
            old_line: None,
            new_line: None,
        };
        if let Some(right) = &self.right {
            anchor.kind = right.kind;
            anchor.new_line = right.line_number;
        }
        if let Some(left) = &self.left {
            if self.right.is_none() {
                anchor.kind = left.kind;
            }
            anchor.old_line = left.line_number;
        }
        Some(anchor)
    }
}

/// Display payload for the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub title: String,
    pub unified: Vec<UnifiedRow>,
    pub side_by_side: Vec<SideBySideRow>,
}

impl RenderedFile {
    pub fn from_diff(file: &DiffFile) -> Self {
        let mut unified = Vec::new();
        let mut side_by_side = Vec::new();

        if file.hunks.is_empty() {
            let note = if file.is_binary {
                "Binary file differs."
            } else {
                "No content changes."
            };
            let row = UnifiedRow::meta(LineKind::Meta, note);
            side_by_side.push(SideBySideRow::shared(row.clone()));
            unified.push(row);
        }

        for hunk in &file.hunks {
            let header = UnifiedRow::meta(LineKind::Hunk, expand_tabs(&hunk.header));
            side_by_side.push(SideBySideRow::shared(header.clone()));
            unified.push(header);

            let emphasis = pair_emphasis(&hunk.lines);
            for (line, emphasis) in hunk.lines.iter().zip(&emphasis) {
                unified.push(UnifiedRow {
                    kind: line.kind.into(),
                    old_line: line.old_line,
                    new_line: line.new_line,
                    text: expand_tabs(&line.text),
                    emphasis: *emphasis,
                });
            }
            side_by_side.extend(pair_side_rows(&hunk.lines, &emphasis));
        }

        Self {
            title: file.display_path.clone(),
            unified,
            side_by_side,
        }
    }

    /// A plain-text payload, one meta row per line
    pub fn message(title: impl Into<String>, text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n");
        Self::from_lines(title, normalized.split('\n'))
    }

    pub fn from_lines<I, S>(title: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unified: Vec<UnifiedRow> = lines
            .into_iter()
            .map(|line| UnifiedRow::meta(LineKind::Meta, expand_tabs(line.as_ref())))
            .collect();
        let side_by_side = unified.iter().cloned().map(SideBySideRow::shared).collect();
        Self {
            title: title.into(),
            unified,
            side_by_side,
        }
    }

    pub fn is_message(&self) -> bool {
        self.unified.iter().all(|row| row.kind == LineKind::Meta)
    }
}

/// Side-by-side pairing: runs of removed lines followed by added lines are
/// zipped row by row, leftovers stay one-sided.
fn pair_side_rows(lines: &[DiffLine], emphasis: &[Emphasis]) -> Vec<SideBySideRow> {
    let mut rows = Vec::new();
    let mut removed: Vec<SideCell> = Vec::new();
    let mut added: Vec<SideCell> = Vec::new();

    let flush = |rows: &mut Vec<SideBySideRow>,
                 removed: &mut Vec<SideCell>,
                 added: &mut Vec<SideCell>| {
        let count = removed.len().max(added.len());
        let mut left = removed.drain(..);
        let mut right = added.drain(..);
        for _ in 0..count {
            rows.push(SideBySideRow {
                left: left.next(),
                right: right.next(),
                shared: None,
            });
        }
    };

    for (line, emphasis) in lines.iter().zip(emphasis) {
        match line.kind {
            DiffLineKind::Removed => {
                if !added.is_empty() {
                    flush(&mut rows, &mut removed, &mut added);
                }
                removed.push(SideCell {
                    kind: LineKind::Removed,
                    line_number: line.old_line,
                    text: expand_tabs(&line.text),
                    emphasis: *emphasis,
                });
            }
            DiffLineKind::Added => added.push(SideCell {
                kind: LineKind::Added,
                line_number: line.new_line,
                text: expand_tabs(&line.text),
                emphasis: *emphasis,
            }),
            DiffLineKind::Context => {
                flush(&mut rows, &mut removed, &mut added);
                let text = expand_tabs(&line.text);
                rows.push(SideBySideRow {
                    left: Some(SideCell {
                        kind: LineKind::Context,
                        line_number: line.old_line,
                        text: text.clone(),
                        emphasis: None,
                    }),
                    right: Some(SideCell {
                        kind: LineKind::Context,
                        line_number: line.new_line,
                        text,
                        emphasis: None,
                    }),
                    shared: None,
                });
            }
        }
    }
    flush(&mut rows, &mut removed, &mut added);
    rows
}

/// Changed byte range for each removed/added line that has a partner
fn pair_emphasis(lines: &[DiffLine]) -> Vec<Emphasis> {
    let mut out = vec![None; lines.len()];
    let mut idx = 0;
    while idx < lines.len() {
        if lines[idx].kind != DiffLineKind::Removed {
            idx += 1;
            continue;
        }
        let removed_start = idx;
        while idx < lines.len() && lines[idx].kind == DiffLineKind::Removed {
            idx += 1;
        }
        let added_start = idx;
        while idx < lines.len() && lines[idx].kind == DiffLineKind::Added {
            idx += 1;
        }
        let pairs = (added_start - removed_start).min(idx - added_start);
        for offset in 0..pairs {
            let old = removed_start + offset;
            let new = added_start + offset;
            let (old_range, new_range) =
                changed_ranges(&expand_tabs(&lines[old].text), &expand_tabs(&lines[new].text));
            out[old] = old_range;
            out[new] = new_range;
        }
    }
    out
}

/// Ranges between the common prefix and common suffix of two lines
fn changed_ranges(old: &str, new: &str) -> (Emphasis, Emphasis) {
    if old == new {
        return (None, None);
    }
    let prefix: usize = old
        .chars()
        .zip(new.chars())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .sum();
    let suffix: usize = old[prefix..]
        .chars()
        .rev()
        .zip(new[prefix..].chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .sum();

    let range = |text: &str| {
        let end = text.len() - suffix;
        (prefix < end).then_some((prefix, end))
    };
    (range(old), range(new))
}

fn expand_tabs(text: &str) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + TAB_WIDTH);
    let mut col = 0;
    for ch in text.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - col % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(pad));
            col += pad;
        } else {
            out.push(ch);
            col += ch.width().unwrap_or(0);
        }
    }
    out
}

/// Columns needed for the largest line number in `numbers`
pub fn line_number_digits(numbers: impl Iterator<Item = Option<usize>>) -> usize {
    numbers.flatten().max().unwrap_or(0).max(1).to_string().len()
}

/// Width of the line-number gutter in the unified layout
pub fn unified_gutter_width(rows: &[UnifiedRow], show_signs: bool) -> usize {
    let old = line_number_digits(rows.iter().map(|row| row.old_line));
    let new = line_number_digits(rows.iter().map(|row| row.new_line));
    old + 1 + new + 1 + if show_signs { 2 } else { 0 }
}

/// Width of the line-number gutter inside one side-by-side pane
pub fn side_by_side_gutter_width(rows: &[SideBySideRow], show_signs: bool) -> usize {
    let numbers = rows.iter().flat_map(|row| {
        [
            row.left.as_ref().and_then(|cell| cell.line_number),
            row.right.as_ref().and_then(|cell| cell.line_number),
        ]
    });
    line_number_digits(numbers) + 1 + if show_signs { 2 } else { 0 }
}

/// Left and right pane widths, with one column reserved for the divider
///
/// `split` is the left pane's share of the columns beside the divider.
pub fn side_pane_widths(viewport_width: usize, split: f64) -> (usize, usize) {
    let available = viewport_width.saturating_sub(1);
    let left = ((available as f64) * split.clamp(0.0, 1.0)).round() as usize;
    let left = left.min(available);
    (left, available - left)
}

/// Left pane widths that leave both panes one content column past `gutter`
pub fn side_divider_range(viewport_width: usize, gutter: usize) -> Option<RangeInclusive<usize>> {
    let available = viewport_width.saturating_sub(1);
    let min = gutter + 1;
    let max = available.checked_sub(gutter + 1)?;
    (min <= max).then_some(min..=max)
}

/// Split that puts the divider after `left` columns
pub fn split_for_left_width(viewport_width: usize, left: usize) -> f64 {
    let available = viewport_width.saturating_sub(1);
    if available == 0 {
        return EVEN_SPLIT;
    }
    left.min(available) as f64 / available as f64
}

/// Drop the first `columns` display columns of `text`
///
/// Returns the byte offset of what remains. A wide character straddling the
/// cut is dropped whole.
pub fn skip_columns(text: &str, columns: usize) -> (usize, &str) {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        if used >= columns {
            return (idx, &text[idx..]);
        }
        used += ch.width().unwrap_or(0);
    }
    (text.len(), "")
}

/// Split text into chunks whose display width fits `width`
pub fn wrap_text(text: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > width && idx > start {
            chunks.push(&text[start..idx]);
            start = idx;
            used = 0;
        }
        used += w;
    }
    chunks.push(&text[start..]);
    chunks
}

fn wrapped_height(text: &str, width: usize) -> usize {
    wrap_text(text, width).len()
}

/// Visual rows of the unified layout at `viewport_width` (0 means unknown)
pub fn unified_visual_rows(rows: &[UnifiedRow], viewport_width: usize, show_signs: bool) -> usize {
    if viewport_width == 0 {
        return rows.len();
    }
    let content = viewport_width
        .saturating_sub(unified_gutter_width(rows, show_signs))
        .max(1);
    rows.iter()
        .map(|row| match row.kind {
            LineKind::Hunk | LineKind::Meta => wrapped_height(&row.text, viewport_width),
            _ => wrapped_height(&row.text, content),
        })
        .sum()
}

/// Visual rows of the side-by-side layout at `viewport_width` (0 means unknown)
pub fn side_by_side_visual_rows(
    rows: &[SideBySideRow],
    viewport_width: usize,
    show_signs: bool,
    split: f64,
) -> usize {
    if viewport_width == 0 {
        return rows.len();
    }
    let gutter = side_by_side_gutter_width(rows, show_signs);
    let (left_width, right_width) = side_pane_widths(viewport_width, split);
    let left_content = left_width.saturating_sub(gutter).max(1);
    let right_content = right_width.saturating_sub(gutter).max(1);

    rows.iter()
        .map(|row| {
            if let Some(shared) = &row.shared {
                return wrapped_height(&shared.text, viewport_width);
            }
            let left = row
                .left
                .as_ref()
                .map(|cell| wrapped_height(&cell.text, left_content))
                .unwrap_or(1);
            let right = row
                .right
                .as_ref()
                .map(|cell| wrapped_height(&cell.text, right_content))
                .unwrap_or(1);
            left.max(right)
        })
        .sum()
}

/// Columns the unwrapped unified layout can scroll before its widest row ends
pub fn unified_max_scroll_x(rows: &[UnifiedRow], viewport_width: usize, show_signs: bool) -> usize {
    if viewport_width == 0 {
        return 0;
    }
    let content = viewport_width
        .saturating_sub(unified_gutter_width(rows, show_signs))
        .max(1);
    rows.iter()
        .map(|row| {
            let room = match row.kind {
                LineKind::Hunk | LineKind::Meta => viewport_width,
                _ => content,
            };
            row.text.width().saturating_sub(room)
        })
        .max()
        .unwrap_or(0)
}

/// Columns the unwrapped side-by-side layout can scroll; both panes share it
pub fn side_by_side_max_scroll_x(
    rows: &[SideBySideRow],
    viewport_width: usize,
    show_signs: bool,
    split: f64,
) -> usize {
    if viewport_width == 0 {
        return 0;
    }
    let gutter = side_by_side_gutter_width(rows, show_signs);
    let (left_width, right_width) = side_pane_widths(viewport_width, split);
    let left_content = left_width.saturating_sub(gutter).max(1);
    let right_content = right_width.saturating_sub(gutter).max(1);
    let overflow = |cell: &Option<SideCell>, room: usize| {
        cell.as_ref()
            .map_or(0, |cell| cell.text.width().saturating_sub(room))
    };

    rows.iter()
        .map(|row| match &row.shared {
            Some(shared) => shared.text.width().saturating_sub(viewport_width),
            None => overflow(&row.left, left_content).max(overflow(&row.right, right_content)),
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::parse_unified_diff;

    fn render(diff: &str) -> RenderedFile {
        let files = parse_unified_diff(diff).unwrap();
        RenderedFile::from_diff(&files[0])
    }

    const REPLACE: &str = "\
diff --git a/a.txt b/a.txt
--- a/a.txt
+++ b/a.txt
@@ -1,2 +1,2 @@
-let x = 1;
+let x = 2;
 keep
";

    #[test]
    fn test_unified_rows_start_with_hunk_header() {
        let rendered = render(REPLACE);
        assert_eq!(rendered.title, "a.txt");
        assert_eq!(rendered.unified.len(), 4);
        assert_eq!(rendered.unified[0].kind, LineKind::Hunk);
        assert_eq!(
            rendered.unified[1].anchor(),
            ScrollAnchor {
                kind: LineKind::Removed,
                old_line: Some(1),
                new_line: None,
            }
        );
    }

    #[test]
    fn test_side_by_side_pairs_removed_and_added() {
        let rendered = render(REPLACE);
        assert_eq!(rendered.side_by_side.len(), 3);
        let paired = &rendered.side_by_side[1];
        assert_eq!(paired.left.as_ref().unwrap().line_number, Some(1));
        assert_eq!(paired.right.as_ref().unwrap().line_number, Some(1));
        assert_eq!(
            paired.anchor(),
            Some(ScrollAnchor {
                kind: LineKind::Added,
                old_line: Some(1),
                new_line: Some(1),
            })
        );
    }

    #[test]
    fn test_leftover_removed_lines_are_one_sided() {
        let rendered = render(
            "\
--- a/b.txt
+++ b/b.txt
@@ -1,3 +1,2 @@
-one
-two
+uno
 three
",
        );
        let rows = &rendered.side_by_side;
        assert_eq!(rows.len(), 4);
        assert!(rows[2].right.is_none());
        assert_eq!(rows[2].anchor().unwrap().kind, LineKind::Removed);
        assert_eq!(rows[2].anchor().unwrap().old_line, Some(2));
    }

    #[test]
    fn test_intraline_emphasis_covers_changed_middle() {
        let rendered = render(REPLACE);
        assert_eq!(rendered.unified[1].emphasis, Some((8, 9)));
        assert_eq!(rendered.unified[2].emphasis, Some((8, 9)));
        assert_eq!(rendered.unified[3].emphasis, None);
    }

    #[test]
    fn test_message_rows_are_shared() {
        let rendered = RenderedFile::message("Diff", "first\r\n\r\nthird");
        assert_eq!(rendered.unified.len(), 3);
        assert_eq!(rendered.side_by_side.len(), 3);
        assert!(rendered.is_message());
        assert_eq!(rendered.side_by_side[2].shared.as_ref().unwrap().text, "third");
    }

    #[test]
    fn test_wrap_text_respects_display_width() {
        assert_eq!(wrap_text("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_text("", 4), vec![""]);
        assert_eq!(wrap_text("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn test_visual_rows_grow_with_wrapping() {
        let rendered = render(REPLACE);
        assert_eq!(unified_visual_rows(&rendered.unified, 0, false), 4);
        // gutter is 4 columns, leaving 6 for "let x = 1;"
        let narrow = unified_visual_rows(&rendered.unified, 10, false);
        assert!(narrow > 4);
        assert_eq!(unified_visual_rows(&rendered.unified, 200, false), 4);
        assert_eq!(side_by_side_visual_rows(&rendered.side_by_side, 200, true, EVEN_SPLIT), 3);
    }

    #[test]
    fn test_narrow_left_pane_wraps_more_rows() {
        let rendered = render(REPLACE);
        // gutter 2: even split leaves 8 content columns per pane at width 21,
        // so the changed pair takes two rows
        assert_eq!(side_by_side_visual_rows(&rendered.side_by_side, 21, false, EVEN_SPLIT), 4);
        // a 6 column left pane wraps "let x = 1;" onto three rows
        assert_eq!(side_by_side_visual_rows(&rendered.side_by_side, 21, false, 0.3), 5);
    }

    #[test]
    fn test_side_pane_widths_follow_split() {
        assert_eq!(side_pane_widths(61, EVEN_SPLIT), (30, 30));
        assert_eq!(side_pane_widths(61, 0.25), (15, 45));
        assert_eq!(side_pane_widths(61, 2.0), (60, 0));
        assert_eq!(side_pane_widths(0, EVEN_SPLIT), (0, 0));
    }

    #[test]
    fn test_split_round_trips_through_left_width() {
        for left in [1, 17, 30, 31, 59] {
            let split = split_for_left_width(61, left);
            assert_eq!(side_pane_widths(61, split).0, left);
        }
        assert_eq!(split_for_left_width(1, 0), EVEN_SPLIT);
    }

    #[test]
    fn test_divider_range_keeps_a_content_column() {
        assert_eq!(side_divider_range(61, 4), Some(5..=55));
        assert_eq!(side_divider_range(11, 4), Some(5..=5));
        assert_eq!(side_divider_range(10, 4), None);
        assert_eq!(side_divider_range(3, 4), None);
    }

    #[test]
    fn test_skip_columns_drops_straddling_wide_chars() {
        assert_eq!(skip_columns("abcdef", 0), (0, "abcdef"));
        assert_eq!(skip_columns("abcdef", 2), (2, "cdef"));
        assert_eq!(skip_columns("abc", 9), (3, ""));
        // each ideograph is two columns wide and three bytes long
        assert_eq!(skip_columns("日本語", 1), (3, "本語"));
        assert_eq!(skip_columns("日本語", 2), (3, "本語"));
    }

    #[test]
    fn test_max_scroll_x_measures_widest_overflow() {
        let rendered = render(REPLACE);
        // the 15 column hunk header overflows a 10 column viewport by 5
        assert_eq!(unified_max_scroll_x(&rendered.unified, 10, false), 5);
        assert_eq!(unified_max_scroll_x(&rendered.unified, 40, false), 0);
        assert_eq!(unified_max_scroll_x(&rendered.unified, 0, false), 0);

        let side = &rendered.side_by_side;
        assert_eq!(side_by_side_max_scroll_x(side, 21, false, EVEN_SPLIT), 2);
        assert_eq!(side_by_side_max_scroll_x(side, 21, false, 0.3), 6);
    }

    #[test]
    fn test_tabs_are_expanded() {
        assert_eq!(expand_tabs("\tx"), "    x");
        assert_eq!(expand_tabs("ab\tc"), "ab  c");
    }
}
