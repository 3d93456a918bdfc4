//! Keeps the viewer's vertical position when flipping between layouts

use super::types::{DiffLayout, Selection};
use super::App;
use dv_core::{
    side_by_side_visual_rows, unified_visual_rows, DiffSection, LineKind, RenderedFile,
    ScrollAnchor,
};
use tracing::debug;

/// Row geometry of one payload in both layouts
pub trait LayoutRows {
    /// Visual rows the layout occupies, wrapping included
    fn visual_rows(&self, layout: DiffLayout) -> usize;

    /// Anchor of every logical row; `None` for rows without one
    fn row_anchors(&self, layout: DiffLayout) -> Vec<Option<ScrollAnchor>>;

    /// Whether visual rows differ from logical rows
    fn wrapped(&self) -> bool;

    fn anchor_at(&self, layout: DiffLayout, offset: usize) -> Option<ScrollAnchor> {
        let anchors = self.row_anchors(layout);
        let last = anchors.len().checked_sub(1)?;
        anchors[offset.min(last)]
    }

    fn find_anchor(&self, layout: DiffLayout, anchor: &ScrollAnchor) -> Option<usize> {
        find_anchor_row(&self.row_anchors(layout), anchor)
    }
}

/// The viewer payload as currently laid out on screen
#[derive(Debug, Clone, Copy)]
pub struct DiffViewport<'a> {
    pub rendered: &'a RenderedFile,
    pub wrap: bool,
    /// Diff area width in columns; 0 before the first draw
    pub width: usize,
    pub show_signs: bool,
    /// Left pane share in the side-by-side layout
    pub split: f64,
}

impl LayoutRows for DiffViewport<'_> {
    fn visual_rows(&self, layout: DiffLayout) -> usize {
        let width = if self.wrap { self.width } else { 0 };
        match layout {
            DiffLayout::Unified => unified_visual_rows(&self.rendered.unified, width, self.show_signs),
            DiffLayout::SideBySide => side_by_side_visual_rows(
                &self.rendered.side_by_side,
                width,
                self.show_signs,
                self.split,
            ),
        }
    }

    fn row_anchors(&self, layout: DiffLayout) -> Vec<Option<ScrollAnchor>> {
        match layout {
            DiffLayout::Unified => self
                .rendered
                .unified
                .iter()
                .map(|row| Some(row.anchor()))
                .collect(),
            DiffLayout::SideBySide => self
                .rendered
                .side_by_side
                .iter()
                .map(|row| row.anchor())
                .collect(),
        }
    }

    fn wrapped(&self) -> bool {
        self.wrap
    }
}

/// Snapshot of the last toggle, used to undo it exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct LayoutToggleMemo {
    pub source: DiffLayout,
    pub target: DiffLayout,
    pub source_offset: usize,
    pub target_offset: usize,
    pub section: DiffSection,
    pub selection: Selection,
}

impl LayoutToggleMemo {
    /// Offset to restore when this toggle is being reversed
    ///
    /// `target_offset` is compared after clamping to `max_offset`, the same
    /// clamp the viewer applied when it displayed it.
    pub fn restores(
        &self,
        source: DiffLayout,
        target: DiffLayout,
        offset: usize,
        max_offset: usize,
        section: DiffSection,
        selection: &Selection,
    ) -> Option<usize> {
        let reversed = self.target == source
            && self.source == target
            && self.target_offset.min(max_offset) == offset
            && self.section == section
            && &self.selection == selection;
        reversed.then_some(self.source_offset)
    }
}

/// First row matching `anchor`, trying progressively looser criteria
pub fn find_anchor_row(rows: &[Option<ScrollAnchor>], anchor: &ScrollAnchor) -> Option<usize> {
    let find = |pred: &dyn Fn(&ScrollAnchor) -> bool| {
        rows.iter()
            .position(|row| row.as_ref().is_some_and(|row| pred(row)))
    };

    if let (Some(old), Some(new)) = (anchor.old_line, anchor.new_line) {
        if let Some(idx) = find(&|row| row.old_line == Some(old) && row.new_line == Some(new)) {
            return Some(idx);
        }
    }

    let by_kind = match (anchor.kind, anchor.old_line, anchor.new_line) {
        (LineKind::Added, _, Some(new)) => {
            find(&|row| row.kind == LineKind::Added && row.new_line == Some(new))
        }
        (LineKind::Removed, Some(old), _) => {
            find(&|row| row.kind == LineKind::Removed && row.old_line == Some(old))
        }
        (LineKind::Context, Some(old), Some(new)) => find(&|row| {
            row.kind == LineKind::Context && row.old_line == Some(old) && row.new_line == Some(new)
        }),
        _ => None,
    };
    if by_kind.is_some() {
        return by_kind;
    }

    if let Some(old) = anchor.old_line {
        if let Some(idx) = find(&|row| row.old_line == Some(old)) {
            return Some(idx);
        }
    }
    if let Some(new) = anchor.new_line {
        if let Some(idx) = find(&|row| row.new_line == Some(new)) {
            return Some(idx);
        }
    }
    find(&|row| row.kind == anchor.kind)
}

/// Clamp `offset` into `[0, rows - 1]`; 0 when there are no rows
pub fn clamp_offset(rows: usize, offset: usize) -> usize {
    offset.min(rows.saturating_sub(1))
}

/// Proportional mapping between two row counts, rounded to nearest
pub fn map_offset_by_ratio(source_rows: usize, target_rows: usize, offset: usize) -> usize {
    if target_rows == 0 {
        return 0;
    }
    if source_rows <= 1 {
        return clamp_offset(target_rows, offset);
    }
    let src = offset.min(source_rows - 1);
    let mapped = (src * (target_rows - 1) + (source_rows - 1) / 2) / (source_rows - 1);
    mapped.min(target_rows - 1)
}

/// Offset in `target` showing the same content as `offset` in `source`
pub fn map_offset(
    rows: &impl LayoutRows,
    source: DiffLayout,
    target: DiffLayout,
    offset: usize,
) -> usize {
    if source == target {
        return clamp_offset(rows.visual_rows(target), offset);
    }
    if !rows.wrapped() {
        let found = rows
            .anchor_at(source, offset)
            .and_then(|anchor| rows.find_anchor(target, &anchor));
        if let Some(idx) = found {
            return clamp_offset(rows.visual_rows(target), idx);
        }
    }
    map_offset_by_ratio(rows.visual_rows(source), rows.visual_rows(target), offset)
}

impl App {
    /// Flip between unified and side-by-side, keeping the view in place
    pub fn toggle_layout(&mut self) {
        let source = self.layout;
        let target = source.toggled();
        let source_offset = self.scroll_offset;
        let source_max = self.max_scroll();

        let restored = self.layout_memo.as_ref().and_then(|memo| {
            memo.restores(
                source,
                target,
                source_offset,
                source_max,
                self.active_section,
                &self.selection,
            )
        });
        let target_offset = match restored {
            Some(offset) => offset,
            None => map_offset(&self.viewport(), source, target, source_offset),
        };
        debug!(
            from = source.label(),
            to = target.label(),
            source_offset,
            target_offset,
            restored = restored.is_some(),
            "layout toggled"
        );

        self.layout_memo = Some(LayoutToggleMemo {
            source,
            target,
            source_offset,
            target_offset,
            section: self.active_section,
            selection: self.selection.clone(),
        });
        self.layout = target;
        // the memo keeps the mapped offset; the viewer never sits past the bottom
        self.scroll_offset = target_offset.min(self.max_scroll());
        self.clamp_scroll_x();
    }
}
