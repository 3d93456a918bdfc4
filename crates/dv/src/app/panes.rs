//! Pane geometry: the side-by-side split and the sidebar divider

use super::types::DiffLayout;
use super::App;
use dv_core::render::{
    side_by_side_gutter_width, side_divider_range, side_pane_widths, split_for_left_width,
};
use dv_core::EVEN_SPLIT;
use tracing::debug;

pub(super) const DEFAULT_SIDEBAR_WIDTH: u16 = 32;
pub(super) const MIN_SIDEBAR_WIDTH: u16 = 20;
pub(super) const MAX_SIDEBAR_WIDTH: u16 = 72;

impl App {
    pub fn split(&self) -> f64 {
        self.split
    }

    pub fn sidebar_width(&self) -> u16 {
        self.sidebar_width
    }

    pub fn divider_focused(&self) -> bool {
        self.divider_focused
    }

    /// Move the side-by-side divider by `delta` columns
    ///
    /// Both panes keep at least one content column; outside the side-by-side
    /// layout, or before the first draw, nothing happens.
    pub fn shift_split(&mut self, delta: isize) {
        if delta == 0 || self.layout != DiffLayout::SideBySide || self.viewport_width == 0 {
            return;
        }
        let width = self.viewport_width;
        let gutter = side_by_side_gutter_width(&self.viewer.side_by_side, self.show_change_signs);
        let Some(range) = side_divider_range(width, gutter) else {
            return;
        };
        let (left, _) = side_pane_widths(width, self.split);
        let next = left
            .saturating_add_signed(delta)
            .clamp(*range.start(), *range.end());
        if next == left {
            return;
        }
        self.split = split_for_left_width(width, next);
        debug!(left = next, split = self.split, "side-by-side split moved");
        self.clamp_scroll();
        self.clamp_scroll_x();
    }

    /// Back to an even split; side-by-side only
    pub fn reset_split(&mut self) {
        if self.layout != DiffLayout::SideBySide || self.split == EVEN_SPLIT {
            return;
        }
        self.split = EVEN_SPLIT;
        self.clamp_scroll();
        self.clamp_scroll_x();
    }

    /// Hand the arrow keys to the sidebar divider; needs a visible sidebar
    pub fn focus_divider(&mut self) {
        if !self.sidebar_visible {
            return;
        }
        self.filter.input_visible = false;
        self.divider_focused = true;
    }

    pub fn exit_divider_focus(&mut self) {
        self.divider_focused = false;
    }

    /// Grow or shrink the sidebar while the divider has focus
    pub fn resize_sidebar(&mut self, delta: i16) {
        if !self.divider_focused {
            return;
        }
        self.sidebar_width = self
            .sidebar_width
            .saturating_add_signed(delta)
            .clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH);
    }
}
