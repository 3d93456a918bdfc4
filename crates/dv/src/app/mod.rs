//! Application state and logic

use dv_core::{
    side_by_side_max_scroll_x, unified_max_scroll_x, DiffProvider, DiffSection, RenderedFile,
    EVEN_SPLIT,
};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::warn;

mod filter;
mod layout_sync;
mod messages;
mod navigation;
mod palette;
mod panes;
mod sections;
mod types;


pub use filter::{FilterOptions, MatchMode};
pub use layout_sync::{DiffViewport, LayoutRows};
pub use palette::{MenuAction, MenuRow};
pub use sections::{ReloadError, SectionRegistry};
pub use types::{DiffLayout, InitialState, IntralineStyle, SectionSummary, Selection, TreeRow};

use filter::FilterState;
use layout_sync::LayoutToggleMemo;
use palette::{CommandMenu, ThemePreview};

/// The main application state
pub struct App {
    provider: Box<dyn DiffProvider>,
    registry: SectionRegistry,
    /// Section chosen at startup; fallback when nothing else applies
    initial_section: DiffSection,
    active_section: DiffSection,
    selection: Selection,
    /// Child-index path of the tree cursor, section index first
    tree_cursor: Option<Vec<usize>>,
    /// Set while the last reload failed; masks the registry
    load_error: Option<String>,
    repo_root: Option<PathBuf>,
    branch: Option<String>,
    manual_refresh_enabled: bool,

    /// Payload shown in the diff viewer
    viewer: Rc<RenderedFile>,
    /// Vertical offset in visual rows of the current layout
    scroll_offset: usize,
    /// Columns hidden on the left while wrapping is off
    scroll_x: usize,
    viewport_width: usize,
    viewport_height: usize,
    layout: DiffLayout,
    layout_memo: Option<LayoutToggleMemo>,
    line_wrap: bool,
    show_change_signs: bool,
    intraline_style: IntralineStyle,
    /// Left pane share in the side-by-side layout
    split: f64,
    sidebar_visible: bool,
    sidebar_width: u16,
    /// Arrow keys resize the sidebar instead of navigating
    divider_focused: bool,

    filter: FilterState,

    menu: CommandMenu,
    /// Live theme name (may be a preview)
    theme: String,
    theme_preview: Option<ThemePreview>,

    pub should_quit: bool,
}

impl App {
    pub fn new(provider: Box<dyn DiffProvider>, staged: bool, initial: InitialState) -> Self {
        let initial = initial.normalize();
        let registry = SectionRegistry::new(&provider.sections());
        let initial_section = if staged && registry.contains(DiffSection::Staged) {
            DiffSection::Staged
        } else {
            registry.order()[0]
        };
        let manual_refresh_enabled = provider.manual_refresh_enabled();

        let mut app = Self {
            provider,
            registry,
            initial_section,
            active_section: initial_section,
            selection: Selection::Empty,
            tree_cursor: None,
            load_error: None,
            repo_root: None,
            branch: None,
            manual_refresh_enabled,
            viewer: Rc::new(RenderedFile::message("Diff", "Loading diff...")),
            scroll_offset: 0,
            scroll_x: 0,
            viewport_width: 0,
            viewport_height: 0,
            layout: initial.layout,
            layout_memo: None,
            line_wrap: false,
            show_change_signs: initial.show_change_signs,
            intraline_style: initial.intraline_style,
            split: EVEN_SPLIT,
            sidebar_visible: initial.sidebar_visible,
            sidebar_width: panes::DEFAULT_SIDEBAR_WIDTH,
            divider_focused: false,
            filter: FilterState::default(),
            menu: CommandMenu::default(),
            theme: initial.theme,
            theme_preview: None,
            should_quit: false,
        };
        app.refresh();
        app
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active_section(&self) -> DiffSection {
        self.active_section
    }

    pub fn sections(&self) -> &[DiffSection] {
        self.registry.order()
    }

    pub fn can_switch_sections(&self) -> bool {
        self.registry.order().len() > 1
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn repo_root(&self) -> Option<&PathBuf> {
        self.repo_root.as_ref()
    }

    pub fn viewer(&self) -> &Rc<RenderedFile> {
        &self.viewer
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn scroll_x(&self) -> usize {
        self.scroll_x
    }

    pub fn layout(&self) -> DiffLayout {
        self.layout
    }

    pub fn line_wrap(&self) -> bool {
        self.line_wrap
    }

    pub fn show_change_signs(&self) -> bool {
        self.show_change_signs
    }

    pub fn intraline_style(&self) -> IntralineStyle {
        self.intraline_style
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar_visible
    }

    pub fn theme_name(&self) -> &str {
        &self.theme
    }

    /// Registry view that is empty while a load error is shown
    fn live_registry(&self) -> Option<&SectionRegistry> {
        match self.load_error {
            Some(_) => None,
            None => Some(&self.registry),
        }
    }

    pub fn section_summaries(&self) -> Vec<SectionSummary> {
        self.registry
            .order()
            .iter()
            .map(|&section| {
                let state = self.live_registry().and_then(|r| r.state(section));
                SectionSummary {
                    section,
                    files: state.map_or(0, |s| s.file_count()),
                    additions: state.map_or(0, |s| s.additions),
                    deletions: state.map_or(0, |s| s.deletions),
                }
            })
            .collect()
    }

    pub fn totals(&self) -> (usize, usize) {
        self.live_registry().map_or((0, 0), SectionRegistry::totals)
    }

    /// Additions and deletions of the active file
    pub fn active_file_stats(&self) -> Option<(usize, usize)> {
        let path = self.selection.file_path()?;
        let file = self
            .live_registry()?
            .state(self.active_section)?
            .file(path)?;
        Some((file.additions, file.deletions))
    }

    /// Re-read every section unless the provider disables manual refresh
    pub fn manual_refresh(&mut self) {
        if !self.manual_refresh_enabled {
            return;
        }
        self.refresh();
    }

    pub fn manual_refresh_enabled(&self) -> bool {
        self.manual_refresh_enabled
    }

    fn refresh(&mut self) {
        if let Ok(root) = self.provider.repo_root() {
            self.repo_root = Some(root);
        }
        if let Ok(branch) = self.provider.current_branch() {
            self.branch = Some(branch);
        }

        let previous_section = if self.registry.contains(self.active_section) {
            self.active_section
        } else {
            self.initial_section
        };
        let active_file = self
            .selection
            .file_path()
            .map(|path| (self.active_section, path.to_string()));
        let result = self.registry.reload(
            self.provider.as_ref(),
            active_file
                .as_ref()
                .map(|(section, path)| (*section, path.as_str())),
        );
        if let Err(err) = result {
            warn!(error = %err, "diff reload failed");
            self.set_load_error(err.to_string());
            return;
        }
        self.load_error = None;

        if self.registry.total_files() == 0 {
            self.active_section = self.initial_section;
            self.selection = Selection::Empty;
            self.tree_cursor = None;
            self.filter.no_matches = false;
            let message = self.empty_message();
            self.show_message("Diff", &message);
            return;
        }

        let target = if self.registry.has_files(previous_section) {
            previous_section
        } else {
            self.registry
                .find_section_with_files(previous_section)
                .unwrap_or(self.initial_section)
        };
        self.active_section = target;
        let target_path = self
            .registry
            .state(target)
            .and_then(|state| state.preferred_path())
            .map(str::to_string);
        if let Some(path) = target_path {
            self.select_file(&path);
        }
        self.sync_filter_selection();
    }

    fn set_load_error(&mut self, message: String) {
        self.load_error = Some(message);
        self.active_section = self.initial_section;
        self.selection = Selection::Empty;
        self.tree_cursor = None;
        self.filter.no_matches = false;
        let message = self.error_message();
        self.show_message("Error", &message);
    }

    /// Swap the viewer payload and reset both offsets
    fn show(&mut self, rendered: Rc<RenderedFile>) {
        self.viewer = rendered;
        self.scroll_offset = 0;
        self.scroll_x = 0;
    }

    fn show_message(&mut self, title: &str, text: &str) {
        self.show(Rc::new(RenderedFile::message(title, text)));
    }

    pub fn toggle_line_wrap(&mut self) {
        self.line_wrap = !self.line_wrap;
        self.scroll_x = 0;
        self.clamp_scroll();
    }

    pub fn toggle_change_signs(&mut self) {
        self.show_change_signs = !self.show_change_signs;
        self.clamp_scroll();
        self.clamp_scroll_x();
    }

    pub fn toggle_intraline_style(&mut self) {
        self.intraline_style = self.intraline_style.toggled();
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
        if !self.sidebar_visible {
            self.filter.input_visible = false;
            self.divider_focused = false;
        }
    }

    /// Called by the UI with the diff viewport size each frame
    pub fn set_viewport(&mut self, width: usize, height: usize) {
        if (width, height) == (self.viewport_width, self.viewport_height) {
            return;
        }
        self.viewport_width = width;
        self.viewport_height = height;
        self.clamp_scroll();
        self.clamp_scroll_x();
    }

    fn viewport(&self) -> DiffViewport<'_> {
        DiffViewport {
            rendered: &self.viewer,
            wrap: self.line_wrap,
            width: self.viewport_width,
            show_signs: self.show_change_signs,
            split: self.split,
        }
    }

    fn max_scroll(&self) -> usize {
        let rows = self.viewport().visual_rows(self.layout);
        rows.saturating_sub(self.viewport_height.max(1))
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let next = self.scroll_offset.saturating_add_signed(delta);
        self.scroll_offset = next.min(self.max_scroll());
    }

    pub fn scroll_half_page(&mut self, down: bool) {
        let half = (self.viewport_height / 2).max(1) as isize;
        self.scroll_by(if down { half } else { -half });
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    /// Widest overflow of the current layout; 0 while wrapping
    fn max_scroll_x(&self) -> usize {
        if self.line_wrap {
            return 0;
        }
        let viewer = &self.viewer;
        match self.layout {
            DiffLayout::Unified => {
                unified_max_scroll_x(&viewer.unified, self.viewport_width, self.show_change_signs)
            }
            DiffLayout::SideBySide => side_by_side_max_scroll_x(
                &viewer.side_by_side,
                self.viewport_width,
                self.show_change_signs,
                self.split,
            ),
        }
    }

    fn clamp_scroll_x(&mut self) {
        self.scroll_x = self.scroll_x.min(self.max_scroll_x());
    }

    /// Shift the unwrapped diff sideways; false when nothing moved
    pub fn scroll_horizontal(&mut self, delta: isize) -> bool {
        if delta == 0 || self.line_wrap {
            return false;
        }
        let before = self.scroll_x;
        self.scroll_x = before
            .saturating_add_signed(delta)
            .min(self.max_scroll_x());
        self.scroll_x != before
    }
}
