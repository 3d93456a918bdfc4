use dv_core::theme::{parse_theme_name, DEFAULT_THEME};
use dv_core::{DiffSection, NodeKind};

/// Diff presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffLayout {
    /// Single interleaved column
    #[default]
    Unified,
    /// Old on the left, new on the right
    SideBySide,
}

impl DiffLayout {
    pub fn toggled(self) -> Self {
        match self {
            DiffLayout::Unified => DiffLayout::SideBySide,
            DiffLayout::SideBySide => DiffLayout::Unified,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DiffLayout::Unified => "unified",
            DiffLayout::SideBySide => "side-by-side",
        }
    }
}

/// How changed characters inside a paired line are highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntralineStyle {
    #[default]
    Background,
    Underline,
}

impl IntralineStyle {
    pub fn toggled(self) -> Self {
        match self {
            IntralineStyle::Background => IntralineStyle::Underline,
            IntralineStyle::Underline => IntralineStyle::Background,
        }
    }
}

/// What the viewer is showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// No section or file is active
    #[default]
    Empty,
    SectionSummary,
    Directory {
        path: String,
    },
    File {
        path: String,
    },
}

impl Selection {
    pub fn file_path(&self) -> Option<&str> {
        match self {
            Selection::File { path } => Some(path),
            Selection::Empty | Selection::SectionSummary | Selection::Directory { .. } => None,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Selection::File { .. })
    }
}

/// Startup appearance, supplied once at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialState {
    pub layout: DiffLayout,
    pub sidebar_visible: bool,
    pub theme: String,
    pub intraline_style: IntralineStyle,
    pub show_change_signs: bool,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            layout: DiffLayout::Unified,
            sidebar_visible: true,
            theme: DEFAULT_THEME.to_string(),
            intraline_style: IntralineStyle::Background,
            show_change_signs: false,
        }
    }
}

impl InitialState {
    /// Unknown theme names fall back to the default theme
    pub fn normalize(mut self) -> Self {
        self.theme = parse_theme_name(&self.theme)
            .unwrap_or(DEFAULT_THEME)
            .to_string();
        self
    }
}

/// One visible row of the flattened file tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    pub section: DiffSection,
    pub additions: usize,
    pub deletions: usize,
    pub touched_files: usize,
    /// Child-index path from the top of the tree
    pub location: Vec<usize>,
    pub is_cursor: bool,
}

/// Per-section counters shown in the sidebar heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSummary {
    pub section: DiffSection,
    pub files: usize,
    pub additions: usize,
    pub deletions: usize,
}
