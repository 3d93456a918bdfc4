//! dv-core: diff model for the dv browser
//!
//! Sections and diff-source providers, a unified diff parser, the row
//! renderer that projects a parsed file into unified and side-by-side rows,
//! and the per-section file tree.

pub mod git;
pub mod patch;
pub mod render;
pub mod section;
pub mod theme;
pub mod tree;

pub use git::{DiffProvider, GitDiffProvider, GitError, StdinDiffProvider};
pub use patch::{
    parse_unified_diff, DiffFile, DiffHunk, DiffLine, DiffLineKind, FileStatus, PatchError,
};
pub use render::{
    side_by_side_max_scroll_x, side_by_side_visual_rows, unified_max_scroll_x, unified_visual_rows,
    LineKind, RenderedFile, ScrollAnchor, SideCell, SideBySideRow, UnifiedRow, EVEN_SPLIT,
};
pub use section::{default_sections, normalize_sections, DiffSection};
pub use tree::{build_section_tree, NodeKind, SectionTree, TreeNode};
