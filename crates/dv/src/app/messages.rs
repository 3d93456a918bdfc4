//! Literal message payloads shown in place of diff content

use super::sections::SectionState;
use super::App;
use dv_core::{DiffSection, RenderedFile, TreeNode};

impl App {
    /// True when sections are configured for a single piped diff
    pub fn is_piped_mode(&self) -> bool {
        self.registry.order() == [DiffSection::Files]
    }

    pub fn empty_message_parts(&self) -> (&'static str, &'static str) {
        if self.is_piped_mode() {
            return (
                "No files in piped diff.",
                "Run your diff command again and pipe it into dv.",
            );
        }
        (
            "No staged or unstaged changes.",
            "Make edits or stage files, then press r to refresh.",
        )
    }

    pub(super) fn empty_message(&self) -> String {
        let (heading, details) = self.empty_message_parts();
        format!("{heading}\n\n{details}")
    }

    pub(super) fn error_message(&self) -> String {
        let msg = self
            .load_error
            .as_deref()
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
            .unwrap_or("Unknown error");
        let retry = if self.manual_refresh_enabled {
            "Press r to retry."
        } else {
            "Run the command again to retry."
        };
        format!("Failed to load git diff:\n\n{msg}\n\n{retry}")
    }
}

pub(super) fn no_matches_message(query: &str) -> String {
    if query.is_empty() {
        return "No files match the current filter.\n\nPress escape to clear the filter.".to_string();
    }
    format!("No files match {query:?}.\n\nPress escape to clear the filter.")
}

fn empty_section_message(section: DiffSection) -> String {
    match section {
        DiffSection::Files => "No files in this diff.".to_string(),
        DiffSection::Unstaged | DiffSection::Staged => {
            format!("No {} files in this diff.", section.as_str())
        }
    }
}

pub(super) fn section_summary(section: DiffSection, state: Option<&SectionState>) -> RenderedFile {
    let files = state.map_or(0, SectionState::file_count);
    let additions = state.map_or(0, |s| s.additions);
    let deletions = state.map_or(0, |s| s.deletions);

    let mut lines = vec![
        format!("Section: {}", section.display_name()),
        format!("Touched files: {files}"),
        format!("Additions: +{additions}"),
        format!("Deletions: -{deletions}"),
        String::new(),
        "Use n/p to jump between files in this section.".to_string(),
    ];
    if files == 0 {
        lines.push(String::new());
        lines.push(empty_section_message(section));
    }
    RenderedFile::from_lines(format!("{} changes", section.display_name()), lines)
}

pub(super) fn directory_summary(node: &TreeNode) -> RenderedFile {
    let path = if node.path.is_empty() {
        node.name.as_str()
    } else {
        node.path.as_str()
    };
    let path = if path.is_empty() { "(root)" } else { path };
    RenderedFile::from_lines(
        path,
        [
            format!("Section: {}", node.section.display_name()),
            format!("Directory: {path}"),
            format!("Touched files: {}", node.touched_files),
            format!("Additions: +{}", node.additions),
            format!("Deletions: -{}", node.deletions),
            String::new(),
            "Use n/p to jump between changed files.".to_string(),
        ],
    )
}
