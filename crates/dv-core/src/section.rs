//! Diff sections (which git diff space a file belongs to)

use std::fmt;

/// A named group of changed files with independent selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffSection {
    /// Working tree vs index
    Unstaged,
    /// Index vs HEAD
    Staged,
    /// A single piped diff
    Files,
}

impl DiffSection {
    pub fn display_name(self) -> &'static str {
        match self {
            DiffSection::Unstaged => "Unstaged",
            DiffSection::Staged => "Staged",
            DiffSection::Files => "Files",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiffSection::Unstaged => "unstaged",
            DiffSection::Staged => "staged",
            DiffSection::Files => "files",
        }
    }
}

impl fmt::Display for DiffSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sections shown when the provider does not configure its own
pub fn default_sections() -> Vec<DiffSection> {
    vec![DiffSection::Unstaged, DiffSection::Staged]
}

/// Drop duplicates while keeping first-seen order; empty input means default
pub fn normalize_sections(sections: &[DiffSection]) -> Vec<DiffSection> {
    let mut normalized = Vec::with_capacity(sections.len());
    for section in sections {
        if !normalized.contains(section) {
            normalized.push(*section);
        }
    }
    if normalized.is_empty() {
        return default_sections();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sections_defaults_when_empty() {
        assert_eq!(normalize_sections(&[]), default_sections());
    }

    #[test]
    fn test_normalize_sections_drops_duplicates() {
        let sections = [
            DiffSection::Staged,
            DiffSection::Unstaged,
            DiffSection::Staged,
        ];
        assert_eq!(
            normalize_sections(&sections),
            vec![DiffSection::Staged, DiffSection::Unstaged]
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(DiffSection::Unstaged.display_name(), "Unstaged");
        assert_eq!(DiffSection::Files.to_string(), "files");
    }
}
