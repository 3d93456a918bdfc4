//! Per-section caches of files, trees and sticky selections

use dv_core::{
    build_section_tree, normalize_sections, parse_unified_diff, DiffFile, DiffProvider,
    DiffSection, GitError, PatchError, RenderedFile, TreeNode,
};
use rustc_hash::FxHashMap;
use std::rc::Rc;
use thiserror::Error;
use tracing::info;

/// A section failed to load or parse; the registry was left untouched
#[derive(Error, Debug)]
pub enum ReloadError {
    #[error("{section} diff: {source}")]
    Load {
        section: DiffSection,
        #[source]
        source: GitError,
    },
    #[error("{section} parse error: {source}")]
    Parse {
        section: DiffSection,
        #[source]
        source: PatchError,
    },
}

#[derive(Debug, Default)]
pub struct SectionState {
    pub files: Vec<DiffFile>,
    /// Children of the section's root node
    pub roots: Vec<TreeNode>,
    pub rendered: FxHashMap<String, Rc<RenderedFile>>,
    /// Display path to index into `files`
    pub file_by_path: FxHashMap<String, usize>,
    pub ordered_paths: Vec<String>,
    pub tree_index: FxHashMap<String, Vec<usize>>,
    pub last_selected: Option<String>,
    pub additions: usize,
    pub deletions: usize,
}

impl SectionState {
    fn build(section: DiffSection, section_index: usize, files: Vec<DiffFile>) -> Self {
        let tree = build_section_tree(section, section_index, &files);
        let mut state = SectionState {
            roots: tree.roots,
            ordered_paths: tree.ordered_paths,
            tree_index: tree.tree_index,
            ..SectionState::default()
        };
        for (idx, file) in files.iter().enumerate() {
            if state.file_by_path.contains_key(&file.display_path) {
                continue;
            }
            state.file_by_path.insert(file.display_path.clone(), idx);
            state
                .rendered
                .insert(file.display_path.clone(), Rc::new(RenderedFile::from_diff(file)));
            state.additions += file.additions;
            state.deletions += file.deletions;
        }
        state.files = files;
        state
    }

    pub fn file(&self, path: &str) -> Option<&DiffFile> {
        self.file_by_path.get(path).map(|&idx| &self.files[idx])
    }

    pub fn has_files(&self) -> bool {
        !self.ordered_paths.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.ordered_paths.len()
    }

    /// Remembered path if still present, else the first in navigation order
    pub fn preferred_path(&self) -> Option<&str> {
        self.last_selected
            .as_deref()
            .filter(|path| self.file_by_path.contains_key(*path))
            .or_else(|| self.ordered_paths.first().map(String::as_str))
    }
}

/// Owns every configured section's state; the section order never changes
#[derive(Debug)]
pub struct SectionRegistry {
    order: Vec<DiffSection>,
    states: FxHashMap<DiffSection, SectionState>,
}

impl SectionRegistry {
    pub fn new(order: &[DiffSection]) -> Self {
        let order = normalize_sections(order);
        let states = order
            .iter()
            .map(|section| (*section, SectionState::default()))
            .collect();
        Self { order, states }
    }

    pub fn order(&self) -> &[DiffSection] {
        &self.order
    }

    pub fn contains(&self, section: DiffSection) -> bool {
        self.order.contains(&section)
    }

    pub fn index_of(&self, section: DiffSection) -> Option<usize> {
        self.order.iter().position(|s| *s == section)
    }

    pub fn state(&self, section: DiffSection) -> Option<&SectionState> {
        self.states.get(&section)
    }

    pub fn state_mut(&mut self, section: DiffSection) -> Option<&mut SectionState> {
        self.states.get_mut(&section)
    }

    pub fn has_files(&self, section: DiffSection) -> bool {
        self.state(section).is_some_and(SectionState::has_files)
    }

    pub fn file_count(&self, section: DiffSection) -> usize {
        self.state(section).map_or(0, SectionState::file_count)
    }

    pub fn total_files(&self) -> usize {
        self.order.iter().map(|s| self.file_count(*s)).sum()
    }

    /// Total additions and deletions across sections
    pub fn totals(&self) -> (usize, usize) {
        self.states
            .values()
            .fold((0, 0), |(add, del), state| {
                (add + state.additions, del + state.deletions)
            })
    }

    /// Configured order rotated to begin at `start`
    pub fn sections_from(&self, start: DiffSection) -> Vec<DiffSection> {
        let Some(start_idx) = self.index_of(start) else {
            return self.order.clone();
        };
        let len = self.order.len();
        (0..len).map(|i| self.order[(start_idx + i) % len]).collect()
    }

    /// Like `sections_from` without `start` itself
    pub fn sections_after(&self, start: DiffSection) -> Vec<DiffSection> {
        let mut sections = self.sections_from(start);
        if sections.len() <= 1 {
            return Vec::new();
        }
        sections.remove(0);
        sections
    }

    pub fn find_section_with_files(&self, start: DiffSection) -> Option<DiffSection> {
        self.sections_from(start)
            .into_iter()
            .find(|section| self.has_files(*section))
    }

    /// Load and parse every section, then swap them in together
    ///
    /// `active_file` is remembered as its section's selection before the swap.
    /// On error nothing is replaced.
    pub fn reload(
        &mut self,
        provider: &dyn DiffProvider,
        active_file: Option<(DiffSection, &str)>,
    ) -> Result<(), ReloadError> {
        let mut next: FxHashMap<DiffSection, SectionState> = FxHashMap::default();
        for (idx, section) in self.order.iter().copied().enumerate() {
            let raw = provider
                .load_diff(section)
                .map_err(|source| ReloadError::Load { section, source })?;
            let files = parse_unified_diff(&raw)
                .map_err(|source| ReloadError::Parse { section, source })?;
            next.insert(section, SectionState::build(section, idx, files));
        }

        for (section, state) in next.iter_mut() {
            let remembered = match active_file {
                Some((active, path)) if active == *section => Some(path.to_string()),
                _ => self
                    .states
                    .get(section)
                    .and_then(|previous| previous.last_selected.clone()),
            };
            state.last_selected = remembered
                .filter(|path| state.file_by_path.contains_key(path))
                .or_else(|| state.ordered_paths.first().cloned());
        }

        self.states = next;
        info!(
            sections = self.order.len(),
            files = self.total_files(),
            "reloaded diff sections"
        );
        Ok(())
    }
}
