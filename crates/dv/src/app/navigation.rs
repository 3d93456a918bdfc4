use super::messages::{directory_summary, section_summary};
use super::types::{Selection, TreeRow};
use super::App;
use dv_core::{DiffSection, NodeKind, TreeNode};
use std::rc::Rc;

impl App {
    /// Select a file of the active section; false if the path is not there
    pub fn select_file(&mut self, path: &str) -> bool {
        if self.load_error.is_some() {
            return false;
        }
        let Some(state) = self.registry.state(self.active_section) else {
            return false;
        };
        let (Some(location), Some(rendered)) =
            (state.tree_index.get(path), state.rendered.get(path))
        else {
            return false;
        };
        let location = location.clone();
        let rendered = Rc::clone(rendered);

        if let Some(state) = self.registry.state_mut(self.active_section) {
            state.last_selected = Some(path.to_string());
        }
        self.selection = Selection::File {
            path: path.to_string(),
        };
        self.tree_cursor = Some(location);
        self.show(rendered);
        true
    }

    /// Step through the navigable set, wrapping at both ends
    pub fn move_cursor(&mut self, delta: isize) {
        let paths = self.navigable_paths();
        if paths.is_empty() {
            return;
        }
        let count = paths.len() as isize;
        let current = self
            .selection
            .file_path()
            .and_then(|active| paths.iter().position(|p| p == active));

        let next = match current {
            None if delta < 0 => paths.len() - 1,
            None => 0,
            Some(idx) => (idx as isize + delta).rem_euclid(count) as usize,
        };
        self.select_file(&paths[next]);
    }

    /// Jump to the next section that has something to show
    pub fn switch_section(&mut self) {
        if !self.can_switch_sections() || self.load_error.is_some() {
            return;
        }

        let query_active = !self.filter.query.is_empty();
        let mut target = None;
        for candidate in self.registry.sections_after(self.active_section) {
            let Some(state) = self.registry.state(candidate) else {
                continue;
            };
            if query_active {
                let filtered = self.filtered_paths(candidate);
                let Some(first) = filtered.first() else {
                    continue;
                };
                let path = state
                    .last_selected
                    .as_ref()
                    .filter(|last| filtered.contains(last))
                    .unwrap_or(first)
                    .clone();
                target = Some((candidate, path));
                break;
            }
            if let Some(path) = state.preferred_path() {
                target = Some((candidate, path.to_string()));
                break;
            }
        }

        let Some((section, path)) = target else {
            return;
        };
        self.active_section = section;
        self.select_file(&path);
    }

    /// Show a directory summary without touching the remembered selection
    pub fn select_directory(&mut self, section: DiffSection, path: &str) -> bool {
        if self.load_error.is_some() {
            return false;
        }
        let Some(state) = self.registry.state(section) else {
            return false;
        };
        let Some((location, node)) = find_directory(&state.roots, path) else {
            return false;
        };
        let Some(section_idx) = self.registry.index_of(section) else {
            return false;
        };
        let summary = Rc::new(directory_summary(node));
        let mut cursor = vec![section_idx];
        cursor.extend(location);

        self.active_section = section;
        self.selection = Selection::Directory {
            path: path.to_string(),
        };
        self.tree_cursor = Some(cursor);
        self.show(summary);
        true
    }

    /// Show a section summary without touching the remembered selection
    pub fn select_section_summary(&mut self, section: DiffSection) {
        let Some(section_idx) = self.registry.index_of(section) else {
            return;
        };
        let summary = section_summary(
            section,
            self.live_registry().and_then(|r| r.state(section)),
        );
        self.active_section = section;
        self.selection = Selection::SectionSummary;
        self.tree_cursor = Some(vec![section_idx]);
        self.show(Rc::new(summary));
    }

    /// Flattened tree: section roots, then directories and files
    ///
    /// While a query is active only files that match and directories holding
    /// a match are listed.
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let query = self.filter.query.as_str();
        for (idx, &section) in self.registry.order().iter().enumerate() {
            let state = self.live_registry().and_then(|r| r.state(section));
            let root = TreeNode {
                additions: state.map_or(0, |s| s.additions),
                deletions: state.map_or(0, |s| s.deletions),
                touched_files: state.map_or(0, |s| s.file_count()),
                ..TreeNode::section_root(section, Vec::new())
            };
            let mut location = vec![idx];
            self.push_tree_row(&mut rows, &root, 0, &location);
            if let Some(state) = state {
                self.flatten(&mut rows, &state.roots, 1, &mut location, query);
            }
        }
        rows
    }

    fn flatten(
        &self,
        rows: &mut Vec<TreeRow>,
        nodes: &[TreeNode],
        depth: usize,
        location: &mut Vec<usize>,
        query: &str,
    ) {
        for (idx, node) in nodes.iter().enumerate() {
            if !query.is_empty() && !self.filter.node_visible(node) {
                continue;
            }
            location.push(idx);
            self.push_tree_row(rows, node, depth, location);
            self.flatten(rows, &node.children, depth + 1, location, query);
            location.pop();
        }
    }

    fn push_tree_row(
        &self,
        rows: &mut Vec<TreeRow>,
        node: &TreeNode,
        depth: usize,
        location: &[usize],
    ) {
        rows.push(TreeRow {
            depth,
            name: node.name.clone(),
            path: node.path.clone(),
            kind: node.kind,
            section: node.section,
            additions: node.additions,
            deletions: node.deletions,
            touched_files: node.touched_files,
            location: location.to_vec(),
            is_cursor: self.tree_cursor.as_deref() == Some(location),
        });
    }

    /// Move the tree cursor over visible rows, clamped at both ends
    pub fn move_tree_cursor(&mut self, delta: isize) {
        if self.load_error.is_some() {
            return;
        }
        let rows = self.tree_rows();
        if rows.is_empty() {
            return;
        }
        let last = rows.len() - 1;
        let next = match rows.iter().position(|row| row.is_cursor) {
            None if delta < 0 => last,
            None => 0,
            Some(idx) => idx.saturating_add_signed(delta).min(last),
        };
        let row = &rows[next];
        match row.kind {
            NodeKind::Section => self.select_section_summary(row.section),
            NodeKind::Directory => {
                self.select_directory(row.section, &row.path);
            }
            NodeKind::File => {
                self.active_section = row.section;
                self.select_file(&row.path);
            }
        }
    }

    pub fn viewer_title(&self) -> String {
        match &self.selection {
            Selection::SectionSummary => format!("{} changes", self.active_section.display_name()),
            Selection::Directory { path } => format!("{path} (directory)"),
            Selection::File { path } => path.clone(),
            Selection::Empty if self.load_error.is_some() => "Error".to_string(),
            Selection::Empty if self.filter.no_matches => "No matches".to_string(),
            Selection::Empty => "Diff".to_string(),
        }
    }

    /// 1-based position of the active file in its section's full order
    pub fn viewer_file_position(&self) -> Option<(usize, usize)> {
        let path = self.selection.file_path()?;
        let state = self.live_registry()?.state(self.active_section)?;
        let idx = state.ordered_paths.iter().position(|p| p == path)?;
        Some((idx + 1, state.ordered_paths.len()))
    }
}

fn find_directory<'a>(nodes: &'a [TreeNode], path: &str) -> Option<(Vec<usize>, &'a TreeNode)> {
    for (idx, node) in nodes.iter().enumerate() {
        if node.kind != NodeKind::Directory {
            continue;
        }
        if node.path == path {
            return Some((vec![idx], node));
        }
        if path.starts_with(&format!("{}/", node.path)) {
            let (mut location, found) = find_directory(&node.children, path)?;
            location.insert(0, idx);
            return Some((location, found));
        }
    }
    None
}
