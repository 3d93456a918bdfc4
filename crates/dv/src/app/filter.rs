//! File-name filter over the section trees

use super::messages::no_matches_message;
use super::types::Selection;
use super::App;
use dv_core::{DiffSection, TreeNode};
use tracing::debug;

/// How a query is compared against file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Query appears verbatim inside the name
    #[default]
    Substring,
    /// Query characters appear in order, gaps allowed
    Fuzzy,
}

impl MatchMode {
    pub fn toggled(self) -> Self {
        match self {
            MatchMode::Substring => MatchMode::Fuzzy,
            MatchMode::Fuzzy => MatchMode::Substring,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchMode::Substring => "substring",
            MatchMode::Fuzzy => "fuzzy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub mode: MatchMode,
    pub case_sensitive: bool,
}

impl FilterOptions {
    pub fn matches(&self, name: &str, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let (name, query) = if self.case_sensitive {
            (name.to_string(), query.to_string())
        } else {
            (name.to_lowercase(), query.to_lowercase())
        };
        match self.mode {
            MatchMode::Substring => name.contains(&query),
            MatchMode::Fuzzy => {
                let mut name_chars = name.chars();
                query.chars().all(|q| name_chars.any(|c| c == q))
            }
        }
    }
}

#[derive(Debug, Default)]
pub(super) struct FilterState {
    pub query: String,
    pub options: FilterOptions,
    pub input_visible: bool,
    pub no_matches: bool,
}

impl FilterState {
    /// Whether a tree node survives the active query
    pub fn node_visible(&self, node: &TreeNode) -> bool {
        if node.is_leaf() {
            return self.options.matches(&node.name, &self.query);
        }
        node.children.iter().any(|child| self.node_visible(child))
    }
}

/// Post-order walk collecting leaves whose own name matches
///
/// Returns whether anything under `nodes` matched, plus the matching paths in
/// tree order.
pub(super) fn collect_matches(
    nodes: &[TreeNode],
    query: &str,
    options: FilterOptions,
) -> (bool, Vec<String>) {
    let mut paths = Vec::new();
    let mut any = false;
    for node in nodes {
        if node.is_leaf() {
            if options.matches(&node.name, query) {
                paths.push(node.path.clone());
                any = true;
            }
            continue;
        }
        let (matched, child_paths) = collect_matches(&node.children, query, options);
        if matched {
            any = true;
            paths.extend(child_paths);
        }
    }
    (any, paths)
}

impl App {
    pub fn filter_query(&self) -> &str {
        &self.filter.query
    }

    pub fn filter_options(&self) -> FilterOptions {
        self.filter.options
    }

    pub fn filter_input_visible(&self) -> bool {
        self.filter.input_visible
    }

    pub fn filter_no_matches(&self) -> bool {
        self.filter.no_matches
    }

    /// Replace the query and reselect against it
    pub fn set_query(&mut self, query: &str) {
        self.filter.query = query.to_string();
        self.sync_filter_selection();
    }

    pub fn set_filter_options(&mut self, options: FilterOptions) {
        self.filter.options = options;
        if !self.filter.query.is_empty() {
            self.sync_filter_selection();
        }
    }

    /// Show the filter input, revealing the sidebar if needed
    pub fn open_filter(&mut self) {
        self.sidebar_visible = true;
        self.filter.input_visible = true;
    }

    pub fn close_filter_input(&mut self) {
        self.filter.input_visible = false;
    }

    /// Clear a non-empty query and hide the input; false when there was
    /// nothing to clear
    pub fn clear_filter(&mut self) -> bool {
        if self.filter.query.is_empty() {
            return false;
        }
        self.filter.input_visible = false;
        self.set_query("");
        true
    }

    /// Escape: close the menu, else clear the query, else hide the input.
    /// Clearing a query hides the input too.
    pub fn handle_escape(&mut self) {
        if self.menu_visible() {
            self.close_menu();
            return;
        }
        if self.clear_filter() {
            return;
        }
        self.filter.input_visible = false;
    }

    pub fn push_filter_char(&mut self, ch: char) {
        let mut query = self.filter.query.clone();
        query.push(ch);
        self.set_query(&query);
    }

    pub fn pop_filter_char(&mut self) {
        let mut query = self.filter.query.clone();
        if query.pop().is_some() {
            self.set_query(&query);
        }
    }

    /// Files of `section` that survive the query, in tree order
    pub fn filtered_paths(&self, section: DiffSection) -> Vec<String> {
        let Some(state) = self.live_registry().and_then(|r| r.state(section)) else {
            return Vec::new();
        };
        if self.filter.query.is_empty() {
            return state.ordered_paths.clone();
        }
        collect_matches(&state.roots, &self.filter.query, self.filter.options).1
    }

    /// Paths `move_cursor` steps through
    pub fn navigable_paths(&self) -> Vec<String> {
        self.filtered_paths(self.active_section)
    }

    /// Reconcile the selection with the current query
    pub(super) fn sync_filter_selection(&mut self) {
        if self.load_error.is_some() {
            return;
        }

        if self.filter.query.is_empty() {
            self.filter.no_matches = false;
            if self.selection.is_file() {
                return;
            }
            let target = self
                .registry
                .sections_from(self.active_section)
                .into_iter()
                .find_map(|section| {
                    let state = self.registry.state(section)?;
                    let first = state.ordered_paths.first()?;
                    Some((section, first.clone()))
                });
            if let Some((section, path)) = target {
                self.active_section = section;
                self.select_file(&path);
            }
            return;
        }

        for section in self.registry.sections_from(self.active_section) {
            let filtered = self.filtered_paths(section);
            let Some(first) = filtered.first() else {
                continue;
            };
            self.filter.no_matches = false;
            debug!(
                query = %self.filter.query,
                section = %section,
                matches = filtered.len(),
                "filter applied"
            );
            let first = first.clone();
            self.active_section = section;
            self.select_file(&first);
            return;
        }

        debug!(query = %self.filter.query, "filter has no matches");
        self.set_no_matches();
    }

    fn set_no_matches(&mut self) {
        self.filter.no_matches = true;
        self.selection = Selection::Empty;
        self.tree_cursor = None;
        let message = no_matches_message(&self.filter.query);
        self.show_message("No matches", &message);
    }
}
