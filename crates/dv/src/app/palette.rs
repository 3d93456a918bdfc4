use super::types::DiffLayout;
use super::App;
use dv_core::theme::{dark_theme_names, display_name, light_theme_names};
use tracing::debug;

const ROOT_TITLE: &str = "Commands";
const THEMES_TITLE: &str = "Themes";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    SwitchSection,
    Refresh,
    ToggleSidebar,
    FocusDivider,
    ToggleWrap,
    ToggleLayout,
    ResetSplit,
    ToggleSigns,
    ToggleIntraline,
    /// Opens the theme list as a sub-level
    OpenThemes,
    SetTheme(&'static str),
}

#[derive(Clone, Debug)]
pub(crate) struct MenuItem {
    pub label: String,
    pub filter_text: String,
    pub hint: Option<&'static str>,
    pub action: MenuAction,
}

#[derive(Clone, Debug)]
pub(crate) enum MenuEntry {
    Divider(&'static str),
    Item(MenuItem),
}

impl MenuEntry {
    fn item(
        label: &str,
        filter_text: &str,
        hint: Option<&'static str>,
        action: MenuAction,
    ) -> Self {
        MenuEntry::Item(MenuItem {
            label: label.to_string(),
            filter_text: filter_text.to_string(),
            hint,
            action,
        })
    }
}

#[derive(Clone, Debug)]
pub(crate) struct MenuLevel {
    pub title: &'static str,
    pub entries: Vec<MenuEntry>,
    /// Index into the currently matching items
    pub cursor: usize,
    pub query: String,
    /// Cursor moves on this level preview themes
    pub preview: bool,
}

impl MenuLevel {
    fn new(title: &'static str, entries: Vec<MenuEntry>, preview: bool) -> Self {
        Self {
            title,
            entries,
            cursor: 0,
            query: String::new(),
            preview,
        }
    }

    /// Entries shown for the current query; dividers only without one
    fn visible(&self) -> Vec<&MenuEntry> {
        let query = self.query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| match entry {
                MenuEntry::Divider(_) => query.is_empty(),
                MenuEntry::Item(item) => {
                    query.is_empty() || item.filter_text.to_lowercase().contains(&query)
                }
            })
            .collect()
    }

    fn items(&self) -> Vec<&MenuItem> {
        self.visible()
            .into_iter()
            .filter_map(|entry| match entry {
                MenuEntry::Item(item) => Some(item),
                MenuEntry::Divider(_) => None,
            })
            .collect()
    }

    fn current(&self) -> Option<&MenuItem> {
        self.items().get(self.cursor).copied()
    }

    fn clamp_cursor(&mut self) {
        let count = self.items().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }
}

/// Level stack of the command menu; the root level is always at the bottom
#[derive(Debug, Default)]
pub(super) struct CommandMenu {
    pub visible: bool,
    pub stack: Vec<MenuLevel>,
}

impl CommandMenu {
    fn push_level(&mut self, level: MenuLevel) {
        self.stack.push(level);
    }

    /// Pop unless only the root level remains
    fn pop_level(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }

    fn top(&self) -> Option<&MenuLevel> {
        self.stack.last()
    }

    fn top_mut(&mut self) -> Option<&mut MenuLevel> {
        self.stack.last_mut()
    }
}

/// Theme remembered while the theme list previews others
#[derive(Debug, Clone)]
pub(super) struct ThemePreview {
    pub base: String,
    /// First cursor event after entry has been handled
    pub cursor_synced: bool,
}

/// One line of the menu as the UI draws it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRow {
    Divider(String),
    Item {
        label: String,
        hint: Option<String>,
        selected: bool,
    },
}

impl App {
    pub fn menu_visible(&self) -> bool {
        self.menu.visible
    }

    pub fn menu_title(&self) -> &str {
        self.menu.top().map_or(ROOT_TITLE, |level| level.title)
    }

    pub fn menu_query(&self) -> &str {
        self.menu.top().map_or("", |level| level.query.as_str())
    }

    pub fn menu_cursor(&self) -> usize {
        self.menu.top().map_or(0, |level| level.cursor)
    }

    /// Rows of the top level, filtered by its query
    pub fn menu_items(&self) -> Vec<MenuRow> {
        let Some(level) = self.menu.top() else {
            return Vec::new();
        };
        let mut item_idx = 0;
        level
            .visible()
            .into_iter()
            .map(|entry| match entry {
                MenuEntry::Divider(title) => MenuRow::Divider(title.to_string()),
                MenuEntry::Item(item) => {
                    let selected = item_idx == level.cursor;
                    item_idx += 1;
                    MenuRow::Item {
                        label: item.label.clone(),
                        hint: item.hint.map(str::to_string),
                        selected,
                    }
                }
            })
            .collect()
    }

    /// Open the menu at the root, or dismiss it if already open
    pub fn toggle_menu(&mut self) {
        if self.menu.visible {
            self.close_menu();
            return;
        }
        self.theme_preview = None;
        self.open_menu();
    }

    /// Open the menu directly on the theme list
    pub fn open_theme_menu(&mut self) {
        self.close_menu();
        self.open_menu();
        self.push_themes_level();
    }

    fn open_menu(&mut self) {
        self.menu.stack = vec![MenuLevel::new(ROOT_TITLE, self.root_entries(), false)];
        self.menu.visible = true;
    }

    /// Dismiss the menu, reverting any theme preview
    pub fn close_menu(&mut self) {
        self.cancel_theme_preview();
        self.menu.visible = false;
        self.menu.stack.clear();
    }

    pub fn menu_move_cursor(&mut self, delta: isize) {
        let Some(level) = self.menu.top_mut() else {
            return;
        };
        let count = level.items().len();
        if count == 0 {
            level.cursor = 0;
            return;
        }
        let next = level.cursor.saturating_add_signed(delta).min(count - 1);
        if next == level.cursor {
            return;
        }
        level.cursor = next;
        self.on_menu_cursor_change();
    }

    pub fn menu_push_char(&mut self, ch: char) {
        if let Some(level) = self.menu.top_mut() {
            level.query.push(ch);
            level.cursor = 0;
        }
        self.on_menu_cursor_change();
    }

    pub fn menu_pop_char(&mut self) {
        if let Some(level) = self.menu.top_mut() {
            if level.query.pop().is_none() {
                return;
            }
            level.cursor = 0;
        }
        self.on_menu_cursor_change();
    }

    /// Leave the current level; closing the menu from the root
    pub fn menu_back(&mut self) {
        if self.menu.pop_level() {
            if let Some(level) = self.menu.top_mut() {
                level.clamp_cursor();
            }
            self.on_menu_cursor_change();
        } else {
            self.close_menu();
        }
    }

    /// Run the item under the cursor
    pub fn menu_activate(&mut self) {
        let Some(action) = self.menu.top().and_then(MenuLevel::current).map(|i| i.action) else {
            return;
        };
        match action {
            MenuAction::OpenThemes => self.push_themes_level(),
            MenuAction::SetTheme(name) => {
                self.theme = name.to_string();
                self.finish_theme_preview(true);
                debug!(theme = name, "theme committed");
                self.menu.visible = false;
                self.menu.stack.clear();
            }
            other => {
                self.run_menu_action(other);
                self.close_menu();
            }
        }
    }

    fn run_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::SwitchSection => self.switch_section(),
            MenuAction::Refresh => self.manual_refresh(),
            MenuAction::ToggleSidebar => self.toggle_sidebar(),
            MenuAction::FocusDivider => self.focus_divider(),
            MenuAction::ToggleWrap => self.toggle_line_wrap(),
            MenuAction::ToggleLayout => self.toggle_layout(),
            MenuAction::ResetSplit => self.reset_split(),
            MenuAction::ToggleSigns => self.toggle_change_signs(),
            MenuAction::ToggleIntraline => self.toggle_intraline_style(),
            MenuAction::OpenThemes | MenuAction::SetTheme(_) => {}
        }
    }

    fn push_themes_level(&mut self) {
        self.menu
            .push_level(MenuLevel::new(THEMES_TITLE, self.theme_entries(), true));
        self.on_menu_cursor_change();
    }

    /// Preview bookkeeping after the cursor, query or level changed
    fn on_menu_cursor_change(&mut self) {
        let Some(level) = self.menu.top() else {
            return;
        };
        if !level.preview {
            self.cancel_theme_preview();
            return;
        }
        let preview = self.theme_preview.get_or_insert_with(|| ThemePreview {
            base: self.theme.clone(),
            cursor_synced: false,
        });

        if !preview.cursor_synced {
            preview.cursor_synced = true;
            let committed = preview.base.clone();
            let Some(level) = self.menu.top_mut() else {
                return;
            };
            let found = level.items().iter().position(|item| {
                matches!(item.action, MenuAction::SetTheme(name) if name == committed)
            });
            if let Some(idx) = found.filter(|idx| *idx != level.cursor) {
                level.cursor = idx;
                return;
            }
        }

        let Some(MenuAction::SetTheme(name)) = self
            .menu
            .top()
            .and_then(MenuLevel::current)
            .map(|item| item.action)
        else {
            return;
        };
        self.theme = name.to_string();
    }

    fn cancel_theme_preview(&mut self) {
        self.finish_theme_preview(false);
    }

    /// End a preview; without commit the remembered theme comes back
    fn finish_theme_preview(&mut self, commit: bool) {
        if let Some(preview) = self.theme_preview.take() {
            if !commit && self.theme != preview.base {
                self.theme = preview.base;
            }
        }
    }

    fn root_entries(&self) -> Vec<MenuEntry> {
        let mut entries = Vec::new();
        if self.can_switch_sections() {
            entries.push(MenuEntry::item(
                "Switch section",
                "Switch section staged unstaged files",
                Some("[s]"),
                MenuAction::SwitchSection,
            ));
        }
        entries.extend([
            MenuEntry::item(
                "Refresh",
                "Refresh reload diff",
                Some("[r]"),
                MenuAction::Refresh,
            ),
            MenuEntry::Divider("Layout"),
            MenuEntry::item(
                "Toggle sidebar",
                "Toggle sidebar layout panel",
                Some("[b]"),
                MenuAction::ToggleSidebar,
            ),
            MenuEntry::item(
                "Focus divider",
                "Focus divider split resize",
                Some("[d]"),
                MenuAction::FocusDivider,
            ),
            MenuEntry::Divider("Appearance"),
            MenuEntry::item(
                "Toggle line wrap",
                "Toggle line wrap hard wrap soft wrap",
                Some("[w]"),
                MenuAction::ToggleWrap,
            ),
            MenuEntry::item(
                "Toggle side-by-side mode",
                "Toggle side by side mode split unified layout view",
                Some("[v]"),
                MenuAction::ToggleLayout,
            ),
        ]);
        if self.layout == DiffLayout::SideBySide {
            entries.push(MenuEntry::item(
                "Reset pane split",
                "Reset pane split divider even ratio 50 50",
                None,
                MenuAction::ResetSplit,
            ));
        }
        entries.extend([
            MenuEntry::item(
                "Toggle +/- symbols",
                "Toggle plus minus symbols signs prefixes add remove",
                None,
                MenuAction::ToggleSigns,
            ),
            MenuEntry::item(
                "Toggle intraline style",
                "Toggle intraline style highlight background underline changed characters",
                Some("[i]"),
                MenuAction::ToggleIntraline,
            ),
            MenuEntry::item("Theme", "Theme", Some("[t]"), MenuAction::OpenThemes),
        ]);
        entries
    }

    fn theme_entries(&self) -> Vec<MenuEntry> {
        let committed = self
            .theme_preview
            .as_ref()
            .map_or(self.theme.as_str(), |preview| preview.base.as_str());
        let mut entries = Vec::new();
        let groups: [(&'static str, Vec<&'static str>); 2] = [
            ("Dark themes", dark_theme_names().collect()),
            ("Light themes", light_theme_names().collect()),
        ];
        for (title, names) in groups {
            if names.is_empty() {
                continue;
            }
            entries.push(MenuEntry::Divider(title));
            for name in names {
                let label = display_name(name);
                entries.push(MenuEntry::Item(MenuItem {
                    filter_text: format!("{label} {name}"),
                    label,
                    hint: (name == committed).then_some("current"),
                    action: MenuAction::SetTheme(name),
                }));
            }
        }
        entries
    }
}
