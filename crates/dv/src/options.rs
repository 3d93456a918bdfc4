//! Startup option values and their parsing

use crate::app::{DiffLayout, InitialState, IntralineStyle};
use dv_core::theme::{parse_theme_name, theme_names, DEFAULT_THEME};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OptionError {
    #[error("invalid --view value {0:?} (expected \"unified\" or \"split\")")]
    View(String),
    #[error("invalid --theme value {value:?} (available themes: {available})")]
    Theme { value: String, available: String },
    #[error("invalid --intraline-style value {0:?} (expected \"background\" or \"underline\")")]
    IntralineStyle(String),
}

/// Lowercase, trim, and turn `_` and spaces into `-`
pub fn normalize_value(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}

pub fn parse_layout(value: &str) -> Result<DiffLayout, OptionError> {
    match normalize_value(value).as_str() {
        "unified" => Ok(DiffLayout::Unified),
        "split" | "side-by-side" | "sidebyside" => Ok(DiffLayout::SideBySide),
        _ => Err(OptionError::View(value.to_string())),
    }
}

pub fn parse_intraline_style(value: &str) -> Result<IntralineStyle, OptionError> {
    match normalize_value(value).as_str() {
        "background" | "bg" => Ok(IntralineStyle::Background),
        "underline" => Ok(IntralineStyle::Underline),
        _ => Err(OptionError::IntralineStyle(value.to_string())),
    }
}

pub fn parse_theme(value: &str) -> Result<&'static str, OptionError> {
    parse_theme_name(value).ok_or_else(|| OptionError::Theme {
        value: value.to_string(),
        available: theme_names().collect::<Vec<_>>().join(", "),
    })
}

/// Raw startup values, after config merging and before parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupValues {
    pub view: String,
    pub sidebar: bool,
    pub theme: String,
    pub intraline_style: String,
    pub show_symbols: bool,
}

impl Default for StartupValues {
    fn default() -> Self {
        Self {
            view: "unified".to_string(),
            sidebar: true,
            theme: DEFAULT_THEME.to_string(),
            intraline_style: "background".to_string(),
            show_symbols: false,
        }
    }
}

impl StartupValues {
    pub fn into_initial_state(self) -> Result<InitialState, OptionError> {
        Ok(InitialState {
            layout: parse_layout(&self.view)?,
            sidebar_visible: self.sidebar,
            theme: parse_theme(&self.theme)?.to_string(),
            intraline_style: parse_intraline_style(&self.intraline_style)?,
            show_change_signs: self.show_symbols,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_value() {
        assert_eq!(normalize_value("  Side_By Side "), "side-by-side");
    }

    #[test]
    fn test_parse_layout_aliases() {
        assert_eq!(parse_layout("Unified"), Ok(DiffLayout::Unified));
        assert_eq!(parse_layout("split"), Ok(DiffLayout::SideBySide));
        assert_eq!(parse_layout("side_by_side"), Ok(DiffLayout::SideBySide));
        assert_eq!(parse_layout("SideBySide"), Ok(DiffLayout::SideBySide));
    }

    #[test]
    fn test_parse_layout_error_message() {
        let err = parse_layout("columns").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid --view value \"columns\" (expected \"unified\" or \"split\")"
        );
    }

    #[test]
    fn test_parse_intraline_style() {
        assert_eq!(parse_intraline_style("BG"), Ok(IntralineStyle::Background));
        assert_eq!(parse_intraline_style("underline"), Ok(IntralineStyle::Underline));
        assert!(parse_intraline_style("bold")
            .unwrap_err()
            .to_string()
            .contains("expected \"background\" or \"underline\""));
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!(parse_theme("catpuccin"), Ok("catppuccin"));
        assert_eq!(parse_theme("Tokyonight"), Ok("tokyonight"));
        let err = parse_theme("neon").unwrap_err().to_string();
        assert!(err.starts_with("invalid --theme value \"neon\" (available themes: catppuccin, "));
    }

    #[test]
    fn test_into_initial_state() {
        let values = StartupValues {
            view: "split".to_string(),
            sidebar: false,
            theme: "nord".to_string(),
            intraline_style: "underline".to_string(),
            show_symbols: true,
        };
        let state = values.into_initial_state().unwrap();
        assert_eq!(state.layout, DiffLayout::SideBySide);
        assert!(!state.sidebar_visible);
        assert_eq!(state.theme, "nord");
        assert_eq!(state.intraline_style, IntralineStyle::Underline);
        assert!(state.show_change_signs);

        assert_eq!(
            StartupValues::default().into_initial_state().unwrap(),
            InitialState::default()
        );
    }
}
