//! Built-in theme catalogue
//!
//! Colors are hex strings; the terminal front end resolves them.

/// Theme used when none is configured or the configured one is unknown
pub const DEFAULT_THEME: &str = "catppuccin";

/// Hex colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub background: &'static str,
    pub panel: &'static str,
    pub text: &'static str,
    pub text_muted: &'static str,
    pub accent: &'static str,
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub border: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSpec {
    pub name: &'static str,
    pub light: bool,
    pub palette: ThemePalette,
}

const fn dark(name: &'static str, palette: ThemePalette) -> ThemeSpec {
    ThemeSpec {
        name,
        light: false,
        palette,
    }
}

const fn light(name: &'static str, palette: ThemePalette) -> ThemeSpec {
    ThemeSpec {
        name,
        light: true,
        palette,
    }
}

pub const THEMES: &[ThemeSpec] = &[
    dark(
        "catppuccin",
        ThemePalette {
            background: "#1e1e2e",
            panel: "#181825",
            text: "#cdd6f4",
            text_muted: "#7f849c",
            accent: "#cba6f7",
            success: "#a6e3a1",
            error: "#f38ba8",
            warning: "#f9e2af",
            border: "#45475a",
        },
    ),
    dark(
        "dracula",
        ThemePalette {
            background: "#282a36",
            panel: "#21222c",
            text: "#f8f8f2",
            text_muted: "#6272a4",
            accent: "#bd93f9",
            success: "#50fa7b",
            error: "#ff5555",
            warning: "#f1fa8c",
            border: "#44475a",
        },
    ),
    dark(
        "gruvbox",
        ThemePalette {
            background: "#282828",
            panel: "#1d2021",
            text: "#ebdbb2",
            text_muted: "#928374",
            accent: "#83a598",
            success: "#b8bb26",
            error: "#fb4934",
            warning: "#fabd2f",
            border: "#504945",
        },
    ),
    dark(
        "kanagawa",
        ThemePalette {
            background: "#1f1f28",
            panel: "#16161d",
            text: "#dcd7ba",
            text_muted: "#727169",
            accent: "#7e9cd8",
            success: "#98bb6c",
            error: "#e82424",
            warning: "#e6c384",
            border: "#363646",
        },
    ),
    dark(
        "monokai",
        ThemePalette {
            background: "#272822",
            panel: "#1e1f1c",
            text: "#f8f8f2",
            text_muted: "#75715e",
            accent: "#66d9ef",
            success: "#a6e22e",
            error: "#f92672",
            warning: "#e6db74",
            border: "#49483e",
        },
    ),
    dark(
        "nord",
        ThemePalette {
            background: "#2e3440",
            panel: "#272c36",
            text: "#eceff4",
            text_muted: "#616e88",
            accent: "#88c0d0",
            success: "#a3be8c",
            error: "#bf616a",
            warning: "#ebcb8b",
            border: "#434c5e",
        },
    ),
    dark(
        "one-dark",
        ThemePalette {
            background: "#282c34",
            panel: "#21252b",
            text: "#abb2bf",
            text_muted: "#5c6370",
            accent: "#61afef",
            success: "#98c379",
            error: "#e06c75",
            warning: "#e5c07b",
            border: "#3e4451",
        },
    ),
    dark(
        "tokyonight",
        ThemePalette {
            background: "#1a1b26",
            panel: "#16161e",
            text: "#c0caf5",
            text_muted: "#565f89",
            accent: "#7aa2f7",
            success: "#9ece6a",
            error: "#f7768e",
            warning: "#e0af68",
            border: "#292e42",
        },
    ),
    light(
        "catppuccin-latte",
        ThemePalette {
            background: "#eff1f5",
            panel: "#e6e9ef",
            text: "#4c4f69",
            text_muted: "#8c8fa1",
            accent: "#8839ef",
            success: "#40a02b",
            error: "#d20f39",
            warning: "#df8e1d",
            border: "#ccd0da",
        },
    ),
    light(
        "github-light",
        ThemePalette {
            background: "#ffffff",
            panel: "#f6f8fa",
            text: "#24292f",
            text_muted: "#6e7781",
            accent: "#0969da",
            success: "#1a7f37",
            error: "#cf222e",
            warning: "#9a6700",
            border: "#d0d7de",
        },
    ),
    light(
        "gruvbox-light",
        ThemePalette {
            background: "#fbf1c7",
            panel: "#f2e5bc",
            text: "#3c3836",
            text_muted: "#928374",
            accent: "#076678",
            success: "#79740e",
            error: "#9d0006",
            warning: "#b57614",
            border: "#d5c4a1",
        },
    ),
    light(
        "solarized-light",
        ThemePalette {
            background: "#fdf6e3",
            panel: "#eee8d5",
            text: "#586e75",
            text_muted: "#93a1a1",
            accent: "#268bd2",
            success: "#859900",
            error: "#dc322f",
            warning: "#b58900",
            border: "#e4ddc8",
        },
    ),
];

pub fn find_theme(name: &str) -> Option<&'static ThemeSpec> {
    THEMES.iter().find(|theme| theme.name == name)
}

pub fn theme_names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().map(|theme| theme.name)
}

pub fn dark_theme_names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().filter(|t| !t.light).map(|t| t.name)
}

pub fn light_theme_names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().filter(|t| t.light).map(|t| t.name)
}

/// Resolve a user-supplied theme name to a catalogue entry
///
/// Accepts any case, `_` or spaces for `-`, and the common `catpuccin`
/// misspelling.
pub fn parse_theme_name(input: &str) -> Option<&'static str> {
    let normalized: String = input
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect();
    let normalized = match normalized.as_str() {
        "catpuccin" => DEFAULT_THEME.to_string(),
        _ => normalized,
    };
    find_theme(&normalized).map(|theme| theme.name)
}

/// "one-dark" -> "One Dark"
pub fn display_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_exists() {
        assert!(find_theme(DEFAULT_THEME).is_some());
    }

    #[test]
    fn test_parse_theme_name_normalizes() {
        assert_eq!(parse_theme_name(" Tokyonight "), Some("tokyonight"));
        assert_eq!(parse_theme_name("one_dark"), Some("one-dark"));
        assert_eq!(parse_theme_name("catpuccin"), Some("catppuccin"));
        assert_eq!(parse_theme_name("does-not-exist"), None);
    }

    #[test]
    fn test_groups_cover_catalogue() {
        let total = dark_theme_names().count() + light_theme_names().count();
        assert_eq!(total, theme_names().count());
        assert!(light_theme_names().any(|name| name == "github-light"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("one-dark"), "One Dark");
        assert_eq!(display_name("catppuccin"), "Catppuccin");
    }
}
