//! Theme palette resolution into terminal colors

use dv_core::theme::{find_theme, ThemeSpec, DEFAULT_THEME, THEMES};
use ratatui::style::Color;

/// RGB color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Parse hex color string (e.g., "#2ecc71" or "2ecc71")
pub fn parse_hex(s: &str) -> Result<Rgb, String> {
    let s = s.trim().trim_start_matches('#');
    if s.len() != 6 {
        return Err(format!(
            "invalid hex color: expected 6 characters, got {}",
            s.len()
        ));
    }

    let channel = |range: std::ops::Range<usize>, name: &str| {
        s.get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
            .ok_or_else(|| format!("invalid hex color: bad {name} component in '{s}'"))
    };

    Ok(Rgb {
        r: channel(0..2, "red")?,
        g: channel(2..4, "green")?,
        b: channel(4..6, "blue")?,
    })
}

pub fn color_to_rgb(color: Color) -> Option<Rgb> {
    match color {
        Color::Rgb(r, g, b) => Some(Rgb { r, g, b }),
        _ => None,
    }
}

/// Mix `fg` over `bg`; None unless both are RGB
pub fn blend_colors(bg: Color, fg: Color, alpha: f32) -> Option<Color> {
    let bg = color_to_rgb(bg)?;
    let fg = color_to_rgb(fg)?;
    let a = alpha.clamp(0.0, 1.0);
    let blend = |b: u8, f: u8| -> u8 { (b as f32 * (1.0 - a) + f as f32 * a).round() as u8 };
    Some(Color::Rgb(
        blend(bg.r, fg.r),
        blend(bg.g, fg.g),
        blend(bg.b, fg.b),
    ))
}

fn hex_or(value: &str, fallback: Color) -> Color {
    parse_hex(value)
        .map(|rgb| Color::Rgb(rgb.r, rgb.g, rgb.b))
        .unwrap_or(fallback)
}

/// Colors the UI draws with
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub background: Color,
    pub panel: Color,
    pub text: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub border: Color,

    // Diff backgrounds, derived from success/error over the background
    pub added_bg: Color,
    pub removed_bg: Color,
    pub added_emphasis_bg: Color,
    pub removed_emphasis_bg: Color,
    pub cursor_bg: Color,
}

impl ResolvedTheme {
    pub fn from_spec(spec: &ThemeSpec) -> Self {
        let palette = &spec.palette;
        let background = hex_or(palette.background, Color::Reset);
        let panel = hex_or(palette.panel, background);
        let text = hex_or(palette.text, Color::White);
        let accent = hex_or(palette.accent, Color::Cyan);
        let success = hex_or(palette.success, Color::Green);
        let error = hex_or(palette.error, Color::Red);
        let mix = |fg: Color, alpha: f32, fallback: Color| {
            blend_colors(background, fg, alpha).unwrap_or(fallback)
        };

        Self {
            background,
            panel,
            text,
            text_muted: hex_or(palette.text_muted, Color::DarkGray),
            accent,
            success,
            error,
            warning: hex_or(palette.warning, Color::Yellow),
            border: hex_or(palette.border, Color::DarkGray),
            added_bg: mix(success, 0.15, Color::Reset),
            removed_bg: mix(error, 0.15, Color::Reset),
            added_emphasis_bg: mix(success, 0.35, Color::Green),
            removed_emphasis_bg: mix(error, 0.35, Color::Red),
            cursor_bg: mix(accent, 0.25, Color::DarkGray),
        }
    }

    /// Theme by catalogue name; unknown names get the default theme
    pub fn named(name: &str) -> Self {
        let spec = find_theme(name)
            .or_else(|| find_theme(DEFAULT_THEME))
            .unwrap_or(&THEMES[0]);
        Self::from_spec(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#2ecc71"), Ok(Rgb { r: 46, g: 204, b: 113 }));
        assert_eq!(parse_hex(" ffffff "), Ok(Rgb { r: 255, g: 255, b: 255 }));
        assert!(parse_hex("#fff").is_err());
        assert!(parse_hex("#gg0000").unwrap_err().contains("red"));
    }

    #[test]
    fn test_blend_colors() {
        let black = Color::Rgb(0, 0, 0);
        let white = Color::Rgb(255, 255, 255);
        assert_eq!(blend_colors(black, white, 0.5), Some(Color::Rgb(128, 128, 128)));
        assert_eq!(blend_colors(black, white, 2.0), Some(white));
        assert_eq!(blend_colors(Color::Reset, white, 0.5), None);
    }

    #[test]
    fn test_every_theme_resolves_to_rgb() {
        for spec in THEMES {
            let theme = ResolvedTheme::from_spec(spec);
            assert!(matches!(theme.background, Color::Rgb(..)), "{}", spec.name);
            assert!(matches!(theme.added_bg, Color::Rgb(..)), "{}", spec.name);
        }
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(ResolvedTheme::named("nope"), ResolvedTheme::named(DEFAULT_THEME));
    }
}
