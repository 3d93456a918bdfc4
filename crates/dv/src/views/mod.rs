//! Diff viewer rendering for both layouts

mod side_by_side;
mod unified;

#[cfg(test)]
mod tests;

pub use side_by_side::render_side_by_side;
pub use unified::render_unified;

use crate::app::{App, IntralineStyle};
use crate::color::ResolvedTheme;
use dv_core::render::{skip_columns, wrap_text, Emphasis};
use dv_core::LineKind;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};
use unicode_width::UnicodeWidthStr;

/// Per-frame drawing settings taken from the app
struct ViewStyle {
    theme: ResolvedTheme,
    intraline: IntralineStyle,
    wrap: bool,
    show_signs: bool,
    /// Columns hidden on the left; only read when not wrapping
    scroll_x: usize,
}

impl ViewStyle {
    fn from_app(app: &App) -> Self {
        Self {
            theme: ResolvedTheme::named(app.theme_name()),
            intraline: app.intraline_style(),
            wrap: app.line_wrap(),
            show_signs: app.show_change_signs(),
            scroll_x: app.scroll_x(),
        }
    }

    fn base(&self) -> Style {
        Style::default().bg(self.theme.background)
    }

    fn line_style(&self, kind: LineKind) -> Style {
        let theme = &self.theme;
        match kind {
            LineKind::Added => Style::default().fg(theme.text).bg(theme.added_bg),
            LineKind::Removed => Style::default().fg(theme.text).bg(theme.removed_bg),
            LineKind::Context => self.base().fg(theme.text),
            LineKind::Hunk => self.base().fg(theme.accent),
            LineKind::Meta => self.base().fg(theme.text_muted),
        }
    }

    fn emphasis_style(&self, kind: LineKind) -> Style {
        let style = self.line_style(kind);
        match (self.intraline, kind) {
            (IntralineStyle::Background, LineKind::Added) => style.bg(self.theme.added_emphasis_bg),
            (IntralineStyle::Background, LineKind::Removed) => {
                style.bg(self.theme.removed_emphasis_bg)
            }
            (IntralineStyle::Underline, LineKind::Added | LineKind::Removed) => {
                style.add_modifier(Modifier::UNDERLINED)
            }
            _ => style,
        }
    }

    fn gutter_style(&self, kind: LineKind) -> Style {
        let style = self.line_style(kind).fg(self.theme.text_muted);
        match kind {
            LineKind::Added => style.fg(self.theme.success),
            LineKind::Removed => style.fg(self.theme.error),
            _ => style,
        }
    }

    fn sign(&self, kind: LineKind) -> &'static str {
        if !self.show_signs {
            return "";
        }
        match kind {
            LineKind::Added => "+ ",
            LineKind::Removed => "- ",
            _ => "  ",
        }
    }

    /// Visual chunks of `text` with their byte offsets
    ///
    /// Without wrapping this is the single window starting `scroll_x` columns in.
    fn chunks<'t>(&self, text: &'t str, width: usize) -> Vec<(usize, &'t str)> {
        if !self.wrap {
            let (start, rest) = skip_columns(text, self.scroll_x);
            let window = wrap_text(rest, width).first().copied().unwrap_or("");
            return vec![(start, window)];
        }
        let mut offset = 0;
        let mut out = Vec::new();
        for chunk in wrap_text(text, width) {
            out.push((offset, chunk));
            offset += chunk.len();
        }
        out
    }

    /// Spans for one chunk, splitting out the emphasized byte range
    fn content_spans(
        &self,
        chunk: &str,
        offset: usize,
        kind: LineKind,
        emphasis: Emphasis,
    ) -> Vec<Span<'static>> {
        let style = self.line_style(kind);
        let end = offset + chunk.len();
        let Some((start, stop)) = emphasis
            .map(|(start, stop)| (start.max(offset), stop.min(end)))
            .filter(|(start, stop)| start < stop)
        else {
            return vec![Span::styled(chunk.to_string(), style)];
        };

        let (start, stop) = (start - offset, stop - offset);
        let mut spans = Vec::with_capacity(3);
        if start > 0 {
            spans.push(Span::styled(chunk[..start].to_string(), style));
        }
        spans.push(Span::styled(
            chunk[start..stop].to_string(),
            self.emphasis_style(kind),
        ));
        if stop < chunk.len() {
            spans.push(Span::styled(chunk[stop..].to_string(), style));
        }
        spans
    }
}

fn line_number(number: Option<usize>, digits: usize) -> String {
    match number {
        Some(n) => format!("{n:>digits$}"),
        None => " ".repeat(digits),
    }
}

fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|span| span.content.width()).sum()
}

/// Fill `spans` with styled blanks up to `width` columns
fn pad_to(spans: &mut Vec<Span<'static>>, width: usize, style: Style) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}
