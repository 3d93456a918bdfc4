//! Unified layout: one interleaved column with old and new line numbers

use super::{line_number, pad_to, ViewStyle};
use crate::app::App;
use dv_core::render::{line_number_digits, unified_gutter_width};
use dv_core::{LineKind, UnifiedRow};
use ratatui::{layout::Rect, text::Line, text::Span, widgets::Paragraph, Frame};

/// Render the unified layout from the app's scroll offset
pub fn render_unified(frame: &mut Frame, app: &App, area: Rect) {
    let view = ViewStyle::from_app(app);
    let lines = unified_lines(&app.viewer().unified, &view, area.width as usize);
    let visible: Vec<Line> = lines
        .into_iter()
        .skip(app.scroll_offset())
        .take(area.height as usize)
        .collect();
    frame.render_widget(Paragraph::new(visible).style(view.base()), area);
}

fn unified_lines(rows: &[UnifiedRow], view: &ViewStyle, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return Vec::new();
    }
    let old_digits = line_number_digits(rows.iter().map(|row| row.old_line));
    let new_digits = line_number_digits(rows.iter().map(|row| row.new_line));
    let gutter_width = unified_gutter_width(rows, view.show_signs);
    let content_width = width.saturating_sub(gutter_width).max(1);

    let mut lines = Vec::new();
    for row in rows {
        if matches!(row.kind, LineKind::Hunk | LineKind::Meta) {
            let style = view.line_style(row.kind);
            for (_, chunk) in view.chunks(&row.text, width) {
                lines.push(Line::from(Span::styled(chunk.to_string(), style)));
            }
            continue;
        }

        let gutter_style = view.gutter_style(row.kind);
        let fill = view.line_style(row.kind);
        for (idx, (offset, chunk)) in view.chunks(&row.text, content_width).into_iter().enumerate() {
            let gutter = if idx == 0 {
                format!(
                    "{} {} {}",
                    line_number(row.old_line, old_digits),
                    line_number(row.new_line, new_digits),
                    view.sign(row.kind)
                )
            } else {
                " ".repeat(gutter_width)
            };
            let mut spans = vec![Span::styled(gutter, gutter_style)];
            spans.extend(view.content_spans(chunk, offset, row.kind, row.emphasis));
            pad_to(&mut spans, width, fill);
            lines.push(Line::from(spans));
        }
    }
    lines
}
