//! Side-by-side layout: old lines on the left, new lines on the right

use super::{line_number, pad_to, ViewStyle};
use crate::app::App;
use dv_core::render::{line_number_digits, side_by_side_gutter_width, side_pane_widths};
use dv_core::{SideBySideRow, SideCell};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const DIVIDER: &str = "│";

/// Render the side-by-side layout from the app's scroll offset
pub fn render_side_by_side(frame: &mut Frame, app: &App, area: Rect) {
    let view = ViewStyle::from_app(app);
    let lines = side_by_side_lines(
        &app.viewer().side_by_side,
        &view,
        area.width as usize,
        app.split(),
    );
    let visible: Vec<Line> = lines
        .into_iter()
        .skip(app.scroll_offset())
        .take(area.height as usize)
        .collect();
    frame.render_widget(Paragraph::new(visible).style(view.base()), area);
}

/// Geometry shared by every row of one pane
struct Pane {
    digits: usize,
    gutter: usize,
    width: usize,
}

impl Pane {
    fn content_width(&self) -> usize {
        self.width.saturating_sub(self.gutter).max(1)
    }

    fn blank(&self, view: &ViewStyle) -> Vec<Span<'static>> {
        vec![Span::styled(" ".repeat(self.width), view.base())]
    }

    fn cell_lines(&self, cell: &SideCell, view: &ViewStyle) -> Vec<Vec<Span<'static>>> {
        let gutter_style = view.gutter_style(cell.kind);
        let fill = view.line_style(cell.kind);
        view.chunks(&cell.text, self.content_width())
            .into_iter()
            .enumerate()
            .map(|(idx, (offset, chunk))| {
                let gutter = if idx == 0 {
                    format!(
                        "{} {}",
                        line_number(cell.line_number, self.digits),
                        view.sign(cell.kind)
                    )
                } else {
                    " ".repeat(self.gutter)
                };
                let mut spans = vec![Span::styled(gutter, gutter_style)];
                spans.extend(view.content_spans(chunk, offset, cell.kind, cell.emphasis));
                pad_to(&mut spans, self.width, fill);
                spans
            })
            .collect()
    }
}

fn side_by_side_lines(
    rows: &[SideBySideRow],
    view: &ViewStyle,
    width: usize,
    split: f64,
) -> Vec<Line<'static>> {
    if width == 0 {
        return Vec::new();
    }
    let digits = line_number_digits(rows.iter().flat_map(|row| {
        [
            row.left.as_ref().and_then(|cell| cell.line_number),
            row.right.as_ref().and_then(|cell| cell.line_number),
        ]
    }));
    let gutter = side_by_side_gutter_width(rows, view.show_signs);
    let (left_width, right_width) = side_pane_widths(width, split);
    let left = Pane {
        digits,
        gutter,
        width: left_width,
    };
    let right = Pane {
        digits,
        gutter,
        width: right_width,
    };
    let divider_style = Style::default()
        .fg(view.theme.border)
        .bg(view.theme.background);

    let mut lines = Vec::new();
    for row in rows {
        if let Some(shared) = &row.shared {
            let style = view.line_style(shared.kind);
            for (_, chunk) in view.chunks(&shared.text, width) {
                lines.push(Line::from(Span::styled(chunk.to_string(), style)));
            }
            continue;
        }

        let left_lines = row
            .left
            .as_ref()
            .map(|cell| left.cell_lines(cell, view))
            .unwrap_or_default();
        let right_lines = row
            .right
            .as_ref()
            .map(|cell| right.cell_lines(cell, view))
            .unwrap_or_default();
        let height = left_lines.len().max(right_lines.len()).max(1);

        let mut left_iter = left_lines.into_iter();
        let mut right_iter = right_lines.into_iter();
        for _ in 0..height {
            let mut spans = left_iter.next().unwrap_or_else(|| left.blank(view));
            spans.push(Span::styled(DIVIDER, divider_style));
            spans.extend(right_iter.next().unwrap_or_else(|| right.blank(view)));
            lines.push(Line::from(spans));
        }
    }
    lines
}
