//! UI rendering for the TUI

use crate::app::{App, DiffLayout, MenuRow, TreeRow};
use crate::color::ResolvedTheme;
use crate::views::{render_side_by_side, render_unified};
use dv_core::NodeKind;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Columns the diff keeps beside the sidebar; narrower and it is not drawn
const MIN_DIFF_WIDTH: u16 = 40;
const MENU_WIDTH: u16 = 52;

/// Keep the tail of a path within `max_width` columns
fn truncate_path(path: &str, max_width: usize) -> String {
    if path.width() <= max_width {
        return path.to_string();
    }

    let parts: Vec<&str> = path.split('/').collect();
    let last = parts.last().copied().unwrap_or(path);
    if parts.len() > 2 {
        let simple = format!("{}/.../{}", parts[0], last);
        if simple.width() <= max_width {
            return simple;
        }
    }

    let budget = max_width.saturating_sub(3);
    let mut tail: Vec<char> = Vec::new();
    let mut used = 0;
    for ch in last.chars().rev() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        tail.push(ch);
    }
    format!("...{}", tail.into_iter().rev().collect::<String>())
}

/// Main drawing function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let theme = ResolvedTheme::named(app.theme_name());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_content(frame, app, &theme, chunks[0]);
    draw_status_bar(frame, app, &theme, chunks[1]);

    if app.menu_visible() {
        draw_command_menu(frame, app, &theme);
    }
}

fn draw_content(frame: &mut Frame, app: &mut App, theme: &ResolvedTheme, area: Rect) {
    let sidebar_width = app.sidebar_width();
    if app.sidebar_visible() && area.width >= sidebar_width + MIN_DIFF_WIDTH {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
            .split(area);
        draw_sidebar(frame, app, theme, chunks[0]);
        draw_viewer(frame, app, theme, chunks[1]);
    } else {
        draw_viewer(frame, app, theme, area);
    }
}

fn draw_sidebar(frame: &mut Frame, app: &App, theme: &ResolvedTheme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Separator
        ])
        .split(area);
    let content_area = chunks[0];
    let separator_area = chunks[1];

    let (glyph, color) = if app.divider_focused() {
        ("┃\n", theme.accent)
    } else {
        ("▏\n", theme.border)
    };
    let separator_text = glyph.repeat(separator_area.height as usize);
    let separator =
        Paragraph::new(separator_text).style(Style::default().fg(color).bg(theme.background));
    frame.render_widget(separator, separator_area);

    let show_filter = app.filter_input_visible() || !app.filter_query().is_empty();
    let panel_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if show_filter {
            vec![
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Tree
                Constraint::Length(1), // Filter
            ]
        } else {
            vec![Constraint::Length(3), Constraint::Min(0)]
        })
        .split(content_area);

    let panel = Style::default().bg(theme.panel);
    let muted = panel.fg(theme.text_muted);

    let root_name = app
        .repo_root()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or(".");
    let max_width = content_area.width.saturating_sub(6) as usize;
    let mut header = vec![
        Line::from(vec![
            Span::styled(" Root ", muted),
            Span::styled(truncate_path(root_name, max_width), panel.fg(theme.text)),
        ]),
    ];
    if let Some(branch) = app.branch() {
        header.push(Line::from(vec![
            Span::styled(" On ", muted),
            Span::styled(truncate_path(branch, max_width), panel.fg(theme.accent)),
        ]));
    }
    frame.render_widget(Paragraph::new(header).style(panel), panel_chunks[0]);

    draw_tree(frame, app, theme, panel_chunks[1]);

    if show_filter {
        let mut spans = vec![
            Span::styled(" / ", panel.fg(theme.accent)),
            Span::styled(app.filter_query().to_string(), panel.fg(theme.text)),
        ];
        if app.filter_input_visible() {
            spans.push(Span::styled("█", panel.fg(theme.accent)));
        }
        let options = app.filter_options();
        let mut mode = options.mode.label().to_string();
        if options.case_sensitive {
            mode.push_str(" Aa");
        }
        spans.push(Span::styled(format!("  {mode}"), panel.fg(theme.text_muted)));
        if app.filter_no_matches() {
            spans.push(Span::styled("  no matches", panel.fg(theme.error)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).style(panel), panel_chunks[2]);
    }
}

fn draw_tree(frame: &mut Frame, app: &App, theme: &ResolvedTheme, area: Rect) {
    let rows = app.tree_rows();
    let height = area.height as usize;
    let cursor = rows.iter().position(|row| row.is_cursor).unwrap_or(0);
    let start = (cursor + 1).saturating_sub(height);
    let width = area.width as usize;

    let lines: Vec<Line> = rows
        .iter()
        .skip(start)
        .take(height)
        .map(|row| tree_line(row, theme, width))
        .collect();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme.panel)),
        area,
    );
}

fn tree_line(row: &TreeRow, theme: &ResolvedTheme, width: usize) -> Line<'static> {
    let bg = if row.is_cursor { theme.cursor_bg } else { theme.panel };
    let base = Style::default().bg(bg);
    let indent = "  ".repeat(row.depth);
    let (label, label_style) = match row.kind {
        NodeKind::Section => (
            format!("{} ({})", row.name, row.touched_files),
            base.fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        NodeKind::Directory => (format!("{}/", row.name), base.fg(theme.text_muted)),
        NodeKind::File => (row.name.clone(), base.fg(theme.text)),
    };

    let stats = format!("+{} -{} ", row.additions, row.deletions);
    let available = width.saturating_sub(indent.len() + 1 + stats.len() + 1);
    let label = truncate_path(&label, available);
    let used = 1 + indent.len() + label.width() + stats.len();

    Line::from(vec![
        Span::styled(format!(" {indent}"), base),
        Span::styled(label, label_style),
        Span::styled(" ".repeat(width.saturating_sub(used)), base),
        Span::styled(format!("+{}", row.additions), base.fg(theme.success)),
        Span::styled(" ", base),
        Span::styled(format!("-{} ", row.deletions), base.fg(theme.error)),
    ])
}

fn draw_viewer(frame: &mut Frame, app: &mut App, theme: &ResolvedTheme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Diff
        ])
        .split(area);

    let base = Style::default().bg(theme.background);
    let mut title = vec![Span::styled(
        format!(" {} ", app.viewer_title()),
        base.fg(theme.text).add_modifier(Modifier::BOLD),
    )];
    if let Some((position, total)) = app.viewer_file_position() {
        title.push(Span::styled(
            format!("{position}/{total} "),
            base.fg(theme.text_muted),
        ));
    }
    if let Some((additions, deletions)) = app.active_file_stats() {
        title.push(Span::styled(format!("+{additions}"), base.fg(theme.success)));
        title.push(Span::styled(" ", base));
        title.push(Span::styled(format!("-{deletions}"), base.fg(theme.error)));
    }
    frame.render_widget(Paragraph::new(Line::from(title)).style(base), chunks[0]);

    let diff_area = chunks[1];
    app.set_viewport(diff_area.width as usize, diff_area.height as usize);
    match app.layout() {
        DiffLayout::Unified => render_unified(frame, app, diff_area),
        DiffLayout::SideBySide => render_side_by_side(frame, app, diff_area),
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, theme: &ResolvedTheme, area: Rect) {
    let bar = Style::default().bg(theme.panel);
    let mut left = vec![Span::raw(" ")];
    for summary in app.section_summaries() {
        let active = summary.section == app.active_section();
        let name_style = if active {
            bar.fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            bar.fg(theme.text_muted)
        };
        left.push(Span::styled(
            format!("{} {}", summary.section.display_name(), summary.files),
            name_style,
        ));
        left.push(Span::styled(format!(" +{}", summary.additions), bar.fg(theme.success)));
        left.push(Span::styled(format!(" -{}", summary.deletions), bar.fg(theme.error)));
        left.push(Span::raw("  "));
    }

    let mut right = Vec::new();
    if app.divider_focused() {
        right.push(Span::styled("resize ←/→  done esc  ", bar.fg(theme.accent)));
    }
    right.push(Span::styled(app.layout().label(), bar.fg(theme.text)));
    if app.line_wrap() {
        right.push(Span::styled(" wrap", bar.fg(theme.text)));
    }
    right.push(Span::styled("  ^P commands ", bar.fg(theme.text_muted)));

    frame.render_widget(Paragraph::new(Line::from(left)).style(bar), area);
    frame.render_widget(
        Paragraph::new(Line::from(right))
            .alignment(Alignment::Right)
            .style(bar),
        area,
    );
}

fn draw_command_menu(frame: &mut Frame, app: &App, theme: &ResolvedTheme) {
    let area = frame.area();
    let rows = app.menu_items();

    // Query line plus borders
    let popup_width = MENU_WIDTH.min(area.width.saturating_sub(4));
    let popup_height = (rows.len() as u16 + 3).min(area.height.saturating_sub(4));
    let popup_x = area.width.saturating_sub(popup_width) / 2;
    let popup_y = area.height.saturating_sub(popup_height) / 4;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let panel = Style::default().bg(theme.panel);
    let inner_width = popup_width.saturating_sub(2) as usize;
    let list_height = popup_height.saturating_sub(3) as usize;
    let cursor = app.menu_cursor();
    let selected = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| matches!(row, MenuRow::Item { .. }))
        .nth(cursor)
        .map_or(0, |(idx, _)| idx);
    let start = (selected + 1).saturating_sub(list_height);

    let mut lines = vec![Line::from(vec![
        Span::styled("> ", panel.fg(theme.accent)),
        Span::styled(app.menu_query().to_string(), panel.fg(theme.text)),
        Span::styled("█", panel.fg(theme.accent)),
    ])];
    for row in rows.iter().skip(start).take(list_height) {
        lines.push(match row {
            MenuRow::Divider(title) => Line::from(Span::styled(
                format!(" {title}"),
                panel.fg(theme.text_muted).add_modifier(Modifier::BOLD),
            )),
            MenuRow::Item {
                label,
                hint,
                selected,
            } => {
                let style = if *selected {
                    panel.bg(theme.cursor_bg).fg(theme.text)
                } else {
                    panel.fg(theme.text)
                };
                let hint = hint.as_deref().unwrap_or("");
                let gap = inner_width.saturating_sub(label.width() + hint.width() + 3);
                Line::from(vec![
                    Span::styled(format!("  {label}"), style),
                    Span::styled(" ".repeat(gap), style),
                    Span::styled(format!("{hint} "), style.fg(theme.text_muted)),
                ])
            }
        });
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.menu_title()))
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(theme.accent))
        .style(panel);
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_path_keeps_short_paths() {
        assert_eq!(truncate_path("src/main.rs", 20), "src/main.rs");
    }

    #[test]
    fn test_truncate_path_abbreviates_middle() {
        assert_eq!(
            truncate_path("crates/dv/src/app/navigation.rs", 24),
            "crates/.../navigation.rs"
        );
    }

    #[test]
    fn test_truncate_path_keeps_tail() {
        assert_eq!(truncate_path("a_really_long_file_name.rs", 10), "...name.rs");
    }
}
