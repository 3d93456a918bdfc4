use std::path::PathBuf;

use crate::app::{App, DiffLayout, InitialState};
use crate::views::{render_side_by_side, render_unified};
use dv_core::{DiffProvider, DiffSection, GitError};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

const DIFF: &str = "diff --git a/src/main.rs b/src/main.rs
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,3 +1,3 @@
 fn main() {
-    println!(\"old\");
+    println!(\"new\");
 }
";

struct FixedProvider;

impl DiffProvider for FixedProvider {
    fn load_diff(&self, _section: DiffSection) -> Result<String, GitError> {
        Ok(DIFF.to_string())
    }

    fn repo_root(&self) -> Result<PathBuf, GitError> {
        Err(GitError::NotARepo)
    }

    fn current_branch(&self) -> Result<String, GitError> {
        Err(GitError::NotARepo)
    }

    fn sections(&self) -> Vec<DiffSection> {
        vec![DiffSection::Files]
    }
}

fn make_app(layout: DiffLayout, show_signs: bool) -> App {
    let initial = InitialState {
        layout,
        show_change_signs: show_signs,
        ..InitialState::default()
    };
    App::new(Box::new(FixedProvider), false, initial)
}

fn render_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal
        .draw(|frame| {
            let area = frame.area();
            app.set_viewport(area.width as usize, area.height as usize);
            match app.layout() {
                DiffLayout::Unified => render_unified(frame, app, area),
                DiffLayout::SideBySide => render_side_by_side(frame, app, area),
            }
        })
        .expect("draw");
    terminal.backend().buffer().clone()
}

fn buffer_text(buf: &Buffer) -> Vec<String> {
    let mut lines = Vec::new();
    for y in 0..buf.area.height {
        let mut line = String::new();
        for x in 0..buf.area.width {
            line.push_str(buf[(x, y)].symbol());
        }
        lines.push(line);
    }
    lines
}

#[test]
fn test_unified_render_shows_both_line_numbers() {
    let mut app = make_app(DiffLayout::Unified, false);
    let lines = buffer_text(&render_buffer(&mut app, 40, 6));
    assert!(lines[0].starts_with("@@ -1,3 +1,3 @@"));
    assert!(lines[1].starts_with("1 1 fn main() {"));
    assert!(lines[2].starts_with("2       println!(\"old\");"));
    assert!(lines[3].starts_with("  2     println!(\"new\");"));
    assert!(lines[4].starts_with("3 3 }"));
}

#[test]
fn test_unified_render_with_change_signs() {
    let mut app = make_app(DiffLayout::Unified, true);
    let lines = buffer_text(&render_buffer(&mut app, 40, 6));
    assert!(lines[1].starts_with("1 1   fn main() {"));
    assert!(lines[2].starts_with("2   -     println!"));
    assert!(lines[3].starts_with("  2 +     println!"));
}

#[test]
fn test_side_by_side_pairs_rows() {
    let mut app = make_app(DiffLayout::SideBySide, false);
    let lines = buffer_text(&render_buffer(&mut app, 61, 5));
    assert!(lines[0].starts_with("@@ -1,3 +1,3 @@"));
    assert!(lines[1].starts_with("1 fn main() {"));
    assert!(lines[2].starts_with("2     println!(\"old\");"));
    assert!(lines[2].contains("│2     println!(\"new\");"));
    assert_eq!(lines[3].matches('}').count(), 2);
}

#[test]
fn test_wrapped_line_continues_without_gutter() {
    let mut app = make_app(DiffLayout::Unified, false);
    app.toggle_line_wrap();
    let lines = buffer_text(&render_buffer(&mut app, 20, 8));
    assert!(lines[2].starts_with("2       println!(\"ol"));
    assert!(lines[3].starts_with("    d\");"));
    assert!(lines[4].starts_with("  2     println!(\"ne"));
}

#[test]
fn test_scroll_offset_skips_rows() {
    let mut app = make_app(DiffLayout::Unified, false);
    render_buffer(&mut app, 40, 3);
    app.scroll_by(1);
    let lines = buffer_text(&render_buffer(&mut app, 40, 3));
    assert!(lines[0].starts_with("1 1 fn main() {"));

    app.scroll_to_bottom();
    let lines = buffer_text(&render_buffer(&mut app, 40, 3));
    assert!(lines[2].starts_with("3 3 }"));
}

#[test]
fn test_horizontal_scroll_shifts_content_not_gutter() {
    let mut app = make_app(DiffLayout::Unified, false);
    render_buffer(&mut app, 20, 6);
    // `    println!("old");` is 20 columns against 16 of content room
    assert!(app.scroll_horizontal(10));
    assert_eq!(app.scroll_x(), 4);

    let lines = buffer_text(&render_buffer(&mut app, 20, 6));
    assert!(lines[0].starts_with("1,3 +1,3 @@"));
    assert!(lines[1].starts_with("1 1 ain() {"));
    assert!(lines[2].starts_with("2   println!(\"old\");"));
    assert!(lines[3].starts_with("  2 println!(\"new\");"));
}

#[test]
fn test_side_by_side_divider_follows_split() {
    let mut app = make_app(DiffLayout::SideBySide, false);
    render_buffer(&mut app, 61, 5);
    app.shift_split(-10);

    let lines = buffer_text(&render_buffer(&mut app, 61, 5));
    assert!(
        lines[2].starts_with("2     println!(\"old\"│2     println!(\"new\");"),
        "{:?}",
        lines[2]
    );
}
