//! Renders a [`crate::db::TraceRow`] sequence as the compact indented
//! tree the telemetry TUI component displays: bold name, colored status
//! symbol, gray duration (spec.md §4.8).

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::db::TraceRow;
use crate::status::DerivedStatus;

fn human_duration(d: std::time::Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

fn status_color(status: DerivedStatus) -> Color {
    match status {
        DerivedStatus::Running => Color::Yellow,
        DerivedStatus::Cached => Color::Cyan,
        DerivedStatus::Failed => Color::Red,
        DerivedStatus::Pending => Color::DarkGray,
        DerivedStatus::Ok => Color::Green,
    }
}

/// One line per row: ancestor `│ ` prefixes, then this row's own
/// connector (`├─`/`╰─`), a colored status symbol, the bold name, and a
/// gray duration suffix. Truncated to `width` visible columns with `…`,
/// trimming from the name span since the prefix/connector/symbol/duration
/// are load-bearing for reading the tree shape.
pub fn render_tree(rows: &[TraceRow], ancestors_has_next: &[Vec<bool>], width: usize) -> Vec<Line<'static>> {
    rows.iter()
        .zip(ancestors_has_next)
        .map(|(row, ancestor_flags)| render_line(row, ancestor_flags, width))
        .collect()
}

fn render_line(row: &TraceRow, ancestor_has_next: &[bool], width: usize) -> Line<'static> {
    let mut prefix = String::new();
    for &has_next in ancestor_has_next {
        prefix.push_str(if has_next { "│ " } else { "  " });
    }
    if row.depth > 0 {
        prefix.push_str(if row.has_next_sibling { "├─" } else { "╰─" });
    }
    let duration = row.duration.map(human_duration);

    let fixed_width = prefix.chars().count()
        + 1 // status symbol
        + 1 // space
        + 1 // space before duration
        + duration.as_ref().map(String::len).unwrap_or(0);
    let name_budget = width.saturating_sub(fixed_width);
    let name = truncate(&row.name, name_budget);

    let mut spans = vec![
        Span::raw(prefix),
        Span::styled(row.status.symbol().to_string(), Style::default().fg(status_color(row.status))),
        Span::raw(" "),
        Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
    ];
    if let Some(duration) = duration {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(duration, Style::default().fg(Color::Gray)));
    }
    Line::from(spans)
}

fn truncate(text: &str, width: usize) -> String {
    if width == 0 || text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Computes, for every row, whether each of its ancestors (by depth) has
/// a following sibling — the flags `render_line` needs to decide between
/// `│ ` and two spaces at each indent level.
pub fn ancestor_has_next_flags(rows: &[TraceRow]) -> Vec<Vec<bool>> {
    let mut stack: Vec<bool> = Vec::new();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        stack.truncate(row.depth);
        out.push(stack.clone());
        if row.depth == stack.len() {
            stack.push(row.has_next_sibling);
        } else {
            stack[row.depth] = row.has_next_sibling;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SpanId;
    use crate::status::DerivedStatus;
    use std::time::Duration;

    fn row(name: &str, depth: usize, has_next: bool) -> TraceRow {
        TraceRow {
            span_id: SpanId(name.into()),
            depth,
            has_next_sibling: has_next,
            name: name.into(),
            status: DerivedStatus::Ok,
            duration: Some(Duration::from_millis(250)),
        }
    }

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn renders_connectors_for_last_vs_middle_child() {
        let rows = vec![row("root", 0, false), row("a", 1, true), row("b", 1, false)];
        let flags = ancestor_has_next_flags(&rows);
        let lines = render_tree(&rows, &flags, 80);
        assert!(plain(&lines[1]).starts_with("├─"));
        assert!(plain(&lines[2]).starts_with("╰─"));
    }

    #[test]
    fn truncates_name_to_width_with_ellipsis() {
        let rows = vec![row("a-very-long-span-name-indeed", 0, false)];
        let flags = ancestor_has_next_flags(&rows);
        let lines = render_tree(&rows, &flags, 10);
        let text = plain(&lines[0]);
        assert_eq!(text.chars().count(), 10);
        assert!(text.contains('…'));
    }

    #[test]
    fn status_symbol_is_colored_and_name_is_bold() {
        let rows = vec![row("root", 0, false)];
        let flags = ancestor_has_next_flags(&rows);
        let lines = render_tree(&rows, &flags, 80);
        let symbol_span = &lines[0].spans[1];
        assert_eq!(symbol_span.style.fg, Some(Color::Green));
        let name_span = &lines[0].spans[3];
        assert!(name_span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn duration_renders_in_gray() {
        let rows = vec![row("root", 0, false)];
        let flags = ancestor_has_next_flags(&rows);
        let lines = render_tree(&rows, &flags, 80);
        let duration_span = lines[0].spans.last().unwrap();
        assert_eq!(duration_span.content.as_ref(), "250ms");
        assert_eq!(duration_span.style.fg, Some(Color::Gray));
    }
}
