//! The REPL/TUI main loop (spec.md §4.6): terminal setup, an
//! `EventHandler`-driven loop that drains `ReplState`'s dispatch queue on
//! every tick and renders via `ratatui`, teardown. Grounded directly on
//! the teacher's `crates/tui/src/app.rs::run_app` shape (enable raw mode,
//! enter the alternate screen, loop `terminal.draw` / `event_handler.next()`,
//! then restore the terminal) — generalized from the teacher's monolithic
//! `App` struct onto `dang_repl::ReplState`.
//!
//! This does not wire `dang-tui`'s `FocusRing`/`OverlayStack` for a
//! top-level component tree (e.g. rendering `:doc`'s `DocBrowser` as a
//! proper overlay): the REPL's own entries/input/spinner are driven
//! directly here, which is proportionate to one CLI binary's main loop.
//! See DESIGN.md.

use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use dang_repl::{Evaluator, HistoryStore, ReplState, SubmitEffect};
use dang_tui::TuiEvent;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;

const TICK_RATE: Duration = Duration::from_millis(100);

pub async fn run(history: HistoryStore, evaluator: Arc<dyn Evaluator>) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, history, evaluator).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    history: HistoryStore,
    evaluator: Arc<dyn Evaluator>,
) -> anyhow::Result<()> {
    let mut state = ReplState::new(history, evaluator);
    let mut event_handler = dang_tui::EventHandler::new();
    event_handler.start(TICK_RATE);

    // Dedicated flush task for the Dagger-log coalescing writer (spec.md
    // §5): drains the writer's dirty signal independently of the UI
    // thread's tick/event loop below.
    tokio::spawn(state.log_writer().run(state.dispatch_handle(), state.log_writer_stop()));

    loop {
        let width = terminal.size()?.width;
        terminal.draw(|frame| render(frame, &mut state, width))?;

        match event_handler.next().await {
            Some(TuiEvent::Tick) => state.drain_dispatch(),
            Some(TuiEvent::Terminal(Event::Key(key))) => {
                if handle_key(&mut state, key) {
                    break;
                }
            }
            Some(TuiEvent::Dispatch) => state.drain_dispatch(),
            Some(TuiEvent::Quit) | None => break,
            _ => {}
        }
    }

    state.teardown();
    Ok(())
}

/// Returns `true` if the loop should exit.
fn handle_key(state: &mut ReplState, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.cancel_current_eval();
        return false;
    }
    match key.code {
        KeyCode::Enter => {
            let (index, source, effect) = state.submit();
            match effect {
                SubmitEffect::Exit => return true,
                SubmitEffect::None => {
                    if !source.trim().is_empty() {
                        state.start_eval(index, source);
                    }
                }
            }
        }
        KeyCode::Backspace => {
            state.input.pop();
            state.on_input_changed();
        }
        KeyCode::Char(c) => {
            state.input.push(c);
            state.on_input_changed();
        }
        KeyCode::Up => {
            if let Some(text) = state.history.nav_up() {
                state.input = text.to_string();
                state.on_input_changed();
            }
        }
        KeyCode::Down => {
            if let Some(text) = state.history.nav_down() {
                state.input = text.to_string();
                state.on_input_changed();
            }
        }
        _ => {}
    }
    false
}

fn render(frame: &mut ratatui::Frame, state: &mut ReplState, width: u16) {
    // Completion overlay (spec.md §4.6): a dropdown listing every
    // candidate, or — per the single-match policy — just the one match's
    // detail line with no dropdown at all.
    let completion_height = if state.completions.is_empty() {
        0
    } else if state.show_completion_dropdown {
        state.completions.len().min(6) as u16 + 2
    } else {
        3
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3), Constraint::Length(completion_height)])
        .split(frame.area());

    let mut lines: Vec<Line> = Vec::new();
    for entry in &mut state.entries {
        for text in entry.render(width.saturating_sub(2)) {
            lines.push(styled_line(&text));
        }
    }
    let history = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("dang"));
    frame.render_widget(history, chunks[0]);

    let prompt = if state.is_evaluating() { "evaluating..." } else { "dang>" };
    let input = Paragraph::new(format!("{prompt} {}", state.input))
        .block(Block::default().borders(Borders::ALL).title("input"));
    frame.render_widget(input, chunks[1]);

    if completion_height > 0 {
        let title = if state.show_completion_dropdown { "completions" } else { "detail" };
        let text: Vec<Line> = if state.show_completion_dropdown {
            state
                .completions
                .iter()
                .map(|item| Line::from(item.display_label.clone().unwrap_or_else(|| item.label.clone())))
                .collect()
        } else {
            let item = &state.completions[0];
            vec![Line::from(format!(
                "{}: {}",
                item.display_label.clone().unwrap_or_else(|| item.label.clone()),
                item.detail
            ))]
        };
        let completions = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(completions, chunks[2]);
    }
}

/// Applies spec.md §7's "red `Error:` prefix" styling; every other line
/// renders in the default style.
fn styled_line(text: &str) -> Line<'static> {
    if text.contains("error:") || text.starts_with("Error:") || text == "cancelled" {
        Line::from(Span::styled(text.to_string(), Style::default().fg(Color::Red)))
    } else {
        Line::from(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_on_empty_input_does_not_spawn_eval() {
        let mut state = ReplState::new(HistoryStore::in_memory(), Arc::new(dang_repl::MockEvaluator));
        state.input = "".to_string();
        let quit = handle_key(&mut state, KeyEvent::from(KeyCode::Enter));
        assert!(!quit);
        assert!(!state.is_evaluating());
    }

    #[test]
    fn exit_command_signals_quit() {
        let mut state = ReplState::new(HistoryStore::in_memory(), Arc::new(dang_repl::MockEvaluator));
        state.input = ":exit".to_string();
        let quit = handle_key(&mut state, KeyEvent::from(KeyCode::Enter));
        assert!(quit);
    }

    #[test]
    fn typed_characters_append_to_input() {
        let mut state = ReplState::new(HistoryStore::in_memory(), Arc::new(dang_repl::MockEvaluator));
        handle_key(&mut state, KeyEvent::from(KeyCode::Char('1')));
        handle_key(&mut state, KeyEvent::from(KeyCode::Char('+')));
        assert_eq!(state.input, "1+");
    }

    #[test]
    fn error_lines_get_red_styling() {
        let line = styled_line("Error: boom");
        assert!(matches!(line.spans[0].style.fg, Some(Color::Red)));
    }
}
