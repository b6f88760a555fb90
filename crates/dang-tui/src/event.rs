//! Terminal and internal event plumbing. Grounded on the teacher's
//! `crates/tui/src/event.rs` `EventHandler`: a background task polls
//! crossterm and forwards both input and tick events over an unbounded
//! mpsc channel, so the main loop only ever does `next().await`.

use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;
use tokio::sync::mpsc;

/// Events the shell's main loop reacts to.
#[derive(Debug)]
pub enum TuiEvent {
    Terminal(CrosstermEvent),
    Tick,
    /// A background task finished and wants to run a closure against app
    /// state between frames. See [`crate::dispatch::Dispatcher`].
    Dispatch,
    /// An overlay or input listener asked for an immediate repaint.
    RequestRender { force: bool },
    Quit,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<TuiEvent>,
    tx: mpsc::UnboundedSender<TuiEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<TuiEvent> {
        self.tx.clone()
    }

    /// Spawns the terminal-polling task. Tick events drive the dispatch
    /// queue and spinner frames; terminal events are forwarded verbatim.
    pub fn start(&self, tick_rate: Duration) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                if crossterm::event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    if let Ok(event) = crossterm::event::read() {
                        if tx.send(TuiEvent::Terminal(event)).is_err() {
                            break;
                        }
                    }
                }

                interval.tick().await;
                if tx.send(TuiEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }

    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.rx.recv().await
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_handler_yields_a_working_sender() {
        let handler = EventHandler::new();
        let _sender = handler.sender();
    }

    #[tokio::test]
    async fn send_then_receive_preserves_order() {
        let mut handler = EventHandler::new();
        let sender = handler.sender();
        sender.send(TuiEvent::Tick).unwrap();
        sender.send(TuiEvent::Quit).unwrap();
        assert!(matches!(handler.next().await, Some(TuiEvent::Tick)));
        assert!(matches!(handler.next().await, Some(TuiEvent::Quit)));
    }
}
