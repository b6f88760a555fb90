//! A fixed-cadence busy indicator. Frame advance is driven by the dispatch
//! queue (one `update()` per drain), not by its own timer, so it starts
//! exactly on mount and stops exactly on unmount with no leftover task to
//! cancel.

use crate::component::{Component, RenderCtx, RenderOutput};

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct Spinner {
    label: String,
    frame: usize,
}

impl Spinner {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), frame: 0 }
    }

    pub fn frame_glyph(&self) -> &'static str {
        FRAMES[self.frame % FRAMES.len()]
    }
}

impl Component for Spinner {
    fn render(&self, _ctx: &RenderCtx) -> RenderOutput {
        RenderOutput::changed(vec![format!("{} {}", self.frame_glyph(), self.label)])
    }

    fn update(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    fn on_mount(&mut self) {
        self.frame = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_advances_and_wraps() {
        let mut s = Spinner::new("working");
        let first = s.frame_glyph();
        for _ in 0..FRAMES.len() {
            s.update();
        }
        assert_eq!(s.frame_glyph(), first);
    }

    #[test]
    fn mount_resets_frame() {
        let mut s = Spinner::new("working");
        s.update();
        s.update();
        s.on_mount();
        assert_eq!(s.frame_glyph(), FRAMES[0]);
    }

    #[test]
    fn render_includes_label() {
        let s = Spinner::new("loading things");
        let out = s.render(&RenderCtx::new(80, 1, 24));
        assert!(out.lines[0].contains("loading things"));
    }
}
