//! The component contract. Every renderable element of the REPL/doc-browser
//! shell implements this: a `render` that is pure given the component's own
//! state plus the area it's given, and an `update` that mutates state in
//! response to a tick.

use crate::event::TuiEvent;
use crate::overlay::CursorGroup;

/// Everything a component needs to lay itself out: the area it's drawn
/// into, the full terminal height (for components that reserve space at a
/// fixed edge regardless of their own content), and the cursor group a
/// component binds its own cursor-relative children to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderCtx {
    pub width: u16,
    pub height: u16,
    pub screen_height: u16,
    pub cursor_group: Option<CursorGroup>,
}

impl RenderCtx {
    pub fn new(width: u16, height: u16, screen_height: u16) -> Self {
        Self { width, height, screen_height, cursor_group: None }
    }

    pub fn with_cursor_group(mut self, group: CursorGroup) -> Self {
        self.cursor_group = Some(group);
        self
    }
}

/// What `render` hands back to the caller: the rendered lines plus whether
/// they differ from the last render (so the cache can skip a repaint).
pub struct RenderOutput {
    pub lines: Vec<String>,
    pub dirty: bool,
}

impl RenderOutput {
    pub fn unchanged(lines: Vec<String>) -> Self {
        Self { lines, dirty: false }
    }

    pub fn changed(lines: Vec<String>) -> Self {
        Self { lines, dirty: true }
    }
}

/// A node in the component tree.
///
/// `render`/`update` are required; the rest have no-op defaults so leaf
/// components (a static label, say) don't have to implement key handling,
/// mount hooks, or focus/hover plumbing they don't use.
pub trait Component {
    fn render(&self, ctx: &RenderCtx) -> RenderOutput;

    /// Advance internal state (e.g. a spinner's frame index). Called once
    /// per dispatch-queue drain, not once per render.
    fn update(&mut self);

    /// Returns `true` if the key was consumed. Unconsumed keys bubble to the
    /// parent in the focus ring.
    fn handle_key_press(&mut self, _event: &TuiEvent) -> bool {
        false
    }

    fn handle_mouse(&mut self, _x: u16, _y: u16) -> bool {
        false
    }

    fn on_mount(&mut self) {}

    fn set_focused(&mut self, _focused: bool) {}

    fn set_hovered(&mut self, _hovered: bool) {}
}
