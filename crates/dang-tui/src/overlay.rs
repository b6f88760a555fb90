//! Floating layers drawn above the base component tree: completion
//! dropdowns, the doc browser, the type-hint bubble. spec.md §4.5 describes
//! sizing (absolute or percent of viewport), anchoring relative to either
//! the viewport corners or the cursor, and a z-stack rendered in insertion
//! order so the most-recently-opened overlay draws last (on top).

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Size {
    Absolute { width: u16, height: u16 },
    Percent { width_pct: u8, height_pct: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorGroup(u32);

/// Tracks the current cursor position for each live `CursorGroup`. A single
/// input's cursor can anchor several overlays at once (the completion
/// dropdown and an inline type hint, say) by sharing one group: moving the
/// cursor updates the group's position once, and every overlay anchored to
/// it re-anchors together on the next render.
#[derive(Default)]
pub struct CursorGroups {
    next_id: u32,
    positions: std::collections::HashMap<CursorGroup, (u16, u16)>,
}

impl CursorGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self) -> CursorGroup {
        let group = CursorGroup(self.next_id);
        self.next_id += 1;
        group
    }

    /// Moves every overlay anchored to `group` to `(x, y)` on the next draw.
    pub fn set_position(&mut self, group: CursorGroup, x: u16, y: u16) {
        self.positions.insert(group, (x, y));
    }

    pub fn position(&self, group: CursorGroup) -> Option<(u16, u16)> {
        self.positions.get(&group).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    /// Re-anchored whenever the linked group's cursor moves; used by the
    /// completion dropdown and inline type hints.
    CursorRelative(CursorGroup),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u32);

pub struct OverlayOptions {
    pub size: Size,
    pub anchor: Anchor,
    /// If set, key events that aren't consumed by the overlay bubble to
    /// this component instead of the one that was focused when the overlay
    /// opened.
    pub bubble_target: Option<crate::focus::FocusId>,
    /// While `true`, keys go to this overlay exclusively and never reach
    /// the base tree underneath it.
    pub captures_focus: bool,
}

struct Entry {
    id: OverlayId,
    options: OverlayOptions,
    visible: bool,
}

/// Z-stack of open overlays, in insertion (and therefore draw) order.
pub struct OverlayStack {
    next_id: u32,
    entries: Vec<Entry>,
}

impl OverlayStack {
    pub fn new() -> Self {
        Self { next_id: 0, entries: Vec::new() }
    }

    pub fn open(&mut self, options: OverlayOptions) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, options, visible: true });
        id
    }

    pub fn set_options(&mut self, id: OverlayId, options: OverlayOptions) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.options = options;
        }
    }

    pub fn hide(&mut self, id: OverlayId) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.visible = false;
        }
    }

    pub fn close(&mut self, id: OverlayId) {
        self.entries.retain(|e| e.id != id);
    }

    /// Visible overlays in draw order, topmost (drawn last) at the end.
    pub fn draw_order(&self) -> Vec<OverlayId> {
        self.entries.iter().filter(|e| e.visible).map(|e| e.id).collect()
    }

    /// The overlay that currently captures focus, if any — the topmost one
    /// with `captures_focus` set.
    pub fn focus_capturer(&self) -> Option<OverlayId> {
        self.entries.iter().rev().find(|e| e.visible && e.options.captures_focus).map(|e| e.id)
    }

    pub fn resolve_size(&self, id: OverlayId, viewport_w: u16, viewport_h: u16) -> Option<(u16, u16)> {
        let entry = self.entries.iter().find(|e| e.id == id)?;
        Some(match entry.options.size {
            Size::Absolute { width, height } => (width, height),
            Size::Percent { width_pct, height_pct } => (
                viewport_w * width_pct as u16 / 100,
                viewport_h * height_pct as u16 / 100,
            ),
        })
    }

    /// Top-left corner to draw the overlay at. `TopLeft`/`TopRight`/
    /// `BottomLeft` resolve against the viewport; `CursorRelative` looks up
    /// its group's current position in `groups` and returns `None` if the
    /// group has never been positioned (e.g. the linked input hasn't
    /// rendered yet).
    pub fn resolve_position(
        &self,
        id: OverlayId,
        groups: &CursorGroups,
        viewport_w: u16,
        viewport_h: u16,
    ) -> Option<(u16, u16)> {
        let entry = self.entries.iter().find(|e| e.id == id)?;
        let (w, h) = self.resolve_size(id, viewport_w, viewport_h)?;
        match entry.options.anchor {
            Anchor::TopLeft => Some((0, 0)),
            Anchor::TopRight => Some((viewport_w.saturating_sub(w), 0)),
            Anchor::BottomLeft => Some((0, viewport_h.saturating_sub(h))),
            Anchor::CursorRelative(group) => groups.position(group),
        }
    }
}

impl Default for OverlayStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(captures_focus: bool) -> OverlayOptions {
        OverlayOptions {
            size: Size::Absolute { width: 10, height: 3 },
            anchor: Anchor::TopLeft,
            bubble_target: None,
            captures_focus,
        }
    }

    #[test]
    fn draw_order_is_insertion_order() {
        let mut stack = OverlayStack::new();
        let a = stack.open(opts(false));
        let b = stack.open(opts(false));
        assert_eq!(stack.draw_order(), vec![a, b]);
    }

    #[test]
    fn hidden_overlay_is_excluded_but_not_closed() {
        let mut stack = OverlayStack::new();
        let a = stack.open(opts(false));
        stack.hide(a);
        assert!(stack.draw_order().is_empty());
    }

    #[test]
    fn topmost_focus_capturer_wins() {
        let mut stack = OverlayStack::new();
        stack.open(opts(true));
        let b = stack.open(opts(true));
        assert_eq!(stack.focus_capturer(), Some(b));
    }

    #[test]
    fn percent_size_resolves_against_viewport() {
        let mut stack = OverlayStack::new();
        let a = stack.open(OverlayOptions {
            size: Size::Percent { width_pct: 50, height_pct: 25 },
            anchor: Anchor::TopLeft,
            bubble_target: None,
            captures_focus: false,
        });
        assert_eq!(stack.resolve_size(a, 80, 40), Some((40, 10)));
    }

    #[test]
    fn cursor_relative_overlay_resolves_against_its_group_position() {
        let mut groups = CursorGroups::new();
        let group = groups.register();
        groups.set_position(group, 5, 7);

        let mut stack = OverlayStack::new();
        let a = stack.open(OverlayOptions {
            size: Size::Absolute { width: 10, height: 3 },
            anchor: Anchor::CursorRelative(group),
            bubble_target: None,
            captures_focus: false,
        });
        assert_eq!(stack.resolve_position(a, &groups, 80, 40), Some((5, 7)));
    }

    #[test]
    fn cursor_relative_overlay_with_unpositioned_group_resolves_to_none() {
        let mut groups = CursorGroups::new();
        let group = groups.register();

        let mut stack = OverlayStack::new();
        let a = stack.open(OverlayOptions {
            size: Size::Absolute { width: 10, height: 3 },
            anchor: Anchor::CursorRelative(group),
            bubble_target: None,
            captures_focus: false,
        });
        assert_eq!(stack.resolve_position(a, &groups, 80, 40), None);
    }

    #[test]
    fn two_groups_re_anchor_independently() {
        let mut groups = CursorGroups::new();
        let dropdown_group = groups.register();
        let hint_group = groups.register();
        groups.set_position(dropdown_group, 1, 1);
        groups.set_position(hint_group, 9, 9);
        assert_eq!(groups.position(dropdown_group), Some((1, 1)));
        assert_eq!(groups.position(hint_group), Some((9, 9)));
    }

    #[test]
    fn top_right_and_bottom_left_resolve_against_viewport_corners() {
        let mut stack = OverlayStack::new();
        let top_right = stack.open(OverlayOptions {
            size: Size::Absolute { width: 10, height: 3 },
            anchor: Anchor::TopRight,
            bubble_target: None,
            captures_focus: false,
        });
        let bottom_left = stack.open(OverlayOptions {
            size: Size::Absolute { width: 10, height: 3 },
            anchor: Anchor::BottomLeft,
            bubble_target: None,
            captures_focus: false,
        });
        let groups = CursorGroups::new();
        assert_eq!(stack.resolve_position(top_right, &groups, 80, 40), Some((70, 0)));
        assert_eq!(stack.resolve_position(bottom_left, &groups, 80, 40), Some((0, 37)));
    }
}
