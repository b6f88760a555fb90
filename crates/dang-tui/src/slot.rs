//! A single-child container whose child can be swapped at runtime, e.g. the
//! REPL input line swapping between a text box and a busy spinner while an
//! evaluation is in flight.

use crate::component::{Component, RenderCtx, RenderOutput};

pub struct Slot<T: Component> {
    child: Option<T>,
}

impl<T: Component> Slot<T> {
    pub fn empty() -> Self {
        Self { child: None }
    }

    pub fn with_child(child: T) -> Self {
        Self { child: Some(child) }
    }

    pub fn set(&mut self, child: T) {
        self.child = Some(child);
    }

    pub fn clear(&mut self) {
        self.child = None;
    }

    pub fn child(&self) -> Option<&T> {
        self.child.as_ref()
    }

    pub fn child_mut(&mut self) -> Option<&mut T> {
        self.child.as_mut()
    }
}

impl<T: Component> Component for Slot<T> {
    fn render(&self, ctx: &RenderCtx) -> RenderOutput {
        match &self.child {
            Some(child) => child.render(ctx),
            None => RenderOutput::unchanged(Vec::new()),
        }
    }

    fn update(&mut self) {
        if let Some(child) = &mut self.child {
            child.update();
        }
    }

    fn handle_key_press(&mut self, event: &crate::event::TuiEvent) -> bool {
        self.child.as_mut().map(|c| c.handle_key_press(event)).unwrap_or(false)
    }

    fn on_mount(&mut self) {
        if let Some(child) = &mut self.child {
            child.on_mount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label(String);

    impl Component for Label {
        fn render(&self, _ctx: &RenderCtx) -> RenderOutput {
            RenderOutput::unchanged(vec![self.0.clone()])
        }

        fn update(&mut self) {}
    }

    #[test]
    fn empty_slot_renders_nothing() {
        let slot: Slot<Label> = Slot::empty();
        assert!(slot.render(&RenderCtx::new(80, 1, 24)).lines.is_empty());
    }

    #[test]
    fn set_replaces_child() {
        let mut slot = Slot::with_child(Label("a".into()));
        slot.set(Label("b".into()));
        assert_eq!(slot.render(&RenderCtx::new(80, 1, 24)).lines, vec!["b".to_string()]);
    }

    #[test]
    fn clear_empties_slot() {
        let mut slot = Slot::with_child(Label("a".into()));
        slot.clear();
        assert!(slot.child().is_none());
    }
}
