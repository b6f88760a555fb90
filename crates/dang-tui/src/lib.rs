//! Cooperative single-threaded component-tree TUI framework used by the
//! REPL shell and the doc browser (spec.md §4.5).

pub mod cancel;
pub mod component;
pub mod dispatch;
pub mod event;
pub mod focus;
pub mod overlay;
pub mod render_cache;
pub mod slot;
pub mod spinner;

pub use cancel::CancelRegistry;
pub use component::{Component, RenderCtx, RenderOutput};
pub use dispatch::{DispatchHandle, Dispatcher};
pub use event::{EventHandler, TuiEvent};
pub use focus::{FocusId, FocusRing};
pub use overlay::{Anchor, CursorGroup, CursorGroups, OverlayId, OverlayOptions, OverlayStack, Size};
pub use render_cache::RenderCache;
pub use slot::Slot;
pub use spinner::Spinner;
