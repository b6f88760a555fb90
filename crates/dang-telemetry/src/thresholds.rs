use std::time::Duration;

/// Spans shorter than this are suppressed from the rows view entirely —
/// they're noise at typical render cadence.
#[derive(Clone, Copy, Debug)]
pub struct TooFastThreshold(pub Duration);

impl Default for TooFastThreshold {
    fn default() -> Self {
        Self(Duration::from_millis(50))
    }
}

/// Completed subtrees whose root ended more than this long ago are
/// evicted from the DB on the next GC pass.
#[derive(Clone, Copy, Debug)]
pub struct GcThreshold(pub Duration);

impl Default for GcThreshold {
    fn default() -> Self {
        Self(Duration::from_secs(300))
    }
}
