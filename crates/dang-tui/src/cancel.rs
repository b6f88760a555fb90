//! Per-task cancellation. Every in-flight evaluation or background fetch
//! gets a [`CancellationToken`] from a [`CancelRegistry`]; on teardown (or
//! Ctrl-C) the registry fires every outstanding token at once rather than
//! requiring each caller to be told individually.

use tokio_util::sync::CancellationToken;

#[derive(Default)]
pub struct CancelRegistry {
    tokens: Vec<CancellationToken>,
}

impl CancelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token linked to the registry's root: cancelling the
    /// registry cancels every token it has ever issued, including ones
    /// issued before this call.
    pub fn issue(&mut self) -> CancellationToken {
        let token = CancellationToken::new();
        self.tokens.push(token.clone());
        token
    }

    pub fn cancel_all(&mut self) {
        for token in self.tokens.drain(..) {
            token.cancel();
        }
    }

    pub fn outstanding(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_cancelled()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_all_fires_every_issued_token() {
        let mut registry = CancelRegistry::new();
        let a = registry.issue();
        let b = registry.issue();
        registry.cancel_all();
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
    }

    #[test]
    fn outstanding_counts_non_cancelled_tokens() {
        let mut registry = CancelRegistry::new();
        registry.issue();
        let b = registry.issue();
        assert_eq!(registry.outstanding(), 2);
        b.cancel();
        assert_eq!(registry.outstanding(), 1);
    }
}
