//! The REPL's external-collaborator seam: evaluation of a parsed, type-
//! checked expression against the GraphQL-speaking container-orchestration
//! runtime lives outside this crate entirely (spec.md's Non-goals exclude
//! the runtime itself). `Evaluator` is the trait the REPL shell drives;
//! `MockEvaluator` stands in for tests.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// One line written to stdout/stderr during evaluation, or the rendered
/// string form of a returned value.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalLine {
    Stdout(String),
    Stderr(String),
    Result(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutcome {
    Completed,
    Cancelled,
    Failed(String),
}

#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Evaluates `source` (already parsed and type-checked by the caller).
    /// `emit` is called for each line as it becomes available, in the order
    /// spec.md §5 requires: captured stdout before the corresponding result
    /// line. Must return promptly once `cancel` fires.
    async fn eval(&self, source: &str, cancel: CancellationToken, emit: &(dyn Fn(EvalLine) + Send + Sync)) -> EvalOutcome;
}

/// Test/demo stand-in: echoes the source back as a single result line,
/// honouring cancellation so REPL-loop tests can exercise Ctrl-C handling.
pub struct MockEvaluator;

#[async_trait]
impl Evaluator for MockEvaluator {
    async fn eval(&self, source: &str, cancel: CancellationToken, emit: &(dyn Fn(EvalLine) + Send + Sync)) -> EvalOutcome {
        if cancel.is_cancelled() {
            return EvalOutcome::Cancelled;
        }
        emit(EvalLine::Stdout(format!("evaluating: {source}")));
        if cancel.is_cancelled() {
            return EvalOutcome::Cancelled;
        }
        emit(EvalLine::Result(format!("=> {source}")));
        EvalOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn mock_evaluator_emits_stdout_before_result() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = lines.clone();
        let emit = move |line: EvalLine| lines_clone.lock().unwrap().push(line);
        let outcome = MockEvaluator.eval("1 + 1", CancellationToken::new(), &emit).await;
        assert_eq!(outcome, EvalOutcome::Completed);
        let lines = lines.lock().unwrap();
        assert!(matches!(lines[0], EvalLine::Stdout(_)));
        assert!(matches!(lines[1], EvalLine::Result(_)));
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let outcome = MockEvaluator.eval("1 + 1", token, &|_| {}).await;
        assert_eq!(outcome, EvalOutcome::Cancelled);
    }
}
