use dang_syntax::SourceLocation;
use dang_types::UnifyError;
use thiserror::Error;

/// A single inference failure. Carries the node's location and an optional
/// cause chain (currently just unification failures, the only thing that
/// raises mid-inference).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{loc}: {message}")]
pub struct InferError {
    pub loc: SourceLocation,
    pub message: String,
    #[source]
    pub cause: Option<UnifyError>,
}

impl InferError {
    pub fn new(loc: SourceLocation, message: impl Into<String>) -> Self {
        Self { loc, message: message.into(), cause: None }
    }

    pub fn from_unify(loc: SourceLocation, err: UnifyError) -> Self {
        Self {
            loc,
            message: err.to_string(),
            cause: Some(err),
        }
    }
}

/// Accumulator used by resilient mode; strict mode short-circuits on the
/// first error instead of populating this.
#[derive(Debug, Clone, Default)]
pub struct InferenceErrors(pub Vec<InferError>);

impl InferenceErrors {
    pub fn push(&mut self, err: InferError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InferError> {
        self.0.iter()
    }
}
