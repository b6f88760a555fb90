use dang_types::{Fresher, ModuleArena};

use crate::annotations::Annotations;
use crate::error::InferenceErrors;

/// Everything one inference run threads through every `infer_*` call.
/// Never a global: the REPL, the LSP, and the batch runner each own one.
pub struct InferContext {
    pub resilient: bool,
    pub errors: InferenceErrors,
    pub fresher: Fresher,
    pub arena: ModuleArena,
    pub annotations: Annotations,
}

impl InferContext {
    pub fn strict() -> Self {
        Self {
            resilient: false,
            errors: InferenceErrors::default(),
            fresher: Fresher::new(),
            arena: ModuleArena::new(),
            annotations: Annotations::new(),
        }
    }

    /// LSP always runs in this mode (spec: "Inference for LSP always runs
    /// in resilient mode").
    pub fn resilient() -> Self {
        Self { resilient: true, ..Self::strict() }
    }
}
