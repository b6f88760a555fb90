//! REPL state machine: entries, input, history, and the submit pipeline
//! (spec.md §4.6). Background evaluation never touches `ReplState`
//! directly — it submits closures through a [`DispatchHandle`], matching
//! the "UI thread is the sole mutator" rule in spec.md §5.

use std::sync::Arc;

use dang_completion::{
    arg_candidates, classify, enclosing_callee_name, lexical_candidates, member_candidates, rank,
    should_show_dropdown, CompletionContext, CompletionItem,
};
use dang_env::{new_prelude_env, Env};
use dang_infer::InferContext;
use dang_tui::dispatch::{DispatchHandle, Dispatcher};
use dang_tui::{CancelRegistry, Slot, Spinner};
use dang_types::{ModuleArena, Type};
use tokio_util::sync::CancellationToken;

use crate::command::{parse_command, Command};
use crate::docbrowser::{doc_items_from_env, DocBrowser};
use crate::entry::Entry;
use crate::evaluator::{EvalLine, EvalOutcome, Evaluator};
use crate::history::HistoryStore;
use crate::logwriter::DaggerLogWriter;

pub struct ReplState {
    pub entries: Vec<Entry>,
    pub input: String,
    pub history: HistoryStore,
    pub env: Env,
    pub spinner_slot: Slot<Spinner>,
    pub doc_browser: Option<DocBrowser>,
    /// Completion-menu candidates for the current `input`, refreshed by
    /// [`Self::on_input_changed`] (spec.md §4.6's "RS text-input onChange
    /// -> CS classifies context -> RS updates dropdown + detail overlays").
    pub completions: Vec<CompletionItem>,
    /// Single-match policy (spec E1): suppress the dropdown but the
    /// detail bubble for `completions[0]` still applies.
    pub show_completion_dropdown: bool,
    /// Accumulates every `class`/`record` module type declared across the
    /// session's evaluations, so later `:doc`/completion lookups can still
    /// resolve a type declared several submits ago.
    arena: ModuleArena,
    /// Buffers stdout/stderr from the in-flight eval and flushes them to
    /// the live entry in coalesced batches (spec.md §4.6/§5).
    log_writer: DaggerLogWriter,
    log_writer_stop: CancellationToken,
    cancel_registry: CancelRegistry,
    current_cancel: Option<CancellationToken>,
    evaluator: Arc<dyn Evaluator>,
    dispatcher: Dispatcher<ReplState>,
}

/// Outcome of a single `submit()` call, for the caller to react to (e.g.
/// exit the process on `Command::Exit`).
pub enum SubmitEffect {
    None,
    Exit,
}

impl ReplState {
    pub fn new(history: HistoryStore, evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            entries: Vec::new(),
            input: String::new(),
            history,
            env: new_prelude_env(),
            spinner_slot: Slot::empty(),
            doc_browser: None,
            completions: Vec::new(),
            show_completion_dropdown: false,
            arena: ModuleArena::new(),
            log_writer: DaggerLogWriter::new(),
            log_writer_stop: CancellationToken::new(),
            cancel_registry: CancelRegistry::new(),
            current_cancel: None,
            evaluator,
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn dispatch_handle(&self) -> DispatchHandle<ReplState> {
        self.dispatcher.handle()
    }

    /// Clones the shared handle the caller (the binary's main loop) spawns
    /// the dedicated flush task with, via [`DaggerLogWriter::run`].
    pub fn log_writer(&self) -> DaggerLogWriter {
        self.log_writer.clone()
    }

    /// Cancelled by [`Self::teardown`]; stops the flush task spawned with
    /// [`Self::log_writer`].
    pub fn log_writer_stop(&self) -> CancellationToken {
        self.log_writer_stop.clone()
    }

    /// Text-input onChange (spec.md §4.6): classifies the cursor context
    /// and refreshes the completion dropdown/detail state. The cursor is
    /// always assumed to sit at the end of `input` — the REPL's input is a
    /// single logical line with no interior cursor movement modeled.
    pub fn on_input_changed(&mut self) {
        let ctx = classify(&self.input, self.input.len());
        let prefix = match &ctx {
            CompletionContext::Lexical { prefix }
            | CompletionContext::Member { prefix, .. }
            | CompletionContext::Arg { prefix, .. } => prefix.clone(),
        };
        let items = match &ctx {
            CompletionContext::Lexical { .. } => lexical_candidates(&self.env),
            CompletionContext::Member { receiver, .. } => match self.infer_probe_type(receiver) {
                Some(ty) => member_candidates(&ty, &self.arena),
                None => Vec::new(),
            },
            CompletionContext::Arg { already_supplied, .. } => {
                match enclosing_callee_name(&self.input, self.input.len()).and_then(|name| self.env.scheme_of(&name))
                {
                    Some(scheme) => match scheme.ty {
                        Type::Function(ft) => arg_candidates(&ft, already_supplied),
                        _ => Vec::new(),
                    },
                    None => Vec::new(),
                }
            }
        };
        let items = rank(items, &prefix);
        self.show_completion_dropdown = should_show_dropdown(&items);
        self.completions = items;
    }

    /// Infers the type of a standalone sub-expression (e.g. a completion
    /// receiver) against the live env, resiliently so a currently-invalid
    /// receiver still resolves as far as possible. `None` on parse failure
    /// or if inference left the expression untyped.
    fn infer_probe_type(&self, expr: &str) -> Option<Type> {
        let probe = format!("let __dang_completion_probe = {expr}");
        let module = dang_syntax::parse_module("<completion-probe>", &probe).ok()?;
        let mut ctx = InferContext::resilient();
        ctx.arena = self.arena.clone();
        let _ = dang_infer::infer_module(&mut ctx, &self.env, &module);
        let dang_syntax::Form::Let(l) = module.forms.first()? else {
            return None;
        };
        ctx.annotations.inferred_type(l.value.id()).cloned()
    }

    /// Runs all dispatched closures against self. Call once per frame/tick.
    pub fn drain_dispatch(&mut self) {
        let dispatcher = std::mem::replace(&mut self.dispatcher, Dispatcher::new());
        dispatcher.drain(self);
        self.dispatcher = dispatcher;
    }

    pub fn is_evaluating(&self) -> bool {
        self.current_cancel.is_some()
    }

    /// Ctrl-C: fires the in-flight eval's cancellation handle, if any.
    pub fn cancel_current_eval(&mut self) {
        if let Some(token) = self.current_cancel.take() {
            token.cancel();
        }
    }

    pub fn teardown(&mut self) {
        self.cancel_registry.cancel_all();
        self.log_writer_stop.cancel();
    }

    /// Step 1 of spec.md §4.6's on-submit sequence: echoes the input into a
    /// fresh entry and clears the live buffer. The remaining steps (command
    /// dispatch, or parse/check/eval) are driven by the caller via
    /// [`Self::handle_submitted`] so the async eval spawn can live in the
    /// binary crate that owns a tokio runtime.
    pub fn submit(&mut self) -> (usize, String, SubmitEffect) {
        let input = std::mem::take(&mut self.input);
        self.history.append(&input);
        self.entries.push(Entry::new(&input));
        let index = self.entries.len() - 1;
        self.on_input_changed();

        if input.starts_with(':') {
            let cmd = parse_command(&input);
            let effect = self.run_command(index, cmd);
            self.entries[index].finish();
            return (index, input, effect);
        }

        (index, input, SubmitEffect::None)
    }

    fn run_command(&mut self, index: usize, cmd: Command) -> SubmitEffect {
        match cmd {
            Command::Exit => SubmitEffect::Exit,
            Command::Clear => {
                self.entries.clear();
                SubmitEffect::None
            }
            Command::Reset => {
                self.env = new_prelude_env();
                self.entries.clear();
                SubmitEffect::None
            }
            Command::Help => {
                self.entries[index].result.push(
                    "=> :help :exit :quit :clear :reset :debug :debug-render :env :version :type :find :history :doc",
                );
                SubmitEffect::None
            }
            Command::Version => {
                self.entries[index].result.push(format!("=> {}", env!("CARGO_PKG_VERSION")));
                SubmitEffect::None
            }
            Command::Env { filter } => {
                let bindings = self.env.bindings(false, true);
                for (name, scheme) in bindings {
                    if filter.as_ref().map(|f| name.contains(f.as_str())).unwrap_or(true) {
                        self.entries[index].result.push(format!("=> {name}: {}", scheme.ty));
                    }
                }
                SubmitEffect::None
            }
            Command::Type(expr) => {
                self.entries[index].result.push(format!("=> {}", self.infer_expr_type(&expr)));
                SubmitEffect::None
            }
            Command::Find(pattern) => {
                let bindings = self.env.bindings(false, true);
                for (name, _) in bindings.iter().filter(|(n, _)| n.contains(&pattern)) {
                    self.entries[index].result.push(format!("=> {name}"));
                }
                SubmitEffect::None
            }
            Command::History => {
                for entry in self.history.entries() {
                    self.entries[index].result.push(format!("=> {entry}"));
                }
                SubmitEffect::None
            }
            Command::Debug | Command::DebugRender => {
                self.entries[index].result.push("=> debug mode toggled");
                SubmitEffect::None
            }
            Command::Doc => {
                let items = doc_items_from_env(&self.env, &self.arena);
                self.doc_browser = Some(DocBrowser::new(items));
                SubmitEffect::None
            }
            Command::Unknown(name) => {
                self.entries[index].logs.push(format!("unknown command: {name}"));
                SubmitEffect::None
            }
        }
    }

    /// `:type <expr>` (spec.md §4.6): wraps the expression in a throwaway
    /// `let`, resiliently infers it against the live env, and prints the
    /// resulting structural type. Resilient mode is used (rather than
    /// strict) so a probe expression that itself has an error still
    /// reports a best-effort type instead of nothing.
    fn infer_expr_type(&self, expr: &str) -> String {
        let probe = format!("let __dang_type_probe = {expr}");
        let module = match dang_syntax::parse_module("<type-probe>", &probe) {
            Ok(m) => m,
            Err(_) => return "<parse error>".to_string(),
        };
        let mut ctx = InferContext::resilient();
        ctx.arena = self.arena.clone();
        let _ = dang_infer::infer_module(&mut ctx, &self.env, &module);
        let Some(dang_syntax::Form::Let(l)) = module.forms.first() else {
            return "<parse error>".to_string();
        };
        match ctx.annotations.inferred_type(l.value.id()) {
            Some(ty) => ty.to_string(),
            None => "<unknown>".to_string(),
        }
    }

    /// Step 3 of spec.md §4.6: parse, strict-mode type-check, then spawn a
    /// cancellable background eval. Errors abandon the eval without ever
    /// reaching the evaluator.
    pub fn start_eval(&mut self, index: usize, source: String) {
        let module = match dang_syntax::parse_module("<repl>", &source) {
            Ok(m) => m,
            Err(errors) => {
                for e in errors {
                    self.entries[index].logs.push(format!("parse error: {e}"));
                }
                self.entries[index].finish();
                return;
            }
        };

        let mut ctx = InferContext::strict();
        ctx.arena = self.arena.clone();
        if let Err(e) = dang_infer::infer_module(&mut ctx, &self.env, &module) {
            self.entries[index].logs.push(format!("type error: {e}"));
            self.entries[index].finish();
            return;
        }
        self.arena = ctx.arena.clone();

        let token = self.cancel_registry.issue();
        self.current_cancel = Some(token.clone());
        self.spinner_slot.set(Spinner::new("evaluating"));
        // SetTarget(entry): routes the coalescing writer's buffered
        // stdout/stderr to this entry until the eval finishes below.
        self.log_writer.set_target(Some(index));

        let evaluator = self.evaluator.clone();
        let handle = self.dispatch_handle();
        let emit_handle = handle.clone();
        let log_writer = self.log_writer.clone();

        tokio::spawn(async move {
            let emit = move |line: EvalLine| match line {
                EvalLine::Stdout(s) | EvalLine::Stderr(s) => log_writer.write(s),
                EvalLine::Result(s) => {
                    emit_handle.submit(move |state: &mut ReplState| state.entries[index].result.push(s));
                }
            };
            let outcome = evaluator.eval(&source, token, &emit).await;
            handle.submit(move |state: &mut ReplState| {
                match outcome {
                    EvalOutcome::Completed => {}
                    EvalOutcome::Cancelled => state.entries[index].logs.push("cancelled".to_string()),
                    EvalOutcome::Failed(e) => state.entries[index].logs.push(format!("error: {e}")),
                }
                state.entries[index].finish();
                state.current_cancel = None;
                state.spinner_slot.clear();
                // SetTarget(nil): no further writes from this (possibly
                // still-running, if cancellation raced) task reach an
                // entry that's now immutable.
                state.log_writer.set_target(None);
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::MockEvaluator;

    fn state() -> ReplState {
        ReplState::new(HistoryStore::in_memory(), Arc::new(MockEvaluator))
    }

    #[test]
    fn submitting_a_colon_command_finishes_entry_immediately() {
        let mut state = state();
        state.input = ":version".to_string();
        let (index, _, _) = state.submit();
        assert!(state.entries[index].is_finished());
    }

    #[test]
    fn submitting_exit_command_returns_exit_effect() {
        let mut state = state();
        state.input = ":exit".to_string();
        let (_, _, effect) = state.submit();
        assert!(matches!(effect, SubmitEffect::Exit));
    }

    #[test]
    fn clear_empties_entries() {
        let mut state = state();
        state.input = "anything".to_string();
        state.submit();
        state.input = ":clear".to_string();
        state.submit();
        assert!(state.entries.is_empty());
    }

    #[tokio::test]
    async fn eval_pipeline_rejects_unparseable_input_without_spawning() {
        let mut state = state();
        state.input = "1 +".to_string();
        let (index, source, _) = state.submit();
        state.start_eval(index, source);
        assert!(state.entries[index].is_finished());
        assert!(!state.entries[index].logs.is_empty());
    }

    #[tokio::test]
    async fn successful_eval_completes_and_clears_spinner() {
        let mut state = state();
        state.input = "let x = 1".to_string();
        let (index, source, _) = state.submit();
        state.start_eval(index, source);
        assert!(state.is_evaluating());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        state.drain_dispatch();
        assert!(state.entries[index].is_finished());
        assert!(!state.is_evaluating());
    }

    #[test]
    fn doc_command_populates_browser_from_bindings() {
        let mut state = state();
        state.input = ":doc".to_string();
        state.submit();
        let browser = state.doc_browser.expect("doc browser constructed");
        assert!(browser.columns[0].items.iter().any(|i| i.name == "print"));
    }

    #[test]
    fn on_input_changed_populates_lexical_completions() {
        let mut state = state();
        state.input = "pri".to_string();
        state.on_input_changed();
        assert!(state.completions.iter().any(|i| i.label == "print"));
    }

    #[test]
    fn single_lexical_match_suppresses_dropdown() {
        let mut state = state();
        state.input = "prin".to_string();
        state.on_input_changed();
        assert_eq!(state.completions.len(), 1);
        assert!(!state.show_completion_dropdown);
    }

    #[tokio::test]
    async fn successful_eval_flushes_coalesced_stdout_through_log_writer() {
        let mut state = state();
        let stop = state.log_writer_stop();
        let flush = tokio::spawn(state.log_writer().run(state.dispatch_handle(), stop.clone()));

        state.input = "let y = 2".to_string();
        let (index, source, _) = state.submit();
        state.start_eval(index, source);
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        state.drain_dispatch();

        assert!(state.entries[index].is_finished());
        assert!(state.entries[index].logs.lines().iter().any(|l| l.contains("evaluating")));

        stop.cancel();
        flush.await.unwrap();
    }
}
