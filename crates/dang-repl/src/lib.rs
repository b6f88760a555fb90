//! The REPL shell: entries, history, the `:`-command table, an evaluator
//! seam, and the Miller-column doc browser (spec.md §4.6, §4.9).

pub mod command;
pub mod docbrowser;
pub mod doctemplate;
pub mod entry;
pub mod evaluator;
pub mod history;
pub mod logwriter;
pub mod state;

pub use command::{parse_command, Command};
pub use docbrowser::{doc_items_from_env, Column, DocBrowser, DocItem};
pub use doctemplate::{DocArg, DocTemplate};
pub use entry::{Entry, EntryRegion};
pub use evaluator::{EvalLine, EvalOutcome, Evaluator, MockEvaluator};
pub use history::HistoryStore;
pub use logwriter::DaggerLogWriter;
pub use state::{ReplState, SubmitEffect};
