//! bangsh: a small interactive command interpreter.
//!
//! Each line is either a built-in (`exit`, `pwd`, `cd`, `history`), a recall
//! of an earlier command (`!!`, `!n`), or an external program run in a forked
//! child, in the foreground or, with a trailing `&`, in the background. The
//! last few commands are kept in a numbered [`history::HistoryLog`], which is
//! also printed when the user presses Ctrl-C.

pub mod builtins;
pub mod completion;
pub mod config;
pub mod error;
pub mod history;
pub mod parser;
pub mod pipeline;
pub mod recall;
pub mod repl;
pub mod signals;
pub mod util;

pub use config::Config;
pub use error::ShellError;
pub use repl::{start_repl, Shell};
