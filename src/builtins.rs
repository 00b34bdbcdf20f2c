// builtins.rs

use std::env;
use std::io::Write;

use crate::history::HistoryLog;
use crate::util::writeln_ignore_broken_pipe;

pub const BUILTIN_NAMES: [&str; 4] = ["exit", "pwd", "cd", "history"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Pwd,
    Cd,
    History,
}

impl Builtin {
    /// Case-sensitive match on the first word of a command.
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "exit" => Some(Builtin::Exit),
            "pwd" => Some(Builtin::Pwd),
            "cd" => Some(Builtin::Cd),
            "history" => Some(Builtin::History),
            _ => None,
        }
    }
}

/// Whether the prompt loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub fn run_builtin<W: Write>(
    builtin: Builtin,
    words: &[&str],
    history: &HistoryLog,
    out: &mut W,
) -> std::io::Result<Flow> {
    match builtin {
        // Extra arguments are ignored and background jobs are left running.
        Builtin::Exit => return Ok(Flow::Exit),
        Builtin::Pwd => match env::current_dir() {
            Ok(path) => writeln_ignore_broken_pipe(&mut *out, path.display().to_string())?,
            Err(e) => writeln_ignore_broken_pipe(&mut *out, format!("pwd: {}", e))?,
        },
        Builtin::Cd => match words.get(1) {
            None => writeln_ignore_broken_pipe(&mut *out, "cd: Invalid directory.")?,
            Some(target) => {
                if let Err(e) = env::set_current_dir(target) {
                    tracing::debug!(path = *target, error = %e, "cd failed");
                    writeln_ignore_broken_pipe(&mut *out, format!("cd: {}: Invalid directory.", target))?;
                }
            }
        },
        Builtin::History => history.dump(&mut *out)?,
    }
    Ok(Flow::Continue)
}
