// completion.rs

use rustyline::completion::{Completer, Pair};
use rustyline::{Helper, Context};
use rustyline::hint::Hinter;
use rustyline::highlight::Highlighter;
use rustyline::validate::{Validator, ValidationContext, ValidationResult};
use rustyline::error::ReadlineError;
use std::os::unix::fs::PermissionsExt;

use crate::builtins::BUILTIN_NAMES;

/// Tab completion for the command word: built-ins plus executables on `$PATH`.
#[derive(Debug, Default)]
pub struct BuiltinCompleter;

impl BuiltinCompleter {
    pub fn new() -> Self {
        Self
    }
}

/// Sorted, de-duplicated command names starting with `prefix`.
pub fn command_candidates(prefix: &str, path_var: Option<&str>) -> Vec<String> {
    let mut names: Vec<String> = BUILTIN_NAMES
        .iter()
        .filter(|b| b.starts_with(prefix))
        .map(|b| b.to_string())
        .collect();
    for dir in path_var.unwrap_or_default().split(':').filter(|d| !d.is_empty()) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !name.starts_with(prefix) {
                continue;
            }
            // metadata() follows symlinks
            let is_exec = std::fs::metadata(entry.path())
                .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
                .unwrap_or(false);
            if is_exec {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    names.dedup();
    names
}

impl Completer for BuiltinCompleter {
    type Candidate = Pair;
    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let before = &line[..pos];
        let start = before.len() - before.trim_start().len();
        let prefix = &before[start..];
        // only the command word is completed
        if prefix.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let path_var = std::env::var("PATH").ok();
        let completions = command_candidates(prefix, path_var.as_deref())
            .into_iter()
            .map(|n| Pair {
                display: n.clone(),
                replacement: format!("{} ", n),
            })
            .collect();
        Ok((start, completions))
    }
}

impl Hinter for BuiltinCompleter {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for BuiltinCompleter {}

impl Validator for BuiltinCompleter {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for BuiltinCompleter {}
