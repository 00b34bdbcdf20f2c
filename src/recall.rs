// recall.rs

use thiserror::Error;

use crate::history::HistoryLog;
use crate::parser::BANG;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecallError {
    #[error("Invalid history reference.")]
    Malformed,
    #[error("!!: No commands in history.")]
    EmptyHistory,
    #[error("!{0}: No such command in history.")]
    NotFound(u64),
}

/// What a line starting with `!` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recall {
    Last,
    Ordinal(u64),
}

impl Recall {
    /// Reads the recall shape out of `words`. `Ok(None)` means the line is not
    /// a recall at all.
    pub fn parse(words: &[&str]) -> Result<Option<Recall>, RecallError> {
        match words {
            [first, ..] if *first != BANG => Ok(None),
            [] => Ok(None),
            [_, second] if *second == BANG => Ok(Some(Recall::Last)),
            [_, digits] if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                match digits.parse::<u64>() {
                    Ok(n) if n > 0 => Ok(Some(Recall::Ordinal(n))),
                    _ => Err(RecallError::Malformed),
                }
            }
            _ => Err(RecallError::Malformed),
        }
    }

    /// Copies the referenced text out of `history`. The entry itself is left
    /// untouched.
    pub fn resolve(self, history: &HistoryLog) -> Result<String, RecallError> {
        let entry = match self {
            Recall::Last => history.last().ok_or(RecallError::EmptyHistory)?,
            Recall::Ordinal(n) => history.lookup(n).ok_or(RecallError::NotFound(n))?,
        };
        Ok(entry.text().to_owned())
    }
}
