// error.rs

use thiserror::Error;

/// Conditions that end the interpreter. Anything the user can retry from is
/// reported where it happens and never turns into one of these.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("unable to read command from keyboard: {0}")]
    Read(#[source] std::io::Error),

    #[error("line editor failed: {0}")]
    Editor(#[from] rustyline::error::ReadlineError),

    #[error("fork failed: {0}")]
    Fork(#[source] nix::Error),

    #[error("could not install {signal} handler: {source}")]
    Signal {
        signal: &'static str,
        #[source]
        source: nix::Error,
    },

    #[error("invalid value {value:?} for {var}")]
    Config { var: &'static str, value: String },

    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),
}
