// config.rs

use crate::error::ShellError;

pub const DEFAULT_HISTORY_DEPTH: usize = 10;
pub const DEFAULT_MAX_LINE: usize = 1024;

const HISTORY_DEPTH_VAR: &str = "BANGSH_HISTORY_DEPTH";
const MAX_LINE_VAR: &str = "BANGSH_MAX_LINE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How many recent commands the history log retains.
    pub history_depth: usize,
    /// Size of the command line buffer, terminator included.
    pub max_line: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            max_line: DEFAULT_MAX_LINE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ShellError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unset variables keep
    /// their defaults; set ones must be positive integers.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShellError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(HISTORY_DEPTH_VAR) {
            config.history_depth = parse_positive(HISTORY_DEPTH_VAR, value)?;
        }
        if let Some(value) = lookup(MAX_LINE_VAR) {
            // one byte is reserved for the terminator
            config.max_line = parse_positive(MAX_LINE_VAR, value)?.max(2);
        }
        Ok(config)
    }
}

fn parse_positive(var: &'static str, value: String) -> Result<usize, ShellError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ShellError::Config { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.history_depth, 10);
        assert_eq!(config.max_line, 1024);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(|var| match var {
            "BANGSH_HISTORY_DEPTH" => Some("25".to_string()),
            "BANGSH_MAX_LINE" => Some(" 256 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.history_depth, 25);
        assert_eq!(config.max_line, 256);
    }

    #[test]
    fn rejects_zero_and_garbage() {
        let err = Config::from_lookup(|var| (var == "BANGSH_HISTORY_DEPTH").then(|| "0".to_string()));
        assert!(matches!(err, Err(ShellError::Config { var: "BANGSH_HISTORY_DEPTH", .. })));

        let err = Config::from_lookup(|var| (var == "BANGSH_MAX_LINE").then(|| "lots".to_string()));
        assert!(matches!(err, Err(ShellError::Config { var: "BANGSH_MAX_LINE", .. })));
    }
}
