// repl.rs

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Editor, CompletionType, Config as EditorConfig};
use std::collections::VecDeque;
use std::io::Write;

use crate::builtins::Flow;
use crate::completion::BuiltinCompleter;
use crate::config::Config;
use crate::error::ShellError;
use crate::history::HistoryLog;
use crate::parser::CommandLine;
use crate::pipeline::Dispatcher;
use crate::recall::Recall;
use crate::signals;
use crate::util::{write_ignore_broken_pipe, writeln_ignore_broken_pipe, RawStdout};

/// One outcome of asking for a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// The read was cut short by the interrupt key; ask again.
    Interrupted,
    Eof,
}

/// Where command lines come from.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input, ShellError>;
}

/// Interactive input through rustyline.
pub struct Terminal {
    rl: Editor<BuiltinCompleter, DefaultHistory>,
}

impl Terminal {
    pub fn new() -> Result<Self, ShellError> {
        let config = EditorConfig::builder().completion_type(CompletionType::List).build();
        let mut rl = Editor::with_config(config)?;
        rl.set_helper(Some(BuiltinCompleter::new()));
        Ok(Self { rl })
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<Input, ShellError> {
        match self.rl.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    // arrow-key recall only; the numbered log lives in HistoryLog
                    let _ = self.rl.add_history_entry(line.as_str());
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(ReadlineError::Io(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(Input::Interrupted),
            Err(ReadlineError::Io(e)) => Err(ShellError::Read(e)),
            Err(e) => Err(ShellError::Editor(e)),
        }
    }
}

/// Canned input, for driving the loop without a terminal. Records every
/// prompt it is shown.
#[derive(Debug, Default)]
pub struct Script {
    inputs: VecDeque<Input>,
    prompts: Vec<String>,
}

impl Script {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_inputs(lines.into_iter().map(|l| Input::Line(l.into())))
    }

    pub fn from_inputs<I: IntoIterator<Item = Input>>(inputs: I) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineSource for Script {
    fn read_line(&mut self, prompt: &str) -> Result<Input, ShellError> {
        self.prompts.push(prompt.to_string());
        Ok(self.inputs.pop_front().unwrap_or(Input::Eof))
    }
}

/// `<cwd>> `, or just `> ` when the working directory cannot be read.
pub fn prompt() -> String {
    match std::env::current_dir() {
        Ok(path) => format!("{}> ", path.display()),
        Err(e) => {
            tracing::warn!(error = %e, "cannot read working directory for prompt");
            "> ".to_string()
        }
    }
}

/// The interpreter: prompt, read, tokenize, recall, record, dispatch.
pub struct Shell<S, W> {
    history: HistoryLog,
    line: CommandLine,
    recalled: CommandLine,
    dispatcher: Dispatcher,
    source: S,
    out: W,
}

impl<S: LineSource, W: Write> Shell<S, W> {
    pub fn new(config: Config, source: S, out: W) -> Self {
        Self {
            history: HistoryLog::new(config.history_depth, config.max_line),
            line: CommandLine::new(config.max_line),
            recalled: CommandLine::new(config.max_line),
            dispatcher: Dispatcher::new(),
            source,
            out,
        }
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Runs until `exit` or end of input.
    pub fn run(&mut self) -> Result<(), ShellError> {
        while self.step()? == Flow::Continue {}
        Ok(())
    }

    /// One prompt-and-execute round.
    pub fn step(&mut self) -> Result<Flow, ShellError> {
        self.dispatcher.reap_background();
        if signals::take_pending() {
            signals::report_interrupt(&self.history, &mut self.out)?;
        }

        match self.source.read_line(&prompt())? {
            Input::Line(text) => self.execute(&text),
            Input::Interrupted => {
                // the handler may have fired too; print the listing once
                signals::take_pending();
                signals::report_interrupt(&self.history, &mut self.out)?;
                Ok(Flow::Continue)
            }
            Input::Eof => {
                write_ignore_broken_pipe(&mut self.out, b"\n")?;
                Ok(Flow::Exit)
            }
        }
    }

    /// Handles one line exactly as if it had been typed.
    pub fn execute(&mut self, text: &str) -> Result<Flow, ShellError> {
        self.line.fill(text);
        let tokens = self.line.tokenize();
        if tokens.is_empty() {
            return Ok(Flow::Continue);
        }

        match Recall::parse(tokens.words()) {
            Ok(None) => {
                self.history.record(&tokens.to_text());
                self.dispatcher.dispatch(&tokens, &self.history, &mut self.out)
            }
            Ok(Some(recall)) => {
                let background = tokens.run_in_background();
                match recall.resolve(&self.history) {
                    Ok(resolved) => self.run_recalled(&resolved, background),
                    Err(e) => {
                        tracing::debug!(?recall, error = %e, "recall failed");
                        writeln_ignore_broken_pipe(&mut self.out, e.to_string())?;
                        Ok(Flow::Continue)
                    }
                }
            }
            Err(e) => {
                writeln_ignore_broken_pipe(&mut self.out, e.to_string())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Echoes, records and dispatches recalled text. A recalled line that
    /// itself starts with `!` is not resolved again.
    fn run_recalled(&mut self, resolved: &str, background: bool) -> Result<Flow, ShellError> {
        self.recalled.fill(resolved);
        let mut tokens = self.recalled.tokenize();
        if background {
            tokens.set_background(true);
        }
        if tokens.is_empty() {
            return Ok(Flow::Continue);
        }

        let mut echo = tokens.to_text();
        if tokens.run_in_background() {
            echo.push_str(" &");
        }
        writeln_ignore_broken_pipe(&mut self.out, echo)?;

        self.history.record(resolved);
        self.dispatcher.dispatch(&tokens, &self.history, &mut self.out)
    }
}

/// Interactive session on the controlling terminal.
pub fn start_repl(config: Config) -> Result<(), ShellError> {
    signals::install_interrupt_handler()?;
    let mut shell = Shell::new(config, Terminal::new()?, RawStdout);
    shell.run()
}
