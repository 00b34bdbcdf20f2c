// pipeline.rs

use std::ffi::CString;
use std::io::Write;

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{self, execvp, fork, ForkResult, Pid};

use crate::builtins::{run_builtin, Builtin, Flow};
use crate::error::ShellError;
use crate::history::HistoryLog;
use crate::parser::Tokens;
use crate::util::writeln_ignore_broken_pipe;

/// What became of an external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Foreground child, waited for.
    Finished(WaitStatus),
    /// Background child, still owned by the dispatcher for reaping.
    Background(Pid),
    /// The command could not be turned into an argument vector.
    NotStarted,
}

/// Runs built-ins in process and everything else in a forked child.
#[derive(Debug, Default)]
pub struct Dispatcher {
    background: Vec<Pid>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Background children not yet collected.
    pub fn background_jobs(&self) -> &[Pid] {
        &self.background
    }

    pub fn dispatch<W: Write>(
        &mut self,
        tokens: &Tokens<'_>,
        history: &HistoryLog,
        out: &mut W,
    ) -> Result<Flow, ShellError> {
        let Some(name) = tokens.first() else {
            return Ok(Flow::Continue);
        };
        if let Some(builtin) = Builtin::lookup(name) {
            tracing::debug!(?builtin, "running builtin");
            return Ok(run_builtin(builtin, tokens.words(), history, out)?);
        }
        self.spawn_external(tokens.words(), tokens.run_in_background(), out)?;
        Ok(Flow::Continue)
    }

    /// Forks; the child execs `words[0]` with `words` as its argv.
    ///
    /// Fork failure is fatal to the interpreter. Exec failure only kills the
    /// child, which reports `<name>: Unknown command.` and exits with 1.
    pub fn spawn_external<W: Write>(
        &mut self,
        words: &[&str],
        background: bool,
        out: &mut W,
    ) -> Result<Job, ShellError> {
        let argv = match words.iter().map(|w| CString::new(*w)).collect::<Result<Vec<_>, _>>() {
            Ok(argv) => argv,
            Err(_) => {
                writeln_ignore_broken_pipe(&mut *out, format!("{}: Unknown command.", words.join(" ")))?;
                return Ok(Job::NotStarted);
            }
        };
        let Some(program) = argv.first() else {
            return Ok(Job::NotStarted);
        };
        out.flush()?;

        // The child either becomes the program or exits; it never returns
        // into the loop.
        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                let _ = execvp(program, &argv);
                let _ = unistd::write(libc::STDOUT_FILENO, program.as_bytes());
                let _ = unistd::write(libc::STDOUT_FILENO, b": Unknown command.\n");
                unsafe { libc::_exit(1) }
            }
            Ok(ForkResult::Parent { child }) => {
                tracing::debug!(pid = child.as_raw(), background, program = ?program, "spawned child");
                if background {
                    self.background.push(child);
                    Ok(Job::Background(child))
                } else {
                    Ok(Job::Finished(wait_foreground(child)))
                }
            }
            Err(e) => Err(ShellError::Fork(e)),
        }
    }

    /// Collects any background children that have exited, without blocking.
    pub fn reap_background(&mut self) {
        self.background.retain(|&pid| match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => true,
            Ok(status) => {
                tracing::debug!(pid = pid.as_raw(), ?status, "reaped background job");
                false
            }
            Err(e) => {
                tracing::warn!(pid = pid.as_raw(), error = %e, "lost track of background job");
                false
            }
        });
    }
}

fn wait_foreground(child: Pid) -> WaitStatus {
    loop {
        match waitpid(child, Some(WaitPidFlag::WUNTRACED)) {
            Ok(status) => {
                tracing::debug!(pid = child.as_raw(), ?status, "foreground job done");
                return status;
            }
            Err(Errno::EINTR) => continue,
            Err(e) => {
                tracing::warn!(pid = child.as_raw(), error = %e, "waitpid failed");
                return WaitStatus::StillAlive;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn foreground_child_is_waited_for() {
        let mut dispatcher = Dispatcher::new();
        let mut out = Vec::new();
        let job = dispatcher.spawn_external(&["true"], false, &mut out).unwrap();
        assert!(matches!(job, Job::Finished(WaitStatus::Exited(_, 0))), "{job:?}");

        let job = dispatcher.spawn_external(&["sh", "-c", "exit 3"], false, &mut out).unwrap();
        assert!(matches!(job, Job::Finished(WaitStatus::Exited(_, 3))), "{job:?}");
        assert!(dispatcher.background_jobs().is_empty());
    }

    #[test]
    fn unknown_program_only_fails_the_child() {
        let mut dispatcher = Dispatcher::new();
        let mut out = Vec::new();
        let job = dispatcher.spawn_external(&["doesnotexist123"], false, &mut out).unwrap();
        assert!(matches!(job, Job::Finished(WaitStatus::Exited(_, 1))), "{job:?}");
    }

    #[test]
    fn background_child_does_not_block() {
        let mut dispatcher = Dispatcher::new();
        let mut out = Vec::new();
        let started = Instant::now();
        let job = dispatcher.spawn_external(&["sleep", "1"], true, &mut out).unwrap();
        assert!(started.elapsed() < Duration::from_millis(900));
        let Job::Background(pid) = job else {
            panic!("expected a background job, got {job:?}");
        };
        assert_eq!(dispatcher.background_jobs(), &[pid]);

        let deadline = Instant::now() + Duration::from_secs(10);
        while !dispatcher.background_jobs().is_empty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50));
            dispatcher.reap_background();
        }
        assert!(dispatcher.background_jobs().is_empty());
    }

    #[test]
    fn interior_nul_is_reported_not_spawned() {
        let mut dispatcher = Dispatcher::new();
        let mut out = Vec::new();
        let job = dispatcher.spawn_external(&["a\0b"], false, &mut out).unwrap();
        assert_eq!(job, Job::NotStarted);
        assert_eq!(out, b"a\0b: Unknown command.\n");
    }
}
