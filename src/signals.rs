// signals.rs

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

use crate::error::ShellError;
use crate::history::HistoryLog;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// SIGINT handler. Only sets a flag; the prompt loop does the printing.
extern "C" fn on_sigint(_sig: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Routes SIGINT to the pending flag instead of terminating the process.
///
/// `SA_RESTART` is deliberately left off so a blocked read returns `EINTR`
/// and the prompt loop gets to react before reading again.
pub fn install_interrupt_handler() -> Result<(), ShellError> {
    let action = SigAction::new(SigHandler::Handler(on_sigint), SaFlags::empty(), SigSet::empty());
    // on_sigint touches nothing but an atomic.
    unsafe { signal::sigaction(Signal::SIGINT, &action) }
        .map_err(|source| ShellError::Signal { signal: "SIGINT", source })?;
    tracing::debug!("SIGINT handler installed");
    Ok(())
}

/// Consumes a pending interrupt, if any.
pub fn take_pending() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}

/// What the user sees on Ctrl-C: a newline, then the history listing.
pub fn report_interrupt<W: Write>(history: &HistoryLog, mut out: W) -> std::io::Result<()> {
    out.write_all(b"\n")?;
    history.dump(out)
}
