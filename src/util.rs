// util.rs

use std::io::Write;

use nix::errno::Errno;
use nix::unistd;

pub fn writeln_ignore_broken_pipe<W: std::io::Write, S: AsRef<str>>(mut w: W, s: S) -> std::io::Result<()> {
    match writeln!(w, "{}", s.as_ref()) {
        Err(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

pub fn write_ignore_broken_pipe<W: std::io::Write>(mut w: W, bytes: &[u8]) -> std::io::Result<()> {
    match w.write_all(bytes) {
        Err(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Unbuffered stdout: every `write` is one write(2) on fd 1.
///
/// Nothing sits in a userspace buffer, so output from the interpreter and
/// from children sharing the terminal stays in order.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawStdout;

impl Write for RawStdout {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        loop {
            match unistd::write(libc::STDOUT_FILENO, buf) {
                Ok(n) => return Ok(n),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(std::io::Error::from_raw_os_error(e as i32)),
            }
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Longest decimal rendering of a u64.
pub const DECIMAL_WIDTH: usize = 20;

/// Formats `n` into the tail of `buf` and returns the digits. No allocation.
pub fn format_decimal(mut n: u64, buf: &mut [u8; DECIMAL_WIDTH]) -> &[u8] {
    let mut pos = DECIMAL_WIDTH;
    loop {
        pos -= 1;
        buf[pos] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    &buf[pos..]
}
