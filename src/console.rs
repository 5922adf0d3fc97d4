//! Console sinks and sources.
//!
//! The reporter never touches `std::io::stdout()` and friends directly. It
//! writes and reads through a [`Console`], so the same rendering and
//! confirmation logic runs against the real terminal ([`StdConsole`]) and
//! against in-memory buffers ([`MemoryConsole`]).

use std::{
    borrow::Cow,
    io::{self, IsTerminal, Read},
};

use crate::severity::Stream;

/// The console a [`Reporter`](crate::Reporter) talks to.
pub trait Console {
    /// Returns the writer for `stream`.
    fn writer(&mut self, stream: Stream) -> &mut dyn io::Write;

    /// Reads a single byte of interactive input.
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Reads a single byte of input that is already pending, used to drain
    /// leftover input after a confirmation.
    ///
    /// Returns `Ok(None)` at end of input, or once nothing more is pending.
    /// The default treats all remaining input as pending and reads until end
    /// of input.
    fn read_pending_byte(&mut self) -> io::Result<Option<u8>> {
        self.read_byte()
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    #[inline]
    fn writer(&mut self, stream: Stream) -> &mut dyn io::Write {
        (**self).writer(stream)
    }

    #[inline]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    #[inline]
    fn read_pending_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_pending_byte()
    }
}

/// The process's standard streams.
///
/// When stdin is redirected, pending input is everything up to end of input.
/// When it is a terminal, which delivers input a line at a time, pending
/// input ends with the current line, so draining never waits for the user to
/// type more.
#[derive(Debug)]
pub struct StdConsole {
    /// Standard output
    stdout: io::Stdout,
    /// Standard error
    stderr: io::Stderr,
    /// Standard input
    stdin: io::Stdin,
    /// The last byte read from stdin, `None` before the first read or after
    /// end of input
    last_read: Option<u8>,
}

impl StdConsole {
    /// Creates a console over the process's standard streams.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            stderr: io::stderr(),
            stdin: io::stdin(),
            last_read: None,
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn writer(&mut self, stream: Stream) -> &mut dyn io::Write {
        match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = read_one(&mut self.stdin)?;
        self.last_read = byte;
        Ok(byte)
    }

    fn read_pending_byte(&mut self) -> io::Result<Option<u8>> {
        if !self.stdin.is_terminal() {
            return self.read_byte();
        }

        match self.last_read {
            None | Some(b'\n') => Ok(None),
            Some(_) => self.read_byte(),
        }
    }
}

/// An in-memory console.
///
/// Output to each stream is collected in its own buffer, and interactive
/// input is served from a fixed byte string.
///
/// # Examples
///
/// ```
/// use xutils::{CallSite, MemoryConsole, Reporter, ReporterConfig, Severity};
///
/// let config = ReporterConfig::default();
/// let mut reporter = Reporter::new(&config, MemoryConsole::new());
/// let _ = reporter.report(
///     Severity::Info,
///     &CallSite::new("a.c", "main", 42),
///     format_args!("value={}", 7),
/// );
///
/// assert_eq!(
///     reporter.console().stdout_text(),
///     " ** xutils: In main (a.c:42) INFO: value=7\n"
/// );
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryConsole {
    /// Bytes written to stdout
    stdout: Vec<u8>,
    /// Bytes written to stderr
    stderr: Vec<u8>,
    /// Interactive input
    input: io::Cursor<Vec<u8>>,
}

impl MemoryConsole {
    /// Creates a console with empty output buffers and no input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a console whose interactive input is `input`.
    pub fn with_input(input: impl Into<Vec<u8>>) -> Self {
        Self {
            input: io::Cursor::new(input.into()),
            ..Self::default()
        }
    }

    /// Everything written to stdout so far.
    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    /// Everything written to stderr so far.
    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    /// Stdout as text, with invalid UTF-8 replaced.
    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Stderr as text, with invalid UTF-8 replaced.
    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// The input that has not been read yet.
    pub fn remaining_input(&self) -> &[u8] {
        let input = self.input.get_ref();
        usize::try_from(self.input.position())
            .ok()
            .and_then(|position| input.get(position..))
            .unwrap_or_default()
    }
}

impl Console for MemoryConsole {
    fn writer(&mut self, stream: Stream) -> &mut dyn io::Write {
        match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        read_one(&mut self.input)
    }
}

/// Reads one byte, retrying on interruption.
fn read_one(reader: &mut impl Read) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}
