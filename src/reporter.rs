//! Rendering reports and deciding what happens afterwards.
//!
//! A [`Reporter`] writes one report to a [`Console`] and returns an
//! [`Outcome`]. It never ends the process itself; [`Outcome::enforce`] does,
//! and it is only called by the macro entry points in this module.

use core::fmt;
use std::io;

use crate::{
    config::ReporterConfig,
    confirm::{Answer, Confirmation},
    console::{Console, StdConsole},
    location::CallSite,
    severity::Severity,
    terminate,
};

/// What must happen after a report was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "an `Outcome` has to be enforced or handled, or termination is lost"]
pub enum Outcome {
    /// Control returns to the caller.
    Continue,
    /// The user declined a confirmation; the process should exit with
    /// `exit_code`.
    Declined {
        /// The exit status to use.
        exit_code: i32,
    },
    /// A fatal error was reported; the process should abort.
    Abort,
}

impl Outcome {
    /// Returns `true` if control should return to the caller.
    #[inline]
    pub const fn is_continue(self) -> bool {
        matches!(self, Outcome::Continue)
    }

    /// Carries out the outcome: returns for [`Outcome::Continue`], exits for
    /// [`Outcome::Declined`] and aborts for [`Outcome::Abort`].
    ///
    /// Standard output and standard error are flushed before the process
    /// ends.
    pub fn enforce(self) {
        match self {
            Outcome::Continue => {}
            Outcome::Declined { exit_code } => terminate::exit(exit_code),
            Outcome::Abort => terminate::abort(),
        }
    }
}

/// Writes reports to a [`Console`].
///
/// The macros use a `Reporter` over [`StdConsole`] with the global
/// configuration. Using one directly lets the host choose the console and
/// decide what to do with the [`Outcome`].
#[derive(Debug)]
pub struct Reporter<'a, C> {
    /// Tag and exit status
    config: &'a ReporterConfig,
    /// Where reports go
    console: C,
}

impl<'a, C: Console> Reporter<'a, C> {
    /// Creates a reporter writing to `console`.
    pub fn new(config: &'a ReporterConfig, console: C) -> Self {
        Self { config, console }
    }

    /// The configuration in use.
    pub fn config(&self) -> &'a ReporterConfig {
        self.config
    }

    /// The console.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// The console, mutably.
    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Consumes the reporter, returning the console.
    pub fn into_console(self) -> C {
        self.console
    }

    /// Writes a report and, for [`Severity::WarnAck`], runs the
    /// confirmation.
    ///
    /// The report is a single line
    ///
    /// ```text
    /// <tag> In <function> (<file>:<line>) <LABEL>: <message>
    /// ```
    ///
    /// written to the severity's stream and flushed. Failing to write is not
    /// an error: the outcome is the same as if the write had succeeded.
    pub fn report(
        &mut self,
        severity: Severity,
        site: &CallSite,
        message: fmt::Arguments<'_>,
    ) -> Outcome {
        if let Err(error) = self.write_report(severity, site, message) {
            tracing::debug!(%error, ?severity, "writing report failed");
        }

        match severity {
            Severity::Info | Severity::WarnNoAck => Outcome::Continue,
            Severity::WarnAck => match Confirmation::new().run(&mut self.console) {
                Answer::Yes => Outcome::Continue,
                Answer::No => Outcome::Declined {
                    exit_code: self.config.declined_exit_code(),
                },
            },
            Severity::Error => Outcome::Abort,
        }
    }

    /// Renders the report line into the severity's stream.
    fn write_report(
        &mut self,
        severity: Severity,
        site: &CallSite,
        message: fmt::Arguments<'_>,
    ) -> io::Result<()> {
        let tag = self.config.tag();
        let writer = self.console.writer(severity.stream());
        writeln!(writer, "{tag} In {site} {severity}: {message}")?;
        writer.flush()
    }
}

/// Reports through the standard console with the global configuration and
/// enforces the outcome.
///
/// Returns only if the outcome is [`Outcome::Continue`].
#[doc(hidden)]
pub fn output(severity: Severity, site: CallSite, message: fmt::Arguments<'_>) {
    Reporter::new(ReporterConfig::current(), StdConsole::new())
        .report(severity, &site, message)
        .enforce();
}

/// Reports a fatal error through the standard console and aborts.
#[doc(hidden)]
#[cold]
pub fn fail(site: CallSite, message: fmt::Arguments<'_>) -> ! {
    let _ = Reporter::new(ReporterConfig::current(), StdConsole::new()).report(
        Severity::Error,
        &site,
        message,
    );
    terminate::abort()
}

/// Reports `message` at `severity` from the caller's location.
///
/// This is the function form of the macros, for code that computes the
/// severity at runtime or cannot use macros. The file and line come from
/// `#[track_caller]`; the function is reported as
/// [`UNKNOWN_FUNCTION`](crate::UNKNOWN_FUNCTION).
///
/// Like the macros, this may exit the process (declined confirmation) or
/// abort it ([`Severity::Error`]).
///
/// # Examples
///
/// ```
/// use xutils::{Severity, report};
///
/// report(Severity::Info, format_args!("{} workers started", 4));
/// ```
#[track_caller]
pub fn report(severity: Severity, message: fmt::Arguments<'_>) {
    output(severity, CallSite::caller(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        confirm::{PROMPT, REPROMPT},
        console::MemoryConsole,
    };

    fn site() -> CallSite {
        CallSite::new("a.c", "main", 42)
    }

    fn report_with(
        config: &ReporterConfig,
        input: &str,
        severity: Severity,
    ) -> (Outcome, MemoryConsole) {
        let mut reporter = Reporter::new(config, MemoryConsole::with_input(input));
        let outcome = reporter.report(severity, &site(), format_args!("value={}", 7));
        (outcome, reporter.into_console())
    }

    #[test]
    fn test_info_header() {
        let (outcome, console) = report_with(&ReporterConfig::DEFAULT, "", Severity::Info);
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(
            console.stdout_text(),
            " ** xutils: In main (a.c:42) INFO: value=7\n"
        );
        assert!(console.stderr().is_empty());
    }

    #[test]
    fn test_warn_noack_does_not_read_input() {
        let (outcome, console) = report_with(&ReporterConfig::DEFAULT, "n\n", Severity::WarnNoAck);
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(
            console.stdout_text(),
            " ** xutils: In main (a.c:42) WARN: value=7\n"
        );
        assert_eq!(console.remaining_input(), b"n\n");
    }

    #[test]
    fn test_warn_ack_accepted() {
        let (outcome, console) = report_with(&ReporterConfig::DEFAULT, "y\n", Severity::WarnAck);
        assert!(outcome.is_continue());
        assert_eq!(
            console.stdout_text(),
            format!(" ** xutils: In main (a.c:42) WARN: value=7\n{PROMPT}")
        );
    }

    #[test]
    fn test_warn_ack_declined_uses_configured_exit_code() {
        let (outcome, _) = report_with(&ReporterConfig::DEFAULT, "n\n", Severity::WarnAck);
        assert_eq!(outcome, Outcome::Declined { exit_code: 255 });

        let config = ReporterConfig::builder().declined_exit_code(3).build();
        let (outcome, _) = report_with(&config, "", Severity::WarnAck);
        assert_eq!(outcome, Outcome::Declined { exit_code: 3 });
    }

    #[test]
    fn test_warn_ack_reprompts_once() {
        let (outcome, console) = report_with(&ReporterConfig::DEFAULT, "x\ny\n", Severity::WarnAck);
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(console.stdout_text().matches(REPROMPT).count(), 1);
    }

    #[test]
    fn test_error_goes_to_stderr_and_aborts() {
        let (outcome, console) = report_with(&ReporterConfig::DEFAULT, "y\n", Severity::Error);
        assert_eq!(outcome, Outcome::Abort);
        assert!(console.stdout().is_empty());
        assert_eq!(
            console.stderr_text(),
            " ** xutils: In main (a.c:42) FAIL: value=7\n"
        );
        assert_eq!(console.remaining_input(), b"y\n");
    }

    #[test]
    fn test_custom_tag() {
        let config = ReporterConfig::builder().tag("[tool]").build();
        let (_, console) = report_with(&config, "", Severity::Info);
        assert_eq!(console.stdout_text(), "[tool] In main (a.c:42) INFO: value=7\n");
    }

    #[test]
    fn test_message_is_not_reinterpreted() {
        let mut reporter = Reporter::new(&ReporterConfig::DEFAULT, MemoryConsole::new());
        let text = "100% {done}";
        let _ = reporter.report(Severity::Info, &site(), format_args!("{text}"));
        assert_eq!(
            reporter.console().stdout_text(),
            " ** xutils: In main (a.c:42) INFO: 100% {done}\n"
        );
    }

    #[test]
    fn test_write_failure_does_not_change_outcome() {
        struct Broken;

        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> io::Result<()> {
                Err(io::ErrorKind::BrokenPipe.into())
            }
        }

        struct BrokenConsole {
            sink: Broken,
            input: MemoryConsole,
        }

        impl Console for BrokenConsole {
            fn writer(&mut self, _: crate::Stream) -> &mut dyn io::Write {
                &mut self.sink
            }

            fn read_byte(&mut self) -> io::Result<Option<u8>> {
                self.input.read_byte()
            }
        }

        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(tracing::Level::DEBUG)
                .finish(),
        );

        let console = BrokenConsole {
            sink: Broken,
            input: MemoryConsole::with_input("y\n"),
        };
        let mut reporter = Reporter::new(&ReporterConfig::DEFAULT, console);
        let outcome = reporter.report(Severity::WarnAck, &site(), format_args!("disk full"));
        assert_eq!(outcome, Outcome::Continue);
        assert!(reporter.console().input.remaining_input().is_empty());
    }

    #[test]
    fn test_auto_traits() {
        static_assertions::assert_impl_all!(Outcome: Send, Sync, Copy);
        static_assertions::assert_impl_all!(Reporter<'static, MemoryConsole>: Send, Sync);
    }
}
