use core::fmt;

/// The classification of a reported message.
///
/// The severity decides which stream a report is written to, whether the
/// reporter blocks for a confirmation, and whether the process survives the
/// report. The variants are not ordered: each one selects a distinct
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational message. Printed to stdout, then returns.
    Info,
    /// Warning that needs no interaction. Printed to stdout, then returns.
    WarnNoAck,
    /// Warning that must be acknowledged. Printed to stdout, then blocks on a
    /// `[y/N]` prompt; declining exits the process.
    WarnAck,
    /// Fatal error. Printed to stderr, then aborts the process.
    Error,
}

/// A standard output stream of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl Severity {
    /// The label printed in the report header: `INFO`, `WARN` or `FAIL`.
    ///
    /// Both warning severities share the `WARN` label.
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::WarnNoAck | Severity::WarnAck => "WARN",
            Severity::Error => "FAIL",
        }
    }

    /// The stream reports of this severity are written to.
    #[inline]
    pub const fn stream(self) -> Stream {
        match self {
            Severity::Error => Stream::Stderr,
            Severity::Info | Severity::WarnNoAck | Severity::WarnAck => Stream::Stdout,
        }
    }

    /// Returns `true` if reporting at this severity asks for a confirmation.
    #[inline]
    pub const fn requires_acknowledgment(self) -> bool {
        matches!(self, Severity::WarnAck)
    }

    /// Returns `true` if reporting at this severity always ends the process.
    #[inline]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::WarnNoAck,
        Severity::WarnAck,
        Severity::Error,
    ];

    #[test]
    fn test_labels() {
        let labels: Vec<_> = ALL.iter().map(|severity| severity.label()).collect();
        assert_eq!(labels, ["INFO", "WARN", "WARN", "FAIL"]);
        assert_eq!(Severity::Error.to_string(), "FAIL");
    }

    #[test]
    fn test_only_errors_go_to_stderr() {
        for severity in ALL {
            let expected = if severity == Severity::Error {
                Stream::Stderr
            } else {
                Stream::Stdout
            };
            assert_eq!(severity.stream(), expected, "{severity:?}");
        }
    }

    #[test]
    fn test_behavior_flags() {
        assert!(Severity::WarnAck.requires_acknowledgment());
        assert!(!Severity::WarnNoAck.requires_acknowledgment());
        assert!(Severity::Error.is_fatal());
        assert_eq!(ALL.iter().filter(|severity| severity.is_fatal()).count(), 1);
    }
}
