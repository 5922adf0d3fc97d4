/// Captures the [`CallSite`] of the invocation.
///
/// Expands to a [`CallSite`] holding [`file!()`], [`line!()`] and the name of
/// the enclosing function. The function name is recovered at compile time
/// from a marker item, so the macro has to be invoked inside a function body.
///
/// [`CallSite`]: crate::CallSite
///
/// # Examples
///
/// ```
/// fn open_database() -> xutils::CallSite {
///     xutils::call_site!()
/// }
///
/// let site = open_database();
/// assert_eq!(site.function(), "open_database");
/// assert_eq!(site.file(), file!());
/// ```
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __xutils_marker() {}
        $crate::CallSite::new(
            ::core::file!(),
            $crate::__private::function_name($crate::__private::type_name_of(__xutils_marker)),
            ::core::line!(),
        )
    }};
}

/// Reports a message at the given [`Severity`].
///
/// The remaining arguments are interpreted in the same way as the
/// [`format!()`] macro, so mismatched placeholders are compile errors. The
/// [`CallSite`] of the invocation is captured automatically.
///
/// What happens after printing depends on the severity; see [`info!`],
/// [`warn_noack!`], [`warn_ack!`] and [`error!`] for the per-level
/// behavior. Prefer those when the severity is known statically: unlike
/// this macro, [`error!`] has type `!`.
///
/// [`Severity`]: crate::Severity
/// [`CallSite`]: crate::CallSite
/// [`format!()`]: std::format
///
/// # Examples
///
/// ```
/// use xutils::{Severity, output};
///
/// fn sync(changed: usize) {
///     let severity = if changed > 100 {
///         Severity::WarnNoAck
///     } else {
///         Severity::Info
///     };
///     output!(severity, "{changed} files changed");
/// }
/// # sync(3);
/// ```
#[macro_export]
macro_rules! output {
    ($severity:expr, $($arg:tt)+) => {
        $crate::__private::output(
            $severity,
            $crate::call_site!(),
            $crate::__private::format_args!($($arg)+),
        )
    };
}

/// Prints an informational message to stdout.
///
/// ```text
///  ** xutils: In main (src/main.rs:4) INFO: value=7
/// ```
///
/// # Examples
///
/// ```
/// let value = 7;
/// xutils::info!("value={}", value);
/// ```
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::output!($crate::Severity::Info, $($arg)+)
    };
}

/// Prints a warning to stdout without waiting for the user.
///
/// [`warn!`] and [`warning!`] are aliases of this macro.
///
/// # Examples
///
/// ```
/// xutils::warn_noack!("cache directory missing, recreating it");
/// ```
#[macro_export]
macro_rules! warn_noack {
    ($($arg:tt)+) => {
        $crate::output!($crate::Severity::WarnNoAck, $($arg)+)
    };
}

/// Prints a warning to stdout without waiting for the user.
///
/// Alias of [`warn_noack!`].
///
/// # Examples
///
/// ```
/// xutils::warn!("config key `{}` is deprecated", "timeout_ms");
/// ```
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::warn_noack!($($arg)+)
    };
}

/// Prints a warning to stdout without waiting for the user.
///
/// Alias of [`warn_noack!`].
///
/// # Examples
///
/// ```
/// xutils::warning!("{} retries left", 2);
/// ```
#[macro_export]
macro_rules! warning {
    ($($arg:tt)+) => {
        $crate::warn_noack!($($arg)+)
    };
}

/// Prints a warning to stdout and asks the user whether to continue.
///
/// The prompt reads single bytes from stdin:
///
/// - `y` or `Y` returns normally.
/// - `n`, `N`, an empty answer or end of input exits the process with the
///   configured declined exit code (255 unless
///   [`ReporterConfig`](crate::ReporterConfig) says otherwise).
/// - Anything else prints `Please answer [y]es or [N]o.` and asks again.
///
/// There is no timeout: this blocks the calling thread until the user
/// answers.
///
/// # Examples
///
/// ```no_run
/// fn wipe(path: &str) {
///     xutils::warn_ack!("about to delete everything under {path}");
///     // Only reached if the user answered yes.
/// }
/// ```
#[macro_export]
macro_rules! warn_ack {
    ($($arg:tt)+) => {
        $crate::output!($crate::Severity::WarnAck, $($arg)+)
    };
}

/// Prints a fatal error to stderr and aborts the process.
///
/// This macro never returns, so it can be used wherever a value of any type
/// is expected.
///
/// # Examples
///
/// ```no_run
/// fn parse_port(raw: &str) -> u16 {
///     match raw.parse() {
///         Ok(port) => port,
///         Err(_) => xutils::error!("invalid port {raw:?}"),
///     }
/// }
/// ```
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::__private::fail(
            $crate::call_site!(),
            $crate::__private::format_args!($($arg)+),
        )
    };
}
