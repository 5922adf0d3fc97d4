//! Call-site capture.
//!
//! A [`CallSite`] is the (file, function, line) triple printed in every
//! report header. The reporting macros capture it with [`call_site!`]; code
//! that cannot use the macros gets file and line from
//! [`CallSite::caller`] through `#[track_caller]`.
//!
//! Rust has no `__func__`, so [`call_site!`] declares a marker function
//! inside the caller and recovers the enclosing function from its
//! [`type_name`](core::any::type_name).

use core::fmt;

/// Function name used when the enclosing function cannot be determined.
pub const UNKNOWN_FUNCTION: &str = "<unknown>";

/// Source code location of a report.
///
/// All three parts are treated as opaque display values and are never
/// validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// The source file the report was issued from.
    file: &'static str,
    /// The function the report was issued from.
    function: &'static str,
    /// The line the report was issued from.
    line: u32,
}

impl CallSite {
    /// Creates a call site from its parts.
    #[inline]
    pub const fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }

    /// Captures the file and line of the caller.
    ///
    /// This uses [`core::panic::Location::caller()`], so it reports the
    /// location of the outermost `#[track_caller]` function in the call
    /// chain. The function name is always [`UNKNOWN_FUNCTION`]; use
    /// [`call_site!`] when it matters.
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        let location = core::panic::Location::caller();
        Self {
            file: location.file(),
            function: UNKNOWN_FUNCTION,
            line: location.line(),
        }
    }

    /// The source file.
    #[inline]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// The enclosing function.
    #[inline]
    pub const fn function(&self) -> &'static str {
        self.function
    }

    /// The line number.
    #[inline]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

/// Formats as `function (file:line)`, the way report headers show it.
impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.function, self.file, self.line)
    }
}

/// Name of the marker function declared by [`call_site!`].
const MARKER: &str = "__xutils_marker";

/// The type name of a value's type, used on the marker function.
#[doc(hidden)]
#[inline]
pub fn type_name_of<T>(_: T) -> &'static str {
    core::any::type_name::<T>()
}

/// Recovers the enclosing function's name from the type name of the marker
/// function declared by [`call_site!`].
///
/// `my_crate::module::load::__xutils_marker` becomes `load`. Closure and
/// async segments are skipped, so a report from inside a closure names the
/// function that defines the closure.
#[doc(hidden)]
pub fn function_name(marker_path: &'static str) -> &'static str {
    let Some(path) = marker_path.strip_suffix(MARKER) else {
        return UNKNOWN_FUNCTION;
    };
    let mut path = path.strip_suffix("::").unwrap_or(path);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }

    match path.rsplit("::").next() {
        Some(name) if !name.is_empty() => name,
        _ => UNKNOWN_FUNCTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let site = CallSite::new("a.c", "main", 42);
        assert_eq!(site.to_string(), "main (a.c:42)");
    }

    #[test]
    fn test_call_site_names_enclosing_function() {
        let site = call_site!();
        assert_eq!(site.function(), "test_call_site_names_enclosing_function");
        assert_eq!(site.file(), file!());
        assert_eq!(site.line(), line!() - 3);
    }

    #[test]
    fn test_call_site_inside_closure() {
        let capture = || call_site!();
        assert_eq!(capture().function(), "test_call_site_inside_closure");
    }

    #[test]
    fn test_caller_uses_track_caller() {
        #[track_caller]
        fn capture() -> CallSite {
            CallSite::caller()
        }

        let expected_line = line!() + 1;
        let site = capture();
        assert_eq!(site.line(), expected_line);
        assert_eq!(site.file(), file!());
        assert_eq!(site.function(), UNKNOWN_FUNCTION);
    }

    #[test]
    fn test_function_name_parsing() {
        assert_eq!(function_name("app::load::__xutils_marker"), "load");
        assert_eq!(
            function_name("app::Store::flush::{{closure}}::{{closure}}::__xutils_marker"),
            "flush"
        );
        assert_eq!(function_name("main::__xutils_marker"), "main");
        assert_eq!(function_name("__xutils_marker"), UNKNOWN_FUNCTION);
        assert_eq!(function_name("not_a_marker"), UNKNOWN_FUNCTION);
    }
}
