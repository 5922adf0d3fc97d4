//! Process termination.
//!
//! Both functions flush the standard streams first, since `abort` runs no
//! destructors and `exit` does not flush `Stdout`'s line buffer on every
//! platform.

use std::io::Write;

/// Flushes stdout and stderr, ignoring failures.
fn flush_std_streams() {
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
}

/// Aborts the process abnormally.
#[cold]
pub(crate) fn abort() -> ! {
    flush_std_streams();
    std::process::abort()
}

/// Exits the process with `code`.
#[cold]
pub(crate) fn exit(code: i32) -> ! {
    tracing::debug!(code, "exiting after declined confirmation");
    flush_std_streams();
    std::process::exit(code)
}
