//! Running a scenario in a child copy of the current test binary.
//!
//! A test binary that uses this module defines a `#[test] fn child_entry()`
//! which returns immediately unless [`SCENARIO_VAR`] is set, and otherwise
//! performs the named scenario.

use std::{
    env,
    io::Write,
    process::{Command, ExitStatus, Output, Stdio},
};

/// Environment variable naming the scenario the child should run.
pub const SCENARIO_VAR: &str = "XUTILS_TEST_SCENARIO";

/// Printed by a child whose scenario returned normally.
pub const CONTINUED: &str = "CONTINUED";

/// Runs `child_entry` of this test binary with `scenario`, feeding `input` on
/// stdin and closing it.
pub fn run_child(scenario: &str, input: &str) -> Output {
    let mut child = Command::new(env::current_exe().unwrap())
        .args(["child_entry", "--exact", "--nocapture", "--test-threads=1"])
        .env(SCENARIO_VAR, scenario)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    // The child may exit before reading everything.
    let _ = stdin.write_all(input.as_bytes());
    drop(stdin);

    child.wait_with_output().unwrap()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Asserts that the child died of `abort`.
pub fn assert_aborted(status: ExitStatus) {
    assert!(!status.success(), "{status:?}");

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(status.signal(), Some(6), "{status:?}");
    }
}
