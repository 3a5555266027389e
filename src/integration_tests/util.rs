//! Utility helpers for running the tests.

use std::process::{Command, Stdio};

use crate::report::line::SubmitId;
use crate::report::writer::LineWriter;
use crate::session::{MonotonicClock, ProgressReporter};

/// Set in the environment of the re-launched test binary.
const CHILD_ENV: &str = "JUDGEREPORT_CHILD";

/// Submit id used by every child run.
pub const CHILD_SUBMIT_ID: &str = "itest_run";

/// What a child run left behind.
#[derive(Debug)]
pub struct ChildRun {
    pub exit_code: Option<i32>,
    pub stderr: String,
}

/// True when this process is the re-launched child.
pub fn is_child() -> bool {
    std::env::var_os(CHILD_ENV).is_some()
}

/// The reporter a child uses: real STDERR, real clock.
pub fn child_reporter() -> ProgressReporter<std::io::Stderr, MonotonicClock> {
    ProgressReporter::with_parts(
        SubmitId::new(CHILD_SUBMIT_ID).expect("valid submit id"),
        LineWriter::stderr(),
        MonotonicClock::new(),
    )
}

/// Turn the `module_path!()` of a test module plus the test function name into
/// the name the test harness filters on.
pub fn test_name(module: &str, function: &str) -> String {
    let module = module.split_once("::").map(|(_, m)| m).unwrap_or(module);
    format!("{module}::{function}")
}

/// Run exactly one test of this binary as a child process.
pub fn run_child(test: &str) -> ChildRun {
    let exe = std::env::current_exe().expect("could not find the test executable");
    let output = Command::new(&exe)
        .args([test, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .env("RUST_BACKTRACE", "0")
        .stdin(Stdio::null())
        .output()
        .unwrap_or_else(|e| panic!("could not run {}: {}", exe.display(), e));
    ChildRun {
        exit_code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
