// SPDX-License-Identifier: MIT

//! The judged program's side of the protocol.
//!
//! A program creates one `ProgressReporter` per run, calls `start` with the
//! number of judge steps, reports debug text and progress while it works, and
//! ends with either `fail` or `success`.  Both end the process with exit code
//! 0: the judge reads the outcome from the last line, not from the exit code.

pub mod clock;
pub mod config;
pub mod reporter;

pub use clock::{Coarse, MonotonicClock, TimeSource, WallClock};
pub use config::{ReporterConfig, Resolution};
pub use reporter::{JudgeSession, ProgressReporter, TERMINAL_EXIT_CODE, Verdict};
