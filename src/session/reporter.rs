// SPDX-License-Identifier: MIT

//! Emits the status lines for one judged run.

use std::fmt;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use super::clock::{TimeSource, elapsed_ms};
use super::config::ReporterConfig;
use crate::error::ReportError;
use crate::report::line::{self, MessageType, SubmitId};
use crate::report::writer::LineWriter;

/// Exit code of the process after `fail` and `success`.
///
/// The same for both: the outcome travels on the status line.
pub const TERMINAL_EXIT_CODE: i32 = 0;

/// State of a started run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgeSession {
    total_steps: u32,
    started_at: Duration,
}

impl JudgeSession {
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Truncated percentage of `steps_done`.  Not clamped: more steps than
    /// announced reads above 100.
    pub fn percent(&self, steps_done: u32) -> u64 {
        u64::from(steps_done) * 100 / u64::from(self.total_steps)
    }
}

/// What a terminal report said.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Fail,
    Success { elapsed_ms: u64 },
}

/// Reports the progress of a judged run.
///
/// The reporter can be shared between threads; every line is written whole.
pub struct ProgressReporter<
    W: Write = std::io::Stderr,
    C: TimeSource = Box<dyn TimeSource + Send + Sync>,
> {
    submit_id: SubmitId,
    out: LineWriter<W>,
    clock: C,
    session: Mutex<Option<JudgeSession>>,
}

impl ProgressReporter {
    /// Reporter writing to STDERR, with the configured clock.
    pub fn from_config(config: ReporterConfig) -> Self {
        let clock = config.clock();
        ProgressReporter::with_parts(config.submit_id, LineWriter::stderr(), clock)
    }
}

impl<W: Write, C: TimeSource> ProgressReporter<W, C> {
    pub fn with_parts(submit_id: SubmitId, out: LineWriter<W>, clock: C) -> Self {
        ProgressReporter {
            submit_id,
            out,
            clock,
            session: Mutex::new(None),
        }
    }

    pub fn submit_id(&self) -> &SubmitId {
        &self.submit_id
    }

    /// The current session, if `start` was called.
    pub fn session(&self) -> Result<Option<JudgeSession>, ReportError> {
        self.access(|s| *s)
    }

    /// Start the run with the total number of steps.
    ///
    /// Starting again replaces the session and restarts the clock.
    pub fn start(&self, total_steps: u32) -> Result<(), ReportError> {
        if total_steps == 0 {
            return Err(ReportError::ZeroSteps);
        }
        let started_at = self.clock.now();
        self.access(|s| {
            *s = Some(JudgeSession {
                total_steps,
                started_at,
            })
        })?;
        log::debug!("[{}] judge started with {} steps", self.submit_id, total_steps);
        Ok(())
    }

    /// Report one line of debug text.
    ///
    /// Use with `format_args!`, or through the `judge_debug!` macro.
    pub fn debug(&self, args: fmt::Arguments<'_>) -> Result<(), ReportError> {
        self.emit(&MessageType::Debug, Some(args))
    }

    /// Report the number of steps done so far, as a percentage.
    pub fn progress(&self, steps_done: u32) -> Result<(), ReportError> {
        let session = self.started()?;
        let percent = session.percent(steps_done);
        self.emit(&MessageType::Progress, Some(format_args!("{}", percent)))
    }

    /// Write any message type, including caller supplied tags.
    pub fn emit(
        &self,
        kind: &MessageType,
        payload: Option<fmt::Arguments<'_>>,
    ) -> Result<(), ReportError> {
        let line = line::encode(&self.submit_id, kind, payload)?;
        log::trace!("[{}] emit {}", self.submit_id, line.trim_end());
        self.out.write_line(&line)?;
        Ok(())
    }

    /// Write the failure line without ending the process.
    pub fn report_fail(&self) -> Result<Verdict, ReportError> {
        self.emit(&MessageType::Fail, None)?;
        Ok(Verdict::Fail)
    }

    /// Write the success line, with the milliseconds since `start`, without
    /// ending the process.
    pub fn report_success(&self) -> Result<Verdict, ReportError> {
        let session = self.started()?;
        let elapsed = elapsed_ms(session.started_at, self.clock.now());
        self.emit(&MessageType::Success, Some(format_args!("{}", elapsed)))?;
        Ok(Verdict::Success {
            elapsed_ms: elapsed,
        })
    }

    /// Report failure and exit the process.
    pub fn fail(&self) -> ! {
        if let Err(e) = self.report_fail() {
            log::error!("[{}] could not report failure: {}", self.submit_id, e);
        }
        terminate()
    }

    /// Report success and exit the process.
    ///
    /// # Panics
    ///
    /// Panics if the session was never started, as there is no start time
    /// to measure from.
    pub fn success(&self) -> ! {
        match self.report_success() {
            Ok(_) => {}
            Err(ReportError::NotStarted) => {
                panic!("success reported before the judge session was started")
            }
            Err(e) => {
                log::error!("[{}] could not report success: {}", self.submit_id, e);
            }
        }
        terminate()
    }

    /// Give back the output stream.
    pub fn into_inner(self) -> Result<W, ReportError> {
        Ok(self.out.into_inner()?)
    }

    fn started(&self) -> Result<JudgeSession, ReportError> {
        self.access(|s| *s)?.ok_or(ReportError::NotStarted)
    }

    /// Generic helper to lock the session and use it with a provided closure.
    fn access<R, F>(&self, f: F) -> Result<R, ReportError>
    where
        F: FnOnce(&mut Option<JudgeSession>) -> R,
    {
        let mut guard = self.session.lock().map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "lock poisoned")
        })?;
        Ok(f(&mut *guard))
    }
}

fn terminate() -> ! {
    std::process::exit(TERMINAL_EXIT_CODE)
}

/// Report a formatted debug line.
///
/// ```ignore
/// judge_debug!(reporter, "{} items", 5)?;
/// ```
#[macro_export]
macro_rules! judge_debug {
    ($reporter:expr, $($arg:tt)+) => {
        $reporter.debug(format_args!($($arg)+))
    };
}
