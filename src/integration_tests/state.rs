//! Expected outcome of a child run.

use std::io::Cursor;

use super::util::{CHILD_SUBMIT_ID, ChildRun};
use crate::report::line::SubmitId;
use crate::report::reader::{FailReason, JudgeReport, JudgeResult, Transcript};

#[derive(Debug)]
pub struct Expected {
    /// The exit code should be one of the listed values.
    pub exit_code: Vec<i32>,

    /// The judge's reading of the child's STDERR.
    pub result: Outcome,

    /// Progress percentages, in the order they were reported.
    pub progress: Vec<u64>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Success with any elapsed time.
    Success,
    Failed(FailReason),
}

impl Expected {
    /// The child reported success and exited with 0.
    pub fn succeeds(progress: &[u64]) -> Self {
        Self {
            exit_code: vec![0],
            result: Outcome::Success,
            progress: progress.to_vec(),
        }
    }

    /// The child reported failure and still exited with 0.
    pub fn fails(progress: &[u64]) -> Self {
        Self {
            exit_code: vec![0],
            result: Outcome::Failed(FailReason::Wrong),
            progress: progress.to_vec(),
        }
    }

    /// The child panicked.
    pub fn panics() -> Self {
        Self {
            exit_code: vec![101],
            result: Outcome::Failed(FailReason::RuntimeError),
            progress: vec![],
        }
    }
}

impl ChildRun {
    /// Read the transcript the way the judge does.
    pub fn judge(&self) -> (JudgeReport, Vec<u64>) {
        let mut progress = Vec::new();
        let report = {
            let mut t = Transcript::new(SubmitId::new(CHILD_SUBMIT_ID).expect("valid submit id"))
                .on_progress(|p| progress.push(p));
            t.read_from(&mut Cursor::new(self.stderr.as_bytes()))
                .expect("reading from memory");
            t.finish(self.exit_code.unwrap_or(-1))
        };
        (report, progress)
    }

    /// Assert that the child's run meets the test's expectations.
    pub fn assert(&self, expected: Expected) {
        let (report, progress) = self.judge();
        let outcome = match report.result {
            JudgeResult::Success { .. } => Outcome::Success,
            JudgeResult::Failed(reason) => Outcome::Failed(reason),
        };
        let exit_ok = self
            .exit_code
            .map(|c| expected.exit_code.contains(&c))
            .unwrap_or(false);
        if !exit_ok || outcome != expected.result || progress != expected.progress {
            println!("Expected: {:?}", expected);
            println!("  Actual: {:?} {:?} progress {:?}", self.exit_code, outcome, progress);
            println!("  STDERR:\n{}", self.stderr);
        }
        assert!(exit_ok, "unexpected exit code {:?}", self.exit_code);
        assert_eq!(outcome, expected.result);
        assert_eq!(progress, expected.progress);
    }
}
