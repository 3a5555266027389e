// SPDX-License-Identifier: MIT

//! Reporter configuration.

use std::str::FromStr;

use super::clock::{Coarse, MonotonicClock, TimeSource};
use crate::error::ReportError;
use crate::report::line::SubmitId;

/// Build-time variable holding the submit id, set when the judge image
/// compiles the program.
pub const SUBMIT_ID_BUILD_VAR: &str = "JUDGE_SUBMIT_ID";

/// Resolution of the reported elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    #[default]
    Millis,
    /// Whole seconds, for consumers that expect the old coarse timings.
    Seconds,
}

impl FromStr for Resolution {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" | "millis" => Ok(Resolution::Millis),
            "s" | "seconds" => Ok(Resolution::Seconds),
            _ => Err(ReportError::Config(format!("unknown clock resolution {:?}", s))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReporterConfig {
    pub submit_id: SubmitId,
    pub resolution: Resolution,
}

impl ReporterConfig {
    pub fn new(submit_id: SubmitId) -> Self {
        ReporterConfig {
            submit_id,
            resolution: Resolution::default(),
        }
    }

    /// Configuration with the submit id compiled in through
    /// `JUDGE_SUBMIT_ID`.
    pub fn from_build() -> Result<Self, ReportError> {
        match option_env!("JUDGE_SUBMIT_ID") {
            Some(id) => Ok(Self::new(SubmitId::new(id)?)),
            None => Err(ReportError::Config(format!(
                "{} was not set at build time",
                SUBMIT_ID_BUILD_VAR
            ))),
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// The time source matching the configured resolution.
    pub fn clock(&self) -> Box<dyn TimeSource + Send + Sync> {
        match self.resolution {
            Resolution::Millis => Box::new(MonotonicClock::new()),
            Resolution::Seconds => Box::new(Coarse(MonotonicClock::new())),
        }
    }
}
