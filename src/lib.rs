//! # judgereport
//!
//! Status reporting from a judged program to the judge that runs it.
//!
//! The judged program writes one framed line per event to its STDERR; the
//! judge reads those lines back and turns them into a verdict.  The
//! [`session`] module is the program side, the [`report`] module holds the
//! framing shared by both sides plus the judge-side reader.

pub mod error;
pub mod input;
pub mod report;
pub mod session;


pub use error::ReportError;
pub use report::line::{MessageType, StatusLine, SubmitId};
pub use session::{ProgressReporter, ReporterConfig, Resolution, Verdict};
