//! # Status Line Protocol
//!
//! The judged process talks to the judge through its STDERR only.  Every
//! event is one line of the form:
//!
//! ```text
//! {{SUBMIT_ID} TYPE}
//! {{SUBMIT_ID} TYPE payload}
//! ```
//!
//! The doubled opening brace is part of the framing.  The submit id is
//! substituted at deployment time, so the judge can tell the protocol lines
//! apart from anything else the program prints.

pub mod line;
pub mod reader;
pub mod writer;
