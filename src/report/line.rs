// SPDX-License-Identifier: MIT

//! Framing of a single status line.
//!
//! Both the writer and the reader go through this module, so the grammar
//! lives in exactly one place.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::error::ReportError;

/// Opens every line.  The second brace opens the submit id.
pub const LINE_PREFIX: &str = "{{";

/// Closes the submit id and separates it from the message type.
const ID_END: &str = "} ";

/// Closes every line, before the newline.
const LINE_SUFFIX: char = '}';

/// The submission identity carried by every line.
///
/// The value comes from the deployment; this type only guarantees it cannot
/// break the framing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmitId(String);

impl SubmitId {
    pub fn new(id: impl Into<String>) -> Result<Self, ReportError> {
        let id = id.into();
        let framing_safe = id
            .chars()
            .all(|c| c != '{' && c != '}' && !c.is_whitespace() && !c.is_control());
        if id.is_empty() || !framing_safe {
            return Err(ReportError::InvalidSubmitId(id));
        }
        Ok(SubmitId(id))
    }

    /// Apply the build-time rewrite used when the id is a UUID: dashes are
    /// not allowed in the identifiers the id is spliced into, so they become
    /// underscores.  The judge must match against the same form.
    pub fn sanitized(id: &str) -> Result<Self, ReportError> {
        Self::new(id.replace('-', "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SubmitId {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The type token of a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageType {
    Debug,
    Progress,
    Fail,
    Success,
    /// Caller supplied tag: ASCII uppercase letters, digits and `_`.
    Custom(String),
}

impl MessageType {
    /// Map a tag to its message type, validating custom tags.
    pub fn from_tag(tag: &str) -> Result<Self, ReportError> {
        match tag {
            "DEBUG" => Ok(MessageType::Debug),
            "PROGRESS" => Ok(MessageType::Progress),
            "FAIL" => Ok(MessageType::Fail),
            "SUCCESS" => Ok(MessageType::Success),
            _ => {
                let valid = !tag.is_empty()
                    && tag
                        .bytes()
                        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');
                if !valid {
                    return Err(ReportError::InvalidTag(tag.to_string()));
                }
                Ok(MessageType::Custom(tag.to_string()))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Debug => "DEBUG",
            MessageType::Progress => "PROGRESS",
            MessageType::Fail => "FAIL",
            MessageType::Success => "SUCCESS",
            MessageType::Custom(tag) => tag,
        }
    }

    /// Fail and success end the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MessageType::Fail | MessageType::Success)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build one complete line, including the trailing newline.
///
/// The payload section, with its leading space, is only written when a
/// payload is given.  Line breaks inside the payload become spaces.
pub fn encode(
    submit_id: &SubmitId,
    kind: &MessageType,
    payload: Option<fmt::Arguments<'_>>,
) -> Result<String, ReportError> {
    let mut line = String::with_capacity(64);
    line.push_str(LINE_PREFIX);
    line.push_str(submit_id.as_str());
    line.push_str(ID_END);
    line.push_str(kind.as_str());
    if let Some(args) = payload {
        line.push(' ');
        let start = line.len();
        line.write_fmt(args)
            .map_err(|_| ReportError::Malformed("payload formatting failed".to_string()))?;
        if line[start..].contains(['\r', '\n']) {
            let flat = line[start..].replace(['\r', '\n'], " ");
            line.truncate(start);
            line.push_str(&flat);
        }
    }
    line.push(LINE_SUFFIX);
    line.push('\n');
    Ok(line)
}

/// A parsed status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub submit_id: SubmitId,
    pub kind: MessageType,
    pub payload: Option<String>,
}

impl StatusLine {
    /// Parse a single line.  The trailing newline is optional.
    pub fn parse(line: &str) -> Result<Self, ReportError> {
        let body = line.strip_suffix('\n').unwrap_or(line);
        let body = body
            .strip_prefix(LINE_PREFIX)
            .and_then(|b| b.strip_suffix(LINE_SUFFIX))
            .ok_or_else(|| ReportError::Malformed(body.to_string()))?;
        let (id, message) = body
            .split_once(ID_END)
            .ok_or_else(|| ReportError::Malformed(body.to_string()))?;
        let submit_id = SubmitId::new(id)?;
        let (tag, payload) = match message.split_once(' ') {
            Some((tag, payload)) => (tag, Some(payload.to_string())),
            None => (message, None),
        };
        Ok(StatusLine {
            submit_id,
            kind: MessageType::from_tag(tag)?,
            payload,
        })
    }

    /// Re-encode the line, including the trailing newline.
    pub fn encode(&self) -> Result<String, ReportError> {
        match &self.payload {
            Some(p) => encode(&self.submit_id, &self.kind, Some(format_args!("{}", p))),
            None => encode(&self.submit_id, &self.kind, None),
        }
    }
}
