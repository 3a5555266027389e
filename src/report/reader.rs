// SPDX-License-Identifier: MIT

//! Judge side of the protocol.
//!
//! The judge merges the program's STDOUT and STDERR into one stream and runs
//! it under `time -v`, so the stream also carries the program's own output
//! and, after the program ends, the resource usage report.  The `Transcript`
//! turns that stream into a `JudgeResult`.

use std::io::{BufRead, Read};

use super::line::{LINE_PREFIX, MessageType, StatusLine, SubmitId};

/// Longest line kept from the stream.  Longer lines are cut here; a cut
/// DEBUG line still counts as debug text, which is capped far below this.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Cap on the collected debug text, in characters.
pub const DEBUG_TEXT_MAX_LEN: usize = 8092;

/// Marker appended to debug text that hit the cap.
const DEBUG_TEXT_ELLIPSIS: &str = "...";

/// Peak memory line printed by `time -v` once the program exits.
const MEMORY_LINE_PREFIX: &str = "Maximum resident set size (kbytes): ";

/// One line as read from the stream, without its line ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub text: String,
    /// The line was longer than the limit and was cut.
    pub truncated: bool,
}

/// Read from the stream up to the next newline, or the maximum length value.
///
/// Returns `None` at the end of the stream.  A cut line has the rest of its
/// bytes, up to the newline, discarded so the next read starts on a fresh
/// line.  Invalid UTF-8 is replaced, not rejected.
pub fn read_line<R: BufRead>(
    source: &mut R,
    max_len: usize,
) -> Result<Option<RawLine>, std::io::Error> {
    let mut buf = Vec::new();
    let count = source.by_ref().take(max_len as u64).read_until(b'\n', &mut buf)?;
    if count == 0 {
        return Ok(None);
    }
    let complete = buf.last() == Some(&b'\n');
    // A line of exactly `max_len` bytes at the end of the stream is whole.
    let truncated = !complete && count == max_len && !source.fill_buf()?.is_empty();
    if complete {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    if truncated {
        skip_rest(source, max_len)?;
    }
    Ok(Some(RawLine {
        text: String::from_utf8_lossy(&buf).into_owned(),
        truncated,
    }))
}

fn skip_rest<R: BufRead>(source: &mut R, chunk: usize) -> Result<(), std::io::Error> {
    let mut scratch = Vec::new();
    loop {
        scratch.clear();
        let count = source.by_ref().take(chunk as u64).read_until(b'\n', &mut scratch)?;
        if count == 0 || scratch.last() == Some(&b'\n') {
            return Ok(());
        }
    }
}

/// Why a judged run did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    /// The program reported failure, printed something it should not have,
    /// or ended without reporting success.
    Wrong,
    /// The program exited with a non-zero code.
    RuntimeError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeResult {
    Success { time_ms: u64, memory_kb: u64 },
    Failed(FailReason),
}

/// Everything the judge keeps from one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeReport {
    pub result: JudgeResult,
    pub debug_text: String,
    /// The last progress percentage reported, if any.
    pub progress: Option<u64>,
}

/// Accumulates the output of one judged run.
pub struct Transcript<'a> {
    submit_id: SubmitId,
    line_prefix: String,
    on_progress: Option<Box<dyn FnMut(u64) + 'a>>,
    progress: Option<u64>,
    debug_text: String,
    debug_chars: usize,
    /// A terminal message was seen.
    ended: bool,
    /// The run already failed; the rest of the stream is ignored.
    failed: bool,
    succeeded: bool,
    time_ms: u64,
    memory_kb: u64,
}

impl<'a> Transcript<'a> {
    pub fn new(submit_id: SubmitId) -> Self {
        let line_prefix = format!("{}{}}} ", LINE_PREFIX, submit_id);
        Transcript {
            submit_id,
            line_prefix,
            on_progress: None,
            progress: None,
            debug_text: String::new(),
            debug_chars: 0,
            ended: false,
            failed: false,
            succeeded: false,
            time_ms: 0,
            memory_kb: 0,
        }
    }

    /// Call `f` with every progress percentage, as it arrives.
    pub fn on_progress<F: FnMut(u64) + 'a>(mut self, f: F) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Read the whole stream.
    pub fn read_from<R: BufRead>(&mut self, source: &mut R) -> Result<(), std::io::Error> {
        while let Some(line) = read_line(source, MAX_LINE_LEN)? {
            if line.truncated {
                self.feed_cut(&line.text);
            } else {
                self.feed(&line.text);
            }
        }
        Ok(())
    }

    /// Handle one line, without its line ending.
    pub fn feed(&mut self, line: &str) {
        if self.failed {
            return;
        }
        let framed = line.starts_with(&self.line_prefix);
        if !framed {
            self.feed_unframed(line);
            return;
        }
        match StatusLine::parse(line) {
            Ok(status) => self.handle(status),
            Err(_) if self.ended => self.feed_unframed(line),
            Err(e) => {
                log::warn!("[{}] invalid message printed: {} ({})", self.submit_id, line, e);
                self.fail();
            }
        }
    }

    /// Handle the kept start of a line that was longer than `MAX_LINE_LEN`.
    fn feed_cut(&mut self, line: &str) {
        if self.failed {
            return;
        }
        let debug_text = line
            .strip_prefix(&self.line_prefix)
            .and_then(|m| m.strip_prefix("DEBUG "));
        match debug_text {
            Some(text) if !text.is_empty() => self.push_debug(text),
            _ => self.feed_unframed(line),
        }
    }

    fn feed_unframed(&mut self, line: &str) {
        if self.failed {
            return;
        }
        if !self.ended {
            log::debug!("[{}] unexpected output before the final report", self.submit_id);
            self.fail();
            return;
        }
        if let Some(kb) = parse_memory_line(line) {
            self.memory_kb = kb;
        }
    }

    fn handle(&mut self, status: StatusLine) {
        let valid = match (&status.kind, status.payload.as_deref()) {
            (MessageType::Debug, Some(text)) if !text.is_empty() => {
                self.push_debug(text);
                true
            }
            (MessageType::Progress, Some(n)) => match parse_digits::<u64>(n) {
                Some(p) => {
                    self.progress = Some(p);
                    if let Some(f) = self.on_progress.as_mut() {
                        f(p);
                    }
                    true
                }
                None => false,
            },
            (MessageType::Fail, None) => {
                self.fail();
                true
            }
            (MessageType::Success, Some(ms)) => match parse_digits::<u64>(ms) {
                Some(t) => {
                    self.succeeded = true;
                    self.time_ms = t;
                    true
                }
                None => false,
            },
            _ => false,
        };
        if valid && status.kind.is_terminal() {
            self.ended = true;
        }
        if !valid {
            log::warn!(
                "[{}] invalid message printed: {} {}",
                self.submit_id,
                status.kind,
                status.payload.as_deref().unwrap_or(""),
            );
            self.fail();
        }
    }

    fn push_debug(&mut self, text: &str) {
        if self.debug_chars >= DEBUG_TEXT_MAX_LEN {
            return;
        }
        for c in text.chars().chain(std::iter::once('\n')) {
            if self.debug_chars == DEBUG_TEXT_MAX_LEN {
                break;
            }
            self.debug_text.push(c);
            self.debug_chars += 1;
        }
    }

    fn fail(&mut self) {
        self.failed = true;
    }

    /// Close the transcript once the stream ended and the process exited.
    pub fn finish(self, exit_code: i32) -> JudgeReport {
        let mut debug_text = self.debug_text;
        if self.debug_chars == DEBUG_TEXT_MAX_LEN {
            debug_text.push_str(DEBUG_TEXT_ELLIPSIS);
        }
        if !debug_text.is_empty() {
            log::debug!("[{}] {}", self.submit_id, debug_text);
        }

        let result = if exit_code != 0 {
            JudgeResult::Failed(FailReason::RuntimeError)
        } else if self.succeeded && !self.failed {
            JudgeResult::Success {
                time_ms: self.time_ms,
                memory_kb: self.memory_kb,
            }
        } else {
            JudgeResult::Failed(FailReason::Wrong)
        };
        JudgeReport {
            result,
            debug_text,
            progress: self.progress,
        }
    }
}

/// Only plain ASCII digits, like the judge's patterns accept.
fn parse_digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_memory_line(line: &str) -> Option<u64> {
    let rest = line.trim_start().strip_prefix(MEMORY_LINE_PREFIX)?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    parse_digits(&rest[..end])
}
