//! Streaming rune transformers.
//!
//! Each transformer is a small state machine that holds back at most a
//! bounded run of runes. None of them fail on their own; the upstream
//! status is forwarded unchanged by [`Staged`].

use crate::stage::{BoxedStage, Stage, Staged};
use crate::stream::RuneStream;

const LF: char = '\n';
const CR: char = '\r';

/// Converts "\r" and "\r\n" to "\n".
#[derive(Debug, Default)]
pub struct ConvertLineTerminators {
    /// The previous rune was a CR already emitted as LF.
    swallow_lf: bool,
}

impl Stage for ConvertLineTerminators {
    type In = char;
    type Out = char;

    fn process(&mut self, rune: char, out: &mut Vec<char>) {
        if self.swallow_lf {
            self.swallow_lf = false;
            if rune == LF {
                return;
            }
        }
        if rune == CR {
            self.swallow_lf = true;
            out.push(LF);
        } else {
            out.push(rune);
        }
    }

    fn name(&self) -> &str {
        "lf"
    }
}

/// Removes white space at the end of lines. Lines are terminated by "\n".
///
/// Only the current run of consecutive white space is held. A run still
/// pending when the input ends is dropped: at a clean end it is trailing,
/// and after a failure the line never completed.
#[derive(Debug, Default)]
pub struct TrimTrailingWhiteSpace {
    spaces: Vec<char>,
}

impl Stage for TrimTrailingWhiteSpace {
    type In = char;
    type Out = char;

    fn process(&mut self, rune: char, out: &mut Vec<char>) {
        if rune == LF {
            self.spaces.clear();
            out.push(rune);
        } else if rune.is_whitespace() {
            self.spaces.push(rune);
        } else {
            out.append(&mut self.spaces);
            out.push(rune);
        }
    }

    fn finish(&mut self, _out: &mut Vec<char>) {
        self.spaces.clear();
    }

    fn name(&self) -> &str {
        "trail"
    }
}

/// Removes "\n" runes at the start of the input.
#[derive(Debug)]
pub struct TrimLeadingEmptyLines {
    skipping: bool,
}

impl Default for TrimLeadingEmptyLines {
    fn default() -> Self {
        Self { skipping: true }
    }
}

impl Stage for TrimLeadingEmptyLines {
    type In = char;
    type Out = char;

    fn process(&mut self, rune: char, out: &mut Vec<char>) {
        if self.skipping {
            if rune == LF {
                return;
            }
            self.skipping = false;
        }
        out.push(rune);
    }

    fn name(&self) -> &str {
        "trim-leading"
    }
}

/// Removes empty lines at the end of the input. Lines are terminated by "\n".
#[derive(Debug)]
pub struct TrimTrailingEmptyLines {
    /// The last rune emitted was a LF (or nothing was emitted yet).
    at_line_start: bool,
    /// LFs of empty lines that may turn out to be trailing.
    pending: usize,
}

impl Default for TrimTrailingEmptyLines {
    fn default() -> Self {
        Self {
            at_line_start: true,
            pending: 0,
        }
    }
}

impl Stage for TrimTrailingEmptyLines {
    type In = char;
    type Out = char;

    fn process(&mut self, rune: char, out: &mut Vec<char>) {
        if self.at_line_start && rune == LF {
            self.pending += 1;
            return;
        }
        out.extend(std::iter::repeat_n(LF, self.pending));
        self.pending = 0;
        out.push(rune);
        self.at_line_start = rune == LF;
    }

    fn finish(&mut self, _out: &mut Vec<char>) {
        self.pending = 0;
    }

    fn name(&self) -> &str {
        "trim-trailing"
    }
}

/// Ensures non-empty content ends with "\n".
#[derive(Debug, Default)]
pub struct EnsureFinalLf {
    last: Option<char>,
}

impl Stage for EnsureFinalLf {
    type In = char;
    type Out = char;

    fn process(&mut self, rune: char, out: &mut Vec<char>) {
        self.last = Some(rune);
        out.push(rune);
    }

    fn finish(&mut self, out: &mut Vec<char>) {
        if matches!(self.last, Some(last) if last != LF) {
            out.push(LF);
        }
    }

    fn name(&self) -> &str {
        "nelf"
    }
}

// ---------------------------------------------------------------------------
// Stage factories and stream functions
// ---------------------------------------------------------------------------

pub fn convert_line_terminators_stage() -> BoxedStage {
    Box::new(ConvertLineTerminators::default())
}

pub fn trim_trailing_white_space_stage() -> BoxedStage {
    Box::new(TrimTrailingWhiteSpace::default())
}

pub fn trim_leading_empty_lines_stage() -> BoxedStage {
    Box::new(TrimLeadingEmptyLines::default())
}

pub fn trim_trailing_empty_lines_stage() -> BoxedStage {
    Box::new(TrimTrailingEmptyLines::default())
}

pub fn ensure_final_lf_stage() -> BoxedStage {
    Box::new(EnsureFinalLf::default())
}

pub fn convert_line_terminators(input: RuneStream<'_>) -> RuneStream<'_> {
    Box::new(Staged::new(input, ConvertLineTerminators::default()))
}

pub fn trim_trailing_white_space(input: RuneStream<'_>) -> RuneStream<'_> {
    Box::new(Staged::new(input, TrimTrailingWhiteSpace::default()))
}

pub fn trim_leading_empty_lines(input: RuneStream<'_>) -> RuneStream<'_> {
    Box::new(Staged::new(input, TrimLeadingEmptyLines::default()))
}

pub fn trim_trailing_empty_lines(input: RuneStream<'_>) -> RuneStream<'_> {
    Box::new(Staged::new(input, TrimTrailingEmptyLines::default()))
}

pub fn ensure_final_lf(input: RuneStream<'_>) -> RuneStream<'_> {
    Box::new(Staged::new(input, EnsureFinalLf::default()))
}
