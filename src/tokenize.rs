//! Tokenizers: line and paragraph content from a rune stream.
//!
//! A trailing line or paragraph with no terminator is emitted only when
//! the input ends cleanly. If the input fails instead, the partial token
//! is dropped; a consumer could not otherwise tell it from a complete one.

use crate::stage::{Stage, Staged};
use crate::stream::{RuneStream, TokenStream};

/// Splits runes into the content of lines, excluding the "\n" terminator.
#[derive(Debug, Default)]
pub struct LineContent {
    line: String,
}

impl Stage for LineContent {
    type In = char;
    type Out = String;

    fn process(&mut self, rune: char, out: &mut Vec<String>) {
        if rune == '\n' {
            out.push(std::mem::take(&mut self.line));
        } else {
            self.line.push(rune);
        }
    }

    fn finish(&mut self, out: &mut Vec<String>) {
        if !self.line.is_empty() {
            out.push(std::mem::take(&mut self.line));
        }
    }

    fn name(&self) -> &str {
        "line-content"
    }
}

/// Joins adjacent non-empty lines into paragraphs.
///
/// Paragraph content keeps the "\n" between its lines but not the one
/// after its last line. Runs of empty lines only separate paragraphs.
#[derive(Debug, Default)]
pub struct ParagraphContent {
    lines: LineContent,
    line_buf: Vec<String>,
    paragraph: String,
}

impl ParagraphContent {
    fn push_line(&mut self, line: String, out: &mut Vec<String>) {
        if line.is_empty() {
            if !self.paragraph.is_empty() {
                out.push(std::mem::take(&mut self.paragraph));
            }
            return;
        }
        if !self.paragraph.is_empty() {
            self.paragraph.push('\n');
        }
        self.paragraph.push_str(&line);
    }

    fn drain_lines(&mut self, out: &mut Vec<String>) {
        let lines = std::mem::take(&mut self.line_buf);
        for line in lines {
            self.push_line(line, out);
        }
    }
}

impl Stage for ParagraphContent {
    type In = char;
    type Out = String;

    fn process(&mut self, rune: char, out: &mut Vec<String>) {
        self.lines.process(rune, &mut self.line_buf);
        self.drain_lines(out);
    }

    fn finish(&mut self, out: &mut Vec<String>) {
        self.lines.finish(&mut self.line_buf);
        self.drain_lines(out);
        if !self.paragraph.is_empty() {
            out.push(std::mem::take(&mut self.paragraph));
        }
    }

    fn name(&self) -> &str {
        "paragraph-content"
    }
}

pub fn line_content(input: RuneStream<'_>) -> TokenStream<'_> {
    Box::new(Staged::new(input, LineContent::default()))
}

pub fn paragraph_content(input: RuneStream<'_>) -> TokenStream<'_> {
    Box::new(Staged::new(input, ParagraphContent::default()))
}
