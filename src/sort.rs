//! Case-insensitive sorting of lines and paragraphs.
//!
//! Unlike the streaming transformers, these stages hold every token until
//! the input ends. Nothing is emitted unless the input ends cleanly.

use log::debug;

use crate::stage::{BoxedStage, Stage, Staged};
use crate::stream::RuneStream;
use crate::tokenize::{LineContent, ParagraphContent};

/// Stable sort on a lowercase projection computed once per token.
pub fn sort_tokens_i(tokens: &mut [String]) {
    tokens.sort_by_cached_key(|token| lowercase(token));
}

/// Maps each rune to exactly one rune, so `'İ'` keys as `'i'`.
fn lowercase(token: &str) -> String {
    token
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// Sorts lines case-insensitively and terminates each with "\n".
#[derive(Debug, Default)]
pub struct SortLinesI {
    lines: LineContent,
    tokens: Vec<String>,
}

impl Stage for SortLinesI {
    type In = char;
    type Out = char;

    fn process(&mut self, rune: char, _out: &mut Vec<char>) {
        self.lines.process(rune, &mut self.tokens);
    }

    fn finish(&mut self, out: &mut Vec<char>) {
        self.lines.finish(&mut self.tokens);
        debug!("{}: sorting {} line(s)", self.name(), self.tokens.len());
        sort_tokens_i(&mut self.tokens);
        for line in self.tokens.drain(..) {
            out.extend(line.chars());
            out.push('\n');
        }
    }

    fn name(&self) -> &str {
        "sortli"
    }
}

/// Sorts paragraphs case-insensitively.
///
/// Paragraphs are separated by one empty line and the last one is
/// followed by a single "\n".
#[derive(Debug, Default)]
pub struct SortParagraphsI {
    paragraphs: ParagraphContent,
    tokens: Vec<String>,
}

impl Stage for SortParagraphsI {
    type In = char;
    type Out = char;

    fn process(&mut self, rune: char, _out: &mut Vec<char>) {
        self.paragraphs.process(rune, &mut self.tokens);
    }

    fn finish(&mut self, out: &mut Vec<char>) {
        self.paragraphs.finish(&mut self.tokens);
        debug!("{}: sorting {} paragraph(s)", self.name(), self.tokens.len());
        sort_tokens_i(&mut self.tokens);
        for (i, paragraph) in self.tokens.drain(..).enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(paragraph.chars());
            out.push('\n');
        }
    }

    fn name(&self) -> &str {
        "sortpi"
    }
}

pub fn sort_lines_i_stage() -> BoxedStage {
    Box::new(SortLinesI::default())
}

pub fn sort_paragraphs_i_stage() -> BoxedStage {
    Box::new(SortParagraphsI::default())
}

pub fn sort_lf_lines_i(input: RuneStream<'_>) -> RuneStream<'_> {
    Box::new(Staged::new(input, SortLinesI::default()))
}

pub fn sort_lf_paragraphs_i(input: RuneStream<'_>) -> RuneStream<'_> {
    Box::new(Staged::new(input, SortParagraphsI::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreamError;
    use crate::source::read_runes;
    use crate::stream::drain_string;

    type StreamFn = for<'a> fn(RuneStream<'a>) -> RuneStream<'a>;

    fn run(f: StreamFn, input: &[u8]) -> (String, Result<(), StreamError>) {
        drain_string(f(read_runes(input)))
    }

    fn check(f: StreamFn, input: &str, want: &str) {
        let (out, status) = run(f, input.as_bytes());
        assert_eq!(out, want, "input {input:?}");
        assert!(status.is_ok(), "input {input:?}");
    }

    #[test]
    fn test_sort_tokens_is_stable() {
        let mut tokens: Vec<String> = ["b", "B", "a", "b", "A"].iter().map(|s| s.to_string()).collect();
        sort_tokens_i(&mut tokens);
        assert_eq!(tokens, vec!["a", "A", "b", "B", "b"]);
    }

    #[test]
    fn test_sort_tokens_non_ascii_case() {
        let mut tokens: Vec<String> = ["Éclair", "zebra", "élan", "Ä"].iter().map(|s| s.to_string()).collect();
        sort_tokens_i(&mut tokens);
        assert_eq!(tokens, vec!["zebra", "Ä", "Éclair", "élan"]);
    }

    #[test]
    fn test_sort_tokens_lowercases_rune_for_rune() {
        assert_eq!(lowercase("İSTANBUL"), "istanbul");

        let mut tokens: Vec<String> = ["İ", "i", "I"].iter().map(|s| s.to_string()).collect();
        sort_tokens_i(&mut tokens);
        assert_eq!(tokens, vec!["İ", "i", "I"]);
    }

    #[test]
    fn test_sort_lines() {
        check(sort_lf_lines_i, "", "");
        check(sort_lf_lines_i, "Q\n\na\nrrr", "\na\nQ\nrrr\n");
        check(sort_lf_lines_i, "second\nfirst\nmiddle.", "first\nmiddle.\nsecond\n");
        check(sort_lf_lines_i, "Bb\nbB\nBB\na\n", "a\nBb\nbB\nBB\n");
        check(sort_lf_lines_i, "bz\n\nA\n\n\nC", "\n\n\nA\nbz\nC\n");
    }

    #[test]
    fn test_sort_paragraphs() {
        check(sort_lf_paragraphs_i, "", "");
        check(sort_lf_paragraphs_i, "\n\n", "");
        check(
            sort_lf_paragraphs_i,
            "Hi\n👽\n\nalien\n\n\nspace",
            "alien\n\nHi\n👽\n\nspace\n",
        );
        check(sort_lf_paragraphs_i, "only\none\n", "only\none\n");
        check(sort_lf_paragraphs_i, "b\n\nB\n\na", "a\n\nb\n\nB\n");
    }

    #[test]
    fn test_sort_lines_emits_nothing_on_failure() {
        let (out, status) = run(sort_lf_lines_i, b"b\na\nc\n\xff");
        assert_eq!(out, "");
        assert!(status.unwrap_err().is_invalid_encoding());
    }

    #[test]
    fn test_sort_paragraphs_emits_nothing_on_failure() {
        let (out, status) = run(sort_lf_paragraphs_i, b"b\n\na\n\n\xe2");
        assert_eq!(out, "");
        assert!(status.unwrap_err().is_invalid_encoding());
    }
}
