//! Rune source: decodes a byte reader into a stream of code points.

use std::io::{self, BufReader, Read};

use crate::error::StreamError;
use crate::stream::RuneStream;

/// Decodes UTF-8 from a byte reader one code point at a time.
///
/// A malformed sequence ends the stream with
/// [`StreamError::InvalidEncoding`] carrying the byte offset where the
/// sequence starts. Read errors end it with [`StreamError::Io`].
pub struct RuneReader<R> {
    bytes: io::Bytes<BufReader<R>>,
    offset: u64,
    done: bool,
}

impl<R: Read> RuneReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
            offset: 0,
            done: false,
        }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn next_byte(&mut self) -> Option<io::Result<u8>> {
        let byte = self.bytes.next();
        if let Some(Ok(_)) = byte {
            self.offset += 1;
        }
        byte
    }

    fn decode(&mut self) -> Option<Result<char, StreamError>> {
        let start = self.offset;
        let lead = match self.next_byte()? {
            Ok(b) => b,
            Err(e) => return Some(Err(e.into())),
        };

        let width = sequence_width(lead);
        if width == 0 {
            return Some(Err(StreamError::InvalidEncoding { offset: start }));
        }

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.next_byte() {
                Some(Ok(b)) if b & 0xC0 == 0x80 => *slot = b,
                Some(Ok(_)) | None => {
                    return Some(Err(StreamError::InvalidEncoding { offset: start }));
                }
                Some(Err(e)) => return Some(Err(e.into())),
            }
        }

        // Rejects overlong forms, surrogates and values past U+10FFFF.
        match std::str::from_utf8(&buf[..width]) {
            Ok(s) => s.chars().next().map(Ok),
            Err(_) => Some(Err(StreamError::InvalidEncoding { offset: start })),
        }
    }
}

impl<R: Read> Iterator for RuneReader<R> {
    type Item = Result<char, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.decode();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

/// Length of the sequence introduced by `lead`, or 0 if it cannot start one.
fn sequence_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

/// Start a rune stream reading from `reader`.
pub fn read_runes<'a, R>(reader: R) -> RuneStream<'a>
where
    R: Read + Send + 'a,
{
    Box::new(RuneReader::new(reader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::drain_string;

    fn decode(bytes: &[u8]) -> (String, Result<(), StreamError>) {
        drain_string(RuneReader::new(bytes))
    }

    fn assert_invalid_at(bytes: &[u8], prefix: &str, at: u64) {
        let (text, status) = decode(bytes);
        assert_eq!(text, prefix);
        match status {
            Err(StreamError::InvalidEncoding { offset }) => assert_eq!(offset, at),
            other => panic!("expected InvalidEncoding, got {other:?}"),
        }
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::other("device lost"));
            }
            self.served = true;
            buf[0] = b'k';
            Ok(1)
        }
    }

    #[test]
    fn test_empty_input_is_clean() {
        let (text, status) = decode(b"");
        assert_eq!(text, "");
        assert!(status.is_ok());
    }

    #[test]
    fn test_multibyte_runes() {
        let (text, status) = decode("a•🧐/".as_bytes());
        assert_eq!(text, "a•🧐/");
        assert!(status.is_ok());
    }

    #[test]
    fn test_literal_replacement_char_is_valid() {
        let (text, status) = decode("@\u{FFFD}\t".as_bytes());
        assert_eq!(text, "@\u{FFFD}\t");
        assert!(status.is_ok());
    }

    #[test]
    fn test_stray_continuation_byte() {
        assert_invalid_at(b"\x80a", "", 0);
    }

    #[test]
    fn test_truncated_sequence_before_ascii() {
        // "=•" is four bytes, then a 4-byte lead cut short by '!'
        assert_invalid_at(b"=\xe2\x80\xa2\xf0\x9f!", "=•", 4);
    }

    #[test]
    fn test_truncated_sequence_at_eof() {
        assert_invalid_at(b"ok\xe2\x80", "ok", 2);
    }

    #[test]
    fn test_overlong_and_surrogate_rejected() {
        assert_invalid_at(b"x\xc0\xafy", "x", 1);
        assert_invalid_at(b"\xe0\x80\x80", "", 0);
        assert_invalid_at(b"s\xed\xa0\x80", "s", 1);
        assert_invalid_at(b"\xf4\x90\x80\x80", "", 0);
    }

    #[test]
    fn test_no_runes_after_failure() {
        let mut reader = RuneReader::new(&b"\xffabc"[..]);
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
        assert_eq!(reader.offset(), 1);
    }

    #[test]
    fn test_read_error_is_io() {
        let (text, status) = decode_reader(FailingReader { served: false });
        assert_eq!(text, "k");
        assert!(matches!(status, Err(StreamError::Io(_))));
    }

    fn decode_reader<R: Read + Send>(reader: R) -> (String, Result<(), StreamError>) {
        drain_string(read_runes(reader))
    }
}
