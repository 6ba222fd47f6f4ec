//! Output side: writing a rune stream to bytes.

use std::io::{self, BufWriter, Read, Write};

use crate::error::{PipelineError, StreamError};

/// Encode every rune of `stream` into `writer`, returning the rune count.
///
/// The writer is flushed even when the stream fails. A stream failure is
/// reported in preference to a write error that follows it.
pub fn write_runes<I, W>(stream: I, writer: W) -> Result<u64, PipelineError>
where
    I: IntoIterator<Item = Result<char, StreamError>>,
    W: Write,
{
    let mut out = BufWriter::new(writer);
    let mut count = 0u64;
    let mut buf = [0u8; 4];

    for item in stream {
        let rune = match item {
            Ok(rune) => rune,
            Err(e) => {
                let _ = out.flush();
                return Err(e.into());
            }
        };
        out.write_all(rune.encode_utf8(&mut buf).as_bytes())
            .map_err(PipelineError::Write)?;
        count += 1;
    }

    out.flush().map_err(PipelineError::Write)?;
    Ok(count)
}

/// Adapts a rune stream back into a byte reader.
///
/// Bytes for every rune before a failure are returned first; the failure
/// then surfaces as an `io::Error` wrapping the `StreamError`.
pub struct RuneEncoder<I> {
    stream: I,
    buf: [u8; 4],
    start: usize,
    end: usize,
    failed: Option<StreamError>,
    done: bool,
}

impl<I> RuneEncoder<I>
where
    I: Iterator<Item = Result<char, StreamError>>,
{
    pub fn new(stream: I) -> Self {
        Self {
            stream,
            buf: [0; 4],
            start: 0,
            end: 0,
            failed: None,
            done: false,
        }
    }
}

impl<I> Read for RuneEncoder<I>
where
    I: Iterator<Item = Result<char, StreamError>>,
{
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let mut written = 0;
        while written < dst.len() {
            if self.start < self.end {
                let n = (self.end - self.start).min(dst.len() - written);
                dst[written..written + n].copy_from_slice(&self.buf[self.start..self.start + n]);
                self.start += n;
                written += n;
                continue;
            }
            if self.done {
                break;
            }
            match self.stream.next() {
                Some(Ok(rune)) => {
                    self.start = 0;
                    self.end = rune.encode_utf8(&mut self.buf).len();
                }
                Some(Err(e)) => {
                    self.failed = Some(e);
                    self.done = true;
                }
                None => self.done = true,
            }
        }

        if written == 0
            && let Some(e) = self.failed.take()
        {
            return Err(io::Error::other(e));
        }
        Ok(written)
    }
}
