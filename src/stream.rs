//! The stream contract shared by every stage.
//!
//! A stream is an iterator of `Result<T, StreamError>`:
//! - every data item arrives as `Ok`
//! - the terminal status follows all data: a single `Err` for a failure,
//!   or exhaustion (`None`) for a clean end
//! - nothing is produced after an `Err`
//!
//! Consumers therefore cannot observe the status before draining the data.
//! A consumer that wants to stop early simply drops the stream.

use crate::error::StreamError;

/// A stream of runes.
pub type RuneStream<'a> = Box<dyn Iterator<Item = Result<char, StreamError>> + Send + 'a>;

/// A stream of line or paragraph content tokens.
pub type TokenStream<'a> = Box<dyn Iterator<Item = Result<String, StreamError>> + Send + 'a>;

/// Drain a stream, returning all data items followed by the terminal status.
pub fn drain<T, I>(stream: I) -> (Vec<T>, Result<(), StreamError>)
where
    I: IntoIterator<Item = Result<T, StreamError>>,
{
    let mut data = Vec::new();
    for item in stream {
        match item {
            Ok(value) => data.push(value),
            Err(e) => return (data, Err(e)),
        }
    }
    (data, Ok(()))
}

/// Drain a rune stream into a `String` plus its terminal status.
pub fn drain_string<I>(stream: I) -> (String, Result<(), StreamError>)
where
    I: IntoIterator<Item = Result<char, StreamError>>,
{
    let (runes, status) = drain(stream);
    (runes.into_iter().collect(), status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing(prefix: &str) -> impl Iterator<Item = Result<char, StreamError>> {
        prefix
            .chars()
            .map(Ok)
            .chain(std::iter::once(Err(StreamError::InvalidEncoding { offset: 3 })))
            .chain("never".chars().map(Ok))
    }

    #[test]
    fn test_drain_clean() {
        let (data, status) = drain_string("xyz".chars().map(Ok));
        assert_eq!(data, "xyz");
        assert!(status.is_ok());
    }

    #[test]
    fn test_drain_stops_at_first_error() {
        let (data, status) = drain_string(failing("q"));
        assert_eq!(data, "q");
        assert!(matches!(
            status,
            Err(StreamError::InvalidEncoding { offset: 3 })
        ));
    }
}
