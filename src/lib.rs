//! # textnorm
//!
//! A streaming text normalization library.
//!
//! Input bytes are decoded as UTF-8 into a stream of runes, passed through
//! a chain of line-oriented transformers and encoded back out.
//!
//! ## Overview
//!
//! - **Rune streams**: iterators of `Result<char, StreamError>`; all data
//!   comes first, then a single terminal status (an `Err`, or the end of
//!   the iterator for success)
//! - **Streaming transformers**: line terminator conversion, trailing white
//!   space and empty line trimming, final newline enforcement
//! - **Tokenizers**: line and paragraph content
//! - **Sorters**: stable case-insensitive sorting of lines or paragraphs
//! - **Catalog**: short keys such as `lf`, `trail` and `norm`
//!
//! ## Example
//!
//! ```
//! use textnorm::{Catalog, read_runes, stream::drain_string};
//!
//! let norm = Catalog::standard().resolve(["norm"]).unwrap();
//! let input = "\r\n  first line  \r\nsecond\t\r\n\r\n";
//!
//! let (output, status) = drain_string(norm.apply(read_runes(input.as_bytes())));
//!
//! assert!(status.is_ok());
//! assert_eq!(output, "  first line\nsecond\n");
//! ```

pub mod catalog;
pub mod channel;
pub mod error;
pub mod pipeline;
pub mod sink;
pub mod sort;
pub mod source;
pub mod stage;
pub mod stream;
pub mod tokenize;
pub mod transform;

pub use catalog::{Catalog, Entry, NORM_CHAIN};
pub use error::{CatalogError, PipelineError, Result, StreamError};
pub use pipeline::{Execution, Pipeline, RunSummary};
pub use sink::{RuneEncoder, write_runes};
pub use sort::{sort_lf_lines_i, sort_lf_paragraphs_i, sort_tokens_i};
pub use source::{RuneReader, read_runes};
pub use stage::{BoxedStage, Stage, StageFactory, Staged, Transformer};
pub use stream::{RuneStream, TokenStream};
pub use tokenize::{line_content, paragraph_content};
pub use transform::{
    convert_line_terminators, ensure_final_lf, trim_leading_empty_lines,
    trim_trailing_empty_lines, trim_trailing_white_space,
};
