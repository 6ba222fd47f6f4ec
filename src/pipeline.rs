//! Pipeline runner: byte reader → transformer → byte writer.

use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};

use crate::channel::spawn_transformer;
use crate::error::{PipelineError, Result};
use crate::sink::write_runes;
use crate::source::read_runes;
use crate::stage::Transformer;
use crate::stream::RuneStream;

/// How the stages of a pipeline are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    /// All stages nested as iterators on the calling thread.
    #[default]
    Inline,
    /// One thread per primitive stage, linked by synchronous channels.
    Threaded,
}

/// Rune counts for a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub runes_in: u64,
    pub runes_out: u64,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    transformer: Transformer,
    execution: Execution,
}

impl Pipeline {
    pub fn new(transformer: Transformer) -> Self {
        Self {
            transformer,
            execution: Execution::default(),
        }
    }

    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Decode `reader`, apply the transformer and encode into `writer`.
    ///
    /// Output produced before a failure has already been written when the
    /// error is returned.
    pub fn run<R, W>(&self, reader: R, writer: W) -> Result<RunSummary>
    where
        R: Read + Send + 'static,
        W: Write,
    {
        let counter = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&counter);
        let source: RuneStream<'static> = Box::new(read_runes(reader).inspect(move |item| {
            if item.is_ok() {
                seen.fetch_add(1, Ordering::Relaxed);
            }
        }));

        debug!(
            "running {} stage(s), {:?} execution",
            self.transformer.stage_count(),
            self.execution
        );

        let output = match self.execution {
            Execution::Inline => self.transformer.apply(source),
            Execution::Threaded => {
                spawn_transformer(&self.transformer, source).map_err(PipelineError::Spawn)?
            }
        };

        let result = write_runes(output, writer);
        let runes_in = counter.load(Ordering::Relaxed);
        match result {
            Ok(runes_out) => {
                debug!("{runes_in} rune(s) in, {runes_out} rune(s) out");
                Ok(RunSummary {
                    runes_in,
                    runes_out,
                })
            }
            Err(e) => {
                warn!("pipeline failed after {runes_in} input rune(s): {e}");
                Err(e)
            }
        }
    }
}
