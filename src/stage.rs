//! Stage trait, the stream adapter that drives it, and composable transformers.
//!
//! Each `Stage` handles one input item at a time, producing zero or more
//! output items. `Staged` turns an upstream stream plus a stage into a
//! downstream stream, so a pipeline is a nest of `Staged` adapters pulled
//! from the end.

use std::collections::VecDeque;

use log::debug;

use crate::error::StreamError;
use crate::stream::RuneStream;

/// A single-pass state machine over a stream of items.
///
/// `process` may hold items back (a run of whitespace, a partial line)
/// and release them on a later call. `finish` is only called when the
/// upstream ended cleanly; after a failure the stage is dropped with its
/// held state, which is how partial lines are truncated.
pub trait Stage: Send {
    type In;
    type Out;

    /// Process one input item, pushing any outputs onto `out`.
    fn process(&mut self, item: Self::In, out: &mut Vec<Self::Out>);

    /// Release held state after a clean end of input.
    fn finish(&mut self, _out: &mut Vec<Self::Out>) {}

    /// The display name of this stage.
    fn name(&self) -> &str;
}

impl<S: Stage + ?Sized> Stage for Box<S> {
    type In = S::In;
    type Out = S::Out;

    fn process(&mut self, item: Self::In, out: &mut Vec<Self::Out>) {
        (**self).process(item, out)
    }

    fn finish(&mut self, out: &mut Vec<Self::Out>) {
        (**self).finish(out)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A rune-to-rune stage behind a box.
pub type BoxedStage = Box<dyn Stage<In = char, Out = char>>;

/// Drives a `Stage` from an upstream stream.
///
/// Outputs are handed downstream before the next upstream item is pulled.
/// An upstream failure is forwarded unchanged and the stage is not
/// finished.
pub struct Staged<I, S: Stage> {
    upstream: Option<I>,
    stage: S,
    pending: VecDeque<S::Out>,
    scratch: Vec<S::Out>,
}

impl<I, S: Stage> Staged<I, S> {
    pub fn new(upstream: I, stage: S) -> Self {
        Self {
            upstream: Some(upstream),
            stage,
            pending: VecDeque::new(),
            scratch: Vec::new(),
        }
    }
}

impl<I, S> Iterator for Staged<I, S>
where
    I: Iterator<Item = Result<S::In, StreamError>>,
    S: Stage,
{
    type Item = Result<S::Out, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(out) = self.pending.pop_front() {
                return Some(Ok(out));
            }
            let upstream = self.upstream.as_mut()?;
            match upstream.next() {
                Some(Ok(item)) => {
                    self.stage.process(item, &mut self.scratch);
                    self.pending.extend(self.scratch.drain(..));
                }
                Some(Err(e)) => {
                    self.upstream = None;
                    debug!("{}: upstream failed, dropping held state: {e}", self.stage.name());
                    return Some(Err(e));
                }
                None => {
                    self.upstream = None;
                    self.stage.finish(&mut self.scratch);
                    debug!(
                        "{}: clean end, {} held item(s) released",
                        self.stage.name(),
                        self.scratch.len()
                    );
                    self.pending.extend(self.scratch.drain(..));
                }
            }
        }
    }
}

/// Builds a fresh rune stage.
pub type StageFactory = fn() -> BoxedStage;

/// A reusable recipe for a rune-to-rune transformation.
///
/// Stages are one-shot, so a transformer stores factories and builds new
/// stage state every time it is applied.
#[derive(Debug, Clone)]
pub enum Transformer {
    /// A single stage.
    Stage(StageFactory),
    /// Sequential application of the parts, first to last.
    Chain(Vec<Transformer>),
}

impl Transformer {
    pub fn stage(build: StageFactory) -> Self {
        Transformer::Stage(build)
    }

    /// Compose transformers into one that applies them in order.
    pub fn chain(parts: impl IntoIterator<Item = Transformer>) -> Self {
        Transformer::Chain(parts.into_iter().collect())
    }

    /// The transformer that passes its input through unchanged.
    pub fn identity() -> Self {
        Transformer::Chain(Vec::new())
    }

    /// Apply this transformer to a rune stream.
    pub fn apply<'a>(&self, input: RuneStream<'a>) -> RuneStream<'a> {
        match self {
            Transformer::Stage(build) => Box::new(Staged::new(input, build())),
            Transformer::Chain(parts) => parts.iter().fold(input, |stream, part| part.apply(stream)),
        }
    }

    /// Number of primitive stages, without building any of them.
    pub fn stage_count(&self) -> usize {
        match self {
            Transformer::Stage(_) => 1,
            Transformer::Chain(parts) => parts.iter().map(Transformer::stage_count).sum(),
        }
    }

    /// Fresh instances of every primitive stage, in application order.
    pub fn stages(&self) -> Vec<BoxedStage> {
        let mut stages = Vec::new();
        self.collect_stages(&mut stages);
        stages
    }

    fn collect_stages(&self, stages: &mut Vec<BoxedStage>) {
        match self {
            Transformer::Stage(build) => stages.push(build()),
            Transformer::Chain(parts) => {
                for part in parts {
                    part.collect_stages(stages);
                }
            }
        }
    }
}
