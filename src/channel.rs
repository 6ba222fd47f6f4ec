//! Thread-per-stage execution over synchronous channel pairs.
//!
//! `spawn` moves a stream onto its own thread. Data crosses a zero-capacity
//! channel, so every send waits for the matching receive and the chain is
//! back-pressured end to end. After the data channel closes, one status is
//! sent on a second channel.
//!
//! Cancellation: dropping a `ChannelStream` closes its receivers. The
//! producer's next send fails, the producer thread stops pulling and drops
//! its upstream, and the shutdown cascades up the chain.

use std::io;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

use log::debug;

use crate::error::StreamError;
use crate::stage::{Staged, Transformer};
use crate::stream::RuneStream;

type Status = Result<(), StreamError>;

/// The consumer end of a stream running on another thread.
pub struct ChannelStream<T> {
    data: Option<Receiver<T>>,
    status: Option<Receiver<Status>>,
}

impl<T> Iterator for ChannelStream<T> {
    type Item = Result<T, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(data) = &self.data {
            match data.recv() {
                Ok(value) => return Some(Ok(value)),
                Err(_) => self.data = None,
            }
        }
        let status = self.status.take()?;
        match status.recv() {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(Err(e)),
            Err(_) => Some(Err(StreamError::Io(io::Error::other(
                "stage thread exited without a status",
            )))),
        }
    }
}

/// Run `stream` on a new thread named after `name`.
pub fn spawn<T, I>(name: &str, stream: I) -> io::Result<ChannelStream<T>>
where
    T: Send + 'static,
    I: Iterator<Item = Result<T, StreamError>> + Send + 'static,
{
    let (data_tx, data_rx) = mpsc::sync_channel(0);
    let (status_tx, status_rx) = mpsc::sync_channel(1);
    let label = name.to_string();

    thread::Builder::new()
        .name(format!("textnorm-{name}"))
        .spawn(move || pump(&label, stream, data_tx, status_tx))?;

    Ok(ChannelStream {
        data: Some(data_rx),
        status: Some(status_rx),
    })
}

fn pump<T, I>(name: &str, stream: I, data: SyncSender<T>, status: SyncSender<Status>)
where
    I: Iterator<Item = Result<T, StreamError>>,
{
    for item in stream {
        match item {
            Ok(value) => {
                if data.send(value).is_err() {
                    debug!("{name}: consumer hung up, stopping");
                    return;
                }
            }
            Err(e) => {
                drop(data);
                let _ = status.send(Err(e));
                return;
            }
        }
    }
    drop(data);
    let _ = status.send(Ok(()));
}

/// Apply `transformer` with each primitive stage on its own thread.
pub fn spawn_transformer(
    transformer: &Transformer,
    input: RuneStream<'static>,
) -> io::Result<RuneStream<'static>> {
    let mut stream = input;
    for stage in transformer.stages() {
        let name = stage.name().to_string();
        stream = Box::new(spawn(&name, Staged::new(stream, stage))?);
    }
    Ok(stream)
}
