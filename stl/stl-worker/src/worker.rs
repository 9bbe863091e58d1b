//! Background decode worker.
//!
//! A decode is a single logical unit of work moved off the caller's
//! thread: one `std::thread` per submission, feeding an `mpsc` channel.
//! Decoding itself stays strictly sequential; the channel is the only
//! concurrency primitive involved.

use std::io;
use std::path::Path;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use stl_decode::{DecodeError, Decoded};
use tracing::debug;

use crate::event::DecodeEvent;

/// A decode submission: raw file bytes plus an opaque caller label.
///
/// The label is bookkeeping for the caller (typically a file name); the
/// decoder never interprets it.
#[derive(Debug, Clone)]
pub struct DecodeJob {
    /// Raw STL bytes, moved into the worker on spawn.
    pub bytes: Vec<u8>,
    /// Opaque label passed through unmodified.
    pub label: String,
}

impl DecodeJob {
    /// Create a job from in-memory bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>, label: impl Into<String>) -> Self {
        Self {
            bytes,
            label: label.into(),
        }
    }

    /// Read a file into a job, labeled with its file name.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be read.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let label = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        Ok(Self { bytes, label })
    }
}

/// Spawn a background decode and return the event stream handle.
///
/// The job's bytes are moved into the worker thread; the caller keeps only
/// the handle. Dropping the handle cancels the decode: the worker notices
/// the closed channel at its next progress report and stops without
/// delivering anything further.
#[must_use]
pub fn spawn(job: DecodeJob) -> DecodeHandle {
    let (tx, rx) = std::sync::mpsc::channel();
    let DecodeJob { bytes, label } = job;

    let worker_label = label.clone();
    thread::spawn(move || run(bytes, &worker_label, tx));

    DecodeHandle {
        rx,
        label,
        done: false,
    }
}

/// Worker body: decode and translate the outcome into terminal events.
fn run(bytes: Vec<u8>, label: &str, tx: Sender<DecodeEvent>) {
    debug!(label, len = bytes.len(), "decode worker started");
    let mut events = EventTx { tx };

    let result = {
        let mut on_progress = |percent: u8| events.progress(percent);
        stl_decode::decode_with_progress(bytes, &mut on_progress)
    };

    match result {
        Ok(Decoded {
            buffers,
            triangle_count,
            format,
        }) => {
            debug!(label, triangles = triangle_count, %format, "decode finished");
            events.finish(DecodeEvent::Success {
                vertices: buffers.vertices,
                normals: buffers.normals,
                triangle_count,
                format,
            });
        }
        // Cancellation means the receiver is gone; there is nobody left
        // to deliver a terminal event to.
        Err(DecodeError::Cancelled) => debug!(label, "decode cancelled"),
        Err(err) => {
            debug!(label, error = %err, "decode failed");
            events.finish(DecodeEvent::Error {
                message: err.to_string(),
            });
        }
    }
}

/// Sending half of the event protocol.
///
/// Exactly-one-terminal is enforced by construction: `finish` consumes the
/// sender, so no event can follow it.
struct EventTx {
    tx: Sender<DecodeEvent>,
}

impl EventTx {
    /// Send a progress event. Returns `false` when the receiver is gone,
    /// which the decoder treats as a cancellation request.
    fn progress(&mut self, percent: u8) -> bool {
        self.tx.send(DecodeEvent::Progress { percent }).is_ok()
    }

    /// Send the single terminal event. A send failure means the handle
    /// was dropped between the last progress report and completion; the
    /// event is swallowed whole, never split.
    fn finish(self, event: DecodeEvent) {
        let _ = self.tx.send(event);
    }
}

/// Handle to an in-flight decode: the receiving half of the event stream.
///
/// Iterate it (or call [`recv`](Self::recv)) to observe progress events
/// followed by the terminal event, after which the stream fuses. Drop it
/// to cancel the decode.
#[derive(Debug)]
pub struct DecodeHandle {
    rx: Receiver<DecodeEvent>,
    label: String,
    done: bool,
}

impl DecodeHandle {
    /// The submission's label, passed through unmodified.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Block until the next event.
    ///
    /// Returns `None` once the terminal event has been delivered, or if
    /// the worker went away without one (it panicked).
    pub fn recv(&mut self) -> Option<DecodeEvent> {
        if self.done {
            return None;
        }
        match self.rx.recv() {
            Ok(event) => {
                self.done = event.is_terminal();
                Some(event)
            }
            Err(_) => {
                self.done = true;
                None
            }
        }
    }

    /// Drain the stream, discarding progress, and return the terminal
    /// event.
    ///
    /// Returns `None` only if the worker died without delivering one.
    #[must_use]
    pub fn wait(mut self) -> Option<DecodeEvent> {
        let mut last = None;
        while let Some(event) = self.recv() {
            last = Some(event);
        }
        last.filter(DecodeEvent::is_terminal)
    }
}

impl Iterator for DecodeHandle {
    type Item = DecodeEvent;

    fn next(&mut self) -> Option<DecodeEvent> {
        self.recv()
    }
}
