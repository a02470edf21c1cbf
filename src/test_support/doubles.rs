//! In-memory connection and file doubles that count close operations.

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

#[derive(Debug, Default)]
struct Counters {
    flushes: AtomicUsize,
    shutdowns: AtomicUsize,
    drops: AtomicUsize,
}

/// Observer handle kept by the test after the double is moved away.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    written: Arc<Mutex<Vec<u8>>>,
    counters: Arc<Counters>,
}

impl Probe {
    /// Bytes written to the double so far.
    pub fn contents(&self) -> Vec<u8> {
        self.written.lock().unwrap().clone()
    }

    pub fn flushes(&self) -> usize {
        self.counters.flushes.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.counters.shutdowns.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.counters.drops.load(Ordering::SeqCst)
    }
}

fn record_write(probe: &Probe, limit: Option<usize>, buf: &[u8]) -> io::Result<usize> {
    let mut written = probe.written.lock().unwrap();
    let accepted = match limit {
        Some(limit) if written.len() >= limit => {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"));
        }
        Some(limit) => buf.len().min(limit - written.len()),
        None => buf.len(),
    };
    written.extend_from_slice(&buf[..accepted]);
    Ok(accepted)
}

/// Destination file double.
#[derive(Debug)]
pub struct RecordingFile {
    probe: Probe,
    fail_after: Option<usize>,
}

impl RecordingFile {
    pub fn new() -> (Self, Probe) {
        let probe = Probe::default();
        (
            Self {
                probe: probe.clone(),
                fail_after: None,
            },
            probe,
        )
    }

    /// A file that accepts `limit` bytes and then fails every write.
    pub fn failing_after(limit: usize) -> (Self, Probe) {
        let (mut file, probe) = Self::new();
        file.fail_after = Some(limit);
        (file, probe)
    }
}

impl AsyncWrite for RecordingFile {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(record_write(&self.probe, self.fail_after, buf))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.probe.counters.flushes.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.probe.counters.shutdowns.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }
}

impl Drop for RecordingFile {
    fn drop(&mut self) {
        self.probe.counters.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
enum ReadStep {
    Data(Vec<u8>),
    Fail(io::ErrorKind),
}

/// Connection double replaying scripted reads and recording writes.
///
/// Once the script is exhausted every read reports end of stream.
#[derive(Debug)]
pub struct ScriptedConnection {
    reads: VecDeque<ReadStep>,
    probe: Probe,
}

impl ScriptedConnection {
    pub fn new() -> (Self, Probe) {
        let probe = Probe::default();
        (
            Self {
                reads: VecDeque::new(),
                probe: probe.clone(),
            },
            probe,
        )
    }

    /// Queues one read returning `data`.
    #[must_use]
    pub fn read(mut self, data: &[u8]) -> Self {
        self.reads.push_back(ReadStep::Data(data.to_vec()));
        self
    }

    /// Queues one read failing with `kind`.
    #[must_use]
    pub fn read_error(mut self, kind: io::ErrorKind) -> Self {
        self.reads.push_back(ReadStep::Fail(kind));
        self
    }
}

impl AsyncRead for ScriptedConnection {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.reads.pop_front() {
            None => Poll::Ready(Ok(())),
            Some(ReadStep::Fail(kind)) => Poll::Ready(Err(io::Error::new(kind, "scripted failure"))),
            Some(ReadStep::Data(mut data)) => {
                let take = data.len().min(buf.remaining());
                buf.put_slice(&data[..take]);
                if take < data.len() {
                    let rest = data.split_off(take);
                    self.reads.push_front(ReadStep::Data(rest));
                }
                Poll::Ready(Ok(()))
            }
        }
    }
}

impl AsyncWrite for ScriptedConnection {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(record_write(&self.probe, None, buf))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.probe.counters.flushes.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.probe.counters.shutdowns.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }
}

impl Drop for ScriptedConnection {
    fn drop(&mut self) {
        self.probe.counters.drops.fetch_add(1, Ordering::SeqCst);
    }
}
