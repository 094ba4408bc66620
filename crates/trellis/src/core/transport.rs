use std::collections::VecDeque;

use crate::error::Result;

/// The message channel to the server.
///
/// Inbound frames are not pulled through this trait: the embedder pushes them
/// into [`Tree::receive`](crate::Tree::receive).
pub trait Transport {
    /// Wait for the channel to become ready.
    fn open(&mut self) -> Result<()>;

    /// Send one encoded frame.
    fn send(&mut self, frame: &[u8]) -> Result<()>;
}

/// A transport that accepts and discards every frame.
#[derive(Debug, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn send(&mut self, _frame: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// A transport plus the queue of frames produced before it opened.
pub struct Link {
    /// Underlying channel.
    transport: Box<dyn Transport>,
    /// Is the channel ready?
    open: bool,
    /// Frames waiting for the channel, oldest first.
    outbox: VecDeque<Vec<u8>>,
    /// Maximum queued frames.
    limit: usize,
}

impl Link {
    /// Wrap a transport. The link starts closed.
    pub fn new(transport: Box<dyn Transport>, limit: usize) -> Self {
        Self {
            transport,
            open: false,
            outbox: VecDeque::new(),
            limit,
        }
    }

    /// Open the channel and flush everything queued so far.
    pub fn open(&mut self) -> Result<()> {
        self.transport.open()?;
        self.open = true;
        self.flush()
    }

    /// Mark the channel closed. Later frames are queued.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Is the channel ready?
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Number of queued frames.
    pub fn pending(&self) -> usize {
        self.outbox.len()
    }

    /// Send a frame, or queue it if the channel is not open yet.
    pub fn send(&mut self, frame: Vec<u8>) -> Result<()> {
        if !self.open {
            if self.outbox.len() >= self.limit {
                self.outbox.pop_front();
                tracing::warn!(limit = self.limit, "outbox full, dropping oldest frame");
            }
            self.outbox.push_back(frame);
            return Ok(());
        }
        self.flush()?;
        self.transport.send(&frame)
    }

    /// Send queued frames in order. A frame that fails to send stays at the
    /// front of the queue.
    pub fn flush(&mut self) -> Result<()> {
        if !self.outbox.is_empty() {
            tracing::debug!(frames = self.outbox.len(), "flushing outbox");
        }
        while let Some(frame) = self.outbox.pop_front() {
            if let Err(e) = self.transport.send(&frame) {
                self.outbox.push_front(frame);
                return Err(e);
            }
        }
        Ok(())
    }
}
