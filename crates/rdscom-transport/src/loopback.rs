use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::traits::Channel;

type FrameQueue = Arc<Mutex<VecDeque<Vec<u8>>>>;

/// In-memory channel that queues whole frames.
///
/// [`LoopbackChannel::new`] builds a self-loopback endpoint: everything sent
/// comes back on the next receive, one frame per call. [`LoopbackChannel::pair`]
/// builds two cross-linked endpoints so two peers can talk to each other.
/// Cloning an endpoint shares its queues, which is how tests inject inbound
/// frames and inspect outbound ones.
#[derive(Debug, Clone)]
pub struct LoopbackChannel {
    tx: FrameQueue,
    rx: FrameQueue,
}

impl LoopbackChannel {
    /// A single endpoint whose sends loop back to its own receives.
    pub fn new() -> Self {
        let queue: FrameQueue = Arc::default();
        Self {
            tx: Arc::clone(&queue),
            rx: queue,
        }
    }

    /// Two endpoints wired to each other: frames sent on one arrive at the
    /// other.
    pub fn pair() -> (Self, Self) {
        let a_to_b: FrameQueue = Arc::default();
        let b_to_a: FrameQueue = Arc::default();
        (
            Self {
                tx: Arc::clone(&a_to_b),
                rx: Arc::clone(&b_to_a),
            },
            Self {
                tx: b_to_a,
                rx: a_to_b,
            },
        )
    }

    /// Number of frames waiting to be received on this endpoint.
    pub fn pending(&self) -> usize {
        self.rx.lock().expect("loopback queue lock").len()
    }
}

impl Default for LoopbackChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Channel for LoopbackChannel {
    fn receive(&mut self) -> Result<Vec<u8>> {
        let frame = self.rx.lock().expect("loopback queue lock").pop_front();
        Ok(frame.unwrap_or_default())
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.tx
            .lock()
            .expect("loopback queue lock")
            .push_back(frame.to_vec());
        Ok(())
    }
}
