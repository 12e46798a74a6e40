/// In-memory transport for testing
/// Frames a client sends are queued for the test to inspect, or to relay to
/// another client as the server would

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tether_client::Transport;

/// Client-side end: every frame sent is copied into the shared queue
pub struct LocalTransport {
    queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
}

/// Server-side end of a `LocalTransport`
#[derive(Clone)]
pub struct ServerInbox {
    queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
}

impl LocalTransport {
    pub fn new() -> (Self, ServerInbox) {
        let queue = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                queue: queue.clone(),
            },
            ServerInbox { queue },
        )
    }
}

impl Transport for LocalTransport {
    fn send(&mut self, frame: &[u8]) {
        self.queue.lock().unwrap().push_back(frame.to_vec());
    }
}

impl ServerInbox {
    /// Takes every frame received so far, oldest first
    pub fn drain(&self) -> Vec<Vec<u8>> {
        self.queue.lock().unwrap().drain(..).collect()
    }

    pub fn pop(&self) -> Option<Vec<u8>> {
        self.queue.lock().unwrap().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}
