use tokio::sync::broadcast;

/// Payload-free "favorites changed, re-read the store" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangePulse;

/// Process-wide broadcast channel shared by every mounted view.
///
/// Delivery is best effort: no acknowledgement, and a receiver that falls
/// more than `capacity` pulses behind sees a lag instead of the pulses.
#[derive(Clone)]
pub struct ChangeChannel {
    sender: broadcast::Sender<ChangePulse>,
}

impl ChangeChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangePulse> {
        self.sender.subscribe()
    }

    /// Emit one pulse. Returns how many receivers it reached.
    pub fn notify(&self) -> usize {
        self.sender.send(ChangePulse).unwrap_or(0)
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeChannel {
    fn default() -> Self {
        Self::new(16)
    }
}
