use crate::{abstract_trait::events::ChangeFeedTrait, domain::event::ChangeEvent};
use tokio::sync::broadcast;
use tracing::debug;

pub const CHANGE_FEED_CAPACITY: usize = 256;

/// In-process change feed. Subscribers that fall more than the channel
/// capacity behind lose the oldest events instead of blocking writers.
#[derive(Clone)]
pub struct BroadcastChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl BroadcastChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastChangeFeed {
    fn default() -> Self {
        Self::new(CHANGE_FEED_CAPACITY)
    }
}

impl ChangeFeedTrait for BroadcastChangeFeed {
    fn publish(&self, event: ChangeEvent) {
        let channel = event.channel();
        match self.sender.send(event) {
            Ok(receivers) => debug!("📣 Published {channel} event to {receivers} subscriber(s)"),
            Err(_) => debug!("No subscribers for {channel} event"),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}
