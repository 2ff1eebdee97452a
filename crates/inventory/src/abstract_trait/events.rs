use crate::domain::event::ChangeEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

pub type DynChangeFeed = Arc<dyn ChangeFeedTrait + Send + Sync>;

pub trait ChangeFeedTrait {
    /// Fan out to current subscribers. Having none is not an error.
    fn publish(&self, event: ChangeEvent);
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
