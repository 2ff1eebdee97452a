mod broadcast;

pub use self::broadcast::{BroadcastChangeFeed, CHANGE_FEED_CAPACITY};
