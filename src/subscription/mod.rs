// Live-update fan-out to WebSocket subscribers

pub mod manager;
pub mod protocol;
pub mod registry;

pub use manager::ConnectionManager;
pub use protocol::FeedMessage;
pub use registry::{PublishReport, SubscriberId, SubscriberRegistry, Subscription};
