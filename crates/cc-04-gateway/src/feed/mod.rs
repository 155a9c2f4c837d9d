//! Live feed: commit worker and subscriber fan-out.

pub mod publisher;
pub mod worker;

pub use publisher::{FeedPublisher, FeedSubscription, SubscriberQueue};
pub use worker::{commit_channel, ChannelCommitListener, CommitWorker};
