pub mod publisher;

pub use publisher::{ChannelPublisher, CyclePublisher, CycleUpdate, LogPublisher};
