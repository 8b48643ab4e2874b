pub mod poller;

pub use poller::PollScheduler;
