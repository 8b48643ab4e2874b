pub mod analytics;
pub mod collect;
pub mod config;
pub mod error;
pub mod history;
pub mod interfaces;
pub mod observability;
pub mod scheduler;
pub mod sources;
pub mod types;
