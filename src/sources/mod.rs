pub mod adapter;
pub mod fetcher;

pub use adapter::SourceAdapter;
pub use fetcher::{HttpFetcher, PriceFetcher};
