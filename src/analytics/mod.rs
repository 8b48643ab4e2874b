pub mod engine;

pub use engine::{AnalyticsEngine, PriceReport, RetailerReport};
