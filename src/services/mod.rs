//! External collaborators consumed by the cycles.

pub mod market_data;

pub use market_data::{HttpMarketFeed, MarketFeed, StaticMarketFeed};
