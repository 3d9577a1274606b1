// src/scrape/mod.rs
mod collect;

pub use collect::collect_prices;
pub use collect::{EntityFailure, ScrapeReport};
