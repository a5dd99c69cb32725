// src/aggregator/mod.rs
mod round;
mod snapshot;

pub use round::Aggregator;
pub use snapshot::Snapshot;
