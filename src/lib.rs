// src/lib.rs
pub mod aggregator;
pub mod config;
pub mod display;
pub mod metrics;
pub mod probe;
pub mod scheduler;
