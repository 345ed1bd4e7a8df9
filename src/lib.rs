pub mod api;
pub mod exchanges;
pub mod models;
pub mod strategy;
pub mod utils;

#[cfg(feature = "gate_exec")]
pub mod execution;

#[cfg(feature = "gate_exec")]
pub mod config;
