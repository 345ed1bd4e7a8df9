pub mod poll;
pub mod time;

#[cfg(feature = "gate_exec")]
pub mod logging;
