//! Logging setup on top of env_logger
//!
//! Levels come from `RUST_LOG` and default to `info`:
//! ```bash
//! RUST_LOG=debug gate_market_buy X/USDT 10
//! RUST_LOG=gate_market_buy::execution=debug gate_market_buy X/USDT 10
//! ```

use std::env;

/// Initialize env_logger once; later calls are ignored
pub fn init_logging() {
    let initialized = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init();

    if initialized.is_ok() {
        log::debug!("📝 Log level: {}", get_log_level());
    }
}

/// Current level filter as configured through RUST_LOG
pub fn get_log_level() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}
