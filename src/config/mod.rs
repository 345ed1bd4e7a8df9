pub mod runner;

pub use runner::{config_path, load_gate_credentials, load_runner_config, RunnerConfig};
