//! Live Gate.io execution: request signing, wire payloads and the REST gateway

pub mod gate_client;
pub mod signing;
pub mod wire;

pub use gate_client::GateClient;
pub use signing::GateCredentials;
