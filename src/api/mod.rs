// api/mod.rs
pub mod errors;
pub mod gateway;

pub use errors::GatewayError;
pub use gateway::ExchangeGateway;
