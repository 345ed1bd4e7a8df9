//! Exchange endpoint catalogs

pub mod endpoints;

pub use endpoints::GateioSpot;
