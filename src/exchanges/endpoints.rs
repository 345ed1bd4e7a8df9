//! Gate.io spot REST endpoints (API v4)

pub struct GateioSpot;

impl GateioSpot {
    pub const BASE: &'static str = "https://api.gateio.ws";
    /// Prefix included in signed paths
    pub const PREFIX: &'static str = "/api/v4";

    pub const CURRENCY_PAIRS: &'static str = "/spot/currency_pairs";
    pub const TICKERS: &'static str = "/spot/tickers";
    pub const ACCOUNTS: &'static str = "/spot/accounts";
    pub const ORDERS: &'static str = "/spot/orders";

    pub fn currency_pair(id: &str) -> String {
        format!("{}/{}", Self::CURRENCY_PAIRS, id)
    }
}
