// =================================================================
// api/gateway.rs - Exchange Gateway Interface
// =================================================================

use async_trait::async_trait;
use std::collections::BTreeSet;

use super::errors::GatewayError;
use crate::models::{Balances, MarketInfo, OrderFill, Ticker, TradingPair};

/// The operations the market-buy flow needs from an exchange.
///
/// The live implementation is `execution::GateClient`; tests substitute an
/// in-memory double.
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// Load every listed pair. Called once at startup.
    async fn load_markets(&self) -> Result<BTreeSet<TradingPair>, GatewayError>;

    async fn get_market(&self, pair: &TradingPair) -> Result<MarketInfo, GatewayError>;

    async fn fetch_ticker(&self, pair: &TradingPair) -> Result<Ticker, GatewayError>;

    async fn fetch_balance(&self) -> Result<Balances, GatewayError>;

    /// Submit a market buy for `amount` units of the base asset.
    ///
    /// `price` is the price `amount` was sized at. Exchanges that size market
    /// buys in quote currency spend `amount * price`, never a re-quoted value.
    async fn create_market_buy_order(
        &self,
        pair: &TradingPair,
        amount: f64,
        price: f64,
    ) -> Result<OrderFill, GatewayError>;
}
