use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Spot trading pair, e.g. base `X` quoted in `USDT`.
///
/// Parses both the display form `X/USDT` and Gate's wire form `X_USDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TradingPair {
    pub base: String,
    pub quote: String,
}

impl TradingPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    /// Gate.io currency pair id: `X_USDT`
    pub fn gate_id(&self) -> String {
        format!("{}_{}", self.base, self.quote)
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid trading pair '{0}', expected BASE/QUOTE or BASE_QUOTE")]
pub struct ParsePairError(pub String);

impl FromStr for TradingPair {
    type Err = ParsePairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (base, quote) = trimmed
            .split_once('/')
            .or_else(|| trimmed.split_once('_'))
            .ok_or_else(|| ParsePairError(s.to_string()))?;

        let valid = |part: &str| !part.is_empty() && part.chars().all(char::is_alphanumeric);
        if !valid(base) || !valid(quote) {
            return Err(ParsePairError(s.to_string()));
        }

        Ok(TradingPair::new(base, quote))
    }
}

/// Market metadata as reported by the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInfo {
    pub pair: TradingPair,
    /// Buying is currently allowed
    pub tradable: bool,
    /// Decimal places accepted for prices (and quote-sized market buys)
    pub price_precision: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub last: f64,
}

/// Free (available) amount per currency; snapshot, nothing is reserved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balances {
    free: HashMap<String, f64>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_free(mut self, currency: &str, amount: f64) -> Self {
        self.set_free(currency, amount);
        self
    }

    pub fn set_free(&mut self, currency: &str, amount: f64) {
        self.free.insert(currency.to_uppercase(), amount);
    }

    /// Missing currencies read as zero
    pub fn free(&self, currency: &str) -> f64 {
        self.free
            .get(&currency.to_uppercase())
            .copied()
            .unwrap_or(0.0)
    }
}

/// Result of a filled market buy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFill {
    pub order_id: String,
    /// Base amount bought
    pub amount: f64,
    pub average_price: Option<f64>,
}
