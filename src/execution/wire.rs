// =================================================================
// execution/wire.rs - Gate.io spot JSON payloads
// =================================================================

use serde::{Deserialize, Serialize};

use crate::api::GatewayError;
use crate::models::{MarketInfo, OrderFill, TradingPair};

/// Entry of `GET /spot/currency_pairs`
#[derive(Debug, Clone, Deserialize)]
pub struct GateCurrencyPair {
    pub id: String,
    pub base: String,
    pub quote: String,
    /// "untradable", "buyable", "sellable" or "tradable"
    #[serde(default)]
    pub trade_status: String,
    /// Price precision
    #[serde(default)]
    pub precision: Option<u32>,
}

impl GateCurrencyPair {
    pub fn is_buyable(&self) -> bool {
        matches!(self.trade_status.as_str(), "tradable" | "buyable")
    }

    pub fn pair(&self) -> TradingPair {
        TradingPair::new(&self.base, &self.quote)
    }

    pub fn to_market_info(&self) -> MarketInfo {
        MarketInfo {
            pair: self.pair(),
            tradable: self.is_buyable(),
            price_precision: self.precision,
        }
    }
}

/// Entry of `GET /spot/tickers`
#[derive(Debug, Clone, Deserialize)]
pub struct GateTicker {
    pub currency_pair: String,
    #[serde(default)]
    pub last: String,
}

/// Entry of `GET /spot/accounts`
#[derive(Debug, Clone, Deserialize)]
pub struct GateSpotAccount {
    pub currency: String,
    pub available: String,
}

/// Body of `POST /spot/orders` for a market buy. `amount` is quote currency.
#[derive(Debug, Clone, Serialize)]
pub struct GateMarketBuyRequest {
    pub text: String,
    pub currency_pair: String,
    #[serde(rename = "type")]
    pub order_type: &'static str,
    pub account: &'static str,
    pub side: &'static str,
    pub amount: String,
    pub time_in_force: &'static str,
}

impl GateMarketBuyRequest {
    pub fn new(currency_pair: String, quote_amount: String, text: String) -> Self {
        Self {
            text,
            currency_pair,
            order_type: "market",
            account: "spot",
            side: "buy",
            amount: quote_amount,
            time_in_force: "ioc",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateOrderResponse {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub finish_as: Option<String>,
    /// Base amount filled
    #[serde(default)]
    pub filled_amount: Option<String>,
    /// Quote amount filled
    #[serde(default)]
    pub filled_total: Option<String>,
    #[serde(default)]
    pub avg_deal_price: Option<String>,
}

impl GateOrderResponse {
    pub fn to_fill(&self) -> Result<OrderFill, GatewayError> {
        let average_price = parse_optional(self.avg_deal_price.as_deref())?.filter(|p| *p > 0.0);
        let filled_total = parse_optional(self.filled_total.as_deref())?;

        let amount = match parse_optional(self.filled_amount.as_deref())? {
            Some(amount) => amount,
            None => match (filled_total, average_price) {
                (Some(total), Some(price)) => total / price,
                _ => 0.0,
            },
        };

        if amount <= 0.0 {
            return Err(GatewayError::InvalidResponse(format!(
                "order {} finished as {} without fills",
                self.id,
                self.finish_as.as_deref().unwrap_or(&self.status)
            )));
        }

        Ok(OrderFill {
            order_id: self.id.clone(),
            amount,
            average_price,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateErrorBody {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error for a non-2xx response. Gate's `label` is kept when the body is a
/// JSON error object; anything else becomes the message verbatim.
pub fn api_error(status: u16, body: &str) -> GatewayError {
    let (label, message) = match serde_json::from_str::<GateErrorBody>(body) {
        Ok(parsed) => (parsed.label, parsed.message.unwrap_or_else(|| body.to_string())),
        Err(_) => (None, body.to_string()),
    };
    GatewayError::Api {
        status,
        label,
        message,
    }
}

pub fn parse_number(field: &str, value: &str) -> Result<f64, GatewayError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| GatewayError::Parse(format!("Invalid {} '{}': {}", field, value, e)))
}

fn parse_optional(value: Option<&str>) -> Result<Option<f64>, GatewayError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_number("amount", v).map(Some),
    }
}

/// Format an amount with at most `precision` decimals, trailing zeros removed
pub fn format_amount(value: f64, precision: u32) -> String {
    let formatted = format!("{:.*}", precision as usize, value);
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}
