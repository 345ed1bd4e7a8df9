// =================================================================
// execution/gate_client.rs - Gate.io Spot REST Gateway
// =================================================================

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;
use std::time::Duration;

use super::signing::{sign, GateCredentials};
use super::wire::{
    api_error, format_amount, parse_number, GateCurrencyPair, GateMarketBuyRequest,
    GateOrderResponse, GateSpotAccount, GateTicker,
};
use crate::api::{ExchangeGateway, GatewayError};
use crate::exchanges::GateioSpot;
use crate::models::{Balances, MarketInfo, OrderFill, Ticker, TradingPair};
use crate::utils::time::current_unix_seconds_string;

/// Decimals used for the quote cost when the pair's precision is unknown
const DEFAULT_COST_PRECISION: u32 = 8;

/// Gate's error label for a pair it does not list
const INVALID_CURRENCY_PAIR: &str = "INVALID_CURRENCY_PAIR";

/// Gate.io spot gateway over the v4 REST API
pub struct GateClient {
    client: reqwest::Client,
    base_url: String,
    creds: GateCredentials,
    timeout: Option<Duration>,
    /// Pair metadata from the last `load_markets`/`get_market`, keyed by Gate id
    markets: RwLock<HashMap<String, GateCurrencyPair>>,
}

impl GateClient {
    pub fn new(creds: GateCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: GateioSpot::BASE.to_string(),
            creds,
            timeout: None,
            markets: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Per-request timeout; without one a hung call blocks forever
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{}{}", self.base_url, GateioSpot::PREFIX, path)
        } else {
            format!("{}{}{}?{}", self.base_url, GateioSpot::PREFIX, path, query)
        }
    }

    fn request(&self, method: Method, path: &str, query: &str) -> RequestBuilder {
        let url = self.url(path, query);
        debug!("{} {}", method, url);

        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");

        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    async fn get_public<T: DeserializeOwned>(&self, path: &str, query: &str) -> Result<T, GatewayError> {
        let response = self.request(Method::GET, path, query).send().await?;
        Self::read_json(response).await
    }

    async fn send_signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &str,
        body: String,
    ) -> Result<T, GatewayError> {
        let timestamp = current_unix_seconds_string();
        let signed_path = format!("{}{}", GateioSpot::PREFIX, path);
        let signature = sign(
            &self.creds.api_secret,
            method.as_str(),
            &signed_path,
            query,
            &body,
            &timestamp,
        )?;

        let response = self
            .request(method, path, query)
            .header("KEY", &self.creds.api_key)
            .header("Timestamp", timestamp)
            .header("SIGN", signature)
            .body(body)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    fn remember(&self, pairs: impl IntoIterator<Item = GateCurrencyPair>) {
        match self.markets.write() {
            Ok(mut markets) => {
                for pair in pairs {
                    markets.insert(pair.id.clone(), pair);
                }
            }
            Err(_) => warn!("Market cache lock poisoned, skipping update"),
        }
    }

    fn cached_price_precision(&self, pair: &TradingPair) -> Option<u32> {
        self.markets
            .read()
            .ok()?
            .get(&pair.gate_id())
            .and_then(|m| m.precision)
    }

    async fn fetch_currency_pair(&self, pair: &TradingPair) -> Result<GateCurrencyPair, GatewayError> {
        let path = GateioSpot::currency_pair(&pair.gate_id());
        match self.get_public::<GateCurrencyPair>(&path, "").await {
            Ok(raw) => Ok(raw),
            Err(GatewayError::Api { label: Some(label), .. }) if label == INVALID_CURRENCY_PAIR => {
                Err(GatewayError::UnknownPair(pair.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ExchangeGateway for GateClient {
    async fn load_markets(&self) -> Result<BTreeSet<TradingPair>, GatewayError> {
        let pairs: Vec<GateCurrencyPair> = self.get_public(GateioSpot::CURRENCY_PAIRS, "").await?;
        let symbols: BTreeSet<TradingPair> = pairs.iter().map(GateCurrencyPair::pair).collect();

        info!("Loaded {} spot markets from Gate.io", symbols.len());
        self.remember(pairs);
        Ok(symbols)
    }

    async fn get_market(&self, pair: &TradingPair) -> Result<MarketInfo, GatewayError> {
        let raw = self.fetch_currency_pair(pair).await?;
        let info = raw.to_market_info();
        debug!("{} trade_status={}", pair, raw.trade_status);
        self.remember([raw]);
        Ok(info)
    }

    async fn fetch_ticker(&self, pair: &TradingPair) -> Result<Ticker, GatewayError> {
        let id = pair.gate_id();
        let tickers: Vec<GateTicker> = self
            .get_public(GateioSpot::TICKERS, &format!("currency_pair={}", id))
            .await?;

        let ticker = tickers
            .into_iter()
            .find(|t| t.currency_pair == id)
            .ok_or_else(|| GatewayError::InvalidResponse(format!("no ticker for {}", id)))?;

        Ok(Ticker {
            last: parse_number("last price", &ticker.last)?,
        })
    }

    async fn fetch_balance(&self) -> Result<Balances, GatewayError> {
        let accounts: Vec<GateSpotAccount> = self
            .send_signed(Method::GET, GateioSpot::ACCOUNTS, "", String::new())
            .await?;

        let mut balances = Balances::new();
        for account in accounts {
            balances.set_free(&account.currency, parse_number("available", &account.available)?);
        }
        Ok(balances)
    }

    /// Gate sizes market buys in quote currency, so the base amount is
    /// converted at the price it was sized at.
    async fn create_market_buy_order(
        &self,
        pair: &TradingPair,
        amount: f64,
        price: f64,
    ) -> Result<OrderFill, GatewayError> {
        let precision = match self.cached_price_precision(pair) {
            Some(precision) => precision,
            None => self
                .get_market(pair)
                .await
                .ok()
                .and_then(|m| m.price_precision)
                .unwrap_or(DEFAULT_COST_PRECISION),
        };
        let cost = format_amount(amount * price, precision);

        let request = GateMarketBuyRequest::new(
            pair.gate_id(),
            cost.clone(),
            format!("t-gmb{}", current_unix_seconds_string()),
        );
        let body = serde_json::to_string(&request)?;

        info!(
            "Gate market buy {}: {} {} (≈{} {} at {})",
            pair.gate_id(),
            cost,
            pair.quote,
            amount,
            pair.base,
            price
        );

        let response: GateOrderResponse = self
            .send_signed(Method::POST, GateioSpot::ORDERS, "", body)
            .await?;
        debug!("Order {} status={} finish_as={:?}", response.id, response.status, response.finish_as);

        response.to_fill()
    }
}
