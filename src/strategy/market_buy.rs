//! One-shot market buy: wait for the pair to open, size the order from a
//! quote budget, submit it and classify the result.

use log::{debug, error, info, warn};
use std::collections::BTreeSet;
use tokio::sync::broadcast;

use super::sizing::{plan_order, SizedOrder, SizingError, MIN_ORDER_VALUE};
use crate::api::{ExchangeGateway, GatewayError};
use crate::models::TradingPair;
use crate::utils::poll::{poll_until, Clock, PollOutcome, PollPolicy, TokioClock};

/// Gate's error label for an order the account cannot pay for
pub const BALANCE_NOT_ENOUGH: &str = "BALANCE_NOT_ENOUGH";

/// Outcome of `place_buy_order`
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Filled {
        order_id: String,
        amount: f64,
        average_price: Option<f64>,
    },
    /// Local pre-check: free balance below budget, nothing submitted
    InsufficientFunds { required: f64, available: f64 },
    /// Balance could not be read, nothing submitted
    BalanceUnavailable { detail: String },
    SizingFailed { detail: String },
    /// Exchange refused the order for lack of funds
    InsufficientFundsAtSubmission {
        required: f64,
        available: f64,
        detail: String,
    },
    OrderFailed { detail: String },
}

impl OrderOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, OrderOutcome::Filled { .. })
    }
}

/// Outcome of a full `run`
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Pair is not in the loaded market set
    UnknownPair { pair: String },
    /// Stopped waiting for the market before it opened
    WaitAborted { cancelled: bool, attempts: u32 },
    Order { result: OrderOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionFailure {
    InsufficientBalance,
    Other(String),
}

/// Map an order-submission error to a failure kind.
///
/// Uses the gateway's structured label when there is one and only falls back
/// to scanning the message text.
pub fn classify_submission_error(err: &GatewayError) -> SubmissionFailure {
    match err.label() {
        Some(label) if label == BALANCE_NOT_ENOUGH => SubmissionFailure::InsufficientBalance,
        Some(_) => SubmissionFailure::Other(err.to_string()),
        None if err.to_string().contains(BALANCE_NOT_ENOUGH) => {
            SubmissionFailure::InsufficientBalance
        }
        None => SubmissionFailure::Other(err.to_string()),
    }
}

/// Market-buy flow over an injected gateway
pub struct MarketBuyFlow<G> {
    gateway: G,
    clock: Box<dyn Clock>,
    poll: PollPolicy,
    min_order_value: f64,
}

impl<G: ExchangeGateway> MarketBuyFlow<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            clock: Box::new(TokioClock),
            poll: PollPolicy::default(),
            min_order_value: MIN_ORDER_VALUE,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_min_order_value(mut self, min_order_value: f64) -> Self {
        self.min_order_value = min_order_value;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Errors count as "not open"; the caller polls again
    pub async fn is_market_open(&self, pair: &TradingPair) -> bool {
        match self.gateway.get_market(pair).await {
            Ok(market) => market.tradable,
            Err(e) => {
                warn!("Market {} unavailable: {}", pair, e);
                false
            }
        }
    }

    pub async fn wait_for_market_open(
        &self,
        pair: &TradingPair,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> PollOutcome {
        poll_until(self.poll, self.clock.as_ref(), shutdown_rx, move |attempt| async move {
            let open = self.is_market_open(pair).await;
            if !open {
                info!("⏳ Market {} not open yet, waiting... (check #{})", pair, attempt);
            }
            open
        })
        .await
    }

    pub async fn get_current_price(&self, pair: &TradingPair) -> Result<f64, GatewayError> {
        match self.gateway.fetch_ticker(pair).await {
            Ok(ticker) => Ok(ticker.last),
            Err(e) => {
                error!("Failed to fetch last price for {}: {}", pair, e);
                Err(e)
            }
        }
    }

    pub async fn calculate_amount(&self, pair: &TradingPair, budget: f64) -> Result<f64, SizingError> {
        self.size_for_budget(pair, budget).await.map(|sized| sized.amount)
    }

    async fn size_for_budget(&self, pair: &TradingPair, budget: f64) -> Result<SizedOrder, SizingError> {
        let price = self.get_current_price(pair).await?;
        let sized = plan_order(budget, price, self.min_order_value)?;

        if sized.raised_to_minimum {
            warn!(
                "Budget {} {} is below the minimum order value, spending {} instead",
                budget, pair.quote, self.min_order_value
            );
        }
        debug!("Sized {} {} at price {}", sized.amount, pair.base, price);

        Ok(sized)
    }

    /// Free balance of `currency`; a currency missing from the account is zero
    pub async fn get_account_balance(&self, currency: &str) -> Result<f64, GatewayError> {
        match self.gateway.fetch_balance().await {
            Ok(balances) => {
                let free = balances.free(currency);
                info!("💰 {} balance: {}", currency, free);
                Ok(free)
            }
            Err(e) => {
                error!("Failed to fetch account balance: {}", e);
                Err(e)
            }
        }
    }

    pub async fn place_buy_order(&self, pair: &TradingPair, budget: f64) -> OrderOutcome {
        let available = match self.get_account_balance(&pair.quote).await {
            Ok(free) => free,
            Err(e) => {
                return OrderOutcome::BalanceUnavailable {
                    detail: e.to_string(),
                };
            }
        };

        if available < budget {
            error!(
                "Insufficient {} balance. Required: {}, available: {}",
                pair.quote, budget, available
            );
            return OrderOutcome::InsufficientFunds {
                required: budget,
                available,
            };
        }

        let sized = match self.size_for_budget(pair, budget).await {
            Ok(sized) => sized,
            Err(e) => {
                error!("Failed to calculate order amount: {}", e);
                return OrderOutcome::SizingFailed {
                    detail: e.to_string(),
                };
            }
        };

        info!(
            "📤 Submitting market buy: {} {} (~{} {})",
            sized.amount,
            pair,
            sized.notional(),
            pair.quote
        );

        match self
            .gateway
            .create_market_buy_order(pair, sized.amount, sized.price)
            .await
        {
            Ok(fill) => {
                info!(
                    "✅ Buy order filled. Bought {} {} at average price {}",
                    fill.amount,
                    pair.base,
                    fill.average_price
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "n/a".to_string())
                );
                OrderOutcome::Filled {
                    order_id: fill.order_id,
                    amount: fill.amount,
                    average_price: fill.average_price,
                }
            }
            Err(e) => match classify_submission_error(&e) {
                SubmissionFailure::InsufficientBalance => {
                    error!(
                        "❌ Order rejected: insufficient balance. Required: {}, available: {}",
                        budget, available
                    );
                    OrderOutcome::InsufficientFundsAtSubmission {
                        required: budget,
                        available,
                        detail: e.to_string(),
                    }
                }
                SubmissionFailure::Other(detail) => {
                    error!("❌ Order failed: {}", detail);
                    OrderOutcome::OrderFailed { detail }
                }
            },
        }
    }

    /// Check the pair is listed, wait for it to open, then buy
    pub async fn run(
        &self,
        markets: &BTreeSet<TradingPair>,
        pair: &TradingPair,
        budget: f64,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> RunOutcome {
        if !markets.contains(pair) {
            error!("Invalid trading pair: {}", pair);
            return RunOutcome::UnknownPair {
                pair: pair.to_string(),
            };
        }

        match self.wait_for_market_open(pair, shutdown_rx).await {
            PollOutcome::Ready { attempts } => {
                info!("🚀 Market {} is open after {} check(s), placing order...", pair, attempts);
            }
            PollOutcome::Cancelled { attempts } => {
                warn!("Shutdown requested while waiting for {} ({} checks)", pair, attempts);
                return RunOutcome::WaitAborted {
                    cancelled: true,
                    attempts,
                };
            }
            PollOutcome::Exhausted { attempts } => {
                error!("Market {} still closed after {} checks, giving up", pair, attempts);
                return RunOutcome::WaitAborted {
                    cancelled: false,
                    attempts,
                };
            }
        }

        RunOutcome::Order {
            result: self.place_buy_order(pair, budget).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(label: Option<&str>, message: &str) -> GatewayError {
        GatewayError::Api {
            status: 400,
            label: label.map(str::to_string),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_classify_by_label() {
        let err = api_error(Some("BALANCE_NOT_ENOUGH"), "Not enough balance");
        assert_eq!(classify_submission_error(&err), SubmissionFailure::InsufficientBalance);

        let err = api_error(Some("INVALID_PARAM_VALUE"), "amount too small");
        assert!(matches!(
            classify_submission_error(&err),
            SubmissionFailure::Other(text) if text.contains("amount too small")
        ));
    }

    #[test]
    fn test_classify_falls_back_to_text() {
        let err = GatewayError::Network("gate says BALANCE_NOT_ENOUGH".to_string());
        assert_eq!(classify_submission_error(&err), SubmissionFailure::InsufficientBalance);

        let err = GatewayError::Network("connection reset".to_string());
        assert_eq!(
            classify_submission_error(&err),
            SubmissionFailure::Other("Network error: connection reset".to_string())
        );
    }
}
