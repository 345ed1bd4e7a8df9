//! Wait for a Gate.io spot pair to open and market-buy it with a fixed quote budget
//!
//! ```bash
//! API_KEY=... SECRET_KEY=... gate_market_buy X/USDT 10
//! ```

#![cfg(feature = "gate_exec")]

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast;

use gate_market_buy::api::ExchangeGateway;
use gate_market_buy::config::{config_path, load_gate_credentials, load_runner_config};
use gate_market_buy::execution::GateClient;
use gate_market_buy::models::TradingPair;
use gate_market_buy::strategy::MarketBuyFlow;
use gate_market_buy::utils::logging;

#[derive(Parser)]
#[command(name = "gate_market_buy", about = "Market-buy a Gate.io spot pair as soon as it opens")]
struct Args {
    /// Trading pair, e.g. X/USDT
    symbol: TradingPair,

    /// Quote currency to spend, e.g. 10 (USDT)
    #[arg(value_parser = parse_budget)]
    budget: f64,
}

fn parse_budget(raw: &str) -> Result<f64, String> {
    let budget: f64 = raw.parse().map_err(|e| format!("invalid budget '{}': {}", raw, e))?;
    if !budget.is_finite() || budget < 0.0 {
        return Err(format!("budget must be a non-negative number, got {}", raw));
    }
    Ok(budget)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let args = Args::parse();

    let config = match load_runner_config(&config_path()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    let creds = load_gate_credentials(&config);
    if !creds.is_complete() {
        log::warn!("⚠️  API credentials incomplete, balance and order calls will be rejected");
    }
    let client = GateClient::new(creds)
        .with_base_url(config.exchange.base_url.clone())
        .with_timeout(config.exchange.request_timeout());

    let markets = match client.load_markets().await {
        Ok(markets) => {
            log::info!("✅ Market data loaded ({} pairs)", markets.len());
            markets
        }
        Err(e) => {
            log::error!("❌ Failed to load market data: {}", e);
            std::process::exit(1);
        }
    };

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            log::info!("🛑 Ctrl-C received");
            let _ = shutdown_tx.send(());
        }
    });

    let flow = MarketBuyFlow::new(client)
        .with_poll_policy(config.market_wait.poll_policy())
        .with_min_order_value(config.order.min_order_value);

    let outcome = flow
        .run(&markets, &args.symbol, args.budget, &mut shutdown_rx)
        .await;
    log::debug!("Run outcome: {:?}", outcome);

    Ok(())
}
