//! Order placement flow for a single quote-budgeted market buy

pub mod market_buy;
pub mod sizing;

pub use market_buy::{
    classify_submission_error, MarketBuyFlow, OrderOutcome, RunOutcome, SubmissionFailure,
};
pub use sizing::{plan_order, size_order, SizedOrder, SizingError, MIN_ORDER_VALUE};
