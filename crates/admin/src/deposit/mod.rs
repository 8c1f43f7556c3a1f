//! Deposit domain logic.
//!
//! Pure decision functions, separated from webhook handlers and routes so
//! the policy is testable without a database or network. Handlers fetch,
//! call in here to decide, then write.

pub mod ingest;
pub mod reconcile;

pub use ingest::{IngestDecision, build_deposit_order, deposit_line_item, plan_ingest};
pub use reconcile::{
    BalanceUpdate, COLLECTION_REQUEST_ATTR, DepositResolution, DepositSource, OrderSnapshot,
    PaymentBreakdown,
    balance_collected, parse_arrival_date, payment_breakdown, plan_balance_update,
    resolve_deposit,
};
