//! ledgerscan-core: canonical transaction schema and the amount/date normalizer
//! shared by every statement format.

pub mod error;
pub mod normalize;
pub mod transaction;

pub use error::NormalizeError;
pub use normalize::{
    compose_date, expand_year, from_cents, parse_amount, parse_day_month, resolve_month_name,
    to_cents,
};
pub use transaction::TransactionRecord;
