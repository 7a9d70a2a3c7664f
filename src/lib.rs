pub mod chart;
pub mod error;
pub mod loan;
pub mod prompt;

pub use error::LoanError;
pub use loan::{describe, BalancePoint, BalanceSeries, LoanTerms, RepaymentFrequency};
