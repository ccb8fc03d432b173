pub mod fees;
pub mod ledger;
pub mod oracle;
pub mod position;
pub mod rebalance;

pub use ledger::*;
pub use rebalance::*;
