pub mod analysis;
pub mod dataset;
pub mod error;
pub mod export;
pub mod ledger;
pub mod regulatory;
pub mod scenario;
pub mod session;
