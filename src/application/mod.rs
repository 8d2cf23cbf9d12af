pub mod ledger;
pub mod orchestrator;
pub mod payouts;
