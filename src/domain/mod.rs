pub mod balance;
pub mod commission;
pub mod gateway;
pub mod money;
pub mod payout;
pub mod ports;
pub mod transaction;
