pub mod money;
pub mod payment;
