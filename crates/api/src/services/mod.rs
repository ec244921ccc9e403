//! Business logic above the repositories and external clients.
//!
//! Route handlers stay thin; the flows that touch several tables or an
//! external API live here.

pub mod checkout;
pub mod cleanup;
pub mod payouts;

pub use checkout::{CartLine, CheckoutService, StartedCheckout};
pub use payouts::{PayoutService, WithdrawalReceipt, net_amount, platform_fee};
