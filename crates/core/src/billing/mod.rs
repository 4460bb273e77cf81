//! Billing module - read-only aggregation over the imported dataset.

mod billing_model;
mod billing_service;
mod billing_traits;

pub use billing_model::{AssetHolding, ClientTotals, FirmTotals, PortfolioTotals, TierWithRanges};
pub use billing_service::BillingService;
pub use billing_traits::BillingServiceTrait;
