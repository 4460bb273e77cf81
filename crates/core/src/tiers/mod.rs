//! Billing tiers module - tier catalog and fee band storage.

mod tiers_model;
mod tiers_repository;

pub use tiers_model::{BillingTierDB, TierRange, TierRangeDB};
pub use tiers_repository::TierRepository;

#[cfg(test)]
mod tiers_model_tests;
