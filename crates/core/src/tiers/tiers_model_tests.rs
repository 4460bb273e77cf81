//! Tests for tier fee band models.

#[cfg(test)]
mod tests {
    use crate::tiers::{TierRange, TierRangeDB};
    use rust_decimal_macros::dec;

    #[test]
    fn test_range_parses_stored_decimal_strings() {
        let db = TierRangeDB::new("tier-1", dec!(0), dec!(500000), dec!(0.0125));
        let range = TierRange::from(db);
        assert_eq!(range.portfolio_aum_min, dec!(0));
        assert_eq!(range.portfolio_aum_max, dec!(500000));
        assert_eq!(range.fee_percentage, dec!(0.0125));
    }

    #[test]
    fn test_range_serializes_camel_case() {
        let range = TierRange {
            portfolio_aum_min: dec!(0),
            portfolio_aum_max: dec!(250000),
            fee_percentage: dec!(0.02),
        };
        let json = serde_json::to_value(&range).unwrap();
        assert!(json.get("portfolioAumMin").is_some());
        assert!(json.get("portfolioAumMax").is_some());
        assert!(json.get("feePercentage").is_some());
    }
}
