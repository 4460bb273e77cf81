//! Tests for data kind resolution and row parsing.

#[cfg(test)]
mod tests {
    use crate::imports::{
        AssetRow, ClientRow, DataKind, ImportError, TierRow, UploadFile, WriteStrategy,
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_resolve_matches_case_insensitive_substrings() {
        assert_eq!(
            DataKind::resolve("Client_Billing_2024.csv"),
            Some(DataKind::ClientBilling)
        );
        assert_eq!(
            DataKind::resolve("BILLING_TIER.csv"),
            Some(DataKind::BillingTier)
        );
        assert_eq!(DataKind::resolve("portfolio"), Some(DataKind::Portfolio));
        assert_eq!(DataKind::resolve("q2_asset_report"), Some(DataKind::Asset));
    }

    #[test]
    fn test_resolve_first_match_wins_in_dependency_order() {
        // Contains both "billing_tier" and "asset"; the earlier kind wins.
        assert_eq!(
            DataKind::resolve("billing_tier_assets.csv"),
            Some(DataKind::BillingTier)
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_names() {
        assert_eq!(DataKind::resolve("holdings.csv"), None);
        assert_eq!(DataKind::resolve(""), None);
    }

    #[test]
    fn test_write_strategy_per_kind() {
        assert_eq!(
            DataKind::BillingTier.write_strategy(),
            WriteStrategy::Upsert
        );
        assert_eq!(
            DataKind::ClientBilling.write_strategy(),
            WriteStrategy::InsertOnly
        );
        assert_eq!(DataKind::Portfolio.write_strategy(), WriteStrategy::InsertOnly);
        assert_eq!(DataKind::Asset.write_strategy(), WriteStrategy::InsertOnly);
    }

    #[test]
    fn test_kind_serializes_to_canonical_name() {
        assert_eq!(
            serde_json::to_string(&DataKind::ClientBilling).unwrap(),
            "\"client_billing\""
        );
        assert_eq!(
            serde_json::to_string(&DataKind::BillingTier).unwrap(),
            "\"billing_tier\""
        );
    }

    #[test]
    fn test_tier_row_parses_currency_formatting() {
        let row = TierRow::from_row(1, &cells(&["T1", "$0", "$1,000,000.00", "0.0125"])).unwrap();
        assert_eq!(row.external_tier_id, "T1");
        assert_eq!(row.portfolio_aum_min, dec!(0));
        assert_eq!(row.portfolio_aum_max, dec!(1000000.00));
        assert_eq!(row.fee_percentage, dec!(0.0125));
    }

    #[test]
    fn test_tier_row_rejects_bad_numbers() {
        let err = TierRow::from_row(3, &cells(&["T1", "zero", "1", "0.01"])).unwrap_err();
        match err {
            ImportError::RowParse { kind, row, .. } => {
                assert_eq!(kind, DataKind::BillingTier);
                assert_eq!(row, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_client_row_requires_every_column() {
        let err = ClientRow::from_row(2, &cells(&["C1", "Jane Doe", "ON", "Canada"])).unwrap_err();
        match err {
            ImportError::RowParse { row, message, .. } => {
                assert_eq!(row, 2);
                assert!(message.contains("billing_tier_id"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_asset_row_accepts_both_date_formats() {
        let iso = AssetRow::from_row(1, &cells(&["2024-03-31", "P1", "AAPL", "100", "CAD"]))
            .unwrap();
        let us = AssetRow::from_row(1, &cells(&["3/31/2024", "P1", "AAPL", "100", "CAD"]))
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(iso.date, expected);
        assert_eq!(us.date, expected);
    }

    #[test]
    fn test_upload_file_extension() {
        assert_eq!(UploadFile::new("data.XLSX", vec![]).extension(), Some("XLSX"));
        assert_eq!(UploadFile::new("no_extension", vec![]).extension(), None);
    }
}
