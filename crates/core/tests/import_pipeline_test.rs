//! End-to-end tests for the upload ingestion pipeline: batch shape, kind
//! resolution, dependency-ordered inserts, skips, and atomicity.

mod common;

use common::{csv_file, happy_batch, test_pool};
use wealthbill_core::assets::AssetRepository;
use wealthbill_core::clients::ClientRepository;
use wealthbill_core::db::{get_connection, DbPool};
use wealthbill_core::errors::Error;
use wealthbill_core::imports::{
    DataKind, ImportError, ImportService, ImportServiceTrait, MAX_UPLOAD_FILE_BYTES,
};
use wealthbill_core::portfolios::PortfolioRepository;
use wealthbill_core::tiers::TierRepository;

fn row_counts(pool: &DbPool) -> (i64, i64, i64, i64) {
    let mut conn = get_connection(pool).expect("Failed to get connection");
    (
        TierRepository::new().count(&mut conn).unwrap(),
        ClientRepository::new().count(&mut conn).unwrap(),
        PortfolioRepository::new().count(&mut conn).unwrap(),
        AssetRepository::new().count(&mut conn).unwrap(),
    )
}

#[test]
fn test_happy_path_processes_all_kinds_in_dependency_order() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    let results = service.import_batch(&happy_batch()).unwrap();

    let kinds: Vec<DataKind> = results.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DataKind::BillingTier,
            DataKind::ClientBilling,
            DataKind::Portfolio,
            DataKind::Asset,
        ]
    );
    for result in &results {
        assert_eq!(result.processed, 1, "{} should process one row", result.kind);
        assert_eq!(result.skipped.count, 0);
    }
    assert_eq!(row_counts(&pool), (1, 1, 1, 1));
}

#[test]
fn test_file_arrival_order_does_not_matter() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    let mut files = happy_batch();
    files.reverse();
    let results = service.import_batch(&files).unwrap();

    assert_eq!(results[0].kind, DataKind::BillingTier);
    assert_eq!(results[3].kind, DataKind::Asset);
    assert!(results.iter().all(|r| r.processed == 1 && r.skipped.count == 0));
}

#[test]
fn test_missing_reference_skips_row_and_cascades() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    let mut files = happy_batch();
    // Portfolio owner C2 is never imported, so P1 skips and A1 follows.
    files[2] = csv_file(
        "portfolio.csv",
        "external_client_id,external_portfolio_id,currency\nC2,P1,CAD\n",
    );
    let results = service.import_batch(&files).unwrap();

    assert_eq!(results[2].processed, 0);
    assert_eq!(results[2].skipped.ids, vec!["P1 (missing client C2)"]);
    assert_eq!(results[3].processed, 0);
    assert_eq!(results[3].skipped.ids, vec!["A1 (missing portfolio P1)"]);
    assert_eq!(row_counts(&pool), (1, 1, 0, 0));
}

#[test]
fn test_skip_accounting_counts_each_unresolved_row() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    let mut files = happy_batch();
    files[1] = csv_file(
        "client_billing.csv",
        "external_client_id,client_name,province,country,billing_tier_id\n\
         C1,Jane Doe,ON,Canada,T1\n\
         C2,John Roe,BC,Canada,T9\n\
         C3,Ann Low,QC,Canada,T8\n",
    );
    let results = service.import_batch(&files).unwrap();

    assert_eq!(results[1].processed, 1);
    assert_eq!(results[1].skipped.count, 2);
    assert_eq!(
        results[1].skipped.ids,
        vec![
            "C2 (missing billing tier T9)",
            "C3 (missing billing tier T8)",
        ]
    );
}

#[test]
fn test_missing_required_kind_rolls_back_everything() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    // Two files resolve to the portfolio kind, so no asset sheet remains.
    let files = vec![
        happy_batch().remove(0),
        happy_batch().remove(1),
        happy_batch().remove(2),
        csv_file(
            "portfolio_extra.csv",
            "external_client_id,external_portfolio_id,currency\nC1,P9,CAD\n",
        ),
    ];
    let err = service.import_batch(&files).unwrap_err();

    match err {
        Error::Import(ImportError::MissingKinds(kinds)) => assert!(kinds.contains("asset")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(row_counts(&pool), (0, 0, 0, 0));
}

#[test]
fn test_row_parse_error_is_fatal_and_rolls_back() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    let mut files = happy_batch();
    files[3] = csv_file(
        "asset.csv",
        "date,external_portfolio_id,asset_id,asset_value,currency\n\
         2024-03-31,P1,A1,not-a-number,CAD\n",
    );
    let err = service.import_batch(&files).unwrap_err();

    match err {
        Error::Import(ImportError::RowParse { kind, row, .. }) => {
            assert_eq!(kind, DataKind::Asset);
            assert_eq!(row, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(row_counts(&pool), (0, 0, 0, 0));
}

#[test]
fn test_unresolvable_file_name_is_fatal() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    let mut files = happy_batch();
    files[3] = csv_file(
        "holdings.csv",
        "date,external_portfolio_id,asset_id,asset_value,currency\n2024-03-31,P1,A1,1,CAD\n",
    );
    let err = service.import_batch(&files).unwrap_err();

    assert!(matches!(
        err,
        Error::Import(ImportError::UnresolvedKind(name)) if name == "holdings.csv"
    ));
    assert_eq!(row_counts(&pool), (0, 0, 0, 0));
}

#[test]
fn test_batch_shape_validation_rejects_wrong_file_counts() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    let two_files = happy_batch().into_iter().take(2).collect::<Vec<_>>();
    assert!(matches!(
        service.import_batch(&two_files).unwrap_err(),
        Error::Import(ImportError::InvalidBatch(_))
    ));

    let mut five_files = happy_batch();
    five_files.push(csv_file("billing_tier_more.csv", "a\n1\n"));
    assert!(matches!(
        service.import_batch(&five_files).unwrap_err(),
        Error::Import(ImportError::InvalidBatch(_))
    ));

    assert!(matches!(
        service.import_batch(&[]).unwrap_err(),
        Error::Import(ImportError::InvalidBatch(_))
    ));

    let mut mixed = happy_batch();
    mixed[0] = csv_file("billing_tier.txt", "a\n1\n");
    assert!(matches!(
        service.import_batch(&mixed).unwrap_err(),
        Error::Import(ImportError::InvalidBatch(_))
    ));

    assert_eq!(row_counts(&pool), (0, 0, 0, 0));
}

#[test]
fn test_oversized_file_is_rejected_before_parsing() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    let mut files = happy_batch();
    files[0] = wealthbill_core::imports::UploadFile::new(
        "billing_tier.csv",
        vec![b'a'; MAX_UPLOAD_FILE_BYTES + 1],
    );
    let err = service.import_batch(&files).unwrap_err();

    assert!(matches!(
        err,
        Error::Import(ImportError::FileTooLarge(name, _)) if name == "billing_tier.csv"
    ));
    assert_eq!(row_counts(&pool), (0, 0, 0, 0));
}

#[test]
fn test_tier_rows_deduplicate_into_one_tier_with_all_bands() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    let mut files = happy_batch();
    files[0] = csv_file(
        "billing_tier.csv",
        "external_tier_id,portfolio_aum_min,portfolio_aum_max,fee_percentage\n\
         T1,0,500000,0.02\n\
         T1,500000,1000000,0.015\n",
    );
    let results = service.import_batch(&files).unwrap();

    assert_eq!(results[0].processed, 2);
    let mut conn = get_connection(&pool).unwrap();
    let repo = TierRepository::new();
    assert_eq!(repo.count(&mut conn).unwrap(), 1);
    assert_eq!(repo.list_ranges(&mut conn).unwrap().len(), 2);
}

#[test]
fn test_tier_upsert_reuses_internal_id_across_batches() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    service.import_batch(&happy_batch()).unwrap();

    let second = vec![
        csv_file(
            "billing_tier.csv",
            "external_tier_id,portfolio_aum_min,portfolio_aum_max,fee_percentage\n\
             T1,0,1000000,0.01\n",
        ),
        csv_file(
            "client_billing.csv",
            "external_client_id,client_name,province,country,billing_tier_id\n\
             C2,John Roe,BC,Canada,T1\n",
        ),
        csv_file(
            "portfolio.csv",
            "external_client_id,external_portfolio_id,currency\nC2,P2,CAD\n",
        ),
        csv_file(
            "asset.csv",
            "date,external_portfolio_id,asset_id,asset_value,currency\n\
             2024-03-31,P2,A2,100,CAD\n",
        ),
    ];
    service.import_batch(&second).unwrap();

    let mut conn = get_connection(&pool).unwrap();
    assert_eq!(TierRepository::new().count(&mut conn).unwrap(), 1);

    let clients = ClientRepository::new();
    let first = clients
        .find_by_external_id(&mut conn, "C1")
        .unwrap()
        .unwrap();
    let second = clients
        .find_by_external_id(&mut conn, "C2")
        .unwrap()
        .unwrap();
    assert_eq!(first.billing_tier_id, second.billing_tier_id);
}

#[test]
fn test_reimport_without_reset_hits_unique_constraint_and_rolls_back() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    service.import_batch(&happy_batch()).unwrap();
    let err = service.import_batch(&happy_batch()).unwrap_err();

    assert!(err.is_unique_violation());
    assert_eq!(row_counts(&pool), (1, 1, 1, 1));
    // The second batch's tier bands rolled back with it.
    let mut conn = get_connection(&pool).unwrap();
    assert_eq!(TierRepository::new().list_ranges(&mut conn).unwrap().len(), 1);
}

#[test]
fn test_bulk_lookup_resolves_every_row_to_its_client() {
    let (pool, _dir) = test_pool();
    let service = ImportService::new(pool.clone());

    let mut client_csv =
        String::from("external_client_id,client_name,province,country,billing_tier_id\n");
    for i in 1..=50 {
        client_csv.push_str(&format!("C{i},Client {i},ON,Canada,T1\n"));
    }
    let mut portfolio_csv = String::from("external_client_id,external_portfolio_id,currency\n");
    for i in 1..=1000 {
        portfolio_csv.push_str(&format!("C{},P{},CAD\n", (i - 1) % 50 + 1, i));
    }

    let files = vec![
        csv_file(
            "billing_tier.csv",
            "external_tier_id,portfolio_aum_min,portfolio_aum_max,fee_percentage\n\
             T1,0,1000000,0.01\n",
        ),
        csv_file("client_billing.csv", &client_csv),
        csv_file("portfolio.csv", &portfolio_csv),
        csv_file(
            "asset.csv",
            "date,external_portfolio_id,asset_id,asset_value,currency\n\
             2024-03-31,P1,A1,100,CAD\n",
        ),
    ];
    let results = service.import_batch(&files).unwrap();

    assert_eq!(results[1].processed, 50);
    assert_eq!(results[2].processed, 1000);
    assert_eq!(results[2].skipped.count, 0);

    let mut conn = get_connection(&pool).unwrap();
    let clients = ClientRepository::new();
    let portfolios = PortfolioRepository::new();
    for external_id in ["C1", "C25", "C50"] {
        let client = clients
            .find_by_external_id(&mut conn, external_id)
            .unwrap()
            .unwrap();
        let owned = portfolios.list_by_client(&mut conn, &client.id).unwrap();
        assert_eq!(owned.len(), 20, "{external_id} should own 20 portfolios");
    }
}
