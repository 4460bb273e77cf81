//! Upload batch ingestion: shape validation, decoding, kind resolution, and
//! dependency-ordered bulk inserts inside a single transaction.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use diesel::SqliteConnection;
use log::{debug, info, warn};

use crate::assets::{AssetDB, AssetRepository};
use crate::clients::{ClientDB, ClientRepository};
use crate::db::{DbPool, DbTransactionExecutor};
use crate::errors::{Result, ValidationError};
use crate::portfolios::{PortfolioDB, PortfolioRepository};
use crate::tiers::{TierRangeDB, TierRepository};

use super::imports_constants::{
    CSV_BATCH_FILE_COUNT, CSV_EXTENSION, MAX_UPLOAD_FILE_BYTES, XLSX_EXTENSION,
};
use super::imports_errors::ImportError;
use super::imports_model::{
    AssetRow, ClientRow, DataKind, KindImportResult, PortfolioRow, SkippedRows, TierRow, UploadFile,
};
use super::imports_tabular::{read_csv, read_workbook, Sheet};
use super::imports_traits::ImportServiceTrait;

/// Coordinates one upload batch end to end. Kinds are processed in
/// dependency order no matter how the files arrived, so every foreign-key
/// lookup sees rows inserted earlier in the same transaction.
pub struct ImportService {
    pool: Arc<DbPool>,
    tier_repository: TierRepository,
    client_repository: ClientRepository,
    portfolio_repository: PortfolioRepository,
    asset_repository: AssetRepository,
}

impl ImportService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            tier_repository: TierRepository::new(),
            client_repository: ClientRepository::new(),
            portfolio_repository: PortfolioRepository::new(),
            asset_repository: AssetRepository::new(),
        }
    }

    fn ingest_sheets(
        &self,
        conn: &mut SqliteConnection,
        sheets_by_kind: &HashMap<DataKind, Sheet>,
    ) -> Result<Vec<KindImportResult>> {
        let mut results = Vec::with_capacity(DataKind::ALL.len());
        for kind in DataKind::ALL {
            let Some(sheet) = sheets_by_kind.get(&kind) else {
                continue;
            };
            let result = match kind {
                DataKind::BillingTier => self.ingest_tiers(conn, sheet)?,
                DataKind::ClientBilling => self.ingest_clients(conn, sheet)?,
                DataKind::Portfolio => self.ingest_portfolios(conn, sheet)?,
                DataKind::Asset => self.ingest_assets(conn, sheet)?,
            };
            debug!(
                "Processed {}: {} rows, {} skipped",
                result.kind, result.processed, result.skipped.count
            );
            results.push(result);
        }

        // Every kind is required; checked only after processing what was
        // present so the whole batch rolls back together.
        let missing: Vec<&str> = DataKind::ALL
            .into_iter()
            .filter(|kind| !sheets_by_kind.contains_key(kind))
            .map(|kind| kind.canonical_name())
            .collect();
        if !missing.is_empty() {
            warn!("Rejecting incomplete batch, missing: {}", missing.join(", "));
            return Err(ImportError::MissingKinds(missing.join(", ")).into());
        }

        Ok(results)
    }

    /// Tier sheets repeat a tier code once per fee band: upsert each
    /// distinct code, rebuild the code to id map in one lookup, then attach
    /// every band row to its tier id.
    fn ingest_tiers(&self, conn: &mut SqliteConnection, sheet: &Sheet) -> Result<KindImportResult> {
        let mut rows = Vec::with_capacity(sheet.rows.len());
        for (index, cells) in sheet.rows.iter().enumerate() {
            rows.push(TierRow::from_row(index + 1, cells)?);
        }

        let codes = distinct(rows.iter().map(|row| row.external_tier_id.clone()));
        let tier_ids = self.tier_repository.upsert_tiers(conn, &codes)?;

        let mut ranges = Vec::with_capacity(rows.len());
        for row in &rows {
            let tier_id = tier_ids.get(&row.external_tier_id).ok_or_else(|| {
                ValidationError::InvalidInput(format!(
                    "billing tier '{}' not found after upsert",
                    row.external_tier_id
                ))
            })?;
            ranges.push(TierRangeDB::new(
                tier_id,
                row.portfolio_aum_min,
                row.portfolio_aum_max,
                row.fee_percentage,
            ));
        }

        let processed = ranges.len();
        self.tier_repository.insert_ranges(conn, ranges)?;
        debug!("Upserted {} tiers, {} fee bands", codes.len(), processed);

        Ok(KindImportResult {
            kind: DataKind::BillingTier,
            processed,
            skipped: SkippedRows::default(),
        })
    }

    fn ingest_clients(
        &self,
        conn: &mut SqliteConnection,
        sheet: &Sheet,
    ) -> Result<KindImportResult> {
        let mut rows = Vec::with_capacity(sheet.rows.len());
        for (index, cells) in sheet.rows.iter().enumerate() {
            rows.push(ClientRow::from_row(index + 1, cells)?);
        }

        let tier_codes = distinct(rows.iter().map(|row| row.billing_tier_id.clone()));
        let tier_ids = self.tier_repository.ids_by_external_id(conn, &tier_codes)?;

        let mut new_clients = Vec::with_capacity(rows.len());
        let mut skipped = SkippedRows::default();
        for row in &rows {
            match tier_ids.get(&row.billing_tier_id) {
                Some(tier_id) => new_clients.push(ClientDB::new(
                    &row.external_client_id,
                    &row.client_name,
                    &row.province,
                    &row.country,
                    tier_id,
                )),
                None => skipped.push(format!(
                    "{} (missing billing tier {})",
                    row.external_client_id, row.billing_tier_id
                )),
            }
        }

        let processed = new_clients.len();
        self.client_repository.insert_batch(conn, new_clients)?;
        if skipped.count > 0 {
            warn!(
                "Skipped {} client rows with unresolved tiers: {:?}",
                skipped.count, skipped.ids
            );
        }

        Ok(KindImportResult {
            kind: DataKind::ClientBilling,
            processed,
            skipped,
        })
    }

    fn ingest_portfolios(
        &self,
        conn: &mut SqliteConnection,
        sheet: &Sheet,
    ) -> Result<KindImportResult> {
        let mut rows = Vec::with_capacity(sheet.rows.len());
        for (index, cells) in sheet.rows.iter().enumerate() {
            rows.push(PortfolioRow::from_row(index + 1, cells)?);
        }

        let client_codes = distinct(rows.iter().map(|row| row.external_client_id.clone()));
        let client_ids = self
            .client_repository
            .ids_by_external_id(conn, &client_codes)?;

        let mut new_portfolios = Vec::with_capacity(rows.len());
        let mut skipped = SkippedRows::default();
        for row in &rows {
            match client_ids.get(&row.external_client_id) {
                Some(client_id) => new_portfolios.push(PortfolioDB::new(
                    &row.external_portfolio_id,
                    client_id,
                    &row.currency,
                )),
                None => skipped.push(format!(
                    "{} (missing client {})",
                    row.external_portfolio_id, row.external_client_id
                )),
            }
        }

        let processed = new_portfolios.len();
        self.portfolio_repository.insert_batch(conn, new_portfolios)?;
        if skipped.count > 0 {
            warn!(
                "Skipped {} portfolio rows with unresolved clients: {:?}",
                skipped.count, skipped.ids
            );
        }

        Ok(KindImportResult {
            kind: DataKind::Portfolio,
            processed,
            skipped,
        })
    }

    fn ingest_assets(&self, conn: &mut SqliteConnection, sheet: &Sheet) -> Result<KindImportResult> {
        let mut rows = Vec::with_capacity(sheet.rows.len());
        for (index, cells) in sheet.rows.iter().enumerate() {
            rows.push(AssetRow::from_row(index + 1, cells)?);
        }

        let portfolio_codes = distinct(rows.iter().map(|row| row.external_portfolio_id.clone()));
        let portfolio_ids = self
            .portfolio_repository
            .ids_by_external_id(conn, &portfolio_codes)?;

        let mut new_assets = Vec::with_capacity(rows.len());
        let mut skipped = SkippedRows::default();
        for row in &rows {
            match portfolio_ids.get(&row.external_portfolio_id) {
                Some(portfolio_id) => new_assets.push(AssetDB::new(
                    portfolio_id,
                    &row.asset_id,
                    row.asset_value,
                    &row.currency,
                    row.date,
                )),
                None => skipped.push(format!(
                    "{} (missing portfolio {})",
                    row.asset_id, row.external_portfolio_id
                )),
            }
        }

        let processed = new_assets.len();
        self.asset_repository.insert_batch(conn, new_assets)?;
        if skipped.count > 0 {
            warn!(
                "Skipped {} asset rows with unresolved portfolios: {:?}",
                skipped.count, skipped.ids
            );
        }

        Ok(KindImportResult {
            kind: DataKind::Asset,
            processed,
            skipped,
        })
    }
}

impl ImportServiceTrait for ImportService {
    fn import_batch(&self, files: &[UploadFile]) -> Result<Vec<KindImportResult>> {
        validate_batch_shape(files)?;

        let sheets = decode_batch(files)?;
        let sheets_by_kind = resolve_kinds(sheets)?;
        info!(
            "Importing batch of {} file(s), {} sheet(s)",
            files.len(),
            sheets_by_kind.len()
        );

        let results = self
            .pool
            .execute(|conn| self.ingest_sheets(conn, &sheets_by_kind))?;

        for result in &results {
            info!(
                "Imported {}: {} processed, {} skipped",
                result.kind, result.processed, result.skipped.count
            );
        }
        Ok(results)
    }
}

/// A batch is either exactly one workbook or exactly one flat file per kind,
/// with every file under the upload ceiling. Checked before anything touches
/// the database.
fn validate_batch_shape(files: &[UploadFile]) -> std::result::Result<(), ImportError> {
    if files.is_empty() {
        return Err(ImportError::InvalidBatch("no files uploaded".to_string()));
    }

    for file in files {
        if file.bytes.len() > MAX_UPLOAD_FILE_BYTES {
            return Err(ImportError::FileTooLarge(
                file.name.clone(),
                MAX_UPLOAD_FILE_BYTES,
            ));
        }
    }

    let extensions: Vec<String> = files
        .iter()
        .map(|file| {
            file.extension()
                .unwrap_or_default()
                .to_ascii_lowercase()
        })
        .collect();

    if extensions.iter().all(|ext| ext == XLSX_EXTENSION) && files.len() == 1 {
        return Ok(());
    }
    if extensions.iter().all(|ext| ext == CSV_EXTENSION) && files.len() == CSV_BATCH_FILE_COUNT {
        return Ok(());
    }

    Err(ImportError::InvalidBatch(format!(
        "expected one .xlsx workbook or exactly {} .csv files, got {} file(s)",
        CSV_BATCH_FILE_COUNT,
        files.len()
    )))
}

fn decode_batch(files: &[UploadFile]) -> std::result::Result<Vec<Sheet>, ImportError> {
    let mut sheets = Vec::new();
    for file in files {
        let extension = file.extension().unwrap_or_default().to_ascii_lowercase();
        if extension == XLSX_EXTENSION {
            sheets.extend(read_workbook(&file.bytes)?);
        } else {
            sheets.push(read_csv(&file.name, &file.bytes)?);
        }
    }
    Ok(sheets)
}

/// Key each sheet by its resolved kind. When two sheets resolve to the same
/// kind the later one wins; the batch then fails the required-kind check for
/// whichever kind ended up unrepresented.
fn resolve_kinds(sheets: Vec<Sheet>) -> std::result::Result<HashMap<DataKind, Sheet>, ImportError> {
    let mut by_kind: HashMap<DataKind, Sheet> = HashMap::new();
    for sheet in sheets {
        let kind = DataKind::resolve(&sheet.name)
            .ok_or_else(|| ImportError::UnresolvedKind(sheet.name.clone()))?;
        by_kind.insert(kind, sheet);
    }
    Ok(by_kind)
}

/// Order-preserving de-duplication of referenced external ids, so each kind
/// needs exactly one lookup query.
fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}
