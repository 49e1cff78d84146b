//! # ESG Response Store
//!
//! SQLite-backed persistence for yearly ESG response records. This module owns
//! the schema and every invariant the records carry:
//!
//! - At most one non-deleted record exists per `(user_id, financial_year)`,
//!   enforced by a partial unique index. Concurrent inserts for the same key
//!   have exactly one winner; the loser's constraint violation is retried once
//!   as an update before `Conflict` surfaces.
//! - The four derived ratios are recomputed from the merged raw fields on
//!   every write. Caller-supplied derived values do not exist in the payload
//!   type, so a stored record can never contradict its own formulas.
//! - `user_id` and `financial_year` are immutable after creation; partial
//!   updates only touch the raw metric columns.
//! - Deletion is soft: rows are flagged and excluded from listings and from
//!   the uniqueness check, but stay readable by id for audit purposes. A new
//!   submission for a deleted year creates a fresh record.
//!
//! Caller identity is an explicit parameter on every operation. The store
//! never consults ambient session state; resolving "who is calling" happens
//! upstream.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use common::model::metrics::{MetricInputs, RawMetrics};
use common::model::response::EsgResponse;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use thiserror::Error;
use uuid::Uuid;

use crate::metrics;

/// Everything that can go wrong inside the store.
///
/// `InvalidInput` and `Unauthorized` are raised before any database
/// interaction. `NotFound` deliberately covers both a missing record and a
/// record owned by someone else, so callers cannot probe for the existence of
/// other users' data. `StoreUnavailable` propagates database failures without
/// internal retries; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("caller identity missing or mismatched")]
    Unauthorized,
    #[error("response not found")]
    NotFound,
    #[error("conflicting submission for financial year {0}")]
    Conflict(i32),
    #[error("one or more responses in the batch are not owned by the caller")]
    PartialOwnership,
    #[error("storage unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::StoreUnavailable(err.to_string())
    }
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS esg_responses (
    id                    TEXT PRIMARY KEY,
    user_id               TEXT NOT NULL,
    financial_year        INTEGER NOT NULL,
    total_electricity     REAL NOT NULL DEFAULT 0,
    renewable_electricity REAL NOT NULL DEFAULT 0,
    total_fuel            REAL NOT NULL DEFAULT 0,
    carbon_emissions      REAL NOT NULL DEFAULT 0,
    total_employees       REAL NOT NULL DEFAULT 0,
    female_employees      REAL NOT NULL DEFAULT 0,
    training_hours        REAL NOT NULL DEFAULT 0,
    community_investment  REAL NOT NULL DEFAULT 0,
    independent_board     REAL NOT NULL DEFAULT 0,
    data_privacy_policy   INTEGER,
    total_revenue         REAL NOT NULL DEFAULT 0,
    carbon_intensity      REAL NOT NULL DEFAULT 0,
    renewable_ratio       REAL NOT NULL DEFAULT 0,
    diversity_ratio       REAL NOT NULL DEFAULT 0,
    community_spend_ratio REAL NOT NULL DEFAULT 0,
    is_deleted            INTEGER NOT NULL DEFAULT 0,
    deleted_at            TEXT,
    created_at            TEXT NOT NULL,
    updated_at            TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_esg_responses_user_year
    ON esg_responses(user_id, financial_year) WHERE is_deleted = 0;
";

/// Column list shared by every SELECT, in the order `map_row` expects.
const COLUMNS: &str = "id, user_id, financial_year, \
    total_electricity, renewable_electricity, total_fuel, carbon_emissions, \
    total_employees, female_employees, training_hours, community_investment, \
    independent_board, data_privacy_policy, total_revenue, \
    carbon_intensity, renewable_ratio, diversity_ratio, community_spend_ratio, \
    is_deleted, deleted_at, created_at, updated_at";

/// SQLite-backed store for `EsgResponse` records.
///
/// A single connection guarded by a mutex serializes all in-process access;
/// across processes sharing the database file, the partial unique index is
/// the serialization point for the create-vs-update race.
pub struct ResponseStore {
    conn: Mutex<Connection>,
}

impl ResponseStore {
    /// Opens (creating if necessary) the database at `path` and ensures the
    /// schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ResponseStore, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<ResponseStore, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<ResponseStore, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(ResponseStore {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::StoreUnavailable("connection lock poisoned".to_string()))
    }

    /// Creates or updates the record for `(user_id, financial_year)` and
    /// returns it with freshly derived ratios.
    ///
    /// On creation the supplied fields merge over zero defaults; on update
    /// they merge over the stored values, leaving absent fields untouched.
    /// An insert that loses the uniqueness race to a concurrent writer is
    /// retried exactly once as an update.
    pub fn upsert(
        &self,
        user_id: &str,
        financial_year: i32,
        inputs: &MetricInputs,
    ) -> Result<EsgResponse, StoreError> {
        require_caller(user_id)?;
        validate_inputs(financial_year, inputs)?;

        let conn = self.lock()?;
        if let Some(existing) = active_record(&conn, user_id, financial_year)? {
            return update_record(&conn, &existing, inputs);
        }
        match insert_record(&conn, user_id, financial_year, inputs) {
            Ok(record) => Ok(record),
            Err(StoreError::Conflict(_)) => {
                // Lost the insert race; the winner's row must exist now.
                match active_record(&conn, user_id, financial_year)? {
                    Some(existing) => update_record(&conn, &existing, inputs),
                    None => Err(StoreError::Conflict(financial_year)),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// All non-deleted records owned by `user_id`, newest financial year
    /// first, optionally narrowed to one year. An empty result is not an
    /// error.
    pub fn list_active(
        &self,
        user_id: &str,
        financial_year: Option<i32>,
    ) -> Result<Vec<EsgResponse>, StoreError> {
        require_caller(user_id)?;
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {COLUMNS} FROM esg_responses \
             WHERE user_id = ?1 AND is_deleted = 0 \
             {} ORDER BY financial_year DESC",
            if financial_year.is_some() {
                "AND financial_year = ?2"
            } else {
                ""
            }
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = match financial_year {
            Some(year) => stmt.query_map(params![user_id, year], map_row)?,
            None => stmt.query_map(params![user_id], map_row)?,
        };
        let mut responses = Vec::new();
        for row in rows {
            responses.push(row?);
        }
        Ok(responses)
    }

    /// Fetches one record by id, including soft-deleted ones (audit access).
    ///
    /// A record owned by another user is reported as `NotFound`, identically
    /// to a record that does not exist.
    pub fn get_by_id(&self, user_id: &str, id: &str) -> Result<EsgResponse, StoreError> {
        require_caller(user_id)?;
        let conn = self.lock()?;
        match record_by_id(&conn, id)? {
            Some(record) if record.user_id == user_id => Ok(record),
            _ => Err(StoreError::NotFound),
        }
    }

    /// Flags a record as deleted. Deleting an already-deleted record is a
    /// silent no-op; the `(user, year)` slot becomes free for a fresh record.
    pub fn soft_delete(&self, user_id: &str, id: &str) -> Result<(), StoreError> {
        require_caller(user_id)?;
        let conn = self.lock()?;
        let record = match record_by_id(&conn, id)? {
            Some(record) if record.user_id == user_id => record,
            _ => return Err(StoreError::NotFound),
        };
        if record.is_deleted {
            return Ok(());
        }
        let now = Utc::now();
        conn.execute(
            "UPDATE esg_responses SET is_deleted = 1, deleted_at = ?1, updated_at = ?1 \
             WHERE id = ?2",
            params![now, id],
        )?;
        Ok(())
    }

    /// Soft-deletes a batch of records, all-or-nothing.
    ///
    /// Any id that is missing or owned by another user fails the whole batch
    /// with `PartialOwnership` and leaves every row untouched. Ids that are
    /// owned but already deleted are skipped, mirroring `soft_delete`
    /// idempotence. Returns the number of rows actually flipped.
    pub fn bulk_soft_delete(&self, user_id: &str, ids: &[String]) -> Result<usize, StoreError> {
        require_caller(user_id)?;
        if ids.is_empty() {
            return Ok(0);
        }
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = Utc::now();
        let mut flipped = 0;
        {
            let mut ownership =
                tx.prepare("SELECT user_id, is_deleted FROM esg_responses WHERE id = ?1")?;
            for id in ids {
                let row: Option<(String, bool)> = ownership
                    .query_row(params![id], |r| Ok((r.get(0)?, r.get(1)?)))
                    .optional()?;
                match row {
                    Some((owner, already_deleted)) if owner == user_id => {
                        if !already_deleted {
                            tx.execute(
                                "UPDATE esg_responses SET is_deleted = 1, deleted_at = ?1, \
                                 updated_at = ?1 WHERE id = ?2",
                                params![now, id],
                            )?;
                            flipped += 1;
                        }
                    }
                    // Missing and foreign-owned look the same to the caller.
                    _ => return Err(StoreError::PartialOwnership),
                }
            }
        }
        tx.commit()?;
        Ok(flipped)
    }
}

fn require_caller(user_id: &str) -> Result<(), StoreError> {
    if user_id.trim().is_empty() {
        return Err(StoreError::Unauthorized);
    }
    Ok(())
}

fn validate_inputs(financial_year: i32, inputs: &MetricInputs) -> Result<(), StoreError> {
    if financial_year <= 0 {
        return Err(StoreError::InvalidInput(
            "financialYear must be a positive integer".to_string(),
        ));
    }
    for (name, value) in inputs.numeric_fields() {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(StoreError::InvalidInput(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }
    }
    if let Some(pct) = inputs.independent_board {
        if pct > 100.0 {
            return Err(StoreError::InvalidInput(
                "independentBoard must be between 0 and 100".to_string(),
            ));
        }
    }
    Ok(())
}

fn active_record(
    conn: &Connection,
    user_id: &str,
    financial_year: i32,
) -> Result<Option<EsgResponse>, StoreError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM esg_responses \
         WHERE user_id = ?1 AND financial_year = ?2 AND is_deleted = 0"
    );
    Ok(conn
        .query_row(&sql, params![user_id, financial_year], map_row)
        .optional()?)
}

fn record_by_id(conn: &Connection, id: &str) -> Result<Option<EsgResponse>, StoreError> {
    let sql = format!("SELECT {COLUMNS} FROM esg_responses WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], map_row).optional()?)
}

fn insert_record(
    conn: &Connection,
    user_id: &str,
    financial_year: i32,
    inputs: &MetricInputs,
) -> Result<EsgResponse, StoreError> {
    let mut raw = RawMetrics::default();
    inputs.apply_to(&mut raw);
    let derived = metrics::derive(&raw);
    let now = Utc::now();
    let record = EsgResponse {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        financial_year,
        total_electricity: raw.total_electricity,
        renewable_electricity: raw.renewable_electricity,
        total_fuel: raw.total_fuel,
        carbon_emissions: raw.carbon_emissions,
        total_employees: raw.total_employees,
        female_employees: raw.female_employees,
        training_hours: raw.training_hours,
        community_investment: raw.community_investment,
        independent_board: raw.independent_board,
        data_privacy_policy: raw.data_privacy_policy,
        total_revenue: raw.total_revenue,
        carbon_intensity: derived.carbon_intensity,
        renewable_ratio: derived.renewable_ratio,
        diversity_ratio: derived.diversity_ratio,
        community_spend_ratio: derived.community_spend_ratio,
        is_deleted: false,
        deleted_at: None,
        created_at: now,
        updated_at: now,
    };
    let result = conn.execute(
        "INSERT INTO esg_responses (\
            id, user_id, financial_year, \
            total_electricity, renewable_electricity, total_fuel, carbon_emissions, \
            total_employees, female_employees, training_hours, community_investment, \
            independent_board, data_privacy_policy, total_revenue, \
            carbon_intensity, renewable_ratio, diversity_ratio, community_spend_ratio, \
            is_deleted, deleted_at, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, \
                 ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
        params![
            record.id,
            record.user_id,
            record.financial_year,
            record.total_electricity,
            record.renewable_electricity,
            record.total_fuel,
            record.carbon_emissions,
            record.total_employees,
            record.female_employees,
            record.training_hours,
            record.community_investment,
            record.independent_board,
            record.data_privacy_policy,
            record.total_revenue,
            record.carbon_intensity,
            record.renewable_ratio,
            record.diversity_ratio,
            record.community_spend_ratio,
            record.is_deleted,
            record.deleted_at,
            record.created_at,
            record.updated_at,
        ],
    );
    match result {
        Ok(_) => Ok(record),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            Err(StoreError::Conflict(financial_year))
        }
        Err(err) => Err(err.into()),
    }
}

fn update_record(
    conn: &Connection,
    existing: &EsgResponse,
    inputs: &MetricInputs,
) -> Result<EsgResponse, StoreError> {
    let mut raw = existing.raw_metrics();
    inputs.apply_to(&mut raw);
    let derived = metrics::derive(&raw);
    let now = Utc::now();
    conn.execute(
        "UPDATE esg_responses SET \
            total_electricity = ?1, renewable_electricity = ?2, total_fuel = ?3, \
            carbon_emissions = ?4, total_employees = ?5, female_employees = ?6, \
            training_hours = ?7, community_investment = ?8, independent_board = ?9, \
            data_privacy_policy = ?10, total_revenue = ?11, \
            carbon_intensity = ?12, renewable_ratio = ?13, diversity_ratio = ?14, \
            community_spend_ratio = ?15, updated_at = ?16 \
         WHERE id = ?17",
        params![
            raw.total_electricity,
            raw.renewable_electricity,
            raw.total_fuel,
            raw.carbon_emissions,
            raw.total_employees,
            raw.female_employees,
            raw.training_hours,
            raw.community_investment,
            raw.independent_board,
            raw.data_privacy_policy,
            raw.total_revenue,
            derived.carbon_intensity,
            derived.renewable_ratio,
            derived.diversity_ratio,
            derived.community_spend_ratio,
            now,
            existing.id,
        ],
    )?;
    Ok(EsgResponse {
        total_electricity: raw.total_electricity,
        renewable_electricity: raw.renewable_electricity,
        total_fuel: raw.total_fuel,
        carbon_emissions: raw.carbon_emissions,
        total_employees: raw.total_employees,
        female_employees: raw.female_employees,
        training_hours: raw.training_hours,
        community_investment: raw.community_investment,
        independent_board: raw.independent_board,
        data_privacy_policy: raw.data_privacy_policy,
        total_revenue: raw.total_revenue,
        carbon_intensity: derived.carbon_intensity,
        renewable_ratio: derived.renewable_ratio,
        diversity_ratio: derived.diversity_ratio,
        community_spend_ratio: derived.community_spend_ratio,
        updated_at: now,
        ..existing.clone()
    })
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EsgResponse> {
    Ok(EsgResponse {
        id: row.get(0)?,
        user_id: row.get(1)?,
        financial_year: row.get(2)?,
        total_electricity: row.get(3)?,
        renewable_electricity: row.get(4)?,
        total_fuel: row.get(5)?,
        carbon_emissions: row.get(6)?,
        total_employees: row.get(7)?,
        female_employees: row.get(8)?,
        training_hours: row.get(9)?,
        community_investment: row.get(10)?,
        independent_board: row.get(11)?,
        data_privacy_policy: row.get(12)?,
        total_revenue: row.get(13)?,
        carbon_intensity: row.get(14)?,
        renewable_ratio: row.get(15)?,
        diversity_ratio: row.get(16)?,
        community_spend_ratio: row.get(17)?,
        is_deleted: row.get(18)?,
        deleted_at: row.get(19)?,
        created_at: row.get(20)?,
        updated_at: row.get(21)?,
    })
}
