//! Report store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the five report operations over the `plc_data` table.
//! - Keep SQL and row encoding inside the persistence boundary.
//!
//! # Invariants
//! - `id` and `created_at` are written once on insert and never updated.
//! - A missing target row is reported as `RepoError::NotFound`, never as an
//!   opaque driver error.
//! - Read paths reject undecodable rows instead of masking them.
//! - Writes take the write lock up front (`BEGIN IMMEDIATE`) so concurrent
//!   writers queue on the busy timeout instead of failing on lock upgrade.

use crate::db::DbError;
use crate::model::report::{GatewayReport, NewReport, ReportId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row, ToSql, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const REPORT_COLUMNS: &str = "id, gateway_id, data, created_at";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for report persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ReportId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "report not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted report data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence boundary for gateway reports.
pub trait ReportStore {
    /// Inserts a new record and returns it with its assigned id/timestamp.
    fn create_report(&self, report: &NewReport) -> RepoResult<GatewayReport>;
    /// Returns every stored record in insertion order.
    fn list_reports(&self) -> RepoResult<Vec<GatewayReport>>;
    fn get_report(&self, id: ReportId) -> RepoResult<GatewayReport>;
    /// Replaces `gateway_id` and `data`, leaving `id` and `created_at` intact.
    fn update_report(&self, id: ReportId, report: &NewReport) -> RepoResult<GatewayReport>;
    fn delete_report(&self, id: ReportId) -> RepoResult<()>;
}

/// SQLite-backed report store.
pub struct SqliteReportStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReportStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn write<T>(&self, op: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let value = op(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

impl ReportStore for SqliteReportStore<'_> {
    fn create_report(&self, report: &NewReport) -> RepoResult<GatewayReport> {
        let data = encode_data(report)?;
        let created_at = Utc::now().timestamp_millis();

        self.write(|conn| {
            query_one(
                conn,
                &format!(
                    "INSERT INTO plc_data (gateway_id, data, created_at)
                     VALUES (?1, ?2, ?3)
                     RETURNING {REPORT_COLUMNS};"
                ),
                params![report.gateway_id(), data, created_at],
            )?
            .ok_or_else(|| RepoError::InvalidData("insert returned no row".to_string()))
        })
    }

    fn list_reports(&self) -> RepoResult<Vec<GatewayReport>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {REPORT_COLUMNS} FROM plc_data ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut reports = Vec::new();

        while let Some(row) = rows.next()? {
            reports.push(parse_report_row(row)?);
        }

        Ok(reports)
    }

    fn get_report(&self, id: ReportId) -> RepoResult<GatewayReport> {
        query_one(
            self.conn,
            &format!("SELECT {REPORT_COLUMNS} FROM plc_data WHERE id = ?1;"),
            params![id],
        )?
        .ok_or(RepoError::NotFound(id))
    }

    fn update_report(&self, id: ReportId, report: &NewReport) -> RepoResult<GatewayReport> {
        let data = encode_data(report)?;

        self.write(|conn| {
            query_one(
                conn,
                &format!(
                    "UPDATE plc_data
                     SET
                        gateway_id = ?1,
                        data = ?2
                     WHERE id = ?3
                     RETURNING {REPORT_COLUMNS};"
                ),
                params![report.gateway_id(), data, id],
            )?
            .ok_or(RepoError::NotFound(id))
        })
    }

    fn delete_report(&self, id: ReportId) -> RepoResult<()> {
        self.write(|conn| {
            let changed = conn.execute("DELETE FROM plc_data WHERE id = ?1;", [id])?;

            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }

            Ok(())
        })
    }
}

fn query_one(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> RepoResult<Option<GatewayReport>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_report_row(row)?));
    }

    Ok(None)
}

fn encode_data(report: &NewReport) -> RepoResult<String> {
    serde_json::to_string(report.data())
        .map_err(|err| RepoError::InvalidData(format!("cannot encode report data: {err}")))
}

fn parse_report_row(row: &Row<'_>) -> RepoResult<GatewayReport> {
    let id: ReportId = row.get("id")?;

    let data_text: String = row.get("data")?;
    let data = serde_json::from_str(&data_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid json in plc_data.data for id {id}: {err}"))
    })?;

    let created_at_ms: i64 = row.get("created_at")?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(created_at_ms).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{created_at_ms}` in plc_data.created_at for id {id}"
        ))
    })?;

    Ok(GatewayReport {
        id,
        gateway_id: row.get("gateway_id")?,
        data,
        created_at,
    })
}
