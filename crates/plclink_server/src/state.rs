//! Application state for the HTTP layer

use plclink_core::{Database, ReportService, ServiceError, ServiceResult, SqliteReportStore};

use crate::error::{ApiError, FaultDomain};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    database: Database,
}

impl AppState {
    /// Create a new AppState around an opened storage client
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Run a report use case on a blocking worker with its own connection.
    ///
    /// Service failures are translated with `domain`, which decides whether a
    /// storage fault is reported as 400 or 500.
    pub async fn run_report_service<T, F>(&self, domain: FaultDomain, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&ReportService<SqliteReportStore<'_>>) -> ServiceResult<T> + Send + 'static,
    {
        let database = self.database.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let conn = database
                .connect()
                .map_err(|err| ServiceError::Storage(err.into()))?;
            let service = ReportService::new(SqliteReportStore::new(&conn));
            op(&service)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("report task failed: {err}")))?;

        outcome.map_err(|err| ApiError::from_service(err, domain))
    }
}
