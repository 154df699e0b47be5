//! plclink_server - HTTP adapter for gateway-report ingestion.
//!
//! Translates HTTP requests into `plclink_core` service calls and service
//! outcomes into status codes. Holds no business rules of its own.
//!
//! # Usage
//!
//! ```ignore
//! use plclink_core::Database;
//! use plclink_server::{create_router, AppState};
//!
//! let database = Database::open("plclink.sqlite3")?;
//! let router = create_router(AppState::new(database), true);
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, FaultDomain};
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

/// Create the REST router with the given application state.
///
/// `cors_enabled` installs a permissive CORS layer (any origin, method and
/// header).
pub fn create_router(state: AppState, cors_enabled: bool) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/gateway",
            get(handlers::reports::list_reports).post(handlers::reports::create_report),
        )
        .route(
            "/gateway/{id}",
            get(handlers::reports::get_report)
                .put(handlers::reports::update_report)
                .delete(handlers::reports::delete_report),
        )
        .route("/nodered", post(handlers::status::confirm_status))
        .with_state(state);

    if cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}
