//! plclink - gateway report ingestion server
//!
//! Usage:
//!   plclink [config.toml]
//!
//! Without a config file the defaults apply (port 8080, `plclink.sqlite3`
//! in the working directory). `PORT`, `PLCLINK_DATABASE_PATH`,
//! `PLCLINK_LOG_LEVEL` and `PLCLINK_LOG_DIR` override either.

use anyhow::Context;
use log::info;
use plclink_core::Database;
use plclink_server::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    plclink_core::init_logging(&config.log_level, config.log_dir.as_deref())
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let database = Database::open(&config.database_path).with_context(|| {
        format!(
            "failed to open database '{}'",
            config.database_path.display()
        )
    })?;

    let app = create_router(AppState::new(database.clone()), config.cors_enabled);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("event=server_start module=server status=ok addr={addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    database.close();
    Ok(())
}

fn load_config() -> anyhow::Result<ServerConfig> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => ServerConfig::load(&path).map_err(anyhow::Error::msg)?,
        None => ServerConfig::default(),
    };
    config
        .apply_env_overrides(|key| std::env::var(key).ok())
        .map_err(anyhow::Error::msg)?;
    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("event=signal_listen module=server status=error error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::error!("event=signal_listen module=server status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("event=shutdown_requested module=server status=ok");
}
