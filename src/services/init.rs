//! Startup helpers: database connection, migrations and the sync scheduler.

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Result;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::services::sync::{
    CatalogClient, EventSyncManager, SqliteEventStore, SyncHandle, SyncScheduler,
};

/// Redact potentially sensitive information from a database URL before logging.
///
/// Userinfo is dropped from parseable URLs; otherwise everything up to `@` is hidden.
pub fn redact_db_url(db_url: &str) -> String {
    if let Ok(url) = url::Url::parse(db_url) {
        let scheme = url.scheme();
        let host = url.host_str().unwrap_or("");
        let port_part = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
        let path = url.path();
        format!("{}://{}{}{}", scheme, host, port_part, path)
    } else {
        if let Some(at_pos) = db_url.find('@') {
            let without_creds = &db_url[at_pos + 1..];
            return format!("(redacted){}", without_creds);
        }
        "(redacted)".to_string()
    }
}

/// Open the SQLite pool, creating the database file and its directory if needed,
/// and run migrations.
pub async fn init_db(config: &Config) -> Result<sqlx::SqlitePool> {
    let db_url = &config.database.url;
    tracing::info!("Connecting to database: {}", redact_db_url(db_url));

    let db_path = db_url.strip_prefix("sqlite://").unwrap_or(db_url);
    let db_file_path = Path::new(db_path);

    let existed = db_file_path.exists();
    if let Some(parent) = db_file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                )
            })?;
            tracing::info!(
                "Database directory created or already exists: {}",
                parent.display()
            );
        }
    }

    let connect_options = sqlx::sqlite::SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(connect_options)
        .await?;

    if existed {
        tracing::info!("Connected to database file: {}", db_file_path.display());
    } else {
        tracing::info!("Created database file: {}", db_file_path.display());
    }

    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Start the event sync scheduler when sync is configured.
///
/// Returns the handle the HTTP layer uses for status and manual triggers, and
/// the scheduler task when one was spawned. A misconfigured HTTP client only
/// disables sync; the service keeps running.
pub fn spawn_sync_scheduler(
    config: &Config,
    pool: &sqlx::SqlitePool,
    cancel: CancellationToken,
) -> (SyncHandle, Option<JoinHandle<()>>) {
    let sync = &config.sync;
    if !sync.is_active() {
        tracing::info!(
            enabled = sync.enabled,
            organizers = sync.organizer_ids.len(),
            "Event sync disabled"
        );
        return (SyncHandle::disabled(), None);
    }

    let client = match CatalogClient::new(Duration::from_secs(sync.http_timeout_seconds)) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Failed to build catalog HTTP client, event sync disabled: {}", e);
            return (SyncHandle::disabled(), None);
        }
    };

    let store = Arc::new(SqliteEventStore::new(pool.clone()));
    let manager = Arc::new(EventSyncManager::new(store, client, sync));
    let handle = SyncHandle::new(true);
    let task = SyncScheduler::new(
        manager,
        Duration::from_secs(sync.interval_seconds),
        handle.clone(),
    )
    .spawn(cancel);

    (handle, Some(task))
}
