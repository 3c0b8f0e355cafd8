use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod routes;
mod services;

use config::Config;
use services::{init, sync::SyncHandle};

pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: Config,
    pub sync: SyncHandle,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cfp_sync=debug,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/sync", routes::sync::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to bind SIGTERM: {}", e);
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
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;

    tracing::info!("Starting CFP event sync service");

    let pool = init::init_db(&config).await?;

    let cancel = CancellationToken::new();
    let (sync, scheduler) = init::spawn_sync_scheduler(&config, &pool, cancel.clone());

    let app_state = Arc::new(AppState {
        db: pool,
        config: config.clone(),
        sync,
    });

    let app = build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let server_fut = axum::serve(listener, app);

    // Dropping the server future stops accepting new connections.
    tokio::select! {
        res = server_fut => {
            if let Err(e) = res {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
        }
    }

    cancel.cancel();

    if let Some(task) = scheduler {
        let shutdown_wait = Duration::from_secs(15);
        tracing::info!(
            "Waiting up to {}s for the sync scheduler to exit",
            shutdown_wait.as_secs()
        );
        match tokio::time::timeout(shutdown_wait, task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Sync scheduler task failed: {:?}", e),
            Err(_) => tracing::warn!("Sync scheduler did not exit in time"),
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    async fn state() -> Arc<AppState> {
        Arc::new(AppState {
            db: db::test_pool().await,
            config: Config::default(),
            sync: SyncHandle::disabled(),
        })
    }

    #[tokio::test]
    async fn router_serves_health() {
        let response = build_router(state().await)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"], "ok");
        assert_eq!(json["sync_enabled"], false);
    }

    #[tokio::test]
    async fn router_nests_sync_routes() {
        let response = build_router(state().await)
            .oneshot(
                Request::builder()
                    .uri("/api/sync/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
