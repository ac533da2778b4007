//! Back-office HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, the events-backend client, the check-in resolver,
//! the survey reconciler, and the HTTP router, then starts the API server.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
mod api;
mod app;
mod config;
mod observability;
mod sessions;

use anyhow::Context;
use app::{AppState, build_router};
use lanyard_api::BackendClient;
use lanyard_checkin::CheckinResolver;
use lanyard_survey::SurveyReconciler;
use sessions::ScanSessionStore;
use std::future::Future;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::BackofficeConfig::from_env_or_yaml().expect("back-office config");
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: config::BackofficeConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability();
    let state = build_state(&config)?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);

    let addr = config.bind_addr;
    tracing::info!(%addr, backend = %config.backend_url, "back office listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

fn build_state(config: &config::BackofficeConfig) -> anyhow::Result<AppState> {
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("build http client")?;
    let client = BackendClient::with_http(config.backend_url.clone(), http.clone());

    Ok(AppState {
        resolver: Arc::new(CheckinResolver::with_page_size(
            client.clone(),
            config.page_size,
        )),
        reconciler: Arc::new(SurveyReconciler::new(client.clone())),
        sessions: Arc::new(ScanSessionStore::new(config.session_ttl)),
        client,
        http,
        page_size: config.page_size,
        api_version: "v1".to_string(),
    })
}
