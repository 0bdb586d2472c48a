//! HTTP Server and Metrics Exposition
//!
//! This module implements the exporter's HTTP server. Every scrape runs the
//! ZFS listing commands on the request's task; there is no background loop and
//! no state shared between requests.
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to metrics and health
//! - `GET /metrics` - Prometheus metrics in text format (path is configurable)
//! - `GET /health` - Liveness check, always 200
//!
//! # Error Handling
//!
//! A scrape always answers `200 OK`. Failing commands produce fewer lines (see
//! [`crate::collectors`]). An unexpected collection error drops only that
//! collector's lines and appends a `# Error: <message>` comment after all
//! rendered lines, so a partially failed scrape is only distinguishable by its
//! content and the logs.

use crate::collectors::{self, CollectionContext, CollectionResult};
use crate::config::{Config, MetricsConfig, HEALTH_PATH};
use crate::error::ExporterError;
use crate::metrics::{render_lines, LabelEscaping};
use crate::zfs::{CommandRunner, SystemCommandRunner};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Content type of the Prometheus text exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Per-server state; read-only for the lifetime of the process
pub struct AppState<R> {
    config: Arc<Config>,
    runner: Arc<R>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            runner: self.runner.clone(),
        }
    }
}

impl<R: CommandRunner + 'static> AppState<R> {
    pub fn new(config: Config, runner: R) -> Self {
        Self {
            config: Arc::new(config),
            runner: Arc::new(runner),
        }
    }
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let runner = SystemCommandRunner::from_config(&config.zfs);
    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let metrics_path = config.server.metrics_path.clone();

    let app = router(AppState::new(config, runner));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}{}", addr, metrics_path);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router for the given state
pub fn router<R: CommandRunner + 'static>(state: AppState<R>) -> Router {
    let metrics_path = state.config.server.metrics_path.clone();

    let mut app = Router::new()
        .route(&metrics_path, get(metrics_handler::<R>))
        .route(HEALTH_PATH, get(health_handler));
    if metrics_path != "/" {
        app = app.route("/", get(root_handler::<R>));
    }
    app.with_state(state)
}

/// Run one full scrape and return the exposition document
///
/// Pool lines come first, then filesystem lines, each group in command output order.
/// An unexpected error in one collector does not stop the other; one `# Error:`
/// comment per failed collector closes the document.
#[instrument(name = "scrape", skip_all)]
pub async fn scrape<R: CommandRunner>(config: &Config, runner: &R) -> String {
    let ctx = CollectionContext {
        runner,
        zfs: &config.zfs,
    };
    let escaping = LabelEscaping::from_flag(config.metrics.escape_label_values);

    let mut body = String::new();
    let errors = collect_into(&ctx, &config.metrics, escaping, &mut body).await;
    if errors.is_empty() {
        info!("Metrics exported successfully");
    }
    for e in errors {
        error!("Error while exporting metrics: {}", e);
        body.push_str(&format!("# Error: {}\n", e));
    }
    body
}

async fn collect_into<R: CommandRunner>(
    ctx: &CollectionContext<'_, R>,
    metrics: &MetricsConfig,
    escaping: LabelEscaping,
    body: &mut String,
) -> Vec<ExporterError> {
    let mut errors = Vec::new();
    if metrics.collect_pool_metrics {
        append_lines(collectors::collect_pool_metrics(ctx).await, escaping, body, &mut errors);
    }
    if metrics.collect_filesystem_metrics {
        append_lines(
            collectors::collect_filesystem_metrics(ctx).await,
            escaping,
            body,
            &mut errors,
        );
    }
    errors
}

fn append_lines(
    result: CollectionResult,
    escaping: LabelEscaping,
    body: &mut String,
    errors: &mut Vec<ExporterError>,
) {
    match result {
        Ok(lines) => body.push_str(&render_lines(&lines, escaping)),
        Err(e) => errors.push(e),
    }
}

async fn root_handler<R: CommandRunner + 'static>(
    State(state): State<AppState<R>>,
) -> impl IntoResponse {
    axum::response::Html(format!(
        r#"<html>
<head><title>ZFS Exporter</title></head>
<body>
<h1>ZFS Prometheus Exporter</h1>
<p><a href="{}">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
        state.config.server.metrics_path
    ))
}

async fn metrics_handler<R: CommandRunner + 'static>(
    State(state): State<AppState<R>>,
) -> Response {
    let body = scrape(&state.config, state.runner.as_ref()).await;
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}

async fn health_handler() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "OK")
}
