use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Router,
    extract::MatchedPath,
    http::{HeaderValue, Method, Request, Response, header},
    middleware,
    routing::get,
};
use hospital_storage::RequestContext;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Span, field::Empty};

use crate::hospital_mgmt::{self, AppState};
use crate::{config::AppConfig, handlers, middleware as app_middleware};

const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);
const SHUTDOWN_DISCONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HospitalServer {
    addr: SocketAddr,
    app: Router,
    state: AppState,
}

pub fn build_app(cfg: &AppConfig, state: AppState) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/openapi", get(handlers::openapi))
        .merge(hospital_mgmt::api_routes())
        // Innermost first: request context, trace, cors, request id, body limit
        .layer(middleware::from_fn_with_state(
            state.clone(),
            app_middleware::request_context,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    let req_id = req
                        .extensions()
                        .get::<HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    let span = tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.route = Empty,
                        http.status_code = Empty,
                        request_id = %req_id
                    );
                    if let Some(route) = req.extensions().get::<MatchedPath>() {
                        span.record("http.route", route.as_str());
                    }
                    span
                })
                .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
                    span.record("http.status_code", res.status().as_u16());
                    tracing::info!(
                        http.status = %res.status().as_u16(),
                        elapsed_ms = %latency.as_millis(),
                        "request handled"
                    );
                }),
        )
        .layer(cors_layer())
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Any origin; credentials are never allowed.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::ORIGIN, header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    state: Option<AppState>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            state: None,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Uses prepared stores instead of building them from the configuration.
    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn build(self) -> HospitalServer {
        let state = self
            .state
            .unwrap_or_else(|| AppState::from_config(&self.config));
        tracing::info!(
            backend = %self.config.storage.backend,
            request_timeout_ms = self.config.server.request_timeout_ms,
            "Document stores configured"
        );
        let app = build_app(&self.config, state.clone());

        HospitalServer {
            addr: self.addr,
            app,
            state,
        }
    }
}

impl HospitalServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.state
            .disconnect_all(&RequestContext::with_timeout(SHUTDOWN_DISCONNECT_TIMEOUT))
            .await;
        tracing::info!("document stores disconnected");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("shutdown signal received");
}
