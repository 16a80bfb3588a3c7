use std::net::SocketAddr;

use axum::{
    extract::State,
    http::{header, HeaderName, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use time::OffsetDateTime;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::error::{expose_error_details, handle_panic, route_not_found};
use crate::state::AppState;
use crate::{auth, snippets};

const LOCAL_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:4173",
    "http://localhost:3000",
];

#[derive(Serialize)]
struct ServerStatus {
    status: &'static str,
    message: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    environment: Environment,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    database: &'static str,
}

async fn root(State(state): State<AppState>) -> Json<ServerStatus> {
    Json(ServerStatus {
        status: "success",
        message: "Server is running",
        timestamp: OffsetDateTime::now_utc(),
        environment: state.config.environment,
    })
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy",
        timestamp: OffsetDateTime::now_utc(),
        database: "configured",
    })
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ]);

    if !config.environment.is_production() {
        return layer.allow_origin(AllowOrigin::mirror_request());
    }

    let frontend_url = config.frontend_url.clone();
    layer.allow_origin(AllowOrigin::predicate(move |origin, _| {
        let allowed = origin
            .to_str()
            .map(|o| origin_allowed(o, frontend_url.as_deref()))
            .unwrap_or(false);
        if !allowed {
            tracing::warn!(origin = ?origin, "cors blocked origin");
        }
        allowed
    }))
}

/// Production origin check: known origins, anything containing one of them,
/// and Vercel preview domains.
fn origin_allowed(origin: &str, frontend_url: Option<&str>) -> bool {
    if origin.contains("vercel.app") || origin.contains("vercel.com") {
        return true;
    }
    LOCAL_ORIGINS
        .into_iter()
        .chain(frontend_url)
        .any(|allowed| origin.contains(allowed))
}

pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/auth", auth::router())
        .nest("/api/snippets", snippets::router())
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            expose_error_details,
        ))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(environment = ?config.environment, "listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
