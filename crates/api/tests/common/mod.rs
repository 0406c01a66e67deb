#![allow(dead_code)] // each test binary uses a different subset of helpers

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use uuid::Uuid;

use closer_api::auth::jwt::{generate_access_token, JwtConfig};
use closer_api::config::{CalendarConfig, ServerConfig};
use closer_api::routes;
use closer_api::state::AppState;
use closer_calendar::CalendarApi;

/// Signing secret shared between the test app and the token helper.
pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// A base URL nothing listens on; requests fail fast with connection refused.
pub const UNREACHABLE_CALENDAR: &str = "http://127.0.0.1:1";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(calendar_api_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        calendar: CalendarConfig {
            api_url: calendar_api_url.to_string(),
            calendar_id: "primary".to_string(),
            timezone: "Europe/Rome".to_string(),
            scheduler_sopralluogo_url: "https://calendly.com/closer/sopralluogo".to_string(),
            scheduler_preliminare_url: "https://calendly.com/closer/preliminare".to_string(),
        },
    }
}

/// Build the full application router with all middleware layers.
///
/// Both store pools point at the same test database (the two tables never
/// overlap, so one database stands in for both external projects). The
/// calendar client points at an unreachable address; use
/// [`build_test_app_with_calendar`] to point it at a stub server.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_calendar(pool, UNREACHABLE_CALENDAR)
}

/// Build the test app with the calendar client aimed at `calendar_api_url`.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app_with_calendar(pool: PgPool, calendar_api_url: &str) -> Router {
    let config = test_config(calendar_api_url);

    let state = AppState {
        calls_pool: pool.clone(),
        properties_pool: pool,
        config: Arc::new(config),
        calendar: Arc::new(CalendarApi::with_base_url(calendar_api_url.to_string())),
        calendar_session: Arc::new(RwLock::new(None)),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// A fresh `Authorization` header value for the test operator.
pub fn auth_header() -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
    };
    let token = generate_access_token("test-operator", 15, &config).expect("test token");
    format!("Bearer {token}")
}

async fn request(
    app: Router,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
) -> Response {
    let builder = Request::builder()
        .method(method)
        .uri(path)
        .header(AUTHORIZATION, auth_header());

    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, path: &str) -> Response {
    request(app, Method::GET, path, None).await
}

/// GET without an `Authorization` header, for auth-rejection tests.
pub async fn get_unauthenticated(app: Router, path: &str) -> Response {
    let req = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(req).await.unwrap()
}

pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    request(app, Method::POST, path, Some(body)).await
}

pub async fn put_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    request(app, Method::PUT, path, Some(body)).await
}

pub async fn patch_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    request(app, Method::PATCH, path, Some(body)).await
}

pub async fn delete(app: Router, path: &str) -> Response {
    request(app, Method::DELETE, path, None).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Insert a property row with the pipeline columns at their defaults.
pub async fn insert_property(
    pool: &PgPool,
    lead_id: Option<Uuid>,
    nome: &str,
    cognome: Option<&str>,
    telefono: &str,
    indirizzo: &str,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO properties (lead_id, lead_nome, lead_cognome, lead_telefono, indirizzo_completo)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(lead_id)
    .bind(nome)
    .bind(cognome)
    .bind(telefono)
    .bind(indirizzo)
    .fetch_one(pool)
    .await
    .expect("seed property")
}

/// Insert a call row. `created_at` defaults to now when `None`.
pub async fn insert_call(
    pool: &PgPool,
    lead_id: Option<Uuid>,
    nome: &str,
    telefono: &str,
    esito: &str,
    created_at: Option<DateTime<Utc>>,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO calls
            (lead_id, lead_nome, lead_telefono, transcript, esito_qualificazione,
             durata_chiamata, created_at)
         VALUES ($1, $2, $3, '[]'::jsonb, $4, 120, COALESCE($5, NOW()))
         RETURNING id",
    )
    .bind(lead_id)
    .bind(nome)
    .bind(telefono)
    .bind(esito)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .expect("seed call")
}

// ---------------------------------------------------------------------------
// Calendar provider stub
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct StubResponses {
    list_body: serde_json::Value,
    create_status: StatusCode,
    create_body: serde_json::Value,
}

/// Spawn a stub calendar provider on an ephemeral port and return its base
/// URL. `list_body` answers event listing; `create_status`/`create_body`
/// answer event creation.
pub async fn spawn_calendar_stub(
    list_body: serde_json::Value,
    create_status: StatusCode,
    create_body: serde_json::Value,
) -> String {
    let stub = StubResponses {
        list_body,
        create_status,
        create_body,
    };

    let app = Router::new()
        .route(
            "/calendars/{id}/events",
            axum::routing::get(|State(s): State<StubResponses>| async move { Json(s.list_body) })
                .post(|State(s): State<StubResponses>| async move {
                    (s.create_status, Json(s.create_body))
                }),
        )
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    format!("http://{addr}")
}
