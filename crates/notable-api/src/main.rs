//! notable-api - HTTP API server for notable

use std::net::SocketAddr;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use notable_core::{CreateNoteRequest, NoteRepository, TagRepository, UpdateNoteRequest};
use notable_db::{Database, PoolConfig};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically, which keeps
/// log correlation straightforward.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    db: Database,
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Parse allowed origins from a comma-separated list.
///
/// An empty list means no cross-origin access: the CORS layer simply never
/// matches a requesting origin.
fn parse_allowed_origins(origins_str: &str) -> Vec<HeaderValue> {
    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

fn allowed_origins_from_env() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS").unwrap_or_default();
    parse_allowed_origins(&origins_str)
}

// =============================================================================
// STARTUP
// =============================================================================

fn init_tracing() {
    // Environment variables:
    //   LOG_FORMAT - "json" or "text" (default: "text")
    //   RUST_LOG   - standard env filter (default: "notable_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "notable_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!(log_format = %log_format, "Logging initialized");
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Notes CRUD
        .route("/api/notes", get(list_notes).post(create_note))
        .route(
            "/api/notes/:id",
            get(get_note).put(update_note).delete(delete_note),
        )
        // Tags
        .route("/api/tags", get(list_tags))
        .route("/api/tags/:name", get(get_tag_with_notes))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins_from_env()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024)) // 2 MB
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    // Get configuration from environment
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/notable".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    // Connect to database; pool sizing comes from DATABASE_* env vars
    info!("Connecting to database...");
    let pool_config = PoolConfig::from_env()?;
    let db = Database::connect_with_config(&database_url, pool_config).await?;
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    let app = build_router(AppState { db });

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// SYSTEM HANDLERS
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "notable-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// NOTE HANDLERS
// =============================================================================

async fn list_notes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let notes = state.db.notes.list().await?;
    Ok(Json(notes))
}

async fn create_note(
    State(state): State<AppState>,
    Json(body): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.db.notes.create(body).await?;
    Ok(Json(note))
}

async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    match state.db.notes.get(id).await? {
        Some(note) => Ok(Json(note)),
        None => Err(ApiError::NotFound("Note not found".to_string())),
    }
}

async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    match state.db.notes.update(id, body).await? {
        Some(note) => Ok(Json(note)),
        None => Err(ApiError::NotFound("Note not found.".to_string())),
    }
}

async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    match state.db.notes.delete(id).await? {
        Some(_) => Ok(Json(serde_json::json!({ "message": "Note deleted" }))),
        None => Err(ApiError::NotFound("Note not found.".to_string())),
    }
}

// =============================================================================
// TAG HANDLERS
// =============================================================================

async fn list_tags(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let tags = state.db.tags.list().await?;
    Ok(Json(tags))
}

/// A miss comes back as a 200 sentinel body, never a 404; the lookup enum
/// serializes either shape directly.
async fn get_tag_with_notes(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let lookup = state.db.tags.get_by_name_with_notes(&name).await?;
    Ok(Json(lookup))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
enum ApiError {
    Database(notable_core::Error),
    NotFound(String),
    BadRequest(String),
}

impl From<notable_core::Error> for ApiError {
    fn from(err: notable_core::Error) -> Self {
        match &err {
            notable_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            notable_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "detail": message,
        }));

        (status, body).into_response()
    }
}
