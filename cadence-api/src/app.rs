/// Application state and router builder
///
/// Defines the shared state handed to every handler and builds the Axum
/// router with CORS, request tracing and session authentication.
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Liveness probe (public)
/// └── /v1/                           # Authenticated API
///     ├── /tasks                     # POST create, GET list
///     ├── /tasks/:id                 # GET status, PATCH, DELETE
///     ├── /tasks/:id/completions     # POST record, GET history
///     ├── /tasks/:id/comments        # POST add, GET thread
///     ├── /comments/:id              # DELETE
///     ├── /me                        # GET profile
///     ├── /me/preferences            # PATCH
///     └── /me/profile-pictures       # POST upload, GET list
/// ```
///
/// Authentication is a session-token lookup: the external auth collaborator
/// mints tokens and persists them through the store; this middleware only
/// resolves `Authorization: Bearer <token>` against the sessions table and
/// injects the resulting [`Caller`] into request extensions.

use crate::config::Config;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use cadence_store::authz::Caller;
use cadence_store::models::session::Session;
use cadence_store::models::user::User;
use cadence_store::store::TaskStore;
use chrono::Utc;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; the store holds the
/// pool, the config sits behind an Arc.
#[derive(Clone)]
pub struct AppState {
    /// The task tracking store
    pub store: TaskStore,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: TaskStore, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Everything under /v1 requires a valid session
    let v1_routes = Router::new()
        .route("/tasks", post(routes::tasks::create_task))
        .route("/tasks", get(routes::tasks::list_tasks))
        .route("/tasks/:id", get(routes::tasks::get_task))
        .route("/tasks/:id", patch(routes::tasks::update_task))
        .route("/tasks/:id", delete(routes::tasks::delete_task))
        .route("/tasks/:id/completions", post(routes::tasks::record_completion))
        .route("/tasks/:id/completions", get(routes::tasks::list_completions))
        .route("/tasks/:id/comments", post(routes::comments::add_comment))
        .route("/tasks/:id/comments", get(routes::comments::list_comments))
        .route("/comments/:id", delete(routes::comments::delete_comment))
        .route("/me", get(routes::me::get_me))
        .route("/me/preferences", patch(routes::me::update_preferences))
        .route("/me/profile-pictures", post(routes::me::add_profile_picture))
        .route("/me/profile-pictures", get(routes::me::list_profile_pictures))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Session authentication middleware
///
/// Resolves the bearer token against the sessions table, rejects expired
/// sessions, loads the user and injects a [`Caller`] into request
/// extensions. The store trusts this identity and never re-derives it.
async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    use crate::error::ApiError;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let session = Session::find_by_token(state.store.pool(), token)
        .await?
        .filter(|s| s.is_valid(Utc::now()))
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

    let user = User::find_by_id(state.store.pool(), &session.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Session user no longer exists".to_string()))?;

    req.extensions_mut().insert(Caller::new(user.id, user.role));

    Ok(next.run(req).await)
}
