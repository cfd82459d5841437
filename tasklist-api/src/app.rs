/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasklist_api::{app::{build_router, AppState}, config::Config};
/// use tasklist_shared::store::memory::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::with_store(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tasklist_shared::{
    auth::middleware::authenticate,
    services::task_service::TaskService,
    store::{TaskStore, UserStore},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; every field
/// is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Account storage
    pub users: Arc<dyn UserStore>,

    /// Ownership-scoped task operations
    pub tasks: TaskService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>, config: Config) -> Self {
        Self {
            users,
            tasks: TaskService::new(tasks),
            config: Arc::new(config),
        }
    }

    /// State backed by one store for both users and tasks
    pub fn with_store<S>(store: Arc<S>, config: Config) -> Self
    where
        S: UserStore + TaskStore + 'static,
    {
        Self::new(store.clone(), store, config)
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health
/// └── /api/
///     ├── /auth/
///     │   ├── POST /register
///     │   └── POST /login
///     ├── /users/             (authenticated)
///     │   └── GET  /me
///     └── /tasks/             (authenticated)
///         ├── GET    /        ?status=completed|pending
///         ├── POST   /
///         ├── GET    /:id
///         ├── PUT    /:id
///         └── DELETE /:id
/// ```
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let user_routes = Router::new().route("/me", get(routes::users::me));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
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
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Verifies the bearer token and injects `AuthUser` into request extensions
///
/// Rejects with 401 before the handler runs.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = authenticate(req.headers(), state.jwt_secret()).map_err(|e| {
        debug!(path = %req.uri().path(), error = %e, "Rejected unauthenticated request");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(auth_user);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_shared::store::memory::MemoryStore;

    #[test]
    fn test_app_state_shares_config() {
        let state = AppState::with_store(Arc::new(MemoryStore::new()), Config::for_testing());
        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.config, &cloned.config));
        assert_eq!(cloned.jwt_secret(), crate::config::TEST_JWT_SECRET);
    }
}
