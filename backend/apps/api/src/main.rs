//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use auth::domain::repository::{SessionRegistry, UserRepository};
use auth::{
    AuthAppState, AuthConfig, InMemorySessionRegistry, InMemoryUserRepository, PgUserRepository,
    auth_router, users_router,
};
use axum::{
    Json, Router,
    extract::State,
    http::{self, Method, StatusCode, header},
    routing::get,
};
use kernel::clock::{Clock, SystemClock};
use planning::domain::repository::{AssignmentRepository, ServiceRepository, SongRepository};
use planning::{InMemoryPlanningRepository, PgPlanningRepository, PlanningAppState, planning_router};
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SWEEP_SECS: u64 = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,planning=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = connect_database().await?;
    let config = auth_config()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sessions = Arc::new(InMemorySessionRegistry::new());
    let sweep_every = env::var("SESSION_SWEEP_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_SWEEP_SECS);
    let _sweep = spawn_session_sweep(sessions.clone(), clock.clone(), Duration::from_secs(sweep_every));

    let app = match pool {
        Some(pool) => {
            let auth = AuthAppState::new(
                Arc::new(PgUserRepository::new(pool.clone())),
                sessions,
                clock,
                config,
            );
            let repo = Arc::new(PgPlanningRepository::new(pool.clone()));
            build_router(auth, repo, Some(pool))
        }
        None => {
            let auth = AuthAppState::new(
                Arc::new(InMemoryUserRepository::new()),
                sessions,
                clock,
                config,
            );
            build_router(auth, Arc::new(InMemoryPlanningRepository::new()), None)
        }
    };

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer());

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BIND_ADDR must be host:port")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Postgres pool with migrations applied
///
/// Debug builds without `DATABASE_URL` fall back to in-memory stores.
async fn connect_database() -> anyhow::Result<Option<PgPool>> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            return Ok(None);
        }
        Err(_) => anyhow::bail!("DATABASE_URL must be set in production"),
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    Ok(Some(pool))
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let config = match env::var("JWT_SECRET_KEY") {
        Ok(secret) if !secret.is_empty() => AuthConfig::new(secret),
        _ if cfg!(debug_assertions) => {
            tracing::warn!("JWT_SECRET_KEY not set, tokens will not survive a restart");
            AuthConfig::with_random_secret()
        }
        _ => anyhow::bail!("JWT_SECRET_KEY must be set in production"),
    };

    Ok(match env::var("PASSWORD_PEPPER") {
        Ok(pepper) if !pepper.is_empty() => config.with_pepper(pepper),
        _ => config,
    })
}

fn cors_layer() -> CorsLayer {
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

/// Health route plus the auth, users and planning routers
fn build_router<U, R>(
    auth: AuthAppState<U, InMemorySessionRegistry>,
    repo: Arc<R>,
    pool: Option<PgPool>,
) -> Router
where
    U: UserRepository + Sync + 'static,
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
{
    let planning = PlanningAppState::new(repo, auth.clone());

    Router::new()
        .route("/", get(health))
        .with_state(pool)
        .nest("/auth", auth_router(auth.clone()))
        .nest("/users", users_router(auth))
        .merge(planning_router(planning))
}

/// GET /
async fn health(State(pool): State<Option<PgPool>>) -> (StatusCode, Json<Value>) {
    let Some(pool) = pool else {
        return (StatusCode::OK, Json(json!({"Success": true})));
    };

    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => (StatusCode::OK, Json(json!({"Success": true}))),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"Success": false})),
            )
        }
    }
}

/// Periodically drop expired sessions from the registry
fn spawn_session_sweep<S>(sessions: Arc<S>, clock: Arc<dyn Clock>, every: Duration) -> JoinHandle<()>
where
    S: SessionRegistry + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match sessions.purge_expired(clock.now()).await {
                Ok(0) => {}
                Ok(purged) => tracing::debug!(purged, "Expired sessions purged"),
                Err(e) => tracing::warn!(error = %e, "Session sweep failed, retrying next tick"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use kernel::clock::ManualClock;
    use tower::ServiceExt;

    fn memory_app(clock: Arc<ManualClock>) -> (Router, Arc<InMemorySessionRegistry>) {
        let sessions = Arc::new(InMemorySessionRegistry::new());
        let auth = AuthAppState::new(
            Arc::new(InMemoryUserRepository::new()),
            sessions.clone(),
            clock,
            AuthConfig::new("test-secret"),
        );
        let router = build_router(auth, Arc::new(InMemoryPlanningRepository::new()), None);
        (router, sessions)
    }

    async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_without_database() {
        let (router, _) = memory_app(Arc::new(ManualClock::default()));

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = call(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"Success": true}));
    }

    #[tokio::test]
    async fn test_routers_are_mounted() {
        let (router, _) = memory_app(Arc::new(ManualClock::default()));

        let request = Request::builder()
            .method("POST")
            .uri("/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"username": "ana", "email": "ana@example.com", "password": "s3cret"})
                    .to_string(),
            ))
            .unwrap();
        let (status, body) = call(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        for uri in ["/users/me", "/services", "/songs"] {
            let request = Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap();
            let (status, _) = call(&router, request).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_sweep_purges_expired_sessions() {
        let clock = Arc::new(ManualClock::default());
        let (router, sessions) = memory_app(clock.clone());

        let request = Request::builder()
            .method("POST")
            .uri("/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"username": "ana", "email": "ana@example.com", "password": "s3cret"})
                    .to_string(),
            ))
            .unwrap();
        call(&router, request).await;
        assert_eq!(sessions.len().await, 1);

        clock.advance(chrono::Duration::minutes(11));
        // The first tick fires immediately.
        let sweep = spawn_session_sweep(sessions.clone(), clock, Duration::from_secs(60));
        for _ in 0..100 {
            if sessions.is_empty().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(sessions.is_empty().await);
        sweep.abort();
    }
}
