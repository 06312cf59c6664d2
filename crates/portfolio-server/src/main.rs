use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use portfolio_api::auth::{self, AdminAccount, AppState, AppStateInner};
use portfolio_api::middleware::require_auth;
use portfolio_api::{admin, contact, tags};
use portfolio_types::validation::ContactValidator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("PORTFOLIO_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("PORTFOLIO_DB_PATH").unwrap_or_else(|_| "portfolio.db".into());
    let host = std::env::var("PORTFOLIO_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PORTFOLIO_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let admin_user =
        std::env::var("PORTFOLIO_ADMIN_USER").unwrap_or_else(|_| "admin".into());
    let admin_password = match std::env::var("PORTFOLIO_ADMIN_PASSWORD") {
        Ok(p) => p,
        Err(_) => {
            warn!("PORTFOLIO_ADMIN_PASSWORD not set, using the development default");
            "admin123".into()
        }
    };

    // Init database
    let db = portfolio_db::Database::open(&PathBuf::from(&db_path))?;

    if std::env::var("PORTFOLIO_SEED_DEMO").is_ok() {
        seed_demo_tags(&db)?;
    }

    // The single admin account, hashed fresh each boot.
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(admin_password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash admin password: {}", e))?
        .to_string();

    let app_state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        admin: AdminAccount {
            id: Uuid::new_v4(),
            username: admin_user,
            password_hash,
        },
        validator: ContactValidator::default(),
    });

    // Routes
    let public_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/contact/submit", post(contact::submit))
        .route("/api/blog/tags", get(tags::list))
        .with_state(app_state.clone());

    let protected_routes = Router::new()
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/admin/submissions", get(admin::list_submissions))
        .route("/api/admin/submissions/{id}", patch(admin::update_submission))
        .layer(middleware::from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Portfolio API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed the tag table with the sample set the blog pipeline would normally
/// maintain, so a fresh checkout has something to list.
fn seed_demo_tags(db: &portfolio_db::Database) -> anyhow::Result<()> {
    let tags = [
        ("Django", 3),
        ("Python", 5),
        ("React", 4),
        ("JavaScript", 2),
        ("Web Development", 6),
        ("Backend", 3),
        ("API", 2),
        ("Database", 1),
    ];
    for (name, count) in tags {
        db.upsert_tag(name, count)?;
    }
    info!("Seeded {} demo tags", tags.len());
    Ok(())
}
