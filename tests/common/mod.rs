#![allow(dead_code)]

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{DatabaseBackend, MockDatabase};
use tokio::sync::OnceCell;
use stadium_booking_api::{
    config::{AppConfig, DurationPolicy},
    db::{create_orm_conn, run_migrations},
    middleware::auth::{AuthUser, Claims},
    models::Role,
    state::AppState,
};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

// Migrate once per test binary, not once per test.
static MIGRATED: OnceCell<()> = OnceCell::const_new();

pub fn test_config(duration_policy: DurationPolicy) -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: JWT_SECRET.to_string(),
        duration_policy,
    }
}

pub fn mock_state(db: MockDatabase) -> AppState {
    AppState::new(db.into_connection(), test_config(DurationPolicy::Waived))
}

pub fn empty_mock_state() -> AppState {
    mock_state(MockDatabase::new(DatabaseBackend::Postgres))
}

/// Connects to `TEST_DATABASE_URL` (or `DATABASE_URL`) and applies migrations.
/// Returns `None` when neither is set so the caller can skip.
pub async fn db_state(duration_policy: DurationPolicy) -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run database tests.");
            return Ok(None);
        }
    };

    let orm = create_orm_conn(&database_url).await?;
    MIGRATED
        .get_or_try_init(|| run_migrations(&orm))
        .await?;
    Ok(Some(AppState::new(orm, test_config(duration_policy))))
}

pub fn actor(role: Role) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role,
    }
}

pub fn bearer(user: &AuthUser) -> String {
    let claims = Claims {
        sub: user.user_id.to_string(),
        role: user.role,
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("encode test token");
    format!("Bearer {token}")
}
