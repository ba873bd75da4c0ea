use crate::models::{DbSession, DbUser};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// User Repository

pub async fn create_user(
    pool: &Pool<Postgres>,
    username: &str,
    password_hash: &str,
) -> Result<DbUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, username, password_hash, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, password_hash, created_at
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, password_hash, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_username(
    pool: &Pool<Postgres>,
    username: &str,
) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, password_hash, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

// Session Repository

pub async fn create_session(
    pool: &Pool<Postgres>,
    token: &str,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<DbSession> {
    let now = Utc::now();

    let session = sqlx::query_as::<_, DbSession>(
        r#"
        INSERT INTO sessions (token, user_id, expires_at, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING token, user_id, expires_at, created_at
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(expires_at)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

pub async fn get_session(pool: &Pool<Postgres>, token: &str) -> Result<Option<DbSession>> {
    let session = sqlx::query_as::<_, DbSession>(
        r#"
        SELECT token, user_id, expires_at, created_at
        FROM sessions
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

pub async fn delete_session(pool: &Pool<Postgres>, token: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE token = $1
        "#,
    )
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}

/// Removes sessions that expired before `now`. Returns how many were dropped.
pub async fn delete_expired_sessions(pool: &Pool<Postgres>, now: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE expires_at <= $1
        "#,
    )
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
