use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create parking_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS parking_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            slot_number INTEGER NOT NULL,
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            booked_by VARCHAR(255) NULL,
            valid_from TIMESTAMP WITH TIME ZONE NULL,
            valid_till TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT parking_slots_slot_number_key UNIQUE (slot_number),
            CONSTRAINT positive_slot_number CHECK (slot_number > 0),
            CONSTRAINT holder_iff_booked CHECK (is_available = (booked_by IS NULL)),
            CONSTRAINT window_pair CHECK ((valid_from IS NULL) = (valid_till IS NULL)),
            CONSTRAINT valid_window CHECK (valid_from IS NULL OR valid_from <= valid_till),
            CONSTRAINT no_window_when_free CHECK (NOT is_available OR valid_from IS NULL)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token VARCHAR(64) PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            expires_at TIMESTAMP WITH TIME ZONE NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_parking_slots_is_available ON parking_slots(is_available)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
