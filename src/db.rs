//! Database module
//!
//! Database connection and schema checks.

use sqlx::PgPool;

/// Tables the PostgreSQL stores read and write
pub const REQUIRED_TABLES: [&str; 3] = ["users", "follows", "notifications"];

/// Verify database connectivity
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables 
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    // Without the partial unique indexes find-or-create can duplicate rows
    for index in [
        "notifications_action_user_id",
        "notifications_action_organization_id",
    ] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM pg_indexes \
             WHERE schemaname = 'public' AND indexname = $1)",
        )
        .bind(index)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required unique index '{}' does not exist", index);
            return Ok(false);
        }
    }

    tracing::info!("Schema verified: {}", REQUIRED_TABLES.join(", "));
    Ok(true)
}
