use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// Create the subscription table if it does not exist. Safe to call on
/// every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subscriptions (
            user_id INTEGER PRIMARY KEY,
            tags TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create subscriptions table")?;
    Ok(())
}

/// Fetch a user's stored tags in stored order; empty when the user never
/// subscribed.
pub async fn get_tags(pool: &SqlitePool, user_id: i64) -> Result<Vec<String>> {
    let row: Option<String> =
        sqlx::query_scalar("SELECT tags FROM subscriptions WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .context("failed to fetch tags")?;

    Ok(row
        .map(|tags| {
            tags.split(',')
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string())
                .collect()
        })
        .unwrap_or_default())
}

/// Replace a user's tag set wholesale (no merge). Each user's row is
/// independent, so concurrent writes for different users never touch each
/// other's subscription.
pub async fn set_tags(pool: &SqlitePool, user_id: i64, tags: &[String]) -> Result<()> {
    sqlx::query("REPLACE INTO subscriptions (user_id, tags) VALUES (?, ?)")
        .bind(user_id)
        .bind(tags.join(","))
        .execute(pool)
        .await
        .context("failed to store tags")?;
    Ok(())
}
