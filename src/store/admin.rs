use sqlx::MySqlPool;

use super::StoreError;
use crate::model::admin::AdminConfig;

pub async fn fetch(pool: &MySqlPool) -> Result<Option<AdminConfig>, StoreError> {
    let config = sqlx::query_as::<_, AdminConfig>(
        "SELECT id, password_hash FROM admin_config WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(config)
}

pub async fn update_password(pool: &MySqlPool, password_hash: &str) -> Result<(), StoreError> {
    sqlx::query("UPDATE admin_config SET password_hash = ? WHERE id = 1")
        .bind(password_hash)
        .execute(pool)
        .await?;

    Ok(())
}

/// Seeds the singleton credential row with the default password on first
/// boot. Returns true when a row was inserted.
pub async fn bootstrap(pool: &MySqlPool, default_hash: &str) -> Result<bool, StoreError> {
    if fetch(pool).await?.is_some() {
        return Ok(false);
    }

    sqlx::query("INSERT INTO admin_config (id, password_hash) VALUES (1, ?)")
        .bind(default_hash)
        .execute(pool)
        .await?;

    Ok(true)
}
