use sqlx::SqlitePool;

use crate::types::AppResult;

pub async fn health_check(pool: &SqlitePool) -> AppResult<bool> {
    let _result = sqlx::query("SELECT 1").fetch_one(pool).await?;

    Ok(true)
}
