use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;

use crate::models::*;
use crate::types::{AppError, AppResult};

const EVENT_LOG_LIMIT: i64 = 1000;

pub struct DatabaseOperations;

impl DatabaseOperations {
    // Trámite operations

    /// Insert a validated trámite and return its new row id.
    ///
    /// `fecha` is assigned here, never by the caller.
    pub async fn insert_tramite(pool: &SqlitePool, tramite: &ValidTramite) -> AppResult<i64> {
        let fecha = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let extra = serde_json::to_string(&tramite.extra)?;

        let result = sqlx::query(
            r#"
            INSERT INTO tramites (tipo, nombre, documento, grado, extra, fecha)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(tramite.tipo.as_str())
        .bind(&tramite.nombre)
        .bind(&tramite.documento)
        .bind(&tramite.grado)
        .bind(&extra)
        .bind(&fecha)
        .execute(pool)
        .await
        .map_err(AppError::SaveTramite)?;

        let id = result.last_insert_rowid();
        tracing::info!(id, tipo = %tramite.tipo, "Trámite stored");
        Ok(id)
    }

    pub async fn get_tramite(pool: &SqlitePool, id: i64) -> AppResult<Option<TramiteRecord>> {
        let record = sqlx::query_as::<_, TramiteRecord>(
            "SELECT id, tipo, nombre, documento, grado, extra, fecha FROM tramites WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn count_tramites(pool: &SqlitePool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tramites")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    // Event log operations

    pub async fn insert_event(
        pool: &SqlitePool,
        event_type: EventType,
        intent: Option<&str>,
        text: Option<&str>,
        channel: &str,
    ) -> AppResult<i64> {
        let timestamp = Utc::now().timestamp_millis();

        let result = sqlx::query(
            "INSERT INTO events (event_type, intent, text, channel, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(event_type.as_str())
        .bind(intent)
        .bind(text)
        .bind(channel)
        .bind(timestamp)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Latest events first, capped at 1000 rows.
    pub async fn list_events(pool: &SqlitePool) -> AppResult<Vec<EventRecord>> {
        let events = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, event_type, intent, text, channel, timestamp
            FROM events
            ORDER BY timestamp DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(EVENT_LOG_LIMIT)
        .fetch_all(pool)
        .await?;

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::TramiteTipo;

    async fn test_pool() -> SqlitePool {
        crate::db::connect(&Config::in_memory().database).await.unwrap()
    }

    fn tramite(tipo: TramiteTipo, nombre: &str) -> ValidTramite {
        ValidTramite {
            tipo,
            nombre: nombre.to_string(),
            documento: "123".to_string(),
            grado: "5A".to_string(),
            extra: serde_json::json!({}),
            channel: "web".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_tramite() {
        let pool = test_pool().await;
        let id = DatabaseOperations::insert_tramite(&pool, &tramite(TramiteTipo::Constancia, "Ana"))
            .await
            .unwrap();

        let record = DatabaseOperations::get_tramite(&pool, id).await.unwrap().unwrap();
        assert_eq!(record.tipo, "constancia");
        assert_eq!(record.nombre, "Ana");
        assert_eq!(record.documento, "123");
        assert_eq!(record.grado, "5A");
        assert_eq!(record.extra, "{}");
        assert!(!record.fecha.is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(&record.fecha).is_ok());
    }

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let pool = test_pool().await;
        let mut last = 0;
        for tipo in TramiteTipo::ALL {
            let id = DatabaseOperations::insert_tramite(&pool, &tramite(tipo, "Luis"))
                .await
                .unwrap();
            assert!(id > last);
            last = id;
        }
        assert_eq!(DatabaseOperations::count_tramites(&pool).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_get_missing_tramite() {
        let pool = test_pool().await;
        assert!(DatabaseOperations::get_tramite(&pool, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_events_newest_first() {
        let pool = test_pool().await;
        DatabaseOperations::insert_event(&pool, EventType::MessageSent, None, Some("hola"), "web")
            .await
            .unwrap();
        DatabaseOperations::insert_event(
            &pool,
            EventType::MessageReceived,
            Some("fallback"),
            Some("respuesta"),
            "web",
        )
        .await
        .unwrap();

        let events = DatabaseOperations::list_events(&pool).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "message_received");
        assert_eq!(events[0].intent.as_deref(), Some("fallback"));
        assert_eq!(events[1].event_type, "message_sent");
    }

    #[tokio::test]
    async fn test_insert_fails_when_store_closed() {
        let pool = test_pool().await;
        pool.close().await;
        let result =
            DatabaseOperations::insert_tramite(&pool, &tramite(TramiteTipo::Constancia, "Ana")).await;
        assert!(matches!(result, Err(AppError::SaveTramite(_))));

        let read = DatabaseOperations::list_events(&pool).await;
        assert!(matches!(read, Err(AppError::Storage(_))));
    }
}
