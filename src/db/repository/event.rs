use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{CanonicalEvent, NewEvent, SyncFieldUpdate};
use crate::error::{AppError, AppResult};

const EVENT_COLUMNS: &str = r#"
    id, slug, name, description, location, country, is_online,
    start_date, end_date, website, logo, tos_url, contact_email, tags,
    cfp_status, cfp_open_at, cfp_close_at, is_paid, created_by,
    created_at, updated_at
"#;

// ============================================================================
// Event Repository
// ============================================================================

/// Repository for canonical events (`events` and `event_organizers` tables).
pub struct EventRepository;

impl EventRepository {
    /// Find an event by its unique slug.
    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> AppResult<Option<CanonicalEvent>> {
        let query = format!("SELECT {} FROM events WHERE slug = ?", EVENT_COLUMNS);
        sqlx::query_as::<_, CanonicalEvent>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    /// Insert a new event and return its generated id.
    ///
    /// A second insert for the same slug is reported as `AppError::Conflict`.
    pub async fn create(pool: &SqlitePool, event: &NewEvent) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO events (
                id, slug, name, description, location, country, is_online,
                start_date, end_date, website, logo, tos_url, contact_email, tags,
                cfp_status, cfp_open_at, cfp_close_at, is_paid, created_by,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&event.slug)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.country)
        .bind(event.is_online)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(&event.website)
        .bind(&event.logo)
        .bind(&event.tos_url)
        .bind(&event.contact_email)
        .bind(&event.tags)
        .bind(event.cfp_status.as_str())
        .bind(event.cfp_open_at)
        .bind(event.cfp_close_at)
        .bind(event.is_paid)
        .bind(&event.created_by)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await;

        match result {
            Ok(_) => Ok(id),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
                format!("event with slug {} already exists", event.slug),
            )),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    /// Overwrite the sync-managed fields of an event. Nothing else is touched.
    pub async fn update_sync_fields(
        pool: &SqlitePool,
        id: &str,
        update: &SyncFieldUpdate,
    ) -> AppResult<()> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = ?,
                start_date = ?,
                end_date = ?,
                description = ?,
                is_paid = ?,
                logo = ?,
                contact_email = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(update.start_date)
        .bind(update.end_date)
        .bind(&update.description)
        .bind(update.is_paid)
        .bind(&update.logo)
        .bind(&update.contact_email)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("event {}", id)));
        }

        Ok(())
    }

    /// Attach organizers to an event. Already-assigned users are left as they are.
    pub async fn assign_organizers(
        pool: &SqlitePool,
        event_id: &str,
        user_ids: &[String],
    ) -> AppResult<()> {
        let now = Utc::now().naive_utc();
        let mut tx = pool.begin().await.map_err(AppError::Database)?;

        for user_id in user_ids {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO event_organizers (event_id, user_id, created_at)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(event_id)
            .bind(user_id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    /// List organizer user ids of an event in assignment order.
    #[cfg(test)]
    pub async fn find_organizer_ids(pool: &SqlitePool, event_id: &str) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT user_id FROM event_organizers WHERE event_id = ? ORDER BY rowid",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn count(pool: &SqlitePool) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(pool)
            .await
            .map_err(AppError::Database)
    }
}
