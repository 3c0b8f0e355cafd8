use sqlx::SqlitePool;

use crate::db::models::User;
use crate::error::{AppError, AppResult};

// ============================================================================
// User Repository
// ============================================================================

pub struct UserRepository;

impl UserRepository {
    /// Load the users with the given ids, keeping the order of `ids`.
    ///
    /// Unknown ids are silently absent from the result.
    pub async fn find_by_ids(pool: &SqlitePool, ids: &[String]) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!(
            "SELECT id, name, email, created_at FROM users WHERE id IN ({})",
            placeholders
        );

        let mut q = sqlx::query_as::<_, User>(&query);
        for id in ids {
            q = q.bind(id);
        }
        let mut users = q.fetch_all(pool).await.map_err(AppError::Database)?;

        users.sort_by_key(|u| ids.iter().position(|id| id == &u.id));
        Ok(users)
    }
}
