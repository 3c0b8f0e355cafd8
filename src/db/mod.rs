pub mod models;
pub mod repository;

pub use repository::{EventRepository, UserRepository};

/// In-memory SQLite pool with migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

#[cfg(test)]
pub async fn insert_test_user(pool: &sqlx::SqlitePool, id: &str) {
    sqlx::query("INSERT INTO users (id, name, email) VALUES (?, ?, ?)")
        .bind(id)
        .bind(format!("User {}", id))
        .bind(format!("{}@example.com", id))
        .execute(pool)
        .await
        .expect("insert user");
}
