// ABOUTME: User storage layer using SQLite
// ABOUTME: Lookup of users and the active-by-role query behind notification fan-out

use chrono::Utc;
use nanoid::nanoid;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use aquaflow_core::{Role, User, UserCreateInput};

use crate::error::{StorageError, StorageResult};

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, input: UserCreateInput) -> StorageResult<User> {
        let id = format!("user-{}", nanoid!(12));
        let now = Utc::now();

        debug!("Creating user: {} ({})", input.name, input.role);

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(input.role)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_user(&id).await
    }

    pub async fn get_user(&self, user_id: &str) -> StorageResult<User> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        row_to_user(&row)
    }

    /// Active users of one role. The transition engine fans notifications
    /// out to exactly this set.
    pub async fn list_active_by_role(&self, role: Role) -> StorageResult<Vec<User>> {
        debug!("Fetching active users with role: {}", role);

        let rows = sqlx::query("SELECT * FROM users WHERE role = ? AND active = 1 ORDER BY name")
            .bind(role)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_user).collect()
    }

    pub async fn list_users(&self) -> StorageResult<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_user).collect()
    }

    pub async fn set_active(&self, user_id: &str, active: bool) -> StorageResult<()> {
        let result = sqlx::query("UPDATE users SET active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> StorageResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        role: row.try_get("role")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
