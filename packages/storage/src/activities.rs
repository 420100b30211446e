// ABOUTME: Activity log storage layer using SQLite
// ABOUTME: Append-only history entries per customer, newest first

use chrono::Utc;
use nanoid::nanoid;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use aquaflow_core::{Activity, ActivityCreateInput};

use crate::error::StorageResult;

pub struct ActivityStorage {
    pool: SqlitePool,
}

impl ActivityStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one entry. Entries are never updated or deleted.
    pub async fn insert_activity(&self, input: ActivityCreateInput) -> StorageResult<Activity> {
        let id = format!("act-{}", nanoid!(12));
        let now = Utc::now();
        let metadata = input
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        debug!(
            "Recording {:?} activity for customer: {}",
            input.activity_type, input.customer_id
        );

        sqlx::query(
            r#"
            INSERT INTO activities (
                id, customer_id, activity_type, description, actor_id, actor_name,
                metadata, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.customer_id)
        .bind(input.activity_type)
        .bind(&input.description)
        .bind(&input.actor_id)
        .bind(&input.actor_name)
        .bind(metadata)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Activity {
            id,
            customer_id: input.customer_id,
            activity_type: input.activity_type,
            description: input.description,
            actor_id: input.actor_id,
            actor_name: input.actor_name,
            metadata: input.metadata,
            created_at: now,
        })
    }

    /// List a customer's history with pagination, newest first.
    pub async fn list_for_customer(
        &self,
        customer_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> StorageResult<(Vec<Activity>, i64)> {
        debug!("Fetching activities for customer: {}", customer_id);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activities WHERE customer_id = ?")
            .bind(customer_id)
            .fetch_one(&self.pool)
            .await?;

        let mut query_str = String::from(
            "SELECT * FROM activities WHERE customer_id = ? ORDER BY created_at DESC, id DESC",
        );
        if let Some(lim) = limit {
            query_str.push_str(&format!(" LIMIT {}", lim));
        }
        if let Some(off) = offset {
            query_str.push_str(&format!(" OFFSET {}", off));
        }

        let rows = sqlx::query(&query_str)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        let activities = rows
            .iter()
            .map(row_to_activity)
            .collect::<StorageResult<Vec<_>>>()?;

        Ok((activities, total))
    }
}

fn row_to_activity(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Activity> {
    Ok(Activity {
        id: row.try_get("id")?,
        customer_id: row.try_get("customer_id")?,
        activity_type: row.try_get("activity_type")?,
        description: row.try_get("description")?,
        actor_id: row.try_get("actor_id")?,
        actor_name: row.try_get("actor_name")?,
        metadata: row
            .try_get::<Option<String>, _>("metadata")?
            .and_then(|s| serde_json::from_str(&s).ok()),
        created_at: row.try_get("created_at")?,
    })
}
