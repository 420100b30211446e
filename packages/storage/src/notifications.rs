// ABOUTME: Notification storage layer using SQLite
// ABOUTME: Handoff notifications created by the transition engine, read by recipients

use chrono::Utc;
use nanoid::nanoid;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use aquaflow_core::{Notification, NotificationCreateInput};

use crate::error::{StorageError, StorageResult};

pub struct NotificationStorage {
    pool: SqlitePool,
}

impl NotificationStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert one notification per input. Used by the transition engine's
    /// fan-out; callers treat the whole batch as best-effort.
    pub async fn insert_notifications(
        &self,
        inputs: &[NotificationCreateInput],
    ) -> StorageResult<Vec<Notification>> {
        let mut created = Vec::with_capacity(inputs.len());

        for input in inputs {
            let id = format!("ntf-{}", nanoid!(12));
            let now = Utc::now();
            let payload = input
                .payload
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;

            sqlx::query(
                r#"
                INSERT INTO notifications (
                    id, recipient_id, customer_id, notification_type, title, message,
                    payload, read_at, created_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?)
                "#,
            )
            .bind(&id)
            .bind(&input.recipient_id)
            .bind(&input.customer_id)
            .bind(input.notification_type)
            .bind(&input.title)
            .bind(&input.message)
            .bind(payload)
            .bind(now)
            .execute(&self.pool)
            .await?;

            created.push(Notification {
                id,
                recipient_id: input.recipient_id.clone(),
                customer_id: input.customer_id.clone(),
                notification_type: input.notification_type,
                title: input.title.clone(),
                message: input.message.clone(),
                payload: input.payload.clone(),
                read_at: None,
                created_at: now,
            });
        }

        debug!("Inserted {} notifications", created.len());
        Ok(created)
    }

    /// List a recipient's notifications, newest first.
    pub async fn list_for_recipient(&self, recipient_id: &str) -> StorageResult<Vec<Notification>> {
        debug!("Fetching notifications for recipient: {}", recipient_id);

        let rows = sqlx::query(
            "SELECT * FROM notifications WHERE recipient_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_notification).collect()
    }

    pub async fn unread_count(&self, recipient_id: &str) -> StorageResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = ? AND read_at IS NULL",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Mark one of the recipient's notifications as read. Scoped to the
    /// recipient so one user cannot touch another's notifications.
    pub async fn mark_read(&self, notification_id: &str, recipient_id: &str) -> StorageResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read_at = ?
            WHERE id = ? AND recipient_id = ? AND read_at IS NULL
            "#,
        )
        .bind(Utc::now())
        .bind(notification_id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

fn row_to_notification(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Notification> {
    Ok(Notification {
        id: row.try_get("id")?,
        recipient_id: row.try_get("recipient_id")?,
        customer_id: row.try_get("customer_id")?,
        notification_type: row.try_get("notification_type")?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        payload: row
            .try_get::<Option<String>, _>("payload")?
            .and_then(|s| serde_json::from_str(&s).ok()),
        read_at: row.try_get("read_at")?,
        created_at: row.try_get("created_at")?,
    })
}
