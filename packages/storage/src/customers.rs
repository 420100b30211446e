// ABOUTME: Customer storage layer using SQLite
// ABOUTME: Handles CRUD operations and the status/assignment write for transitions

use chrono::Utc;
use nanoid::nanoid;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use aquaflow_core::{Customer, CustomerCreateInput, CustomerStatus, CustomerUpdateInput, Priority};

use crate::error::{StorageError, StorageResult};

/// Filter for customer listings. All fields optional; `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub status: Option<CustomerStatus>,
    pub assigned_to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub struct CustomerStorage {
    pool: SqlitePool,
}

impl CustomerStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_customer(&self, input: CustomerCreateInput) -> StorageResult<Customer> {
        let id = format!("cust-{}", nanoid!(12));
        let now = Utc::now();
        let status = input.status.unwrap_or(CustomerStatus::NotHandled);
        let priority = input.priority.unwrap_or_default();
        let needs_analysis = input
            .needs_analysis
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        debug!("Creating customer: {} ({})", input.name, id);

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, phone, email, address, status, priority, assigned_to,
                sale_amount, sale_date, needs_analysis, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(status)
        .bind(priority)
        .bind(&input.assigned_to)
        .bind(input.sale_amount)
        .bind(input.sale_date)
        .bind(needs_analysis)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_customer(&id).await
    }

    pub async fn get_customer(&self, customer_id: &str) -> StorageResult<Customer> {
        debug!("Fetching customer: {}", customer_id);

        let row = sqlx::query("SELECT * FROM customers WHERE id = ?")
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        row_to_customer(&row)
    }

    /// List customers matching the filter plus the total (pre-pagination) count.
    pub async fn list_customers(
        &self,
        filter: &CustomerFilter,
    ) -> StorageResult<(Vec<Customer>, i64)> {
        debug!(
            "Fetching customers (status: {:?}, assigned_to: {:?})",
            filter.status, filter.assigned_to
        );

        let mut conditions = Vec::new();
        if filter.status.is_some() {
            conditions.push("status = ?");
        }
        if filter.assigned_to.is_some() {
            conditions.push("assigned_to = ?");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM customers{where_clause}");
        let mut count = sqlx::query_scalar(&count_query);
        if let Some(status) = filter.status {
            count = count.bind(status);
        }
        if let Some(assigned_to) = &filter.assigned_to {
            count = count.bind(assigned_to);
        }
        let total: i64 = count.fetch_one(&self.pool).await?;

        let mut query_str =
            format!("SELECT * FROM customers{where_clause} ORDER BY updated_at DESC, id");
        if let Some(limit) = filter.limit {
            query_str.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = filter.offset {
            query_str.push_str(&format!(" OFFSET {}", offset));
        }

        let mut query = sqlx::query(&query_str);
        if let Some(status) = filter.status {
            query = query.bind(status);
        }
        if let Some(assigned_to) = &filter.assigned_to {
            query = query.bind(assigned_to);
        }

        let rows = query.fetch_all(&self.pool).await?;
        let customers = rows
            .iter()
            .map(row_to_customer)
            .collect::<StorageResult<Vec<_>>>()?;

        Ok((customers, total))
    }

    /// All customers, unpaginated. Board projection and stats read this.
    pub async fn list_all(&self) -> StorageResult<Vec<Customer>> {
        let (customers, _) = self.list_customers(&CustomerFilter::default()).await?;
        Ok(customers)
    }

    pub async fn update_customer(
        &self,
        customer_id: &str,
        input: CustomerUpdateInput,
    ) -> StorageResult<Customer> {
        let existing = self.get_customer(customer_id).await?;
        let needs_analysis = input
            .needs_analysis
            .or(existing.needs_analysis)
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            UPDATE customers
            SET name = ?, phone = ?, email = ?, address = ?, priority = ?,
                assigned_to = ?, sale_amount = ?, sale_date = ?, needs_analysis = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(input.name.unwrap_or(existing.name))
        .bind(input.phone.unwrap_or(existing.phone))
        .bind(input.email.or(existing.email))
        .bind(input.address.or(existing.address))
        .bind(input.priority.unwrap_or(existing.priority))
        .bind(input.assigned_to.or(existing.assigned_to))
        .bind(input.sale_amount.or(existing.sale_amount))
        .bind(input.sale_date.or(existing.sale_date))
        .bind(needs_analysis)
        .bind(Utc::now())
        .bind(customer_id)
        .execute(&self.pool)
        .await?;

        self.get_customer(customer_id).await
    }

    /// Persist a status transition. When `claim_assigned` is set the same
    /// write also assigns the customer (first-touch claim); an existing
    /// assignment is never overwritten here.
    pub async fn update_status(
        &self,
        customer_id: &str,
        status: CustomerStatus,
        claim_assigned: Option<&str>,
    ) -> StorageResult<Customer> {
        debug!("Updating status of {} to {}", customer_id, status);

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET status = ?,
                assigned_to = COALESCE(assigned_to, ?),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(claim_assigned)
        .bind(Utc::now())
        .bind(customer_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_customer(customer_id).await
    }

    pub async fn delete_customer(&self, customer_id: &str) -> StorageResult<()> {
        debug!("Deleting customer: {}", customer_id);

        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Customer> {
    Ok(Customer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        address: row.try_get("address")?,
        status: row.try_get("status")?,
        priority: row.try_get::<Priority, _>("priority")?,
        assigned_to: row.try_get("assigned_to")?,
        sale_amount: row.try_get("sale_amount")?,
        sale_date: row.try_get("sale_date")?,
        needs_analysis: row
            .try_get::<Option<String>, _>("needs_analysis")?
            .and_then(|s| serde_json::from_str(&s).ok()),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
