// ABOUTME: Integration tests for the SQLite storage layer
// ABOUTME: Exercises customer CRUD, the transition write, activities, notifications, and users

use aquaflow_core::{
    ActivityCreateInput, ActivityType, CustomerCreateInput, CustomerStatus, CustomerUpdateInput,
    NotificationCreateInput, NotificationType, Priority, Role, UserCreateInput,
};
use aquaflow_storage::{
    connect, init_schema, ActivityStorage, CustomerFilter, CustomerStorage, NotificationStorage,
    StorageError, UserStorage,
};
use sqlx::SqlitePool;

/// Helper to create an in-memory database for testing
async fn create_test_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    init_schema(&pool).await.unwrap();
    pool
}

#[tokio::test]
async fn test_connect_creates_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("aquaflow.db");

    let pool = connect(&path).await.unwrap();
    init_schema(&pool).await.unwrap();

    assert!(path.exists());
    let storage = CustomerStorage::new(pool);
    storage.create_customer(customer_input("Anna")).await.unwrap();
}

fn customer_input(name: &str) -> CustomerCreateInput {
    CustomerCreateInput {
        name: name.to_string(),
        phone: "070-123 45 67".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_customer_defaults() {
    let pool = create_test_db().await;
    let storage = CustomerStorage::new(pool);

    let customer = storage.create_customer(customer_input("Anna Berg")).await.unwrap();

    assert!(customer.id.starts_with("cust-"));
    assert_eq!(customer.name, "Anna Berg");
    assert_eq!(customer.status, CustomerStatus::NotHandled);
    assert_eq!(customer.priority, Priority::Medium);
    assert!(customer.assigned_to.is_none());
}

#[tokio::test]
async fn test_get_missing_customer_is_not_found() {
    let pool = create_test_db().await;
    let storage = CustomerStorage::new(pool);

    let err = storage.get_customer("cust-missing").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn test_list_customers_filters_by_status() {
    let pool = create_test_db().await;
    let storage = CustomerStorage::new(pool);

    storage.create_customer(customer_input("A")).await.unwrap();
    let sold = storage
        .create_customer(CustomerCreateInput {
            status: Some(CustomerStatus::Sold),
            ..customer_input("B")
        })
        .await
        .unwrap();

    let (customers, total) = storage
        .list_customers(&CustomerFilter {
            status: Some(CustomerStatus::Sold),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].id, sold.id);
}

#[tokio::test]
async fn test_update_status_bumps_updated_at() {
    let pool = create_test_db().await;
    let storage = CustomerStorage::new(pool);

    let customer = storage.create_customer(customer_input("Anna")).await.unwrap();
    let updated = storage
        .update_status(&customer.id, CustomerStatus::MeetingBooked, None)
        .await
        .unwrap();

    assert_eq!(updated.status, CustomerStatus::MeetingBooked);
    assert!(updated.updated_at >= customer.updated_at);
}

#[tokio::test]
async fn test_update_status_claims_only_when_unassigned() {
    let pool = create_test_db().await;
    let storage = CustomerStorage::new(pool);

    let customer = storage.create_customer(customer_input("Anna")).await.unwrap();

    // First-touch claim
    let claimed = storage
        .update_status(&customer.id, CustomerStatus::CallAgain, Some("user-sales-a"))
        .await
        .unwrap();
    assert_eq!(claimed.assigned_to.as_deref(), Some("user-sales-a"));

    // An existing assignment is never overwritten by the claim write
    let again = storage
        .update_status(&customer.id, CustomerStatus::MeetingBooked, Some("user-sales-b"))
        .await
        .unwrap();
    assert_eq!(again.assigned_to.as_deref(), Some("user-sales-a"));
}

#[tokio::test]
async fn test_update_customer_partial_fields() {
    let pool = create_test_db().await;
    let storage = CustomerStorage::new(pool);

    let customer = storage.create_customer(customer_input("Anna")).await.unwrap();
    let updated = storage
        .update_customer(
            &customer.id,
            CustomerUpdateInput {
                priority: Some(Priority::High),
                sale_amount: Some(48_500.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.sale_amount, Some(48_500.0));
    // Untouched fields survive
    assert_eq!(updated.name, "Anna");
    assert_eq!(updated.phone, customer.phone);
}

#[tokio::test]
async fn test_delete_customer() {
    let pool = create_test_db().await;
    let storage = CustomerStorage::new(pool);

    let customer = storage.create_customer(customer_input("Anna")).await.unwrap();
    storage.delete_customer(&customer.id).await.unwrap();

    let err = storage.get_customer(&customer.id).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn test_activities_are_listed_newest_first() {
    let pool = create_test_db().await;
    let customers = CustomerStorage::new(pool.clone());
    let activities = ActivityStorage::new(pool);

    let customer = customers.create_customer(customer_input("Anna")).await.unwrap();

    for description in ["first", "second", "third"] {
        activities
            .insert_activity(ActivityCreateInput {
                customer_id: customer.id.clone(),
                activity_type: ActivityType::Note,
                description: description.to_string(),
                actor_id: "user-1".to_string(),
                actor_name: "Sven".to_string(),
                metadata: None,
            })
            .await
            .unwrap();
    }

    let (listed, total) = activities
        .list_for_customer(&customer.id, Some(2), None)
        .await
        .unwrap();

    assert_eq!(total, 3);
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].description, "third");
}

#[tokio::test]
async fn test_notification_fanout_and_read_state() {
    let pool = create_test_db().await;
    let notifications = NotificationStorage::new(pool);

    let inputs: Vec<NotificationCreateInput> = ["user-a", "user-b"]
        .iter()
        .map(|recipient| NotificationCreateInput {
            recipient_id: recipient.to_string(),
            customer_id: "cust-1".to_string(),
            notification_type: NotificationType::InstallationReady,
            title: "Ready for installation".to_string(),
            message: "Anna Berg is ready for installation".to_string(),
            payload: None,
        })
        .collect();

    let created = notifications.insert_notifications(&inputs).await.unwrap();
    assert_eq!(created.len(), 2);

    assert_eq!(notifications.unread_count("user-a").await.unwrap(), 1);
    notifications.mark_read(&created[0].id, "user-a").await.unwrap();
    assert_eq!(notifications.unread_count("user-a").await.unwrap(), 0);

    // Marking someone else's notification fails
    let err = notifications.mark_read(&created[1].id, "user-a").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn test_list_active_users_by_role() {
    let pool = create_test_db().await;
    let users = UserStorage::new(pool);

    let installer = users
        .create_user(UserCreateInput {
            name: "Ivar".to_string(),
            email: None,
            role: Role::Installer,
        })
        .await
        .unwrap();
    users
        .create_user(UserCreateInput {
            name: "Stina".to_string(),
            email: None,
            role: Role::Salesperson,
        })
        .await
        .unwrap();
    let retired = users
        .create_user(UserCreateInput {
            name: "Olof".to_string(),
            email: None,
            role: Role::Installer,
        })
        .await
        .unwrap();
    users.set_active(&retired.id, false).await.unwrap();

    let active = users.list_active_by_role(Role::Installer).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, installer.id);
}
