//! Requires a PostgreSQL server at `DATABASE_URL` (default port 5433).
//! Run with `cargo test -- --ignored`.

mod common;

use std::sync::Arc;

use chrono::Utc;
use common::TestDb;
use identity_service::account::directory::AccountStores;
use identity_service::account::directory::UserDirectory;
use identity_service::account::errors::DirectoryError;
use identity_service::account::errors::StoreError;
use identity_service::account::models::Account;
use identity_service::account::models::AccountDetails;
use identity_service::account::models::AccountId;
use identity_service::account::models::AccountKind;
use identity_service::account::models::AccountStatus;
use identity_service::account::models::EmailAddress;
use identity_service::account::models::IdentityField;
use identity_service::account::models::RegisterAccountCommand;
use identity_service::account::models::Username;
use identity_service::account::ports::AccountStore;
use identity_service::outbound::repositories::PostgresAccountStore;
use sqlx::PgPool;

fn stores(pool: &PgPool) -> AccountStores {
    AccountStores {
        customers: Arc::new(PostgresAccountStore::new(pool.clone(), AccountKind::Customer)),
        administrators: Arc::new(PostgresAccountStore::new(pool.clone(), AccountKind::Admin)),
        operators: Arc::new(PostgresAccountStore::new(pool.clone(), AccountKind::Operator)),
        kitchen: Arc::new(PostgresAccountStore::new(pool.clone(), AccountKind::Kitchen)),
    }
}

fn account(username: &str, details: AccountDetails) -> Account {
    Account {
        id: AccountId::new(),
        username: Username::new(username.to_string()).unwrap(),
        email: EmailAddress::new(format!("{}@example.com", username)).unwrap(),
        password_hash: "$argon2id$placeholder".to_string(),
        status: AccountStatus::default(),
        details,
        created_at: Utc::now(),
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_put_and_find_operator() {
    let db = TestDb::new().await;
    let store = PostgresAccountStore::new(db.pool.clone(), AccountKind::Operator);
    let operator = account(
        "dispatcher",
        AccountDetails::Operator {
            department: "logistics".to_string(),
            permissions: vec!["orders:read".to_string(), "orders:assign".to_string()],
        },
    );

    store.put(operator.clone()).await.unwrap();

    let by_username = store.find_by_username("dispatcher").await.unwrap().unwrap();
    assert_eq!(by_username.id, operator.id);
    assert_eq!(by_username.details, operator.details);
    assert_eq!(by_username.status, AccountStatus::default());

    let by_email = store
        .find_by_email("dispatcher@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, operator.id);

    assert!(store.find_by_id(&AccountId::new()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_put_updates_existing_row() {
    let db = TestDb::new().await;
    let store = PostgresAccountStore::new(db.pool.clone(), AccountKind::Kitchen);
    let mut cook = account(
        "grillcook",
        AccountDetails::Kitchen {
            station: "grill".to_string(),
        },
    );
    store.put(cook.clone()).await.unwrap();

    cook.status.account_non_locked = false;
    cook.details = AccountDetails::Kitchen {
        station: "fryer".to_string(),
    };
    store.put(cook.clone()).await.unwrap();

    let stored = store.find_by_id(&cook.id).await.unwrap().unwrap();
    assert!(!stored.status.account_non_locked);
    assert_eq!(stored.details, cook.details);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_identity_is_unique_across_tables() {
    let db = TestDb::new().await;
    let customers = PostgresAccountStore::new(db.pool.clone(), AccountKind::Customer);
    let kitchen = PostgresAccountStore::new(db.pool.clone(), AccountKind::Kitchen);

    customers
        .put(account("shared", AccountDetails::Customer))
        .await
        .unwrap();

    let mut clash = account(
        "shared",
        AccountDetails::Kitchen {
            station: "grill".to_string(),
        },
    );
    clash.email = EmailAddress::new("other@example.com".to_string()).unwrap();

    let err = kitchen.put(clash).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::UniqueViolation(IdentityField::Username)
    ));
    assert!(kitchen.find_by_username("shared").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_directory_over_postgres() {
    let db = TestDb::new().await;
    let directory = UserDirectory::new(stores(&db.pool), Arc::new(auth::PasswordHasher::new()));

    let admin = directory
        .create(RegisterAccountCommand::new(
            Username::new("manager".to_string()).unwrap(),
            EmailAddress::new("manager@example.com".to_string()).unwrap(),
            "P@ssw0rd".to_string(),
            AccountDetails::Admin {
                admin_level: "SUPER".to_string(),
            },
        ))
        .await
        .unwrap();

    let found = directory.find_by_username("manager").await.unwrap().unwrap();
    assert_eq!(found.id, admin.id);
    assert_eq!(found.kind(), AccountKind::Admin);
    assert!(!directory.is_email_available("manager@example.com").await.unwrap());

    let err = directory
        .create(RegisterAccountCommand::new(
            Username::new("manager".to_string()).unwrap(),
            EmailAddress::new("another@example.com".to_string()).unwrap(),
            "P@ssw0rd".to_string(),
            AccountDetails::Customer,
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DirectoryError::DuplicateIdentity(IdentityField::Username)
    ));
}
