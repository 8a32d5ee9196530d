use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Transaction;
use uuid::Uuid;

use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountDetails;
use crate::account::models::AccountId;
use crate::account::models::AccountKind;
use crate::account::models::AccountStatus;
use crate::account::models::EmailAddress;
use crate::account::models::IdentityField;
use crate::account::models::Username;
use crate::account::ports::AccountStore;

const USERNAME_CONSTRAINT: &str = "account_identities_username_key";
const EMAIL_CONSTRAINT: &str = "account_identities_email_key";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    enabled: bool,
    account_non_expired: bool,
    account_non_locked: bool,
    credentials_non_expired: bool,
    created_at: DateTime<Utc>,
    admin_level: Option<String>,
    department: Option<String>,
    permissions: Option<Vec<String>>,
    station: Option<String>,
}

impl AccountRow {
    fn into_account(self, kind: AccountKind) -> Result<Account, StoreError> {
        let missing = |column: &str| {
            StoreError::CorruptRecord(format!("{} account {} has no {}", kind, self.id, column))
        };

        let details = match kind {
            AccountKind::Customer => AccountDetails::Customer,
            AccountKind::Admin => AccountDetails::Admin {
                admin_level: self.admin_level.clone().ok_or_else(|| missing("admin_level"))?,
            },
            AccountKind::Operator => AccountDetails::Operator {
                department: self.department.clone().ok_or_else(|| missing("department"))?,
                permissions: self.permissions.clone().unwrap_or_default(),
            },
            AccountKind::Kitchen => AccountDetails::Kitchen {
                station: self.station.clone().ok_or_else(|| missing("station"))?,
            },
        };

        Ok(Account {
            id: AccountId(self.id),
            username: Username::new(self.username)
                .map_err(|e| StoreError::CorruptRecord(e.to_string()))?,
            email: EmailAddress::new(self.email)
                .map_err(|e| StoreError::CorruptRecord(e.to_string()))?,
            password_hash: self.password_hash,
            status: AccountStatus {
                enabled: self.enabled,
                account_non_expired: self.account_non_expired,
                account_non_locked: self.account_non_locked,
                credentials_non_expired: self.credentials_non_expired,
            },
            details,
            created_at: self.created_at,
        })
    }
}

/// PostgreSQL store for the accounts of one kind.
///
/// Each kind has its own table. Username and email are additionally claimed in
/// `account_identities`, whose unique constraints span all kinds, in the same
/// transaction as the account row.
pub struct PostgresAccountStore {
    pool: PgPool,
    kind: AccountKind,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool, kind: AccountKind) -> Self {
        Self { pool, kind }
    }

    fn table(&self) -> &'static str {
        match self.kind {
            AccountKind::Customer => "customers",
            AccountKind::Admin => "administrators",
            AccountKind::Operator => "operators",
            AccountKind::Kitchen => "kitchen_users",
        }
    }

    /// Kind-specific columns, with NULL placeholders for the others.
    fn detail_columns(&self) -> &'static str {
        match self.kind {
            AccountKind::Customer => {
                "NULL::TEXT AS admin_level, NULL::TEXT AS department, \
                 NULL::TEXT[] AS permissions, NULL::TEXT AS station"
            }
            AccountKind::Admin => {
                "admin_level, NULL::TEXT AS department, \
                 NULL::TEXT[] AS permissions, NULL::TEXT AS station"
            }
            AccountKind::Operator => {
                "NULL::TEXT AS admin_level, department, permissions, NULL::TEXT AS station"
            }
            AccountKind::Kitchen => {
                "NULL::TEXT AS admin_level, NULL::TEXT AS department, \
                 NULL::TEXT[] AS permissions, station"
            }
        }
    }

    async fn find_where(
        &self,
        column: &str,
        value: FindValue<'_>,
    ) -> Result<Option<Account>, StoreError> {
        let sql = format!(
            r#"
            SELECT id, username, email, password_hash,
                   enabled, account_non_expired, account_non_locked, credentials_non_expired,
                   created_at, {}
            FROM {}
            WHERE {} = $1
            "#,
            self.detail_columns(),
            self.table(),
            column
        );

        let query = sqlx::query_as::<_, AccountRow>(&sql);
        let query = match value {
            FindValue::Id(id) => query.bind(id),
            FindValue::Text(text) => query.bind(text),
        };

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        row.map(|r| r.into_account(self.kind)).transpose()
    }

    async fn upsert_identity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: &Account,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO account_identities (account_id, kind, username, email)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (account_id)
            DO UPDATE SET username = EXCLUDED.username, email = EXCLUDED.email
            "#,
        )
        .bind(account.id.0)
        .bind(self.kind.as_str())
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn upsert_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: &Account,
    ) -> Result<(), sqlx::Error> {
        let (extra_columns, extra_values, extra_updates) = match &account.details {
            AccountDetails::Customer => ("", "", ""),
            AccountDetails::Admin { .. } => (
                ", admin_level",
                ", $10",
                ", admin_level = EXCLUDED.admin_level",
            ),
            AccountDetails::Operator { .. } => (
                ", department, permissions",
                ", $10, $11",
                ", department = EXCLUDED.department, permissions = EXCLUDED.permissions",
            ),
            AccountDetails::Kitchen { .. } => {
                (", station", ", $10", ", station = EXCLUDED.station")
            }
        };

        let sql = format!(
            r#"
            INSERT INTO {table} (id, username, email, password_hash, enabled,
                                 account_non_expired, account_non_locked,
                                 credentials_non_expired, created_at{extra_columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9{extra_values})
            ON CONFLICT (id)
            DO UPDATE SET username = EXCLUDED.username,
                          email = EXCLUDED.email,
                          password_hash = EXCLUDED.password_hash,
                          enabled = EXCLUDED.enabled,
                          account_non_expired = EXCLUDED.account_non_expired,
                          account_non_locked = EXCLUDED.account_non_locked,
                          credentials_non_expired = EXCLUDED.credentials_non_expired{extra_updates}
            "#,
            table = self.table(),
        );

        let query = sqlx::query(&sql)
            .bind(account.id.0)
            .bind(account.username.as_str())
            .bind(account.email.as_str())
            .bind(&account.password_hash)
            .bind(account.status.enabled)
            .bind(account.status.account_non_expired)
            .bind(account.status.account_non_locked)
            .bind(account.status.credentials_non_expired)
            .bind(account.created_at);

        let query = match &account.details {
            AccountDetails::Customer => query,
            AccountDetails::Admin { admin_level } => query.bind(admin_level),
            AccountDetails::Operator {
                department,
                permissions,
            } => query.bind(department).bind(permissions),
            AccountDetails::Kitchen { station } => query.bind(station),
        };

        query.execute(&mut **tx).await?;

        Ok(())
    }
}

enum FindValue<'a> {
    Id(Uuid),
    Text(&'a str),
}

fn map_write_error(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some(USERNAME_CONSTRAINT) {
                return StoreError::UniqueViolation(IdentityField::Username);
            }
            if db_err.constraint() == Some(EMAIL_CONSTRAINT) {
                return StoreError::UniqueViolation(IdentityField::Email);
            }
        }
    }
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        self.find_where("id", FindValue::Id(id.0)).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.find_where("username", FindValue::Text(username)).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.find_where("email", FindValue::Text(email)).await
    }

    async fn put(&self, account: Account) -> Result<Account, StoreError> {
        if account.kind() != self.kind {
            return Err(StoreError::CorruptRecord(format!(
                "{} account routed to {} store",
                account.kind(),
                self.kind
            )));
        }

        let mut tx = self.pool.begin().await.map_err(map_write_error)?;
        self.upsert_identity(&mut tx, &account)
            .await
            .map_err(map_write_error)?;
        self.upsert_account(&mut tx, &account)
            .await
            .map_err(map_write_error)?;
        tx.commit().await.map_err(map_write_error)?;

        Ok(account)
    }
}
