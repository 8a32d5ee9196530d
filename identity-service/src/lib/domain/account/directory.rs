use std::sync::Arc;

use chrono::Utc;

use crate::account::errors::DirectoryError;
use crate::account::models::Account;
use crate::account::models::AccountDetails;
use crate::account::models::AccountId;
use crate::account::models::AccountKind;
use crate::account::models::AccountProfile;
use crate::account::models::AccountStatus;
use crate::account::models::IdentityField;
use crate::account::models::RegisterAccountCommand;
use crate::account::models::StatusUpdate;
use crate::account::ports::AccountStore;
use crate::account::ports::SecretHasher;

/// The four kind-specific stores backing the directory.
#[derive(Clone)]
pub struct AccountStores {
    pub customers: Arc<dyn AccountStore>,
    pub administrators: Arc<dyn AccountStore>,
    pub operators: Arc<dyn AccountStore>,
    pub kitchen: Arc<dyn AccountStore>,
}

impl AccountStores {
    /// Store holding accounts of `kind`.
    pub fn for_kind(&self, kind: AccountKind) -> &Arc<dyn AccountStore> {
        match kind {
            AccountKind::Customer => &self.customers,
            AccountKind::Admin => &self.administrators,
            AccountKind::Operator => &self.operators,
            AccountKind::Kitchen => &self.kitchen,
        }
    }
}

#[derive(Clone, Copy)]
enum Lookup<'a> {
    Id(&'a AccountId),
    Username(&'a str),
    Email(&'a str),
}

/// Polymorphic account directory over the four kind-specific stores.
///
/// Lookups query the stores in [`AccountKind::LOOKUP_ORDER`] and stop at the first
/// hit. Writes are routed to the store matching the account's kind.
///
/// Availability checks and the following write are not atomic across stores. Two
/// concurrent registrations of the same username can both pass the check; the
/// stores' own uniqueness constraints decide the winner and the loser surfaces as
/// `DuplicateIdentity`.
#[derive(Clone)]
pub struct UserDirectory {
    stores: AccountStores,
    hasher: Arc<dyn SecretHasher>,
}

impl UserDirectory {
    pub fn new(stores: AccountStores, hasher: Arc<dyn SecretHasher>) -> Self {
        Self { stores, hasher }
    }

    async fn find(&self, lookup: Lookup<'_>) -> Result<Option<Account>, DirectoryError> {
        for kind in AccountKind::LOOKUP_ORDER {
            let store = self.stores.for_kind(kind);
            let found = match lookup {
                Lookup::Id(id) => store.find_by_id(id).await?,
                Lookup::Username(username) => store.find_by_username(username).await?,
                Lookup::Email(email) => store.find_by_email(email).await?,
            };

            if found.is_some() {
                return Ok(found);
            }
        }

        Ok(None)
    }

    /// Find an account of any kind by exact username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, DirectoryError> {
        self.find(Lookup::Username(username)).await
    }

    /// Find an account of any kind by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DirectoryError> {
        self.find(Lookup::Email(email)).await
    }

    /// Find an account of any kind by ID.
    pub async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DirectoryError> {
        self.find(Lookup::Id(id)).await
    }

    pub async fn is_username_available(&self, username: &str) -> Result<bool, DirectoryError> {
        Ok(self.find_by_username(username).await?.is_none())
    }

    pub async fn is_email_available(&self, email: &str) -> Result<bool, DirectoryError> {
        Ok(self.find_by_email(email).await?.is_none())
    }

    /// Register a new account in the store of the command's kind.
    ///
    /// Both username and email are checked against all four stores before the
    /// secret is hashed or anything is written.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Username or email already held by an account of any kind
    /// * `Hashing` - Secret could not be hashed
    /// * `Store` - Storage operation failed
    pub async fn create(&self, command: RegisterAccountCommand) -> Result<Account, DirectoryError> {
        if !self.is_username_available(command.username.as_str()).await? {
            return Err(DirectoryError::DuplicateIdentity(IdentityField::Username));
        }
        if !self.is_email_available(command.email.as_str()).await? {
            return Err(DirectoryError::DuplicateIdentity(IdentityField::Email));
        }

        let password_hash = self.hasher.hash(&command.password)?;

        let account = Account {
            id: AccountId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            status: AccountStatus::default(),
            details: command.details,
            created_at: Utc::now(),
        };

        let created = self.save(account).await?;
        tracing::info!(
            user_id = %created.id,
            username = %created.username,
            kind = %created.kind(),
            "Account registered"
        );

        Ok(created)
    }

    /// Persist an account in the store matching its kind.
    pub async fn save(&self, account: Account) -> Result<Account, DirectoryError> {
        let store = self.stores.for_kind(account.kind());
        Ok(store.put(account).await?)
    }

    /// Replace the stored secret hash with a hash of `raw`.
    pub async fn change_secret(
        &self,
        mut account: Account,
        raw: &str,
    ) -> Result<Account, DirectoryError> {
        account.password_hash = self.hasher.hash(raw)?;
        self.save(account).await
    }

    /// Apply a partial status update to an account of any kind.
    ///
    /// # Errors
    /// * `NotFound` - No account with this ID
    pub async fn update_status(
        &self,
        id: &AccountId,
        update: StatusUpdate,
    ) -> Result<Account, DirectoryError> {
        let mut account = self.require(id).await?;
        account.status = update.apply(account.status);
        self.save(account).await
    }

    /// Replace the kind-specific attributes of an account.
    ///
    /// # Errors
    /// * `NotFound` - No account with this ID
    /// * `KindMismatch` - `details` belong to another kind than the stored account
    pub async fn update_details(
        &self,
        id: &AccountId,
        details: AccountDetails,
    ) -> Result<Account, DirectoryError> {
        let mut account = self.require(id).await?;

        if details.kind() != account.kind() {
            return Err(DirectoryError::KindMismatch {
                id: id.to_string(),
                expected: account.kind(),
                actual: details.kind(),
            });
        }

        account.details = details;
        self.save(account).await
    }

    pub fn build_profile(&self, account: &Account) -> AccountProfile {
        AccountProfile::from(account)
    }

    async fn require(&self, id: &AccountId) -> Result<Account, DirectoryError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))
    }
}
