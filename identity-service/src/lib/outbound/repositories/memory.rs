use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::directory::AccountStores;
use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AccountKind;
use crate::account::models::IdentityField;
use crate::account::ports::AccountStore;

#[derive(Default)]
struct Claims {
    usernames: HashMap<String, AccountId>,
    emails: HashMap<String, AccountId>,
    by_account: HashMap<AccountId, (String, String)>,
}

/// Username and email claims shared by every in-memory store.
///
/// Plays the role of a storage-level unique constraint spanning all four kinds.
#[derive(Default)]
pub struct IdentityIndex {
    claims: Mutex<Claims>,
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the account's username and email, releasing any it held before.
    fn claim(&self, account: &Account) -> Result<(), StoreError> {
        let mut claims = self
            .claims
            .lock()
            .map_err(|_| StoreError::Unavailable("identity index poisoned".to_string()))?;

        let username = account.username.as_str();
        let email = account.email.as_str();

        if matches!(claims.usernames.get(username), Some(owner) if *owner != account.id) {
            return Err(StoreError::UniqueViolation(IdentityField::Username));
        }
        if matches!(claims.emails.get(email), Some(owner) if *owner != account.id) {
            return Err(StoreError::UniqueViolation(IdentityField::Email));
        }

        if let Some((old_username, old_email)) = claims.by_account.remove(&account.id) {
            claims.usernames.remove(&old_username);
            claims.emails.remove(&old_email);
        }
        claims.usernames.insert(username.to_string(), account.id);
        claims.emails.insert(email.to_string(), account.id);
        claims
            .by_account
            .insert(account.id, (username.to_string(), email.to_string()));

        Ok(())
    }
}

/// Account store of one kind, held in process memory.
pub struct InMemoryAccountStore {
    kind: AccountKind,
    records: RwLock<HashMap<AccountId, Account>>,
    index: Arc<IdentityIndex>,
}

impl InMemoryAccountStore {
    pub fn new(kind: AccountKind, index: Arc<IdentityIndex>) -> Self {
        Self {
            kind,
            records: RwLock::new(HashMap::new()),
            index,
        }
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|account| account.username.as_str() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|account| account.email.as_str() == email)
            .cloned())
    }

    async fn put(&self, account: Account) -> Result<Account, StoreError> {
        if account.kind() != self.kind {
            return Err(StoreError::CorruptRecord(format!(
                "{} account routed to {} store",
                account.kind(),
                self.kind
            )));
        }

        let mut records = self.records.write().await;
        self.index.claim(&account)?;
        records.insert(account.id, account.clone());

        Ok(account)
    }
}

/// Four empty in-memory stores sharing one identity index.
pub fn in_memory_stores() -> AccountStores {
    let index = Arc::new(IdentityIndex::new());
    let store = |kind| -> Arc<dyn AccountStore> {
        Arc::new(InMemoryAccountStore::new(kind, Arc::clone(&index)))
    };

    AccountStores {
        customers: store(AccountKind::Customer),
        administrators: store(AccountKind::Admin),
        operators: store(AccountKind::Operator),
        kitchen: store(AccountKind::Kitchen),
    }
}
