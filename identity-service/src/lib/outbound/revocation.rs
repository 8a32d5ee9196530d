use async_trait::async_trait;
use dashmap::DashSet;

use crate::authentication::errors::RevocationError;
use crate::authentication::ports::RevocationRegistry;

/// Process-lifetime set of revoked token strings.
///
/// Entries are never evicted. A deployment with several instances needs a shared,
/// TTL-expiring store sized to the refresh token lifetime instead.
#[derive(Debug, Default)]
pub struct InMemoryRevocationRegistry {
    revoked: DashSet<String>,
}

impl InMemoryRevocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

#[async_trait]
impl RevocationRegistry for InMemoryRevocationRegistry {
    async fn revoke(&self, token: &str) -> Result<bool, RevocationError> {
        Ok(self.revoked.insert(token.to_string()))
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationError> {
        Ok(self.revoked.contains(token))
    }
}
