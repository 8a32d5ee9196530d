use auth::PasswordHasher;

use crate::account::errors::HashingError;
use crate::account::ports::SecretHasher;

impl SecretHasher for PasswordHasher {
    fn hash(&self, raw: &str) -> Result<String, HashingError> {
        PasswordHasher::hash(self, raw).map_err(|e| HashingError(e.to_string()))
    }

    fn matches(&self, raw: &str, hash: &str) -> Result<bool, HashingError> {
        self.verify(raw, hash).map_err(|e| HashingError(e.to_string()))
    }
}
