use std::fmt;

use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Intended use of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity claims carried by every issued token.
///
/// Timestamps are Unix seconds. `jti` makes every minted token a distinct string,
/// even two minted for the same account within the same second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,

    /// Account identifier
    pub user_id: String,

    /// Account kind, e.g. `CUSTOMER`
    pub role: String,

    /// Derived authorities, one `ROLE_<kind>` entry
    pub authorities: Vec<String>,

    pub token_type: TokenType,

    /// Issued at
    pub iat: i64,

    /// Expires at
    pub exp: i64,

    /// Unique token identifier
    pub jti: String,
}

impl TokenClaims {
    /// The single authority derived from a role.
    pub fn authority_for(role: &str) -> String {
        format!("ROLE_{}", role)
    }

    /// Whether the token is expired at `now` (inclusive of the expiry instant).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp: i64) -> TokenClaims {
        TokenClaims {
            sub: "alice01".to_string(),
            user_id: "7".to_string(),
            role: "CUSTOMER".to_string(),
            authorities: vec![TokenClaims::authority_for("CUSTOMER")],
            token_type: TokenType::Access,
            iat: exp - 60,
            exp,
            jti: "jti".to_string(),
        }
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let claims = claims(1_000);

        assert!(!claims.is_expired_at(Utc.timestamp_opt(999, 0).unwrap()));
        assert!(claims.is_expired_at(Utc.timestamp_opt(1_000, 0).unwrap()));
        assert!(claims.is_expired_at(Utc.timestamp_opt(1_001, 0).unwrap()));
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(claims(1_000)).unwrap();

        assert_eq!(json["userId"], "7");
        assert_eq!(json["tokenType"], "access");
        assert_eq!(json["authorities"][0], "ROLE_CUSTOMER");
        assert!(json.get("user_id").is_none());
    }
}
