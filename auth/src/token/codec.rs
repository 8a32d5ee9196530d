use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::TokenClaims;
use super::claims::TokenType;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::TokenError;

/// The view of an account a token is minted for and re-validated against.
pub trait Principal {
    /// Token subject, i.e. the username.
    fn subject(&self) -> &str;

    fn principal_id(&self) -> String;

    /// Role name embedded as the `role` claim.
    fn role(&self) -> &str;

    /// Live account status; a token never outlives an inactive account.
    fn is_active(&self) -> bool;
}

/// Independent lifetimes for the two token types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl TokenLifetimes {
    pub fn from_secs(access_secs: i64, refresh_secs: i64) -> Self {
        Self {
            access: Duration::seconds(access_secs),
            refresh: Duration::seconds(refresh_secs),
        }
    }

    fn of(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access,
            TokenType::Refresh => self.refresh,
        }
    }
}

/// Issues and parses HS256-signed access and refresh tokens.
///
/// Issuance and parsing are pure apart from reading the clock, so one codec can be
/// shared across request handlers without synchronization.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    lifetimes: TokenLifetimes,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec signing with `secret`.
    ///
    /// # Arguments
    /// * `secret` - Process-wide signing key (at least 32 bytes for HS256)
    /// * `lifetimes` - Access and refresh lifetimes
    ///
    /// # Errors
    /// * `InvalidLifetimes` - Access lifetime is not positive or refresh does not exceed it
    pub fn new(secret: &[u8], lifetimes: TokenLifetimes) -> Result<Self, TokenError> {
        if lifetimes.access <= Duration::zero() || lifetimes.refresh <= lifetimes.access {
            return Err(TokenError::InvalidLifetimes {
                access_secs: lifetimes.access.num_seconds(),
                refresh_secs: lifetimes.refresh.num_seconds(),
            });
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            lifetimes,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    pub fn issue_access<P: Principal + ?Sized>(&self, principal: &P) -> Result<String, TokenError> {
        self.issue(principal, TokenType::Access)
    }

    pub fn issue_refresh<P: Principal + ?Sized>(
        &self,
        principal: &P,
    ) -> Result<String, TokenError> {
        self.issue(principal, TokenType::Refresh)
    }

    fn issue<P: Principal + ?Sized>(
        &self,
        principal: &P,
        token_type: TokenType,
    ) -> Result<String, TokenError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at + self.lifetimes.of(token_type);

        let claims = TokenClaims {
            sub: principal.subject().to_string(),
            user_id: principal.principal_id(),
            role: principal.role().to_string(),
            authorities: vec![TokenClaims::authority_for(principal.role())],
            token_type,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `Malformed` - Not three base64url segments, or undecodable header/claims
    /// * `Unsupported` - Signed with an algorithm other than HS256
    /// * `SignatureInvalid` - Signature does not verify with this key
    /// * `Expired` - The clock has reached `exp`
    pub fn parse(&self, token: &str) -> Result<TokenClaims, TokenError> {
        check_structure(token)?;

        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked against the injected clock below, not the system time.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let error = classify(e.kind());
                tracing::debug!(error = %error, "Token rejected");
                error
            })?;

        if claims.is_expired_at(self.clock.now()) {
            tracing::debug!(subject = %claims.sub, "Token expired");
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// True when the token verified but its lifetime has run out.
    ///
    /// Tokens that fail for any other reason are not reported as expired.
    pub fn is_expired(&self, token: &str) -> bool {
        matches!(self.parse(token), Err(TokenError::Expired))
    }

    /// Re-derive token validity from the live account.
    ///
    /// Subject and id must match the principal, the token must be current, and
    /// the principal must be active right now.
    pub fn validate_against<P: Principal + ?Sized>(&self, token: &str, principal: &P) -> bool {
        match self.parse(token) {
            Ok(claims) => {
                claims.sub == principal.subject()
                    && claims.user_id == principal.principal_id()
                    && principal.is_active()
            }
            Err(e) => {
                tracing::debug!(error = %e, "Token validation failed");
                false
            }
        }
    }

    /// Time left before expiry, zero for any token that does not parse.
    pub fn remaining_validity(&self, token: &str) -> Duration {
        match self.parse(token) {
            Ok(claims) => {
                let left = claims.exp - self.clock.now().timestamp();
                Duration::seconds(left.max(0))
            }
            Err(_) => Duration::zero(),
        }
    }

    /// Whether the token expires before `window` has elapsed. Unparseable tokens count as expiring.
    pub fn expires_within(&self, token: &str, window: Duration) -> bool {
        match self.parse(token) {
            Ok(claims) => claims.exp < (self.clock.now() + window).timestamp(),
            Err(_) => true,
        }
    }

    /// One-line summary of a token for diagnostics. Never includes the signature.
    pub fn describe(&self, token: &str) -> String {
        match self.parse(token) {
            Ok(claims) => format!(
                "Token[user={}, userId={}, role={}, type={}, issued={}, expires={}]",
                claims.sub, claims.user_id, claims.role, claims.token_type, claims.iat, claims.exp
            ),
            Err(e) => format!("Invalid token: {}", e),
        }
    }
}

/// Reject anything that is not `header.claims.signature` in base64url before
/// spending time on signature verification.
fn check_structure(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();

    if segments.len() != 3 {
        return Err(TokenError::Malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let is_base64url =
        |s: &str| s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

    for (name, segment) in ["header", "claims", "signature"].iter().zip(segments) {
        if segment.is_empty() {
            return Err(TokenError::Malformed(format!("empty {} segment", name)));
        }
        if !is_base64url(segment) {
            return Err(TokenError::Malformed(format!(
                "{} segment is not base64url",
                name
            )));
        }
    }

    Ok(())
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm
        | ErrorKind::InvalidKeyFormat => TokenError::Unsupported(format!("{:?}", kind)),
        other => TokenError::Malformed(format!("{:?}", other)),
    }
}
