//! JWT authentication and role checks.
//!
//! Tokens are HS256-signed with the configured secret (see
//! [`JoblyConfig::secret_key`](crate::JoblyConfig)). Signing and verification
//! are delegated to `jsonwebtoken`; this module only decides what goes into a
//! token and who may do what with the claims that come out of one.

use crate::error::{JoblyError, JoblyResult};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    pub is_admin: bool,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    /// Claims issued now and valid for `ttl`.
    pub fn new(username: impl Into<String>, is_admin: bool, ttl: Duration) -> Self {
        let iat = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            username: username.into(),
            is_admin,
            iat,
            exp: iat.saturating_add(ttl),
        }
    }
}

/// Sign `claims` with `secret`.
pub fn encode_claims(claims: &Claims, secret: &str) -> JoblyResult<String> {
    let key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::new(Algorithm::HS256), claims, &key)?)
}

/// Issue a token for `username`.
pub fn create_token(
    username: &str,
    is_admin: bool,
    secret: &str,
    ttl: Duration,
) -> JoblyResult<String> {
    encode_claims(&Claims::new(username, is_admin, ttl), secret)
}

/// Verify a token's signature and expiry and return its claims.
pub fn verify_token(token: &str, secret: &str) -> JoblyResult<Claims> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| JoblyError::unauthorized(format!("invalid token: {e}")))
}

/// Resolve the caller from an `Authorization` header value.
///
/// A missing header, a non-bearer scheme, or a token that fails verification
/// all yield `None`: the request continues anonymously and the role checks
/// below reject it where a login is required.
pub fn authenticate_jwt(authorization: Option<&str>, secret: &str) -> Option<Claims> {
    let header = authorization?.trim();
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))?
        .trim();
    match verify_token(token, secret) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(target: "jobly.auth", error = %e, "ignoring unverifiable token");
            None
        }
    }
}

/// Require any logged-in user.
pub fn ensure_logged_in(claims: Option<&Claims>) -> JoblyResult<&Claims> {
    claims.ok_or_else(|| JoblyError::unauthorized("login required"))
}

/// Require a logged-in admin.
pub fn ensure_admin(claims: Option<&Claims>) -> JoblyResult<&Claims> {
    let claims = ensure_logged_in(claims)?;
    if claims.is_admin {
        Ok(claims)
    } else {
        Err(JoblyError::unauthorized("admin only"))
    }
}

/// Require the user named `username`, or an admin.
pub fn ensure_correct_user_or_admin<'a>(
    claims: Option<&'a Claims>,
    username: &str,
) -> JoblyResult<&'a Claims> {
    let claims = ensure_logged_in(claims)?;
    if claims.is_admin || claims.username == username {
        Ok(claims)
    } else {
        Err(JoblyError::unauthorized(format!(
            "not allowed to act on behalf of {username}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "secret-dev";
    const HOUR: Duration = Duration::from_secs(3600);

    fn claims(username: &str, is_admin: bool) -> Claims {
        Claims::new(username, is_admin, HOUR)
    }

    #[test]
    fn token_round_trips_claims() {
        let token = create_token("test", false, SECRET, HOUR).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.username, "test");
        assert!(!claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn authenticate_via_bearer_header() {
        let token = create_token("test", false, SECRET, HOUR).unwrap();
        let header = format!("Bearer {token}");
        let claims = authenticate_jwt(Some(&header), SECRET).unwrap();
        assert_eq!(claims.username, "test");
    }

    #[test]
    fn authenticate_without_header_is_anonymous() {
        assert!(authenticate_jwt(None, SECRET).is_none());
    }

    #[test]
    fn token_signed_with_other_secret_is_ignored() {
        let token = create_token("test", false, "wrong", HOUR).unwrap();
        let header = format!("Bearer {token}");
        assert!(authenticate_jwt(Some(&header), SECRET).is_none());
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(JoblyError::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut c = claims("test", false);
        c.iat -= 7200;
        c.exp = c.iat + 60;
        let token = encode_claims(&c, SECRET).unwrap();
        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn non_bearer_scheme_is_ignored() {
        let token = create_token("test", false, SECRET, HOUR).unwrap();
        let header = format!("Basic {token}");
        assert!(authenticate_jwt(Some(&header), SECRET).is_none());
    }

    #[test]
    fn logged_in_check() {
        let c = claims("test", false);
        assert!(ensure_logged_in(Some(&c)).is_ok());
        assert!(matches!(
            ensure_logged_in(None),
            Err(JoblyError::Unauthorized(_))
        ));
    }

    #[test]
    fn admin_check() {
        assert!(ensure_admin(Some(&claims("goodTest", true))).is_ok());
        assert!(ensure_admin(Some(&claims("badTest", false))).is_err());
        assert!(ensure_admin(None).is_err());
    }

    #[test]
    fn correct_user_or_admin_check() {
        assert!(ensure_correct_user_or_admin(Some(&claims("pan", false)), "pan").is_ok());
        assert!(ensure_correct_user_or_admin(Some(&claims("pan", true)), "gargoyle").is_ok());

        let err =
            ensure_correct_user_or_admin(Some(&claims("badTest", false)), "pan").unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert!(ensure_correct_user_or_admin(None, "pan").is_err());
    }
}
