//! Token guards for protected mutations
//!
//! Protected GraphQL mutations receive the token as an explicit
//! argument. The guards validate it up front and hand the resolver a
//! concrete [`Identity`], so business code never looks identity up from
//! ambient request context.

use crate::auth::JwtService;
use thiserror::Error;

/// Identity proven by a validated token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
}

/// Authentication failure, distinct from business-rule `ok=false`
///
/// Carried back to the caller as a union variant in place of the normal
/// success payload.
#[derive(Debug, Clone, Error)]
#[error("authentication failed: {reason}")]
pub struct AuthError {
    pub reason: String,
}

impl AuthError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Validate an access token and extract the identity it is bound to
pub fn require_access(jwt: &JwtService, token: &str) -> Result<Identity, AuthError> {
    let claims = jwt
        .validate_access_token(token)
        .map_err(|e| AuthError::new(e.to_string()))?;

    Ok(Identity {
        username: claims.sub,
    })
}

/// Validate a refresh token and extract the identity it is bound to
pub fn require_refresh(jwt: &JwtService, token: &str) -> Result<Identity, AuthError> {
    let claims = jwt
        .validate_refresh_token(token)
        .map_err(|e| AuthError::new(e.to_string()))?;

    Ok(Identity {
        username: claims.sub,
    })
}
