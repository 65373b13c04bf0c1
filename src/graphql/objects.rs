//! GraphQL object and payload types
//!
//! Protected mutations return tagged unions: either the normal value
//! (`OkValue` / `TokenValue`) or an `AuthFailure`, so callers can
//! distinguish "bad credentials" from "not authorized to call this at
//! all". Business-rule failures stay plain `ok=false` booleans.

use crate::auth::AuthError;
use crate::repositories::AccountRecord;
use async_graphql::{SimpleObject, Union};

/// A user account
///
/// The password hash is deliberately not exposed.
#[derive(Debug, Clone, SimpleObject)]
pub struct Account {
    pub username: String,
    pub teacher: bool,
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Self {
            username: record.username,
            teacher: record.teacher,
        }
    }
}

/// Boolean result of a protected operation
#[derive(Debug, Clone, SimpleObject)]
pub struct OkValue {
    pub value: bool,
}

/// Token result of a protected operation
#[derive(Debug, Clone, SimpleObject)]
pub struct TokenValue {
    pub token: String,
}

/// Authentication failure on a protected operation
#[derive(Debug, Clone, SimpleObject)]
pub struct AuthFailure {
    pub message: String,
}

impl From<AuthError> for AuthFailure {
    fn from(err: AuthError) -> Self {
        Self {
            message: err.reason,
        }
    }
}

/// Boolean-or-auth-failure result
#[derive(Debug, Clone, Union)]
pub enum OkResult {
    Ok(OkValue),
    Auth(AuthFailure),
}

impl OkResult {
    pub fn ok(value: bool) -> Self {
        Self::Ok(OkValue { value })
    }

    pub fn auth(err: AuthError) -> Self {
        Self::Auth(err.into())
    }
}

/// Token-or-auth-failure result
#[derive(Debug, Clone, Union)]
pub enum TokenResult {
    Token(TokenValue),
    Auth(AuthFailure),
}

impl TokenResult {
    pub fn token(token: String) -> Self {
        Self::Token(TokenValue { token })
    }

    pub fn auth(err: AuthError) -> Self {
        Self::Auth(err.into())
    }
}

/// Payload of `createUser`
#[derive(Debug, Clone, SimpleObject)]
pub struct CreateUserPayload {
    pub user: Option<Account>,
    pub ok: bool,
}

/// Payload of `auth`
#[derive(Debug, Clone, SimpleObject)]
pub struct AuthPayload {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub ok: bool,
}

/// Payload of `refresh`
#[derive(Debug, Clone, SimpleObject)]
pub struct RefreshPayload {
    pub new_token: TokenResult,
}

/// Payload of `changePassword`
#[derive(Debug, Clone, SimpleObject)]
pub struct ChangePasswordPayload {
    pub ok: OkResult,
}

/// Payload of `promoteUser`
#[derive(Debug, Clone, SimpleObject)]
pub struct PromoteUserPayload {
    pub ok: OkResult,
    pub user: Option<Account>,
}
