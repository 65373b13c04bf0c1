//! Account service: creation, authentication and role promotion
//!
//! Business-rule failures (duplicate username, bad credentials, unknown
//! promotion code) are expressed in the return types, never as errors;
//! `ApiError` is reserved for store and hashing faults.

use crate::auth::{Identity, JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{AccountRecord, AccountRepository, CodeRepository};
use serde::Serialize;

/// Freshly issued token pair for an authenticated session
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Account service
pub struct AccountService;

impl AccountService {
    /// Create a new account
    ///
    /// Returns `None` when the username is already taken; in that case
    /// the store is untouched. Accounts are always created with
    /// `teacher = false`; promotion is the only path to the flag.
    ///
    /// Password hashing runs on the blocking thread pool.
    pub async fn create_account(
        accounts: &dyn AccountRepository,
        username: &str,
        password: &str,
    ) -> Result<Option<AccountRecord>, ApiError> {
        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        let account = accounts
            .create(username, &password_hash)
            .await
            .map_err(ApiError::Internal)?;

        Ok(account)
    }

    /// Authenticate with username and password
    ///
    /// Returns `None` for an unknown username or wrong password; the
    /// caller cannot tell which. Verification is constant-time and runs
    /// on the blocking thread pool.
    pub async fn authenticate(
        accounts: &dyn AccountRepository,
        jwt: &JwtService,
        username: &str,
        password: &str,
    ) -> Result<Option<TokenPair>, ApiError> {
        let Some(account) = accounts
            .find_by_username(username)
            .await
            .map_err(ApiError::Internal)?
        else {
            return Ok(None);
        };

        let valid =
            PasswordService::verify_async(password.to_string(), account.password_hash.clone())
                .await
                .map_err(ApiError::Internal)?;

        if !valid {
            return Ok(None);
        }

        let access_token = jwt
            .generate_access_token(&account.username)
            .map_err(ApiError::Internal)?;
        let refresh_token = jwt
            .generate_refresh_token(&account.username)
            .map_err(ApiError::Internal)?;

        Ok(Some(TokenPair {
            access_token,
            refresh_token,
        }))
    }

    /// Mint a new access token for an identity proven by a refresh token
    ///
    /// The refresh guard has already validated the token; this only
    /// issues the new access token.
    pub fn mint_access_token(jwt: &JwtService, identity: &Identity) -> Result<String, ApiError> {
        jwt.generate_access_token(&identity.username)
            .map_err(ApiError::Internal)
    }

    /// Replace the account's password hash
    ///
    /// No current-password check is performed; holding a valid access
    /// token is the entire requirement. Succeeds unconditionally once
    /// the identity is valid, even if the account has since vanished.
    pub async fn change_password(
        accounts: &dyn AccountRepository,
        identity: &Identity,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let password_hash = PasswordService::hash_async(new_password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        accounts
            .update_password(&identity.username, &password_hash)
            .await
            .map_err(ApiError::Internal)?;

        Ok(())
    }

    /// Redeem a promotion code, upgrading the account to teacher
    ///
    /// Returns `None` when the code does not exist (or was already
    /// consumed); the teacher flag is then unchanged. Consumption is
    /// atomic delete-if-exists, so concurrent redemptions of the same
    /// code produce at most one success.
    pub async fn promote(
        accounts: &dyn AccountRepository,
        codes: &dyn CodeRepository,
        identity: &Identity,
        code: &str,
    ) -> Result<Option<AccountRecord>, ApiError> {
        let consumed = codes.consume(code).await.map_err(ApiError::Internal)?;
        if !consumed {
            return Ok(None);
        }

        let account = accounts
            .set_teacher(&identity.username, true)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

        Ok(Some(account))
    }

    /// List all accounts
    pub async fn list_accounts(
        accounts: &dyn AccountRepository,
    ) -> Result<Vec<AccountRecord>, ApiError> {
        accounts.list().await.map_err(ApiError::Internal)
    }

    /// Find an account by username; unknown usernames are not an error
    pub async fn find_account(
        accounts: &dyn AccountRepository,
        username: &str,
    ) -> Result<Option<AccountRecord>, ApiError> {
        accounts
            .find_by_username(username)
            .await
            .map_err(ApiError::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::require_refresh;
    use crate::repositories::memory::{MemoryAccountRepository, MemoryCodeRepository};

    fn test_jwt() -> JwtService {
        JwtService::new("service-test-secret", 3600, 604800)
    }

    #[tokio::test]
    async fn test_create_then_authenticate() {
        let accounts = MemoryAccountRepository::default();
        let jwt = test_jwt();

        let account = AccountService::create_account(&accounts, "alice", "hunter2")
            .await
            .unwrap()
            .expect("first creation succeeds");
        assert_eq!(account.username, "alice");
        assert!(!account.teacher);
        assert_ne!(account.password_hash, "hunter2");

        let tokens = AccountService::authenticate(&accounts, &jwt, "alice", "hunter2")
            .await
            .unwrap()
            .expect("correct credentials");
        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());
        assert_ne!(tokens.access_token, tokens.refresh_token);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let accounts = MemoryAccountRepository::default();

        assert!(AccountService::create_account(&accounts, "alice", "one")
            .await
            .unwrap()
            .is_some());
        assert!(AccountService::create_account(&accounts, "alice", "two")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_teacher_argument_never_applies_at_creation() {
        // There is no teacher parameter on create_account at all; the
        // created record is always a plain account.
        let accounts = MemoryAccountRepository::default();
        let account = AccountService::create_account(&accounts, "alice", "pw")
            .await
            .unwrap()
            .unwrap();
        assert!(!account.teacher);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let accounts = MemoryAccountRepository::default();
        let jwt = test_jwt();

        AccountService::create_account(&accounts, "alice", "hunter2")
            .await
            .unwrap();

        let result = AccountService::authenticate(&accounts, &jwt, "alice", "wrong")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_username() {
        let accounts = MemoryAccountRepository::default();
        let jwt = test_jwt();

        let result = AccountService::authenticate(&accounts, &jwt, "nobody", "pw")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_refresh_flow_mints_access_token() {
        let accounts = MemoryAccountRepository::default();
        let jwt = test_jwt();

        AccountService::create_account(&accounts, "alice", "pw")
            .await
            .unwrap();
        let tokens = AccountService::authenticate(&accounts, &jwt, "alice", "pw")
            .await
            .unwrap()
            .unwrap();

        let identity = require_refresh(&jwt, &tokens.refresh_token).unwrap();
        let new_token = AccountService::mint_access_token(&jwt, &identity).unwrap();
        assert!(jwt.validate_access_token(&new_token).is_ok());
    }

    #[tokio::test]
    async fn test_change_password_rotates_credentials() {
        let accounts = MemoryAccountRepository::default();
        let jwt = test_jwt();

        AccountService::create_account(&accounts, "alice", "old-password")
            .await
            .unwrap();

        let identity = Identity {
            username: "alice".to_string(),
        };
        AccountService::change_password(&accounts, &identity, "new-password")
            .await
            .unwrap();

        assert!(
            AccountService::authenticate(&accounts, &jwt, "alice", "new-password")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            AccountService::authenticate(&accounts, &jwt, "alice", "old-password")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_promote_with_unknown_code() {
        let accounts = MemoryAccountRepository::default();
        let codes = MemoryCodeRepository::default();

        AccountService::create_account(&accounts, "alice", "pw")
            .await
            .unwrap();
        let identity = Identity {
            username: "alice".to_string(),
        };

        let result = AccountService::promote(&accounts, &codes, &identity, "no-such-code")
            .await
            .unwrap();
        assert!(result.is_none());

        let account = accounts.find_by_username("alice").await.unwrap().unwrap();
        assert!(!account.teacher);
    }

    #[tokio::test]
    async fn test_promote_consumes_code_once() {
        let accounts = MemoryAccountRepository::default();
        let codes = MemoryCodeRepository::default();

        AccountService::create_account(&accounts, "alice", "pw")
            .await
            .unwrap();
        codes.insert("golden-ticket").await.unwrap();
        let identity = Identity {
            username: "alice".to_string(),
        };

        let promoted = AccountService::promote(&accounts, &codes, &identity, "golden-ticket")
            .await
            .unwrap()
            .expect("first redemption succeeds");
        assert!(promoted.teacher);

        // Second redemption of the same code fails
        let again = AccountService::promote(&accounts, &codes, &identity, "golden-ticket")
            .await
            .unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn test_list_and_find() {
        let accounts = MemoryAccountRepository::default();

        AccountService::create_account(&accounts, "alice", "pw")
            .await
            .unwrap();
        AccountService::create_account(&accounts, "bob", "pw")
            .await
            .unwrap();

        let all = AccountService::list_accounts(&accounts).await.unwrap();
        assert_eq!(all.len(), 2);

        assert!(AccountService::find_account(&accounts, "alice")
            .await
            .unwrap()
            .is_some());
        assert!(AccountService::find_account(&accounts, "carol")
            .await
            .unwrap()
            .is_none());
    }
}
