//! GraphQL mutation root
//!
//! Protected mutations run the guard first; a guard failure becomes the
//! `AuthFailure` variant of the payload, and the business handler is
//! never invoked.

use super::objects::{
    Account, AuthPayload, ChangePasswordPayload, CreateUserPayload, OkResult, PromoteUserPayload,
    RefreshPayload, TokenResult,
};
use super::{resolver_error, ApiContext};
use crate::auth::{require_access, require_refresh};
use crate::services::AccountService;
use async_graphql::{Context, Object, Result};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a new account
    ///
    /// The `teacher` argument is accepted for compatibility and
    /// ignored: accounts always start as non-teachers, and promotion
    /// codes are the only path to the teacher flag.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
        #[graphql(name = "teacher")] _teacher: Option<bool>,
    ) -> Result<CreateUserPayload> {
        let api = ctx.data::<ApiContext>()?;

        let account = AccountService::create_account(api.accounts.as_ref(), &username, &password)
            .await
            .map_err(resolver_error)?;

        Ok(CreateUserPayload {
            ok: account.is_some(),
            user: account.map(Account::from),
        })
    }

    /// Log in, receiving an access and refresh token pair
    async fn auth(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<AuthPayload> {
        let api = ctx.data::<ApiContext>()?;

        let tokens =
            AccountService::authenticate(api.accounts.as_ref(), &api.jwt, &username, &password)
                .await
                .map_err(resolver_error)?;

        Ok(match tokens {
            Some(pair) => AuthPayload {
                access_token: Some(pair.access_token),
                refresh_token: Some(pair.refresh_token),
                ok: true,
            },
            None => AuthPayload {
                access_token: None,
                refresh_token: None,
                ok: false,
            },
        })
    }

    /// Exchange a refresh token for a new access token
    async fn refresh(&self, ctx: &Context<'_>, refresh_token: String) -> Result<RefreshPayload> {
        let api = ctx.data::<ApiContext>()?;

        let identity = match require_refresh(&api.jwt, &refresh_token) {
            Ok(identity) => identity,
            Err(e) => {
                return Ok(RefreshPayload {
                    new_token: TokenResult::auth(e),
                })
            }
        };

        let token =
            AccountService::mint_access_token(&api.jwt, &identity).map_err(resolver_error)?;

        Ok(RefreshPayload {
            new_token: TokenResult::token(token),
        })
    }

    /// Replace the caller's password
    async fn change_password(
        &self,
        ctx: &Context<'_>,
        token: String,
        password: String,
    ) -> Result<ChangePasswordPayload> {
        let api = ctx.data::<ApiContext>()?;

        let identity = match require_access(&api.jwt, &token) {
            Ok(identity) => identity,
            Err(e) => {
                return Ok(ChangePasswordPayload {
                    ok: OkResult::auth(e),
                })
            }
        };

        AccountService::change_password(api.accounts.as_ref(), &identity, &password)
            .await
            .map_err(resolver_error)?;

        Ok(ChangePasswordPayload {
            ok: OkResult::ok(true),
        })
    }

    /// Redeem a single-use promotion code for teacher status
    async fn promote_user(
        &self,
        ctx: &Context<'_>,
        token: String,
        code: String,
    ) -> Result<PromoteUserPayload> {
        let api = ctx.data::<ApiContext>()?;

        let identity = match require_access(&api.jwt, &token) {
            Ok(identity) => identity,
            Err(e) => {
                return Ok(PromoteUserPayload {
                    ok: OkResult::auth(e),
                    user: None,
                })
            }
        };

        let promoted = AccountService::promote(
            api.accounts.as_ref(),
            api.codes.as_ref(),
            &identity,
            &code,
        )
        .await
        .map_err(resolver_error)?;

        Ok(match promoted {
            Some(account) => PromoteUserPayload {
                ok: OkResult::ok(true),
                user: Some(account.into()),
            },
            None => PromoteUserPayload {
                ok: OkResult::ok(false),
                user: None,
            },
        })
    }
}
