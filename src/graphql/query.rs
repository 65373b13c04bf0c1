//! GraphQL query root

use super::objects::Account;
use super::{resolver_error, ApiContext};
use crate::services::AccountService;
use async_graphql::{Context, Object, Result};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All accounts
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<Account>> {
        let api = ctx.data::<ApiContext>()?;

        let accounts = AccountService::list_accounts(api.accounts.as_ref())
            .await
            .map_err(resolver_error)?;

        Ok(accounts.into_iter().map(Account::from).collect())
    }

    /// Accounts matching a username; empty when there is no match
    async fn user(&self, ctx: &Context<'_>, username: String) -> Result<Vec<Account>> {
        let api = ctx.data::<ApiContext>()?;

        let account = AccountService::find_account(api.accounts.as_ref(), &username)
            .await
            .map_err(resolver_error)?;

        Ok(account.into_iter().map(Account::from).collect())
    }
}
