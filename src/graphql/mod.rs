//! GraphQL schema for account management
//!
//! Queries list and find accounts; mutations cover account creation,
//! login, token refresh, password change and teacher promotion. The
//! resolvers reach the stores only through the repository traits held
//! in [`ApiContext`].

use crate::auth::JwtService;
use crate::error::ApiError;
use crate::repositories::{AccountRepository, CodeRepository};
use async_graphql::{EmptySubscription, ErrorExtensions, Schema};
use std::sync::Arc;
use tracing::error;

mod mutation;
mod objects;
mod query;


pub use mutation::MutationRoot;
pub use objects::Account;
pub use query::QueryRoot;

/// Executable schema type
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Dependencies shared with every resolver
pub struct ApiContext {
    pub accounts: Arc<dyn AccountRepository>,
    pub codes: Arc<dyn CodeRepository>,
    pub jwt: JwtService,
}

/// Build the executable schema over the given stores
pub fn build_schema(
    accounts: Arc<dyn AccountRepository>,
    codes: Arc<dyn CodeRepository>,
    jwt: JwtService,
) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(ApiContext {
            accounts,
            codes,
            jwt,
        })
        .finish()
}

/// Convert a store/hashing fault into a GraphQL field error
///
/// The full error is logged; the caller sees only the generic message
/// from the `ApiError` display impl plus a machine-readable code.
pub(crate) fn resolver_error(err: ApiError) -> async_graphql::Error {
    error!("Resolver error: {:?}", err);

    let code = match &err {
        ApiError::NotFound(_) => "NOT_FOUND",
        ApiError::Unauthorized(_) => "UNAUTHORIZED",
        ApiError::BadRequest(_) => "BAD_REQUEST",
        ApiError::Database(_) => "DATABASE_ERROR",
        ApiError::Internal(_) => "INTERNAL_ERROR",
    };

    async_graphql::Error::new(err.to_string())
        .extend_with(|_, e| e.set("code", code))
}
