use std::collections::BTreeSet;

use sqlx::PgPool;

use crate::{BoxFuture, Result, TurnoutService};
use turnout_domain::scope::{AccessScope, Principal};
use turnout_storage::queries;

/// Source of the region grants assigned to a principal.
pub trait GrantStore
where
	Self: Send + Sync,
{
	fn list_grants<'a>(&'a self, principal_id: i64) -> BoxFuture<'a, Result<BTreeSet<String>>>;
}

pub struct PgGrantStore {
	pool: PgPool,
}
impl PgGrantStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}
impl GrantStore for PgGrantStore {
	fn list_grants<'a>(&'a self, principal_id: i64) -> BoxFuture<'a, Result<BTreeSet<String>>> {
		Box::pin(async move { Ok(queries::list_grants(&self.pool, principal_id).await?) })
	}
}

impl TurnoutService {
	pub async fn access_scope(&self, principal: &Principal) -> Result<AccessScope> {
		if principal.is_privileged {
			return Ok(AccessScope::Unrestricted);
		}

		let grants = self.grants.list_grants(principal.id).await?;

		Ok(AccessScope::resolve(principal, grants))
	}
}
