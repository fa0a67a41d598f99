pub mod access;
pub mod admin;
pub mod auth;
pub mod search;
pub mod tags;
pub mod time_serde;

mod error;

pub use access::{GrantStore, PgGrantStore};
pub use admin::{
	CreateUserRequest, ImportVotersRequest, ImportVotersResponse, ReplaceGrantsRequest,
	TagOverviewRequest, TagOverviewResponse, UserListResponse, UserOut, UserTagCountOut,
};
pub use auth::{IssueSessionResponse, hash_token, session_expiry};
pub use error::{Error, Result};
pub use search::{SearchRequest, SearchResponse, VoterOut};
pub use tags::{CALL_LIST_HEADER, TagResponse, TagStatus, TaggedVotersResponse, encode_call_list};

use std::{future::Future, pin::Pin, sync::Arc};

use turnout_config::Config;
use turnout_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub struct TurnoutService {
	pub cfg: Config,
	pub db: Db,
	pub grants: Arc<dyn GrantStore>,
}
impl TurnoutService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let grants = Arc::new(PgGrantStore::new(db.pool.clone()));

		Self { cfg, db, grants }
	}

	pub fn with_grant_store(cfg: Config, db: Db, grants: Arc<dyn GrantStore>) -> Self {
		Self { cfg, db, grants }
	}
}
