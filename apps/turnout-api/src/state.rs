use std::sync::Arc;

use turnout_service::TurnoutService;
use turnout_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TurnoutService>,
}
impl AppState {
	/// Connects to PostgreSQL and applies the schema before serving.
	pub async fn new(config: turnout_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(&config.search.text_search_config).await?;

		Ok(Self::from_service(TurnoutService::new(config, db)))
	}

	pub fn from_service(service: TurnoutService) -> Self {
		Self { service: Arc::new(service) }
	}
}
