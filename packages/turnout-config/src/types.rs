use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Page size used when a request does not carry one. Must be one of the page size buckets.
	pub default_page_size: u32,
	/// PostgreSQL text search configuration used by the searchable-text index and ranked queries.
	pub text_search_config: String,
}
impl Default for Search {
	fn default() -> Self {
		Self { default_page_size: 25, text_search_config: "simple".to_string() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	#[serde(default = "default_session_ttl_days")]
	pub session_ttl_days: i64,
}

fn default_session_ttl_days() -> i64 {
	30
}
