mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Postgres, Search, Security, Service, Storage};

use std::{fs, path::Path};

pub const PAGE_SIZE_BUCKETS: [u32; 3] = [10, 25, 50];
pub const MAX_SESSION_TTL_DAYS: i64 = 3_650;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if !PAGE_SIZE_BUCKETS.contains(&cfg.search.default_page_size) {
		return Err(Error::Validation {
			message: "search.default_page_size must be one of 10, 25, or 50.".to_string(),
		});
	}

	let ts_config = cfg.search.text_search_config.as_str();

	if ts_config.is_empty() || !ts_config.chars().all(|ch| ch.is_ascii_lowercase() || ch == '_')
	{
		return Err(Error::Validation {
			message: "search.text_search_config must be a lowercase identifier.".to_string(),
		});
	}
	if cfg.security.session_ttl_days <= 0 {
		return Err(Error::Validation {
			message: "security.session_ttl_days must be greater than zero.".to_string(),
		});
	}
	if cfg.security.session_ttl_days > MAX_SESSION_TTL_DAYS {
		return Err(Error::Validation {
			message: format!("security.session_ttl_days must be at most {MAX_SESSION_TTL_DAYS}."),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.search.text_search_config = cfg.search.text_search_config.trim().to_ascii_lowercase();
	cfg.service.log_level = cfg.service.log_level.trim().to_string();

	if cfg.service.log_level.is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
