use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Column list matching [`Voter`], for queries that build their own `WHERE` and `ORDER BY`.
pub const VOTER_COLUMNS: &str = "\
id, voter_id, first_name, last_name, address, city, state, zip_code, registered_party, county, \
precinct, phone, email, has_voted, note";

/// [`VOTER_COLUMNS`] with every column prefixed by a table alias.
pub fn qualified_voter_columns(alias: &str) -> String {
	VOTER_COLUMNS
		.split(',')
		.map(|column| format!("{alias}.{}", column.trim()))
		.collect::<Vec<_>>()
		.join(", ")
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Voter {
	pub id: i64,
	pub voter_id: String,
	pub first_name: String,
	pub last_name: String,
	pub address: Option<String>,
	pub city: Option<String>,
	pub state: Option<String>,
	pub zip_code: Option<String>,
	pub registered_party: Option<String>,
	pub county: Option<String>,
	pub precinct: Option<String>,
	pub phone: Option<String>,
	pub email: Option<String>,
	pub has_voted: bool,
	pub note: Option<String>,
}

/// One row of a bulk import, keyed by the external `voter_id`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct VoterImport {
	pub voter_id: String,
	pub first_name: String,
	pub last_name: String,
	pub address: Option<String>,
	pub city: Option<String>,
	pub state: Option<String>,
	pub zip_code: Option<String>,
	pub registered_party: Option<String>,
	pub county: Option<String>,
	pub precinct: Option<String>,
	pub phone: Option<String>,
	pub email: Option<String>,
	#[serde(default)]
	pub has_voted: bool,
	pub note: Option<String>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct User {
	pub id: i64,
	pub email: String,
	pub full_name: Option<String>,
	pub is_admin: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct UserTagCount {
	pub user_id: i64,
	pub email: String,
	pub full_name: Option<String>,
	pub tag_count: i64,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct SessionUser {
	pub user_id: i64,
	pub is_admin: bool,
}

#[cfg(test)]
mod tests {
	use super::qualified_voter_columns;

	#[test]
	fn qualified_columns_prefix_every_column() {
		let columns = qualified_voter_columns("v");

		assert!(columns.starts_with("v.id, v.voter_id, v.first_name"));
		assert!(columns.ends_with("v.has_voted, v.note"));
		assert!(!columns.contains("v. "));
	}
}
