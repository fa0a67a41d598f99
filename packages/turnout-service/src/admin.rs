use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, Result, TurnoutService};
use turnout_storage::{
	models::{User, VoterImport},
	queries,
};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateUserRequest {
	pub email: String,
	#[serde(default)]
	pub full_name: Option<String>,
	#[serde(default)]
	pub is_admin: bool,
	#[serde(default)]
	pub allowed_counties: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReplaceGrantsRequest {
	pub allowed_counties: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserOut {
	pub id: i64,
	pub email: String,
	pub full_name: Option<String>,
	pub is_admin: bool,
	pub allowed_counties: Vec<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl UserOut {
	pub(crate) fn new(user: User, counties: BTreeSet<String>) -> Self {
		Self {
			id: user.id,
			email: user.email,
			full_name: user.full_name,
			is_admin: user.is_admin,
			allowed_counties: counties.into_iter().collect(),
			created_at: user.created_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserListResponse {
	pub users: Vec<UserOut>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TagOverviewRequest {
	#[serde(default)]
	pub user_id: Option<i64>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UserTagCountOut {
	pub user_id: i64,
	pub email: String,
	pub full_name: Option<String>,
	pub tag_count: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TagOverviewResponse {
	pub users: Vec<UserTagCountOut>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ImportVotersRequest {
	pub voters: Vec<VoterImport>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ImportVotersResponse {
	pub inserted: u64,
	pub updated: u64,
}

impl TurnoutService {
	pub async fn create_user(&self, req: CreateUserRequest) -> Result<UserOut> {
		let email = req.email.trim().to_lowercase();

		if email.is_empty() || !email.contains('@') {
			return Err(Error::InvalidRequest { message: "email must be an address.".to_string() });
		}

		let full_name = req.full_name.as_deref().map(str::trim).filter(|name| !name.is_empty());
		let mut tx = self.db.pool.begin().await?;
		let user = queries::insert_user(&mut *tx, &email, full_name, req.is_admin).await?;
		let counties = queries::replace_grants(&mut tx, user.id, &req.allowed_counties).await?;

		tx.commit().await?;

		tracing::info!(user_id = user.id, is_admin = user.is_admin, "Created user.");

		Ok(UserOut::new(user, counties))
	}

	/// Replaces every county grant of a user.
	pub async fn replace_grants(&self, user_id: i64, req: ReplaceGrantsRequest) -> Result<UserOut> {
		let mut tx = self.db.pool.begin().await?;
		let user = queries::find_user(&mut *tx, user_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("User {user_id} does not exist.") })?;
		let counties = queries::replace_grants(&mut tx, user_id, &req.allowed_counties).await?;

		tx.commit().await?;

		tracing::info!(user_id, grant_count = counties.len(), "Replaced county grants.");

		Ok(UserOut::new(user, counties))
	}

	pub async fn list_users(&self) -> Result<UserListResponse> {
		let users = queries::list_users(&self.db.pool).await?;
		let mut out = Vec::with_capacity(users.len());

		for user in users {
			let counties = queries::list_grants(&self.db.pool, user.id).await?;

			out.push(UserOut::new(user, counties));
		}

		Ok(UserListResponse { users: out })
	}

	/// Tag counts per user, users without tags included. An unknown `user_id` yields no rows.
	pub async fn tag_overview(&self, req: TagOverviewRequest) -> Result<TagOverviewResponse> {
		let rows = queries::tag_counts(&self.db.pool, req.user_id).await?;
		let users = rows
			.into_iter()
			.map(|row| UserTagCountOut {
				user_id: row.user_id,
				email: row.email,
				full_name: row.full_name,
				tag_count: row.tag_count,
			})
			.collect();

		Ok(TagOverviewResponse { users })
	}

	/// Inserts or refreshes voters by external `voter_id` in a single transaction.
	pub async fn import_voters(&self, req: ImportVotersRequest) -> Result<ImportVotersResponse> {
		let voters = req
			.voters
			.into_iter()
			.enumerate()
			.map(|(idx, voter)| normalize_import(idx, voter))
			.collect::<Result<Vec<_>>>()?;
		let mut tx = self.db.pool.begin().await?;
		let mut report = ImportVotersResponse { inserted: 0, updated: 0 };

		for voter in &voters {
			if queries::upsert_voter(&mut *tx, voter).await? {
				report.inserted += 1;
			} else {
				report.updated += 1;
			}
		}

		tx.commit().await?;

		tracing::info!(
			inserted = report.inserted,
			updated = report.updated,
			"Imported voter records."
		);

		Ok(report)
	}
}

fn normalize_import(idx: usize, mut voter: VoterImport) -> Result<VoterImport> {
	for (label, value) in [
		("voter_id", &mut voter.voter_id),
		("first_name", &mut voter.first_name),
		("last_name", &mut voter.last_name),
	] {
		*value = value.trim().to_string();

		if value.is_empty() {
			return Err(Error::InvalidRequest {
				message: format!("voters[{idx}].{label} must be non-empty."),
			});
		}
	}

	for value in [
		&mut voter.address,
		&mut voter.city,
		&mut voter.state,
		&mut voter.zip_code,
		&mut voter.registered_party,
		&mut voter.county,
		&mut voter.precinct,
		&mut voter.phone,
		&mut voter.email,
		&mut voter.note,
	] {
		*value = value.take().map(|raw| raw.trim().to_string()).filter(|raw| !raw.is_empty());
	}

	Ok(voter)
}

#[cfg(test)]
mod tests {
	use super::normalize_import;
	use crate::Error;
	use turnout_storage::models::VoterImport;

	#[test]
	fn import_rows_are_trimmed_and_blanks_dropped() {
		let voter = VoterImport {
			voter_id: " V-1 ".to_string(),
			first_name: "Allison".to_string(),
			last_name: " Murphy".to_string(),
			county: Some("  Kent ".to_string()),
			phone: Some("   ".to_string()),
			..Default::default()
		};
		let voter = normalize_import(0, voter).expect("Row should be accepted.");

		assert_eq!(voter.voter_id, "V-1");
		assert_eq!(voter.last_name, "Murphy");
		assert_eq!(voter.county.as_deref(), Some("Kent"));
		assert_eq!(voter.phone, None);
	}

	#[test]
	fn import_rows_require_identity_fields() {
		let voter = VoterImport {
			voter_id: "V-2".to_string(),
			first_name: " ".to_string(),
			last_name: "Murphy".to_string(),
			..Default::default()
		};

		match normalize_import(3, voter) {
			Err(Error::InvalidRequest { message }) =>
				assert_eq!(message, "voters[3].first_name must be non-empty."),
			other => panic!("Unexpected result: {other:?}"),
		}
	}
}
