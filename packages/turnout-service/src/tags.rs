use serde::{Deserialize, Serialize};

use crate::{Error, Result, TurnoutService, search::VoterOut};
use turnout_domain::scope::Principal;
use turnout_storage::{models::Voter, queries};

pub const CALL_LIST_HEADER: [&str; 6] =
	["voter_id", "first_name", "last_name", "address", "phone", "email"];

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagStatus {
	Tagged,
	AlreadyTagged,
	Untagged,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TagResponse {
	pub voter_id: String,
	pub status: TagStatus,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TaggedVotersResponse {
	pub voters: Vec<VoterOut>,
}

impl TurnoutService {
	/// Adds a voter to the caller's list. Voters outside the caller's scope are reported as
	/// missing.
	pub async fn tag_voter(&self, principal: &Principal, voter_id: &str) -> Result<TagResponse> {
		let voter_id = voter_id.trim();
		let scope = self.access_scope(principal).await?;
		let voter = queries::find_voter(&self.db.pool, voter_id)
			.await?
			.filter(|voter| scope.permits(voter.county.as_deref()))
			.ok_or_else(|| voter_not_found(voter_id))?;
		let status = if queries::insert_tag(&self.db.pool, principal.id, voter.id).await? {
			TagStatus::Tagged
		} else {
			TagStatus::AlreadyTagged
		};

		Ok(TagResponse { voter_id: voter.voter_id, status })
	}

	/// Removes a voter from the caller's list regardless of the caller's current scope.
	pub async fn untag_voter(&self, principal: &Principal, voter_id: &str) -> Result<TagResponse> {
		let voter_id = voter_id.trim();
		let voter = queries::find_voter(&self.db.pool, voter_id)
			.await?
			.ok_or_else(|| voter_not_found(voter_id))?;

		if !queries::delete_tag(&self.db.pool, principal.id, voter.id).await? {
			return Err(Error::NotFound {
				message: format!("Voter {voter_id} is not on your list."),
			});
		}

		Ok(TagResponse { voter_id: voter.voter_id, status: TagStatus::Untagged })
	}

	/// The caller's tagged voters still visible under their current scope, ordered by name.
	pub async fn list_tags(&self, principal: &Principal) -> Result<TaggedVotersResponse> {
		let scope = self.access_scope(principal).await?;

		if scope.is_deny_all() {
			return Ok(TaggedVotersResponse { voters: Vec::new() });
		}

		let regions = scope.regions();
		let voters =
			queries::list_tagged_voters(&self.db.pool, principal.id, regions.as_deref(), false)
				.await?;

		Ok(TaggedVotersResponse { voters: voters.into_iter().map(VoterOut::from).collect() })
	}

	/// CSV call list of the caller's tagged voters who have not voted yet, under the current
	/// scope.
	pub async fn export_call_list(&self, principal: &Principal) -> Result<String> {
		let scope = self.access_scope(principal).await?;
		let voters = if scope.is_deny_all() {
			Vec::new()
		} else {
			let regions = scope.regions();

			queries::list_tagged_voters(&self.db.pool, principal.id, regions.as_deref(), true)
				.await?
		};

		tracing::debug!(principal_id = principal.id, rows = voters.len(), "Exported call list.");

		encode_call_list(&voters)
	}
}

pub fn encode_call_list(voters: &[Voter]) -> Result<String> {
	let mut writer =
		csv::WriterBuilder::new().terminator(csv::Terminator::CRLF).from_writer(Vec::new());

	writer.write_record(CALL_LIST_HEADER).map_err(call_list_error)?;

	for voter in voters {
		writer
			.write_record([
				voter.voter_id.as_str(),
				voter.first_name.as_str(),
				voter.last_name.as_str(),
				voter.address.as_deref().unwrap_or_default(),
				voter.phone.as_deref().unwrap_or_default(),
				voter.email.as_deref().unwrap_or_default(),
			])
			.map_err(call_list_error)?;
	}

	let bytes = writer.into_inner().map_err(|err| call_list_error(err.into_error()))?;

	String::from_utf8(bytes).map_err(|err| Error::Internal {
		message: format!("Call list is not valid UTF-8: {err}."),
	})
}

fn call_list_error(err: impl std::fmt::Display) -> Error {
	Error::Internal { message: format!("Failed to encode call list: {err}.") }
}

fn voter_not_found(voter_id: &str) -> Error {
	Error::NotFound { message: format!("Voter {voter_id} does not exist.") }
}

#[cfg(test)]
mod tests {
	use super::encode_call_list;
	use turnout_storage::models::Voter;

	fn voter(voter_id: &str, last_name: &str, address: Option<&str>) -> Voter {
		Voter {
			id: 1,
			voter_id: voter_id.to_string(),
			first_name: "Sean".to_string(),
			last_name: last_name.to_string(),
			address: address.map(str::to_string),
			city: None,
			state: None,
			zip_code: None,
			registered_party: None,
			county: Some("Kent".to_string()),
			precinct: None,
			phone: Some("555-867-5309".to_string()),
			email: None,
			has_voted: false,
			note: None,
		}
	}

	#[test]
	fn empty_call_list_is_just_the_header() {
		let csv = encode_call_list(&[]).expect("Failed to encode.");

		assert_eq!(csv, "voter_id,first_name,last_name,address,phone,email\r\n");
	}

	#[test]
	fn call_list_quotes_fields_and_blanks_missing_values() {
		let csv = encode_call_list(&[
			voter("V-1", "O'Brien", Some("12 Main St, Apt 4")),
			voter("V-2", "Say \"Hi\"", None),
		])
		.expect("Failed to encode.");
		let lines = csv.lines().collect::<Vec<_>>();

		assert_eq!(lines.len(), 3);
		assert_eq!(lines[1], "V-1,Sean,O'Brien,\"12 Main St, Apt 4\",555-867-5309,");
		assert_eq!(lines[2], "V-2,Sean,\"Say \"\"Hi\"\"\",,555-867-5309,");
	}
}
