use serde::{Deserialize, Serialize};

/// Record columns a caller may target with an explicit field selector.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
	FirstName,
	LastName,
	Address,
	City,
	State,
	ZipCode,
	RegisteredParty,
	Phone,
	Email,
	VoterId,
	County,
	Precinct,
}
impl SearchField {
	pub const ALL: [Self; 12] = [
		Self::FirstName,
		Self::LastName,
		Self::Address,
		Self::City,
		Self::State,
		Self::ZipCode,
		Self::RegisteredParty,
		Self::Phone,
		Self::Email,
		Self::VoterId,
		Self::County,
		Self::Precinct,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::FirstName => "first_name",
			Self::LastName => "last_name",
			Self::Address => "address",
			Self::City => "city",
			Self::State => "state",
			Self::ZipCode => "zip_code",
			Self::RegisteredParty => "registered_party",
			Self::Phone => "phone",
			Self::Email => "email",
			Self::VoterId => "voter_id",
			Self::County => "county",
			Self::Precinct => "precinct",
		}
	}

	/// Column in the `voters` table backing this field.
	pub fn column(self) -> &'static str {
		match self {
			Self::FirstName => "first_name",
			Self::LastName => "last_name",
			Self::Address => "address",
			Self::City => "city",
			Self::State => "state",
			Self::ZipCode => "zip_code",
			Self::RegisteredParty => "registered_party",
			Self::Phone => "phone",
			Self::Email => "email",
			Self::VoterId => "voter_id",
			Self::County => "county",
			Self::Precinct => "precinct",
		}
	}

	/// Resolves a caller-supplied selector. Matching is trimmed and case-insensitive; anything
	/// unrecognized, including the `all` sentinel, yields `None`.
	pub fn parse(raw: &str) -> Option<Self> {
		let key = raw.trim().to_ascii_lowercase();

		Self::ALL.into_iter().find(|field| field.as_str() == key)
	}
}
