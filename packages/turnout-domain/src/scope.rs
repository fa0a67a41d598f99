use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The authenticated caller of a request.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Principal {
	pub id: i64,
	pub is_privileged: bool,
}

/// The set of records a principal may see, expressed over region (county) values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccessScope {
	Unrestricted,
	RestrictedTo(BTreeSet<String>),
}
impl AccessScope {
	/// Privileged principals see everything; everyone else sees exactly their granted regions.
	/// No grants means no records.
	pub fn resolve(principal: &Principal, grants: BTreeSet<String>) -> Self {
		if principal.is_privileged { Self::Unrestricted } else { Self::RestrictedTo(grants) }
	}

	pub fn is_deny_all(&self) -> bool {
		matches!(self, Self::RestrictedTo(grants) if grants.is_empty())
	}

	/// Whether a record with the given region is visible. Records without a region are only
	/// visible to unrestricted principals.
	pub fn permits(&self, region: Option<&str>) -> bool {
		match self {
			Self::Unrestricted => true,
			Self::RestrictedTo(grants) => region.map(|region| grants.contains(region)).unwrap_or(false),
		}
	}

	pub fn regions(&self) -> Option<Vec<String>> {
		match self {
			Self::Unrestricted => None,
			Self::RestrictedTo(grants) => Some(grants.iter().cloned().collect()),
		}
	}
}
