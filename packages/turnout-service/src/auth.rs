use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{Error, Result, TurnoutService, admin::UserOut};
use turnout_domain::scope::Principal;
use turnout_storage::queries;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IssueSessionResponse {
	pub user_id: i64,
	/// Returned once. Only its hash is stored.
	pub token: String,
	#[serde(with = "crate::time_serde")]
	pub expires_at: OffsetDateTime,
}

/// Hex-encoded blake3 digest of a bearer token, the only form in which tokens are stored.
pub fn hash_token(token: &str) -> String {
	blake3::hash(token.as_bytes()).to_hex().to_string()
}

/// `created_at` plus `ttl_days`, failing instead of overflowing the timestamp range.
pub fn session_expiry(created_at: OffsetDateTime, ttl_days: i64) -> Result<OffsetDateTime> {
	ttl_days
		.checked_mul(SECONDS_PER_DAY)
		.map(Duration::seconds)
		.and_then(|ttl| created_at.checked_add(ttl))
		.ok_or_else(|| Error::InvalidRequest {
			message: format!("Session lifetime of {ttl_days} days is out of range."),
		})
}

impl TurnoutService {
	/// Resolves a bearer token to the principal it was issued for.
	pub async fn authenticate(&self, token: &str) -> Result<Principal> {
		let token = token.trim();

		if token.is_empty() {
			return Err(Error::Unauthorized { message: "Bearer token is required.".to_string() });
		}

		let now = OffsetDateTime::now_utc();
		let Some(user) =
			queries::find_session_user(&self.db.pool, &hash_token(token), now).await?
		else {
			tracing::info!("Rejected unknown or expired session token.");

			return Err(Error::Unauthorized {
				message: "Session is invalid or expired.".to_string(),
			});
		};

		Ok(Principal { id: user.user_id, is_privileged: user.is_admin })
	}

	/// The user record and current county grants behind `principal`.
	pub async fn current_user(&self, principal: &Principal) -> Result<UserOut> {
		let user = queries::find_user(&self.db.pool, principal.id).await?.ok_or_else(|| {
			Error::Unauthorized { message: "Session user no longer exists.".to_string() }
		})?;
		let counties = queries::list_grants(&self.db.pool, user.id).await?;

		Ok(UserOut::new(user, counties))
	}

	pub async fn issue_session(&self, user_id: i64) -> Result<IssueSessionResponse> {
		if queries::find_user(&self.db.pool, user_id).await?.is_none() {
			return Err(Error::NotFound { message: format!("User {user_id} does not exist.") });
		}

		let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
		let created_at = OffsetDateTime::now_utc();
		let expires_at = session_expiry(created_at, self.cfg.security.session_ttl_days)?;

		queries::insert_session(&self.db.pool, &hash_token(&token), user_id, created_at, expires_at)
			.await?;

		tracing::info!(user_id, %expires_at, "Issued session.");

		Ok(IssueSessionResponse { user_id, token, expires_at })
	}
}

#[cfg(test)]
mod tests {
	use time::{Duration, OffsetDateTime, macros::datetime};

	use super::{hash_token, session_expiry};
	use crate::Error;

	#[test]
	fn session_expiry_adds_whole_days() {
		let created_at = datetime!(2026-01-01 00:00 UTC);

		assert_eq!(
			session_expiry(created_at, 30).expect("Expiry should fit."),
			datetime!(2026-01-31 00:00 UTC)
		);
	}

	#[test]
	fn oversized_session_lifetime_is_an_error() {
		let created_at = OffsetDateTime::now_utc();

		for ttl_days in [10_000_000, i64::MAX] {
			assert!(matches!(
				session_expiry(created_at, ttl_days),
				Err(Error::InvalidRequest { .. })
			));
		}

		let longest = session_expiry(created_at, 3_650).expect("Configured maximum should fit.");

		assert!(longest > created_at + Duration::days(3_649));
	}

	#[test]
	fn hash_is_stable_hex() {
		let hash = hash_token("session-token");

		assert_eq!(hash, hash_token("session-token"));
		assert_ne!(hash, hash_token("session-token2"));
		assert_eq!(hash.len(), 64);
		assert!(hash.chars().all(|ch| ch.is_ascii_hexdigit()));
	}
}
