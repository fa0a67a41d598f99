use std::collections::BTreeSet;

use sqlx::{PgExecutor, Postgres, Transaction};
use time::OffsetDateTime;

use crate::{
	Error, Result,
	models::{self, SessionUser, User, UserTagCount, VOTER_COLUMNS, Voter, VoterImport},
};

pub async fn list_grants<'e, E>(executor: E, user_id: i64) -> Result<BTreeSet<String>>
where
	E: PgExecutor<'e>,
{
	let rows: Vec<String> =
		sqlx::query_scalar("SELECT county FROM user_county_access WHERE user_id = $1")
			.bind(user_id)
			.fetch_all(executor)
			.await?;

	Ok(rows.into_iter().collect())
}

/// Replaces every grant of `user_id` with `counties`. Blank and duplicate entries are dropped.
pub async fn replace_grants(
	tx: &mut Transaction<'_, Postgres>,
	user_id: i64,
	counties: &[String],
) -> Result<BTreeSet<String>> {
	let counties = counties
		.iter()
		.map(|county| county.trim())
		.filter(|county| !county.is_empty())
		.map(str::to_string)
		.collect::<BTreeSet<_>>();

	sqlx::query("DELETE FROM user_county_access WHERE user_id = $1")
		.bind(user_id)
		.execute(&mut **tx)
		.await?;

	for county in &counties {
		sqlx::query("INSERT INTO user_county_access (user_id, county) VALUES ($1, $2)")
			.bind(user_id)
			.bind(county.as_str())
			.execute(&mut **tx)
			.await?;
	}

	Ok(counties)
}

pub async fn insert_user<'e, E>(
	executor: E,
	email: &str,
	full_name: Option<&str>,
	is_admin: bool,
) -> Result<User>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query_as::<_, User>(
		"\
INSERT INTO users (email, full_name, is_admin)
VALUES ($1, $2, $3)
RETURNING id, email, full_name, is_admin, created_at",
	)
	.bind(email)
	.bind(full_name)
	.bind(is_admin)
	.fetch_one(executor)
	.await;

	match result {
		Ok(user) => Ok(user),
		Err(sqlx::Error::Database(err)) if err.is_unique_violation() =>
			Err(Error::Conflict(format!("User {email} already exists."))),
		Err(err) => Err(err.into()),
	}
}

pub async fn find_user<'e, E>(executor: E, user_id: i64) -> Result<Option<User>>
where
	E: PgExecutor<'e>,
{
	let user = sqlx::query_as::<_, User>(
		"SELECT id, email, full_name, is_admin, created_at FROM users WHERE id = $1",
	)
	.bind(user_id)
	.fetch_optional(executor)
	.await?;

	Ok(user)
}

pub async fn list_users<'e, E>(executor: E) -> Result<Vec<User>>
where
	E: PgExecutor<'e>,
{
	let users = sqlx::query_as::<_, User>(
		"SELECT id, email, full_name, is_admin, created_at FROM users ORDER BY email ASC",
	)
	.fetch_all(executor)
	.await?;

	Ok(users)
}

pub async fn insert_session<'e, E>(
	executor: E,
	token_hash: &str,
	user_id: i64,
	created_at: OffsetDateTime,
	expires_at: OffsetDateTime,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO user_sessions (token_hash, user_id, created_at, expires_at)
VALUES ($1, $2, $3, $4)",
	)
	.bind(token_hash)
	.bind(user_id)
	.bind(created_at)
	.bind(expires_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn find_session_user<'e, E>(
	executor: E,
	token_hash: &str,
	now: OffsetDateTime,
) -> Result<Option<SessionUser>>
where
	E: PgExecutor<'e>,
{
	let user = sqlx::query_as::<_, SessionUser>(
		"\
SELECT u.id AS user_id, u.is_admin
FROM user_sessions s
JOIN users u ON u.id = s.user_id
WHERE s.token_hash = $1
	AND s.expires_at > $2",
	)
	.bind(token_hash)
	.bind(now)
	.fetch_optional(executor)
	.await?;

	Ok(user)
}

/// Inserts a voter or refreshes every imported field of the row with the same `voter_id`.
///
/// An absent note never clears a note written elsewhere. Returns `true` when a row was inserted.
pub async fn upsert_voter<'e, E>(executor: E, voter: &VoterImport) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let inserted: bool = sqlx::query_scalar(
		"\
INSERT INTO voters (
	voter_id,
	first_name,
	last_name,
	address,
	city,
	state,
	zip_code,
	registered_party,
	county,
	precinct,
	phone,
	email,
	has_voted,
	note
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
ON CONFLICT (voter_id) DO UPDATE
SET
	first_name = EXCLUDED.first_name,
	last_name = EXCLUDED.last_name,
	address = EXCLUDED.address,
	city = EXCLUDED.city,
	state = EXCLUDED.state,
	zip_code = EXCLUDED.zip_code,
	registered_party = EXCLUDED.registered_party,
	county = EXCLUDED.county,
	precinct = EXCLUDED.precinct,
	phone = EXCLUDED.phone,
	email = EXCLUDED.email,
	has_voted = EXCLUDED.has_voted,
	note = COALESCE(EXCLUDED.note, voters.note)
RETURNING (xmax = 0) AS inserted",
	)
	.bind(voter.voter_id.as_str())
	.bind(voter.first_name.as_str())
	.bind(voter.last_name.as_str())
	.bind(voter.address.as_deref())
	.bind(voter.city.as_deref())
	.bind(voter.state.as_deref())
	.bind(voter.zip_code.as_deref())
	.bind(voter.registered_party.as_deref())
	.bind(voter.county.as_deref())
	.bind(voter.precinct.as_deref())
	.bind(voter.phone.as_deref())
	.bind(voter.email.as_deref())
	.bind(voter.has_voted)
	.bind(voter.note.as_deref())
	.fetch_one(executor)
	.await?;

	Ok(inserted)
}

pub async fn find_voter<'e, E>(executor: E, voter_id: &str) -> Result<Option<Voter>>
where
	E: PgExecutor<'e>,
{
	let sql = format!("SELECT {VOTER_COLUMNS} FROM voters WHERE voter_id = $1");
	let voter = sqlx::query_as::<_, Voter>(&sql).bind(voter_id).fetch_optional(executor).await?;

	Ok(voter)
}

/// Returns `true` when a new tag was written, `false` when it already existed.
pub async fn insert_tag<'e, E>(executor: E, user_id: i64, voter_pk: i64) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
INSERT INTO user_voter_tags (user_id, voter_id)
VALUES ($1, $2)
ON CONFLICT (user_id, voter_id) DO NOTHING",
	)
	.bind(user_id)
	.bind(voter_pk)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() == 1)
}

pub async fn delete_tag<'e, E>(executor: E, user_id: i64, voter_pk: i64) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM user_voter_tags WHERE user_id = $1 AND voter_id = $2")
		.bind(user_id)
		.bind(voter_pk)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

/// Voters tagged by `user_id`, ordered by name. `regions = None` means no region restriction.
/// `not_voted_only` keeps only voters who have not voted yet.
pub async fn list_tagged_voters<'e, E>(
	executor: E,
	user_id: i64,
	regions: Option<&[String]>,
	not_voted_only: bool,
) -> Result<Vec<Voter>>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
SELECT {columns}
FROM voters v
JOIN user_voter_tags t ON t.voter_id = v.id
WHERE t.user_id = $1
	AND ($2::text[] IS NULL OR v.county = ANY($2))
	AND (NOT $3 OR NOT v.has_voted)
ORDER BY v.last_name ASC, v.first_name ASC, v.voter_id ASC",
		columns = models::qualified_voter_columns("v"),
	);
	let voters = sqlx::query_as::<_, Voter>(&sql)
		.bind(user_id)
		.bind(regions)
		.bind(not_voted_only)
		.fetch_all(executor)
		.await?;

	Ok(voters)
}

/// Tag counts per user, including users with no tags. `user_id` narrows the result to one user.
pub async fn tag_counts<'e, E>(executor: E, user_id: Option<i64>) -> Result<Vec<UserTagCount>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, UserTagCount>(
		"\
SELECT u.id AS user_id, u.email, u.full_name, COUNT(t.id) AS tag_count
FROM users u
LEFT JOIN user_voter_tags t ON t.user_id = u.id
WHERE $1::bigint IS NULL OR u.id = $1
GROUP BY u.id, u.email, u.full_name
ORDER BY u.email ASC",
	)
	.bind(user_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
