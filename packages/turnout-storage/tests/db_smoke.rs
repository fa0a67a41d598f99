use turnout_storage::{db::Db, models::VoterImport, queries};
use turnout_testkit::TestDatabase;

async fn connect(test_db: &TestDatabase) -> Db {
	let cfg = turnout_config::Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };

	Db::connect(&cfg).await.expect("Failed to connect to Postgres.")
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TURNOUT_PG_DSN to run."]
async fn schema_bootstrap_is_repeatable() {
	let Some(base_dsn) = turnout_testkit::env_dsn() else {
		eprintln!("Skipping db_smoke; set TURNOUT_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(&test_db).await;

	db.ensure_schema("simple").await.expect("Failed to apply schema.");
	db.ensure_schema("simple").await.expect("Failed to re-apply schema.");

	let tables: Vec<String> = sqlx::query_scalar(
		"\
SELECT table_name::text
FROM information_schema.tables
WHERE table_schema = 'public'
ORDER BY table_name",
	)
	.fetch_all(&db.pool)
	.await
	.expect("Failed to list tables.");

	assert_eq!(
		tables,
		vec!["user_county_access", "user_sessions", "user_voter_tags", "users", "voters"]
	);

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TURNOUT_PG_DSN to run."]
async fn grants_and_voters_round_trip() {
	let Some(base_dsn) = turnout_testkit::env_dsn() else {
		eprintln!("Skipping db_smoke; set TURNOUT_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(&test_db).await;

	db.ensure_schema("simple").await.expect("Failed to apply schema.");

	let user = queries::insert_user(&db.pool, "a@example.org", None, false)
		.await
		.expect("Failed to insert user.");

	assert!(matches!(
		queries::insert_user(&db.pool, "a@example.org", None, false).await,
		Err(turnout_storage::Error::Conflict(_))
	));

	let mut tx = db.pool.begin().await.expect("Failed to begin.");
	let grants = queries::replace_grants(
		&mut tx,
		user.id,
		&["Kent".to_string(), " Kent ".to_string(), "".to_string(), "Sussex".to_string()],
	)
	.await
	.expect("Failed to replace grants.");

	tx.commit().await.expect("Failed to commit.");

	assert_eq!(grants.into_iter().collect::<Vec<_>>(), vec!["Kent", "Sussex"]);
	assert_eq!(
		queries::list_grants(&db.pool, user.id).await.expect("Failed to list grants.").len(),
		2
	);

	let row = VoterImport {
		voter_id: "V-1".to_string(),
		first_name: "Allison".to_string(),
		last_name: "Murphy".to_string(),
		county: Some("Kent".to_string()),
		..Default::default()
	};

	assert!(queries::upsert_voter(&db.pool, &row).await.expect("Failed to insert voter."));
	assert!(!queries::upsert_voter(&db.pool, &row).await.expect("Failed to update voter."));

	let stored = queries::find_voter(&db.pool, "V-1")
		.await
		.expect("Failed to load voter.")
		.expect("Voter should exist.");

	assert_eq!(stored.last_name, "Murphy");
	assert!(queries::insert_tag(&db.pool, user.id, stored.id).await.expect("tag"));
	assert!(!queries::insert_tag(&db.pool, user.id, stored.id).await.expect("tag"));
	assert!(queries::delete_tag(&db.pool, user.id, stored.id).await.expect("untag"));

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
