pub const TS_CONFIG_PLACEHOLDER: &str = "<TS_CONFIG>";

/// Renders the bootstrap schema with the text search configuration used by `voters.search_tsv`.
///
/// The value is interpolated into DDL, so callers must pass a validated identifier.
pub fn render_schema(text_search_config: &str) -> String {
	let init = include_str!("../../../sql/init.sql");
	let expanded = expand_includes(init);

	expanded.replace(TS_CONFIG_PLACEHOLDER, text_search_config)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_users.sql")),
				"tables/002_user_county_access.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_user_county_access.sql")),
				"tables/003_user_sessions.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_user_sessions.sql")),
				"tables/004_voters.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_voters.sql")),
				"tables/005_user_voter_tags.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_user_voter_tags.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
