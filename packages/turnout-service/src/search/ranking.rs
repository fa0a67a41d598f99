use sqlx::{Postgres, QueryBuilder};

use turnout_domain::classify::TextQuery;

/// Orders ranked matches by score, then by external id so equal scores page deterministically.
pub(super) const RANK_ORDER: &str = "ts_rank(v.search_tsv, ts_query) DESC, v.voter_id ASC";

/// Pushes the `ts_query` source for the ranked `FROM` list.
///
/// Prefix terms go through `to_tsquery` as `a:* & b:*`; the phrase fallback goes through
/// `plainto_tsquery`, which never interprets operators.
pub(super) fn push_ts_query(
	builder: &mut QueryBuilder<'static, Postgres>,
	query: &TextQuery,
	text_search_config: &str,
) {
	let function = match query {
		TextQuery::Prefix(_) => "to_tsquery",
		TextQuery::Phrase(_) => "plainto_tsquery",
	};

	builder.push(function).push("(");
	builder.push_bind(text_search_config.to_string());
	builder.push("::regconfig, ");
	builder.push_bind(query.tsquery_input());
	builder.push(") AS ts_query");
}

/// Conjunctive filter: a row is ranked only if every term of the query matches.
pub(super) fn push_match(builder: &mut QueryBuilder<'static, Postgres>) {
	builder.push("v.search_tsv @@ ts_query");
}
