use sqlx::{Postgres, QueryBuilder};

use super::ranking;
use turnout_domain::{
	classify::SearchPlan,
	field::SearchField,
	paging::PageRequest,
	pattern::NamePairPatterns,
	scope::AccessScope,
};
use turnout_storage::models;

const NAME_ORDER: &str = "v.last_name ASC, v.first_name ASC, v.voter_id ASC";

/// Builds the over-fetching page query for `plan` under `scope`.
pub(super) fn page_query(
	plan: &SearchPlan,
	scope: &AccessScope,
	page: &PageRequest,
	text_search_config: &str,
) -> QueryBuilder<'static, Postgres> {
	let mut builder = QueryBuilder::new("SELECT ");

	builder.push(models::qualified_voter_columns("v")).push(" FROM voters v");

	match plan {
		SearchPlan::RankedText(query) => {
			builder.push(", ");
			ranking::push_ts_query(&mut builder, query, text_search_config);
			builder.push(" WHERE ");
			push_scope(&mut builder, scope);
			builder.push(" AND ");
			ranking::push_match(&mut builder);
			builder.push(" ORDER BY ").push(ranking::RANK_ORDER);
		},
		SearchPlan::FieldTargeted { field, .. } => {
			builder.push(" WHERE ");
			push_scope(&mut builder, scope);
			push_field_patterns(&mut builder, *field, plan.contains_patterns());
			builder.push(" ORDER BY ").push(NAME_ORDER);
		},
		SearchPlan::NamePair { .. } => {
			builder.push(" WHERE ");
			push_scope(&mut builder, scope);

			if let Some(patterns) = plan.name_pair_patterns() {
				push_name_pair(&mut builder, patterns);
			}

			builder.push(" ORDER BY ").push(NAME_ORDER);
		},
		SearchPlan::Browse => {
			builder.push(" WHERE ");
			push_scope(&mut builder, scope);
			builder.push(" ORDER BY ").push(NAME_ORDER);
		},
	}

	builder.push(" LIMIT ");
	builder.push_bind(page.fetch_limit());
	builder.push(" OFFSET ");
	builder.push_bind(page.offset());

	builder
}

/// Exact count of the records visible under `scope`.
pub(super) fn count_query(scope: &AccessScope) -> QueryBuilder<'static, Postgres> {
	let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM voters v WHERE ");

	push_scope(&mut builder, scope);

	builder
}

fn push_scope(builder: &mut QueryBuilder<'static, Postgres>, scope: &AccessScope) {
	match scope.regions() {
		None => {
			builder.push("TRUE");
		},
		Some(regions) if regions.is_empty() => {
			builder.push("FALSE");
		},
		Some(regions) => {
			builder.push("v.county = ANY(");
			builder.push_bind(regions);
			builder.push(")");
		},
	}
}

fn push_field_patterns(
	builder: &mut QueryBuilder<'static, Postgres>,
	field: SearchField,
	patterns: Vec<String>,
) {
	for pattern in patterns {
		builder.push(" AND lower(v.").push(field.column()).push(") LIKE ");
		builder.push_bind(pattern);
	}
}

fn push_name_pair(builder: &mut QueryBuilder<'static, Postgres>, patterns: NamePairPatterns) {
	builder.push(" AND ((lower(v.first_name) LIKE ");
	builder.push_bind(patterns.first_prefix.clone());
	builder.push(" AND lower(v.last_name) LIKE ");
	builder.push_bind(patterns.second_prefix.clone());
	builder.push(") OR (lower(v.first_name) LIKE ");
	builder.push_bind(patterns.second_prefix);
	builder.push(" AND lower(v.last_name) LIKE ");
	builder.push_bind(patterns.first_prefix);
	builder.push(") OR lower(v.last_name) LIKE ");
	builder.push_bind(patterns.joined_prefix);
	builder.push(" OR lower(v.last_name) LIKE ");
	builder.push_bind(patterns.joined_contains);
	builder.push(")");
}
