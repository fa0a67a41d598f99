mod ranking;
mod sql;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Result, TurnoutService};
use turnout_domain::{
	classify::{self, SearchPlan, Strategy},
	paging::PageRequest,
	scope::{AccessScope, Principal},
};
use turnout_storage::models::Voter;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchRequest {
	#[serde(default, alias = "q")]
	pub text: Option<String>,
	#[serde(default)]
	pub field: Option<String>,
	#[serde(default, deserialize_with = "lenient_int")]
	pub page: Option<i64>,
	#[serde(default, deserialize_with = "lenient_int")]
	pub page_size: Option<i64>,
}

/// Accepts integers or numeric strings. Anything unparseable reads as absent so the page
/// defaults apply.
fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Int(i64),
		Text(String),
	}

	Ok(match Option::<Raw>::deserialize(deserializer)? {
		Some(Raw::Int(value)) => Some(value),
		Some(Raw::Text(raw)) => raw.trim().parse().ok(),
		None => None,
	})
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SearchResponse {
	pub voters: Vec<VoterOut>,
	pub has_more: bool,
	/// Exact scoped count. Only present for browse requests.
	pub total: Option<i64>,
	pub page: u32,
	pub page_size: u32,
	pub strategy: Strategy,
}
impl SearchResponse {
	fn empty(strategy: Strategy, page: &PageRequest, total: Option<i64>) -> Self {
		Self {
			voters: Vec::new(),
			has_more: false,
			total,
			page: page.page(),
			page_size: page.page_size(),
			strategy,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct VoterOut {
	pub voter_id: String,
	pub first_name: String,
	pub last_name: String,
	pub address: Option<String>,
	pub city: Option<String>,
	pub state: Option<String>,
	pub zip_code: Option<String>,
	pub registered_party: Option<String>,
	pub county: Option<String>,
	pub precinct: Option<String>,
	pub phone: Option<String>,
	pub email: Option<String>,
	pub has_voted: bool,
	pub note: Option<String>,
}
impl From<Voter> for VoterOut {
	fn from(voter: Voter) -> Self {
		Self {
			voter_id: voter.voter_id,
			first_name: voter.first_name,
			last_name: voter.last_name,
			address: voter.address,
			city: voter.city,
			state: voter.state,
			zip_code: voter.zip_code,
			registered_party: voter.registered_party,
			county: voter.county,
			precinct: voter.precinct,
			phone: voter.phone,
			email: voter.email,
			has_voted: voter.has_voted,
			note: voter.note,
		}
	}
}

impl TurnoutService {
	pub async fn search_voters(
		&self,
		principal: &Principal,
		req: SearchRequest,
	) -> Result<SearchResponse> {
		let plan = classify::classify(req.text.as_deref(), req.field.as_deref());
		let page = PageRequest::new(req.page, req.page_size, self.cfg.search.default_page_size);
		let scope = self.access_scope(principal).await?;

		if scope.is_deny_all() {
			tracing::debug!(
				principal_id = principal.id,
				strategy = plan.strategy().as_str(),
				"Principal has no region grants. Returning an empty page."
			);

			return Ok(SearchResponse::empty(plan.strategy(), &page, Some(0)));
		}
		if plan.tokens().is_empty() && !matches!(plan, SearchPlan::Browse) {
			// Only punctuation survived normalization.
			return Ok(SearchResponse::empty(plan.strategy(), &page, None));
		}

		let (rows, total) = match &plan {
			SearchPlan::Browse => self.browse_page(&scope, &page).await?,
			_ => (self.text_page(&plan, &scope, &page).await?, None),
		};
		let (rows, has_more) = page.split_overfetch(rows);

		tracing::debug!(
			principal_id = principal.id,
			strategy = plan.strategy().as_str(),
			page = page.page(),
			page_size = page.page_size(),
			returned = rows.len(),
			has_more,
			"Voter search completed."
		);

		Ok(SearchResponse {
			voters: rows.into_iter().map(VoterOut::from).collect(),
			has_more,
			total,
			page: page.page(),
			page_size: page.page_size(),
			strategy: plan.strategy(),
		})
	}

	async fn browse_page(
		&self,
		scope: &AccessScope,
		page: &PageRequest,
	) -> Result<(Vec<Voter>, Option<i64>)> {
		let mut tx = self.db.pool.begin().await?;

		sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
			.execute(&mut *tx)
			.await?;

		let total: i64 = sql::count_query(scope).build_query_scalar().fetch_one(&mut *tx).await?;
		let rows = sql::page_query(
			&SearchPlan::Browse,
			scope,
			page,
			&self.cfg.search.text_search_config,
		)
		.build_query_as::<Voter>()
		.fetch_all(&mut *tx)
		.await?;

		tx.commit().await?;

		Ok((rows, Some(total)))
	}

	async fn text_page(
		&self,
		plan: &SearchPlan,
		scope: &AccessScope,
		page: &PageRequest,
	) -> Result<Vec<Voter>> {
		let rows = sql::page_query(plan, scope, page, &self.cfg.search.text_search_config)
			.build_query_as::<Voter>()
			.fetch_all(&self.db.pool)
			.await?;

		Ok(rows)
	}
}
