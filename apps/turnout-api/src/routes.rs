use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::{
		HeaderMap, StatusCode,
		header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE},
	},
	response::{IntoResponse, Response},
	routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;
use turnout_domain::scope::Principal;
use turnout_service::{
	CreateUserRequest, Error as ServiceError, ImportVotersRequest, ImportVotersResponse,
	IssueSessionResponse, ReplaceGrantsRequest, SearchRequest, SearchResponse,
	TagOverviewRequest, TagOverviewResponse, TagResponse, TaggedVotersResponse, UserListResponse,
	UserOut,
};

const BEARER_PREFIX: &str = "Bearer ";
const CALL_LIST_DISPOSITION: &str = "attachment; filename=\"call_list.csv\"";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/me", get(current_user))
		.route("/v1/voters", get(search_voters))
		.route("/v1/tags", get(list_tags))
		.route("/v1/tags/export", get(export_call_list))
		.route("/v1/tags/{voter_id}", post(tag_voter).delete(untag_voter))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/admin/users", get(list_users).post(create_user))
		.route("/v1/admin/users/{user_id}/counties", put(replace_grants))
		.route("/v1/admin/users/{user_id}/sessions", post(issue_session))
		.route("/v1/admin/voters/import", post(import_voters))
		.route("/v1/admin/tags/overview", get(tag_overview))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn current_user(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<UserOut>, ApiError> {
	let principal = authenticate(&state, &headers).await?;
	let response = state.service.current_user(&principal).await?;

	Ok(Json(response))
}

async fn search_voters(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let principal = authenticate(&state, &headers).await?;
	let response = state.service.search_voters(&principal, query).await?;

	Ok(Json(response))
}

async fn list_tags(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<TaggedVotersResponse>, ApiError> {
	let principal = authenticate(&state, &headers).await?;
	let response = state.service.list_tags(&principal).await?;

	Ok(Json(response))
}

async fn export_call_list(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Response, ApiError> {
	let principal = authenticate(&state, &headers).await?;
	let csv = state.service.export_call_list(&principal).await?;
	let headers =
		[(CONTENT_TYPE, "text/csv; charset=utf-8"), (CONTENT_DISPOSITION, CALL_LIST_DISPOSITION)];

	Ok((headers, csv).into_response())
}

async fn tag_voter(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(voter_id): Path<String>,
) -> Result<Json<TagResponse>, ApiError> {
	let principal = authenticate(&state, &headers).await?;
	let response = state.service.tag_voter(&principal, &voter_id).await?;

	Ok(Json(response))
}

async fn untag_voter(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(voter_id): Path<String>,
) -> Result<Json<TagResponse>, ApiError> {
	let principal = authenticate(&state, &headers).await?;
	let response = state.service.untag_voter(&principal, &voter_id).await?;

	Ok(Json(response))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<UserListResponse>, ApiError> {
	let response = state.service.list_users().await?;

	Ok(Json(response))
}

async fn create_user(
	State(state): State<AppState>,
	Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserOut>), ApiError> {
	let response = state.service.create_user(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn replace_grants(
	State(state): State<AppState>,
	Path(user_id): Path<i64>,
	Json(payload): Json<ReplaceGrantsRequest>,
) -> Result<Json<UserOut>, ApiError> {
	let response = state.service.replace_grants(user_id, payload).await?;

	Ok(Json(response))
}

async fn issue_session(
	State(state): State<AppState>,
	Path(user_id): Path<i64>,
) -> Result<(StatusCode, Json<IssueSessionResponse>), ApiError> {
	let response = state.service.issue_session(user_id).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn tag_overview(
	State(state): State<AppState>,
	Query(query): Query<TagOverviewRequest>,
) -> Result<Json<TagOverviewResponse>, ApiError> {
	let response = state.service.tag_overview(query).await?;

	Ok(Json(response))
}

async fn import_voters(
	State(state): State<AppState>,
	Json(payload): Json<ImportVotersRequest>,
) -> Result<Json<ImportVotersResponse>, ApiError> {
	let response = state.service.import_voters(payload).await?;

	Ok(Json(response))
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, ApiError> {
	let token = bearer_token(headers)?;

	Ok(state.service.authenticate(token).await?)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
	let Some(raw) = headers.get(AUTHORIZATION) else {
		return Err(unauthorized("Authorization header is required."));
	};
	let value = raw.to_str().map_err(|_| unauthorized("Authorization header must be ASCII."))?;
	let Some(token) = value.strip_prefix(BEARER_PREFIX).map(str::trim) else {
		return Err(unauthorized("Authorization header must use the Bearer scheme."));
	};

	if token.is_empty() {
		return Err(unauthorized("Bearer token is required."));
	}

	Ok(token)
}

fn unauthorized(message: &str) -> ApiError {
	tracing::info!(reason = message, "Rejected request without a usable bearer token.");

	json_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message),
			ServiceError::Unauthorized { message } =>
				json_error(StatusCode::UNAUTHORIZED, "unauthorized", message),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "conflict", message),
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Storage failure.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal error.")
			},
			ServiceError::Internal { message } => {
				tracing::error!(error = %message, "Internal failure.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal error.")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
