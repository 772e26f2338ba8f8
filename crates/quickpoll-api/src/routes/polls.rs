use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use quickpoll_core::AppState;
use quickpoll_models::poll::{Poll, PollResults, Vote};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::Voter;

#[derive(Deserialize)]
pub struct CreatePollRequest {
    pub question: Option<String>,
    pub description: Option<String>,
    pub options: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub poll_id: Option<String>,
    pub option_id: Option<String>,
}

#[derive(Deserialize)]
pub struct PollIdQuery {
    pub id: Option<String>,
}

fn required_id(query: PollIdQuery) -> Result<String, ApiError> {
    query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Poll id is required".into()))
}

pub async fn create_poll(
    State(state): State<AppState>,
    body: Result<Json<CreatePollRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Poll>), ApiError> {
    let Json(body) = body?;
    let question = body.question.unwrap_or_default();
    let options = body.options.unwrap_or_default();

    let details = quickpoll_core::poll::create_poll(
        &state.db,
        &question,
        body.description.as_deref(),
        options.as_slice(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(details.to_model(false))))
}

pub async fn get_poll(
    State(state): State<AppState>,
    query: Result<Query<PollIdQuery>, QueryRejection>,
) -> Result<Json<Poll>, ApiError> {
    let Query(query) = query?;
    let id = required_id(query)?;
    let details = quickpoll_core::poll::get_poll(&state.db, &id).await?;
    Ok(Json(details.to_model(false)))
}

pub async fn cast_vote(
    State(state): State<AppState>,
    voter: Voter,
    body: Result<Json<CastVoteRequest>, JsonRejection>,
) -> Result<Json<Vote>, ApiError> {
    let Json(body) = body?;
    let vote = quickpoll_core::vote::record_vote(
        &state.db,
        body.poll_id.as_deref().unwrap_or_default(),
        body.option_id.as_deref().unwrap_or_default(),
        &voter.token,
    )
    .await?;

    Ok(Json(quickpoll_core::poll::vote_to_model(&vote, false)))
}

pub async fn get_results(
    State(state): State<AppState>,
    query: Result<Query<PollIdQuery>, QueryRejection>,
) -> Result<Json<PollResults>, ApiError> {
    let Query(query) = query?;
    let id = required_id(query)?;
    let results = quickpoll_core::results::tally_poll(&state.db, &id).await?;
    Ok(Json(results))
}
