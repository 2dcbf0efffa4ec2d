//! Poll routes: public voting and admin management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::poll::{CreatePollRequest, SetPollActiveRequest, VoteRequest};
use domain::models::Poll;
use persistence::entities::PollEntity;
use persistence::repositories::{PollRepository, VoteOutcome};
use shared::crypto::sha256_hex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::AdminSession;

/// Loads the options for `polls` in one query and assembles them.
async fn with_options(
    repo: &PollRepository,
    polls: Vec<PollEntity>,
) -> Result<Vec<Poll>, ApiError> {
    if polls.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = polls.iter().map(|p| p.id.clone()).collect();
    let options = repo.options_for(&ids).await?;
    Ok(polls.into_iter().map(|p| p.into_poll(&options)).collect())
}

async fn load_poll(repo: &PollRepository, id: &str) -> Result<Poll, ApiError> {
    let poll = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Poll not found".into()))?;
    let options = repo.options_for(&[poll.id.clone()]).await?;
    Ok(poll.into_poll(&options))
}

/// List active polls with their current results.
///
/// GET /api/polls
pub async fn list_polls(State(state): State<AppState>) -> Result<Json<Vec<Poll>>, ApiError> {
    let repo = PollRepository::new(state.pool.clone());
    let polls = repo.list(true).await?;
    Ok(Json(with_options(&repo, polls).await?))
}

/// Cast a vote.
///
/// POST /api/polls/:id/vote
///
/// One vote per poll and voter ID. The voter ID is stored hashed.
pub async fn vote(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    ValidatedJson(request): ValidatedJson<VoteRequest>,
) -> Result<Json<Poll>, ApiError> {
    let repo = PollRepository::new(state.pool.clone());
    let voter_key = sha256_hex(&request.voter_id);

    match repo.vote(&poll_id, &request.option_id, &voter_key).await? {
        VoteOutcome::Recorded => {
            debug!(poll_id = %poll_id, option_id = %request.option_id, "Vote recorded");
        }
        VoteOutcome::PollNotFound => return Err(ApiError::NotFound("Poll not found".into())),
        VoteOutcome::OptionNotFound => {
            return Err(ApiError::NotFound("Poll option not found".into()))
        }
        VoteOutcome::PollInactive => {
            return Err(ApiError::Conflict("Poll is closed for voting".into()))
        }
        VoteOutcome::AlreadyVoted => {
            return Err(ApiError::Conflict("Already voted in this poll".into()))
        }
    }

    Ok(Json(load_poll(&repo, &poll_id).await?))
}

/// GET /api/admin/polls
pub async fn admin_list_polls(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<Poll>>, ApiError> {
    let repo = PollRepository::new(state.pool.clone());
    let polls = repo.list(false).await?;
    Ok(Json(with_options(&repo, polls).await?))
}

/// Create a poll with its options.
///
/// POST /api/admin/polls
pub async fn create_poll(
    State(state): State<AppState>,
    session: AdminSession,
    ValidatedJson(request): ValidatedJson<CreatePollRequest>,
) -> Result<(StatusCode, Json<Poll>), ApiError> {
    let options: Vec<(String, String)> = request
        .options
        .iter()
        .map(|label| (Uuid::new_v4().to_string(), label.trim().to_string()))
        .collect();

    let repo = PollRepository::new(state.pool.clone());
    let (poll, option_rows) = repo
        .create(
            &Uuid::new_v4().to_string(),
            request.question.trim(),
            request.active,
            &options,
        )
        .await?;

    info!(
        poll_id = %poll.id,
        options = option_rows.len(),
        session = %session.jti,
        "Poll created"
    );
    Ok((StatusCode::CREATED, Json(poll.into_poll(&option_rows))))
}

/// Open or close voting.
///
/// PUT /api/admin/polls/:id/active
pub async fn set_poll_active(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
    Json(request): Json<SetPollActiveRequest>,
) -> Result<Json<Poll>, ApiError> {
    let repo = PollRepository::new(state.pool.clone());
    let poll = repo
        .set_active(&id, request.active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Poll not found".into()))?;
    let options = repo.options_for(&[poll.id.clone()]).await?;

    info!(poll_id = %poll.id, active = poll.active, session = %session.jti, "Poll toggled");
    Ok(Json(poll.into_poll(&options)))
}

/// Delete a poll with its options and votes.
///
/// DELETE /api/admin/polls/:id
pub async fn delete_poll(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let repo = PollRepository::new(state.pool.clone());
    if repo.delete(&id).await? == 0 {
        return Err(ApiError::NotFound("Poll not found".into()));
    }

    info!(poll_id = %id, session = %session.jti, "Poll deleted");
    Ok(StatusCode::NO_CONTENT)
}
