use quickpoll_db::votes::VoteRow;
use quickpoll_db::DbPool;
use quickpoll_util::validation::MAX_VOTER_TOKEN_LEN;

use crate::error::CoreError;
use crate::poll::parse_id;
use crate::ID_WORKER;

/// Record one vote for `voter_token` on a poll.
///
/// Uniqueness per `(voter_token, poll)` is decided by the insert itself, so
/// under any interleaving of concurrent calls for the same pair exactly one
/// succeeds and the rest get [`CoreError::DuplicateVote`] with nothing
/// written.
pub async fn record_vote(
    pool: &DbPool,
    poll_id: &str,
    option_id: &str,
    voter_token: &str,
) -> Result<VoteRow, CoreError> {
    if poll_id.trim().is_empty() {
        return Err(CoreError::Validation("pollId is required".into()));
    }
    if option_id.trim().is_empty() {
        return Err(CoreError::Validation("optionId is required".into()));
    }
    if voter_token.trim().is_empty() {
        return Err(CoreError::Validation("Voter could not be identified".into()));
    }
    if voter_token.chars().count() > MAX_VOTER_TOKEN_LEN {
        return Err(CoreError::Validation("Voter token is too long".into()));
    }

    let poll_id = parse_id(poll_id).ok_or(CoreError::NotFound)?;
    let poll = quickpoll_db::polls::get_poll(pool, poll_id)
        .await?
        .ok_or(CoreError::NotFound)?;

    let options = quickpoll_db::polls::get_poll_options(pool, poll.id).await?;
    let option_id = parse_id(option_id)
        .filter(|id| options.iter().any(|o| o.id == *id))
        .ok_or_else(|| CoreError::Validation("Option does not belong to this poll".into()))?;

    let vote_id = quickpoll_util::snowflake::generate(ID_WORKER);
    let inserted =
        quickpoll_db::votes::insert_vote_if_absent(pool, vote_id, voter_token, poll.id, option_id)
            .await?;
    match inserted {
        Some(vote) => {
            tracing::info!(poll_id = vote.poll_id, option_id = vote.option_id, "vote recorded");
            Ok(vote)
        }
        None => {
            tracing::debug!(poll_id = poll.id, "duplicate vote rejected");
            Err(CoreError::DuplicateVote)
        }
    }
}
