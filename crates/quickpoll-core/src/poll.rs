use std::collections::HashMap;

use quickpoll_db::polls::{PollOptionRow, PollRow};
use quickpoll_db::votes::VoteRow;
use quickpoll_db::DbPool;
use quickpoll_util::validation;

use crate::error::CoreError;
use crate::ID_WORKER;

/// Stored when a poll is created without a description.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// A poll with its options (creation order) and votes (insertion order).
#[derive(Debug, Clone)]
pub struct PollDetails {
    pub poll: PollRow,
    pub options: Vec<PollOptionRow>,
    pub votes: Vec<VoteRow>,
}

impl PollDetails {
    /// Wire form. Voter tokens are only included when `include_voter_tokens`.
    pub fn to_model(&self, include_voter_tokens: bool) -> quickpoll_models::poll::Poll {
        quickpoll_models::poll::Poll {
            id: self.poll.id.to_string(),
            title: self.poll.title.clone(),
            description: self.poll.description.clone(),
            created_at: self.poll.created_at,
            options: self.options.iter().map(option_to_model).collect(),
            votes: self
                .votes
                .iter()
                .map(|v| vote_to_model(v, include_voter_tokens))
                .collect(),
        }
    }
}

pub fn option_to_model(o: &PollOptionRow) -> quickpoll_models::poll::PollOption {
    quickpoll_models::poll::PollOption {
        id: o.id.to_string(),
        poll_id: o.poll_id.to_string(),
        text: o.text.clone(),
        position: o.position,
    }
}

pub fn vote_to_model(v: &VoteRow, include_voter_token: bool) -> quickpoll_models::poll::Vote {
    quickpoll_models::poll::Vote {
        id: v.id.to_string(),
        poll_id: v.poll_id.to_string(),
        option_id: v.option_id.to_string(),
        voter_token: include_voter_token.then(|| v.voter_token.clone()),
        created_at: v.created_at,
    }
}

/// Parse a wire id. Anything that is not a positive integer cannot name a
/// stored row.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// Validate and persist a poll with its options as one unit.
pub async fn create_poll<S: AsRef<str>>(
    pool: &DbPool,
    title: &str,
    description: Option<&str>,
    option_texts: &[S],
) -> Result<PollDetails, CoreError> {
    let title = validation::validate_title(title)?;
    let description =
        validation::validate_description(description)?.unwrap_or(DEFAULT_DESCRIPTION);
    let texts = validation::validate_options(option_texts)?;

    let poll_id = quickpoll_util::snowflake::generate(ID_WORKER);
    let options: Vec<(i64, &str)> = texts
        .into_iter()
        .map(|text| (quickpoll_util::snowflake::generate(ID_WORKER), text))
        .collect();

    let (poll, options) =
        quickpoll_db::polls::create_poll(pool, poll_id, title, description, &options).await?;

    tracing::info!(poll_id = poll.id, options = options.len(), "poll created");

    Ok(PollDetails {
        poll,
        options,
        votes: Vec::new(),
    })
}

/// Load a poll aggregate by wire id. Malformed ids are reported as not found.
pub async fn get_poll(pool: &DbPool, id: &str) -> Result<PollDetails, CoreError> {
    let id = parse_id(id).ok_or(CoreError::NotFound)?;
    get_poll_by_id(pool, id).await
}

pub async fn get_poll_by_id(pool: &DbPool, id: i64) -> Result<PollDetails, CoreError> {
    let poll = quickpoll_db::polls::get_poll(pool, id)
        .await?
        .ok_or(CoreError::NotFound)?;
    let options = quickpoll_db::polls::get_poll_options(pool, id).await?;
    let votes = quickpoll_db::votes::get_poll_votes(pool, id).await?;
    Ok(PollDetails {
        poll,
        options,
        votes,
    })
}

/// Every poll with options and votes, newest first.
///
/// Callers are responsible for gating access.
pub async fn list_polls(pool: &DbPool) -> Result<Vec<PollDetails>, CoreError> {
    let polls = quickpoll_db::polls::list_polls(pool).await?;

    let mut options_by_poll: HashMap<i64, Vec<PollOptionRow>> = HashMap::new();
    for option in quickpoll_db::polls::get_all_poll_options(pool).await? {
        options_by_poll.entry(option.poll_id).or_default().push(option);
    }
    let mut votes_by_poll: HashMap<i64, Vec<VoteRow>> = HashMap::new();
    for vote in quickpoll_db::votes::get_all_votes(pool).await? {
        votes_by_poll.entry(vote.poll_id).or_default().push(vote);
    }

    Ok(polls
        .into_iter()
        .map(|poll| PollDetails {
            options: options_by_poll.remove(&poll.id).unwrap_or_default(),
            votes: votes_by_poll.remove(&poll.id).unwrap_or_default(),
            poll,
        })
        .collect())
}
