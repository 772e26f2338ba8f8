use std::collections::HashMap;

use quickpoll_db::DbPool;
use quickpoll_models::poll::{OptionResult, PollResults};

use crate::error::CoreError;
use crate::poll::PollDetails;

/// `round(count / total * 100)`, half away from zero; 0 when there are no votes.
pub fn percentage(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count * 200 + total) / (total * 2)) as u32
}

/// Per-option counts and percentages, in option creation order.
pub fn tally(details: &PollDetails) -> PollResults {
    let mut counts: HashMap<i64, u64> = HashMap::with_capacity(details.options.len());
    for vote in &details.votes {
        *counts.entry(vote.option_id).or_insert(0) += 1;
    }

    let per_option: Vec<(i64, &str, u64)> = details
        .options
        .iter()
        .map(|o| (o.id, o.text.as_str(), counts.get(&o.id).copied().unwrap_or(0)))
        .collect();
    let total_votes: u64 = per_option.iter().map(|(_, _, count)| count).sum();

    PollResults {
        poll_id: details.poll.id.to_string(),
        title: details.poll.title.clone(),
        description: details.poll.description.clone(),
        per_option: per_option
            .into_iter()
            .map(|(id, text, count)| OptionResult {
                option_id: id.to_string(),
                option_text: text.to_string(),
                count,
                percentage: percentage(count, total_votes),
            })
            .collect(),
        total_votes,
    }
}

pub async fn tally_poll(pool: &DbPool, poll_id: &str) -> Result<PollResults, CoreError> {
    let details = crate::poll::get_poll(pool, poll_id).await?;
    Ok(tally(&details))
}
