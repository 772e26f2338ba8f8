use crate::{DbError, DbPool};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VoteRow {
    pub id: i64,
    pub voter_token: String,
    pub poll_id: i64,
    pub option_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Insert a vote unless `(voter_token, poll_id)` already has one.
///
/// The uniqueness check and the write are the same statement, so concurrent
/// callers for one key see exactly one `Some`. `None` means the voter had
/// already voted and nothing was written.
pub async fn insert_vote_if_absent(
    pool: &DbPool,
    id: i64,
    voter_token: &str,
    poll_id: i64,
    option_id: i64,
) -> Result<Option<VoteRow>, DbError> {
    let row = sqlx::query_as::<_, VoteRow>(
        "INSERT INTO votes (id, voter_token, poll_id, option_id)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (voter_token, poll_id) DO NOTHING
         RETURNING id, voter_token, poll_id, option_id, created_at",
    )
    .bind(id)
    .bind(voter_token)
    .bind(poll_id)
    .bind(option_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn get_poll_votes(pool: &DbPool, poll_id: i64) -> Result<Vec<VoteRow>, DbError> {
    let rows = sqlx::query_as::<_, VoteRow>(
        "SELECT id, voter_token, poll_id, option_id, created_at
         FROM votes
         WHERE poll_id = ?1
         ORDER BY id ASC",
    )
    .bind(poll_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_all_votes(pool: &DbPool) -> Result<Vec<VoteRow>, DbError> {
    let rows = sqlx::query_as::<_, VoteRow>(
        "SELECT id, voter_token, poll_id, option_id, created_at
         FROM votes
         ORDER BY poll_id ASC, id ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_voter_votes(
    pool: &DbPool,
    poll_id: i64,
    voter_token: &str,
) -> Result<i64, DbError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE poll_id = ?1 AND voter_token = ?2")
            .bind(poll_id)
            .bind(voter_token)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> DbPool {
        let pool = crate::create_pool("sqlite::memory:", 1).await.unwrap();
        crate::run_migrations(&pool).await.unwrap();
        pool
    }

    /// Two polls: 1 with options 10/11, 2 with options 20/21.
    async fn setup_polls(pool: &DbPool) {
        crate::polls::create_poll(
            pool,
            1,
            "Coffee or tea?",
            "No description",
            &[(10, "Coffee"), (11, "Tea")],
        )
        .await
        .unwrap();
        crate::polls::create_poll(
            pool,
            2,
            "Cats or dogs?",
            "No description",
            &[(20, "Cats"), (21, "Dogs")],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_insert_vote() {
        let pool = test_pool().await;
        setup_polls(&pool).await;
        let vote = insert_vote_if_absent(&pool, 100, "1.2.3.4", 1, 10)
            .await
            .unwrap()
            .expect("first vote is stored");
        assert_eq!(vote.id, 100);
        assert_eq!(vote.voter_token, "1.2.3.4");
        assert_eq!(vote.poll_id, 1);
        assert_eq!(vote.option_id, 10);
    }

    #[tokio::test]
    async fn test_second_vote_same_poll_is_not_written() {
        let pool = test_pool().await;
        setup_polls(&pool).await;
        insert_vote_if_absent(&pool, 100, "voter-a", 1, 10)
            .await
            .unwrap()
            .expect("first vote");
        let second = insert_vote_if_absent(&pool, 101, "voter-a", 1, 11)
            .await
            .unwrap();
        assert!(second.is_none());
        assert_eq!(count_voter_votes(&pool, 1, "voter-a").await.unwrap(), 1);

        let votes = get_poll_votes(&pool, 1).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].option_id, 10);
    }

    #[tokio::test]
    async fn test_same_voter_can_vote_on_different_polls() {
        let pool = test_pool().await;
        setup_polls(&pool).await;
        assert!(insert_vote_if_absent(&pool, 100, "voter-a", 1, 10)
            .await
            .unwrap()
            .is_some());
        assert!(insert_vote_if_absent(&pool, 101, "voter-a", 2, 21)
            .await
            .unwrap()
            .is_some());
        assert_eq!(get_all_votes(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_option_from_other_poll_violates_foreign_key() {
        let pool = test_pool().await;
        setup_polls(&pool).await;
        let result = insert_vote_if_absent(&pool, 100, "voter-a", 1, 20).await;
        assert!(matches!(result, Err(DbError::Sqlx(_))));
        assert!(get_poll_votes(&pool, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_poll_votes_empty() {
        let pool = test_pool().await;
        setup_polls(&pool).await;
        assert!(get_poll_votes(&pool, 1).await.unwrap().is_empty());
    }
}
