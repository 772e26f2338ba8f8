use crate::{DbError, DbPool};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PollRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PollOptionRow {
    pub id: i64,
    pub poll_id: i64,
    pub text: String,
    pub position: i32,
}

/// Option to insert alongside a new poll: `(option_id, text)`.
pub type NewOption<'a> = (i64, &'a str);

/// Insert a poll and all of its options in one transaction.
///
/// Option positions follow the slice order.
pub async fn create_poll(
    pool: &DbPool,
    id: i64,
    title: &str,
    description: &str,
    options: &[NewOption<'_>],
) -> Result<(PollRow, Vec<PollOptionRow>), DbError> {
    let mut tx = pool.begin().await?;

    let poll = sqlx::query_as::<_, PollRow>(
        "INSERT INTO polls (id, title, description)
         VALUES (?1, ?2, ?3)
         RETURNING id, title, description, created_at",
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .fetch_one(&mut *tx)
    .await?;

    let mut rows = Vec::with_capacity(options.len());
    for (position, &(option_id, text)) in options.iter().enumerate() {
        let row = sqlx::query_as::<_, PollOptionRow>(
            "INSERT INTO poll_options (id, poll_id, text, position)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, poll_id, text, position",
        )
        .bind(option_id)
        .bind(id)
        .bind(text)
        .bind(position as i32)
        .fetch_one(&mut *tx)
        .await?;
        rows.push(row);
    }

    tx.commit().await?;
    Ok((poll, rows))
}

pub async fn get_poll(pool: &DbPool, id: i64) -> Result<Option<PollRow>, DbError> {
    let row = sqlx::query_as::<_, PollRow>(
        "SELECT id, title, description, created_at FROM polls WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn get_poll_options(pool: &DbPool, poll_id: i64) -> Result<Vec<PollOptionRow>, DbError> {
    let rows = sqlx::query_as::<_, PollOptionRow>(
        "SELECT id, poll_id, text, position
         FROM poll_options
         WHERE poll_id = ?1
         ORDER BY position ASC",
    )
    .bind(poll_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Newest first. Ids are time-ordered, so they break ties between polls
/// created within the same second.
pub async fn list_polls(pool: &DbPool) -> Result<Vec<PollRow>, DbError> {
    let rows = sqlx::query_as::<_, PollRow>(
        "SELECT id, title, description, created_at
         FROM polls
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_all_poll_options(pool: &DbPool) -> Result<Vec<PollOptionRow>, DbError> {
    let rows = sqlx::query_as::<_, PollOptionRow>(
        "SELECT id, poll_id, text, position
         FROM poll_options
         ORDER BY poll_id ASC, position ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_polls(pool: &DbPool) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM polls")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
