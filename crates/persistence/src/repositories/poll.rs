//! Poll repository.

use sqlx::PgPool;

use crate::entities::{PollEntity, PollOptionEntity};
use crate::metrics::QueryTimer;

/// Result of casting a vote.
#[derive(Debug)]
pub enum VoteOutcome {
    Recorded,
    PollNotFound,
    PollInactive,
    OptionNotFound,
    AlreadyVoted,
}

/// Repository for poll operations.
#[derive(Clone)]
pub struct PollRepository {
    pool: PgPool,
}

impl PollRepository {
    /// Creates a new PollRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a poll with its options in one transaction.
    ///
    /// `options` are `(option_id, label)` pairs in display order.
    pub async fn create(
        &self,
        id: &str,
        question: &str,
        active: bool,
        options: &[(String, String)],
    ) -> Result<(PollEntity, Vec<PollOptionEntity>), sqlx::Error> {
        let timer = QueryTimer::new("create_poll");
        let mut tx = self.pool.begin().await?;

        let poll = sqlx::query_as::<_, PollEntity>(
            r#"
            INSERT INTO polls (id, question, active)
            VALUES ($1, $2, $3)
            RETURNING id, question, active, created_at
            "#,
        )
        .bind(id)
        .bind(question)
        .bind(active)
        .fetch_one(&mut *tx)
        .await?;

        let mut created = Vec::with_capacity(options.len());
        for (position, (option_id, label)) in options.iter().enumerate() {
            let option = sqlx::query_as::<_, PollOptionEntity>(
                r#"
                INSERT INTO poll_options (id, poll_id, label, position)
                VALUES ($1, $2, $3, $4)
                RETURNING id, poll_id, label, votes, position
                "#,
            )
            .bind(option_id)
            .bind(id)
            .bind(label)
            .bind(position as i32)
            .fetch_one(&mut *tx)
            .await?;
            created.push(option);
        }

        tx.commit().await?;
        timer.record();
        Ok((poll, created))
    }

    /// List polls, newest first.
    pub async fn list(&self, active_only: bool) -> Result<Vec<PollEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_polls");
        let result = sqlx::query_as::<_, PollEntity>(
            r#"
            SELECT id, question, active, created_at
            FROM polls
            WHERE NOT $1 OR active
            ORDER BY created_at DESC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a poll by ID.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<PollEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_poll_by_id");
        let result = sqlx::query_as::<_, PollEntity>(
            "SELECT id, question, active, created_at FROM polls WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Options of the given polls.
    pub async fn options_for(
        &self,
        poll_ids: &[String],
    ) -> Result<Vec<PollOptionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_poll_options");
        let result = sqlx::query_as::<_, PollOptionEntity>(
            r#"
            SELECT id, poll_id, label, votes, position
            FROM poll_options
            WHERE poll_id = ANY($1)
            ORDER BY poll_id, position
            "#,
        )
        .bind(poll_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Enable or disable voting.
    pub async fn set_active(
        &self,
        id: &str,
        active: bool,
    ) -> Result<Option<PollEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_poll_active");
        let result = sqlx::query_as::<_, PollEntity>(
            r#"
            UPDATE polls SET active = $2
            WHERE id = $1
            RETURNING id, question, active, created_at
            "#,
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a poll with its options and votes.
    pub async fn delete(&self, id: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_poll");
        let result = sqlx::query("DELETE FROM polls WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Record one vote per `(poll, voter_key)`.
    ///
    /// The vote row and the counter increment commit together; the primary
    /// key on `poll_votes` rejects a second vote from the same key.
    pub async fn vote(
        &self,
        poll_id: &str,
        option_id: &str,
        voter_key: &str,
    ) -> Result<VoteOutcome, sqlx::Error> {
        let timer = QueryTimer::new("vote_poll");
        let mut tx = self.pool.begin().await?;

        let active: Option<(bool,)> =
            sqlx::query_as("SELECT active FROM polls WHERE id = $1 FOR SHARE")
                .bind(poll_id)
                .fetch_optional(&mut *tx)
                .await?;

        let outcome = match active {
            None => Some(VoteOutcome::PollNotFound),
            Some((false,)) => Some(VoteOutcome::PollInactive),
            Some((true,)) => None,
        };
        if let Some(outcome) = outcome {
            tx.rollback().await?;
            timer.record();
            return Ok(outcome);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO poll_votes (poll_id, voter_key, option_id)
            SELECT $1, $2, id FROM poll_options WHERE id = $3 AND poll_id = $1
            ON CONFLICT (poll_id, voter_key) DO NOTHING
            "#,
        )
        .bind(poll_id)
        .bind(voter_key)
        .bind(option_id)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            let option_exists: Option<(String,)> =
                sqlx::query_as("SELECT id FROM poll_options WHERE id = $1 AND poll_id = $2")
                    .bind(option_id)
                    .bind(poll_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;
            timer.record();
            return Ok(if option_exists.is_none() {
                VoteOutcome::OptionNotFound
            } else {
                VoteOutcome::AlreadyVoted
            });
        }

        sqlx::query("UPDATE poll_options SET votes = votes + 1 WHERE id = $1")
            .bind(option_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(VoteOutcome::Recorded)
    }
}
