//! Event repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use domain::models::event::adjust_spots_for_capacity;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;

const EVENT_COLUMNS: &str = "id, title, description, date, location, capacity, spots, price, \
                             photos, archived, created_at, updated_at";

/// Input for inserting an event.
#[derive(Debug, Clone)]
pub struct EventInput {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub spots: i32,
    pub price: i32,
    pub photos: Vec<String>,
}

/// Partial update of an event. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub price: Option<i32>,
    pub photos: Option<Vec<String>>,
    pub archived: Option<bool>,
}

/// Repository for event operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List events ordered by date.
    ///
    /// Without `include_archived` only upcoming events that are not archived
    /// are returned.
    pub async fn list(&self, include_archived: bool) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let query = format!(
            r#"
            SELECT {}
            FROM events
            WHERE $1 OR (NOT archived AND date >= NOW())
            ORDER BY date ASC
            "#,
            EVENT_COLUMNS
        );
        let result = sqlx::query_as::<_, EventEntity>(&query)
            .bind(include_archived)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let query = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let result = sqlx::query_as::<_, EventEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Insert a new event.
    pub async fn create(&self, input: &EventInput) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let query = format!(
            r#"
            INSERT INTO events (id, title, description, date, location, capacity, spots, price, photos)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        let result = sqlx::query_as::<_, EventEntity>(&query)
            .bind(&input.id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.date)
            .bind(&input.location)
            .bind(input.capacity)
            .bind(input.spots)
            .bind(input.price)
            .bind(&input.photos)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Apply a partial update.
    ///
    /// A capacity change moves `spots` by the same delta, clamped to
    /// `0..=capacity`, so seats already held stay accounted for. The row is
    /// locked while the new spot count is computed.
    pub async fn update(
        &self,
        id: &str,
        patch: &EventPatch,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let mut tx = self.pool.begin().await?;

        let current: Option<(i32, i32)> =
            sqlx::query_as("SELECT spots, capacity FROM events WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((spots, capacity)) = current else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };
        let new_spots = patch
            .capacity
            .map(|new_capacity| adjust_spots_for_capacity(spots, capacity, new_capacity));

        let query = format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                location = COALESCE($5, location),
                capacity = COALESCE($6, capacity),
                spots = COALESCE($7, spots),
                price = COALESCE($8, price),
                photos = COALESCE($9, photos),
                archived = COALESCE($10, archived),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, EventEntity>(&query)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.description)
            .bind(patch.date)
            .bind(&patch.location)
            .bind(patch.capacity)
            .bind(new_spots)
            .bind(patch.price)
            .bind(&patch.photos)
            .bind(patch.archived)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(event))
    }

    /// Delete an event. Reservations referencing it are kept.
    ///
    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Set the stored archive flag of one event.
    pub async fn archive(&self, id: &str) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("archive_event");
        let query = format!(
            r#"
            UPDATE events SET archived = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        let result = sqlx::query_as::<_, EventEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Reconcile the stored archive flag with the event date.
    ///
    /// Returns the number of events archived.
    pub async fn archive_past(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("archive_past_events");
        let result = sqlx::query(
            r#"
            UPDATE events SET archived = TRUE, updated_at = NOW()
            WHERE NOT archived AND date < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
