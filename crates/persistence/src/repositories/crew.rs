//! Crew repository.

use sqlx::PgPool;

use crate::entities::CrewMemberEntity;
use crate::metrics::QueryTimer;

/// Repository for crew members.
#[derive(Clone)]
pub struct CrewRepository {
    pool: PgPool,
}

impl CrewRepository {
    /// Creates a new CrewRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List crew members in display order.
    pub async fn list(&self) -> Result<Vec<CrewMemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_crew_members");
        let result = sqlx::query_as::<_, CrewMemberEntity>(
            r#"
            SELECT id, name, role, bio, photo_url, position
            FROM crew_members
            ORDER BY position ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a crew member by ID.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<CrewMemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_crew_member_by_id");
        let result = sqlx::query_as::<_, CrewMemberEntity>(
            "SELECT id, name, role, bio, photo_url, position FROM crew_members WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert or replace a crew member.
    pub async fn save(&self, member: &CrewMemberEntity) -> Result<CrewMemberEntity, sqlx::Error> {
        let timer = QueryTimer::new("save_crew_member");
        let result = sqlx::query_as::<_, CrewMemberEntity>(
            r#"
            INSERT INTO crew_members (id, name, role, bio, photo_url, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                role = EXCLUDED.role,
                bio = EXCLUDED.bio,
                photo_url = EXCLUDED.photo_url,
                position = EXCLUDED.position
            RETURNING id, name, role, bio, photo_url, position
            "#,
        )
        .bind(&member.id)
        .bind(&member.name)
        .bind(&member.role)
        .bind(&member.bio)
        .bind(&member.photo_url)
        .bind(member.position)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a crew member. Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_crew_member");
        let result = sqlx::query("DELETE FROM crew_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
