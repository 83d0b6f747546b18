use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::{Athlete, Contingent, RowVersion, Sport};
use crate::database::store::{ParentRef, Repository, Store, StoreError};

/// Postgres-backed store. Every operation is a single statement, so each write is its
/// own transaction; row version checks live in the `WHERE` clause of the update.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Sport> for PgStore {
    async fn list(&self) -> Result<Vec<Sport>, StoreError> {
        let sports = sqlx::query_as::<_, Sport>("SELECT * FROM sports ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(sports)
    }

    async fn find(&self, id: i32) -> Result<Option<Sport>, StoreError> {
        let sport = sqlx::query_as::<_, Sport>("SELECT * FROM sports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sport)
    }

    async fn insert(&self, sport: &Sport) -> Result<Sport, StoreError> {
        let stored = sqlx::query_as::<_, Sport>(
            r#"
            INSERT INTO sports (code, name, created_by, created_on, updated_by, updated_on)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&sport.code)
        .bind(&sport.name)
        .bind(&sport.audit.created_by)
        .bind(sport.audit.created_on)
        .bind(&sport.audit.updated_by)
        .bind(sport.audit.updated_on)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn update(
        &self,
        sport: &Sport,
        expected: Option<RowVersion>,
    ) -> Result<Option<Sport>, StoreError> {
        let stored = sqlx::query_as::<_, Sport>(
            r#"
            UPDATE sports
            SET code = $2, name = $3, updated_by = $4, updated_on = $5,
                row_version = row_version + 1
            WHERE id = $1 AND ($6::BIGINT IS NULL OR row_version = $6)
            RETURNING *
            "#,
        )
        .bind(sport.id)
        .bind(&sport.code)
        .bind(&sport.name)
        .bind(&sport.audit.updated_by)
        .bind(sport.audit.updated_on)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sports WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found)
    }
}

#[async_trait]
impl Repository<Contingent> for PgStore {
    async fn list(&self) -> Result<Vec<Contingent>, StoreError> {
        let contingents =
            sqlx::query_as::<_, Contingent>("SELECT * FROM contingents ORDER BY name, id")
                .fetch_all(&self.pool)
                .await?;
        Ok(contingents)
    }

    async fn find(&self, id: i32) -> Result<Option<Contingent>, StoreError> {
        let contingent = sqlx::query_as::<_, Contingent>("SELECT * FROM contingents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(contingent)
    }

    async fn insert(&self, contingent: &Contingent) -> Result<Contingent, StoreError> {
        let stored = sqlx::query_as::<_, Contingent>(
            "INSERT INTO contingents (code, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(&contingent.code)
        .bind(&contingent.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    // No token column: last writer wins.
    async fn update(
        &self,
        contingent: &Contingent,
        _expected: Option<RowVersion>,
    ) -> Result<Option<Contingent>, StoreError> {
        let stored = sqlx::query_as::<_, Contingent>(
            "UPDATE contingents SET code = $2, name = $3 WHERE id = $1 RETURNING *",
        )
        .bind(contingent.id)
        .bind(&contingent.code)
        .bind(&contingent.name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM contingents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository<Athlete> for PgStore {
    async fn list(&self) -> Result<Vec<Athlete>, StoreError> {
        let athletes = sqlx::query_as::<_, Athlete>(
            "SELECT * FROM athletes ORDER BY last_name, first_name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(athletes)
    }

    async fn find(&self, id: i32) -> Result<Option<Athlete>, StoreError> {
        let athlete = sqlx::query_as::<_, Athlete>("SELECT * FROM athletes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(athlete)
    }

    async fn insert(&self, athlete: &Athlete) -> Result<Athlete, StoreError> {
        let stored = sqlx::query_as::<_, Athlete>(
            r#"
            INSERT INTO athletes (
                first_name, middle_name, last_name, athlete_code, dob, height, weight,
                affiliation, media_info, gender, sport_id, contingent_id,
                created_by, created_on, updated_by, updated_on
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(&athlete.first_name)
        .bind(&athlete.middle_name)
        .bind(&athlete.last_name)
        .bind(&athlete.athlete_code)
        .bind(athlete.dob)
        .bind(athlete.height)
        .bind(athlete.weight)
        .bind(&athlete.affiliation)
        .bind(&athlete.media_info)
        .bind(&athlete.gender)
        .bind(athlete.sport_id)
        .bind(athlete.contingent_id)
        .bind(&athlete.audit.created_by)
        .bind(athlete.audit.created_on)
        .bind(&athlete.audit.updated_by)
        .bind(athlete.audit.updated_on)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn update(
        &self,
        athlete: &Athlete,
        expected: Option<RowVersion>,
    ) -> Result<Option<Athlete>, StoreError> {
        let stored = sqlx::query_as::<_, Athlete>(
            r#"
            UPDATE athletes
            SET first_name = $2, middle_name = $3, last_name = $4, athlete_code = $5,
                dob = $6, height = $7, weight = $8, affiliation = $9, media_info = $10,
                gender = $11, sport_id = $12, contingent_id = $13,
                updated_by = $14, updated_on = $15,
                row_version = row_version + 1
            WHERE id = $1 AND ($16::BIGINT IS NULL OR row_version = $16)
            RETURNING *
            "#,
        )
        .bind(athlete.id)
        .bind(&athlete.first_name)
        .bind(&athlete.middle_name)
        .bind(&athlete.last_name)
        .bind(&athlete.athlete_code)
        .bind(athlete.dob)
        .bind(athlete.height)
        .bind(athlete.weight)
        .bind(&athlete.affiliation)
        .bind(&athlete.media_info)
        .bind(&athlete.gender)
        .bind(athlete.sport_id)
        .bind(athlete.contingent_id)
        .bind(&athlete.audit.updated_by)
        .bind(athlete.audit.updated_on)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM athletes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn athletes_by_parent(&self, parent: ParentRef) -> Result<Vec<Athlete>, StoreError> {
        let (sql, id) = match parent {
            ParentRef::Sport(id) => (
                "SELECT * FROM athletes WHERE sport_id = $1 ORDER BY last_name, first_name, id",
                id,
            ),
            ParentRef::Contingent(id) => (
                "SELECT * FROM athletes WHERE contingent_id = $1 ORDER BY last_name, first_name, id",
                id,
            ),
        };
        let athletes = sqlx::query_as::<_, Athlete>(sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(athletes)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
