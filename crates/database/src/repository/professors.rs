use super::{DbRepository, Repository, expect_row};
use crate::DbError;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{Professor, ProfessorFields};
use uuid::Uuid;

#[async_trait]
impl Repository<Professor> for DbRepository {
    async fn create(&self, fields: ProfessorFields) -> Result<Professor, DbError> {
        let professor = Professor::new(Uuid::new_v4(), fields, Utc::now());
        sqlx::query(
            "INSERT INTO professors (id, firstName, lastName, email, createdAt) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(professor.id)
        .bind(professor.first_name.as_deref())
        .bind(professor.last_name.as_deref())
        .bind(professor.email.as_deref())
        .bind(professor.created_at)
        .execute(&self.pool)
        .await?;
        Ok(professor)
    }

    async fn get_all(&self) -> Result<Vec<Professor>, DbError> {
        let professors = sqlx::query_as::<_, Professor>(
            "SELECT id, firstName, lastName, email, createdAt FROM professors ORDER BY createdAt DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(professors)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Professor, DbError> {
        sqlx::query_as::<_, Professor>(
            "SELECT id, firstName, lastName, email, createdAt FROM professors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn update(&self, id: Uuid, fields: ProfessorFields) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE professors SET firstName = ?, lastName = ?, email = ? WHERE id = ?",
        )
        .bind(fields.first_name)
        .bind(fields.last_name)
        .bind(fields.email)
        .bind(id)
        .execute(&self.pool)
        .await?;
        expect_row(result)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM professors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result)
    }
}
