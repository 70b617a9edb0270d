use super::{DbRepository, Repository, expect_row};
use crate::DbError;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{Subject, SubjectFields};
use uuid::Uuid;

#[async_trait]
impl Repository<Subject> for DbRepository {
    async fn create(&self, fields: SubjectFields) -> Result<Subject, DbError> {
        let subject = Subject::new(Uuid::new_v4(), fields, Utc::now());
        sqlx::query(
            r#"
            INSERT INTO subjects (id, subjectName, subjectDescription, professorId, createdAt)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(subject.id)
        .bind(subject.subject_name.as_deref())
        .bind(subject.subject_description.as_deref())
        .bind(subject.professor_id)
        .bind(subject.created_at)
        .execute(&self.pool)
        .await?;
        Ok(subject)
    }

    async fn get_all(&self) -> Result<Vec<Subject>, DbError> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT id, subjectName, subjectDescription, professorId, createdAt FROM subjects ORDER BY createdAt DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(subjects)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Subject, DbError> {
        sqlx::query_as::<_, Subject>(
            "SELECT id, subjectName, subjectDescription, professorId, createdAt FROM subjects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn update(&self, id: Uuid, fields: SubjectFields) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE subjects SET subjectName = ?, subjectDescription = ?, professorId = ? WHERE id = ?",
        )
        .bind(fields.subject_name)
        .bind(fields.subject_description)
        .bind(fields.professor_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        expect_row(result)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result)
    }
}
