use super::{DbRepository, Repository, expect_row};
use crate::DbError;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{Enrollment, EnrollmentFields};
use uuid::Uuid;

// Enrollments are stored in `registerStudentSubject`, the table name the
// dashboard has always used.
#[async_trait]
impl Repository<Enrollment> for DbRepository {
    async fn create(&self, fields: EnrollmentFields) -> Result<Enrollment, DbError> {
        let enrollment = Enrollment::new(Uuid::new_v4(), fields, Utc::now());
        sqlx::query(
            r#"
            INSERT INTO registerStudentSubject (id, studentId, subjectId, grade, dateRegistered, createdAt)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(enrollment.id)
        .bind(enrollment.student_id)
        .bind(enrollment.subject_id)
        .bind(enrollment.grade)
        .bind(enrollment.date_registered)
        .bind(enrollment.created_at)
        .execute(&self.pool)
        .await?;
        Ok(enrollment)
    }

    async fn get_all(&self) -> Result<Vec<Enrollment>, DbError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(
            "SELECT id, studentId, subjectId, grade, dateRegistered, createdAt FROM registerStudentSubject ORDER BY createdAt DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(enrollments)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Enrollment, DbError> {
        sqlx::query_as::<_, Enrollment>(
            "SELECT id, studentId, subjectId, grade, dateRegistered, createdAt FROM registerStudentSubject WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn update(&self, id: Uuid, fields: EnrollmentFields) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE registerStudentSubject
            SET studentId = ?, subjectId = ?, grade = ?, dateRegistered = ?
            WHERE id = ?
            "#,
        )
        .bind(fields.student_id)
        .bind(fields.subject_id)
        .bind(fields.grade)
        .bind(fields.date_registered)
        .bind(id)
        .execute(&self.pool)
        .await?;
        expect_row(result)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM registerStudentSubject WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result)
    }
}
