use super::{DbRepository, Repository, expect_row};
use crate::DbError;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{Student, StudentFields};
use uuid::Uuid;

#[async_trait]
impl Repository<Student> for DbRepository {
    async fn create(&self, fields: StudentFields) -> Result<Student, DbError> {
        let student = Student::new(Uuid::new_v4(), fields, Utc::now());
        sqlx::query(
            r#"
            INSERT INTO students (id, firstName, lastName, birthDate, address, email, phone, createdAt)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(student.id)
        .bind(student.first_name.as_deref())
        .bind(student.last_name.as_deref())
        .bind(student.birth_date)
        .bind(student.address.as_deref())
        .bind(student.email.as_deref())
        .bind(student.phone.as_deref())
        .bind(student.created_at)
        .execute(&self.pool)
        .await?;
        Ok(student)
    }

    async fn get_all(&self) -> Result<Vec<Student>, DbError> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT id, firstName, lastName, birthDate, address, email, phone, createdAt FROM students ORDER BY createdAt DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Student, DbError> {
        sqlx::query_as::<_, Student>(
            "SELECT id, firstName, lastName, birthDate, address, email, phone, createdAt FROM students WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn update(&self, id: Uuid, fields: StudentFields) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET firstName = ?, lastName = ?, birthDate = ?, address = ?, email = ?, phone = ?
            WHERE id = ?
            "#,
        )
        .bind(fields.first_name)
        .bind(fields.last_name)
        .bind(fields.birth_date)
        .bind(fields.address)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(id)
        .execute(&self.pool)
        .await?;
        expect_row(result)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result)
    }
}
