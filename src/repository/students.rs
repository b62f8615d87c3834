//! Students repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::student::Student,
};

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    pub async fn get_by_roll_number(&self, roll_number: &str) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE roll_number = $1")
            .bind(roll_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    pub async fn roll_number_exists(&self, roll_number: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE roll_number = $1)")
                .bind(roll_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Insert a new student. A concurrent registration of the same roll number
    /// surfaces as a conflict through the unique constraint.
    pub async fn create(&self, name: &str, roll_number: &str, password_hash: &str) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (name, roll_number, password, has_book, borrowed_book_id)
            VALUES ($1, $2, $3, FALSE, NULL)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(roll_number)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Roll number already exists".to_string())
            }
            other => AppError::Database(other),
        })
    }
}
