use chrono::Utc;
use sqlx::SqlitePool;

use super::manager::DatabaseError;
use super::models::user::User;

const USER_COLUMNS: &str = "id, email, hashed_password, role, created_at";

/// Account storage over the `users` table
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                hashed_password TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Like `find_by_id`, but a missing account is an error.
    pub async fn get(&self, id: i64) -> Result<User, DatabaseError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
    }

    pub async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Insert a new account. Returns `Ok(None)` when the email is already taken.
    pub async fn create(
        &self,
        email: &str,
        hashed_password: &str,
        role: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let query = format!(
            "INSERT INTO users (email, hashed_password, role, created_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT(email) DO NOTHING RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(hashed_password)
            .bind(role)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    pub async fn update_password(&self, id: i64, hashed_password: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE users SET hashed_password = ? WHERE id = ?")
            .bind(hashed_password)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    pub async fn update_role(&self, id: i64, role: &str) -> Result<User, DatabaseError> {
        let query = format!("UPDATE users SET role = ? WHERE id = ? RETURNING {}", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(role)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
    }

    pub async fn count_admins(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(crate::auth::ROLE_ADMIN)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
