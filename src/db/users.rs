use time::OffsetDateTime;
use uuid::Uuid;

use super::{Database, DatabaseError, NewUser, User};

impl Database {
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let id = Uuid::now_v7().to_string();

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, verify_code, verify_code_expiry, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.verify_code)
        .bind(new_user.verify_code_expiry)
        .bind(OffsetDateTime::now_utc())
        .execute(self.pool())
        .await?;

        self.find_user_by_id(&id)
            .await?
            .ok_or_else(|| DatabaseError::Query(format!("user {id} vanished after insert")))
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    /// The single read behind the username uniqueness check.
    pub async fn find_verified_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ? AND is_verified = 1")
            .bind(username)
            .fetch_optional(self.pool())
            .await?)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool())
            .await?)
    }

    /// Verified account first, otherwise the newest registration holding `username`.
    pub async fn find_latest_registration(
        &self,
        username: &str,
    ) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = ? ORDER BY is_verified DESC, rowid DESC LIMIT 1",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await?)
    }

    /// Sign-in lookup; `identifier` is either an email or a username.
    pub async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = ?1 OR username = ?1 ORDER BY is_verified DESC, rowid DESC LIMIT 1",
        )
        .bind(identifier)
        .fetch_optional(self.pool())
        .await?)
    }

    /// Overwrites a pending registration with fresh sign-up data.
    pub async fn refresh_registration(
        &self,
        id: &str,
        new_user: NewUser,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE users SET username = ?, password_hash = ?, verify_code = ?, verify_code_expiry = ? WHERE id = ? AND is_verified = 0",
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.verify_code)
        .bind(new_user.verify_code_expiry)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Marks the registration verified and drops other pending registrations
    /// for the same username. Fails with [`DatabaseError::UsernameTaken`] when
    /// the name already has a verified owner.
    pub async fn mark_verified(&self, id: &str) -> Result<(), DatabaseError> {
        let mut tx = self.pool().begin().await?;

        let (username,): (String,) = sqlx::query_as("SELECT username FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE username = ? AND is_verified = 0 AND id != ?")
            .bind(&username)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET is_verified = 1 WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    DatabaseError::UsernameTaken
                }
                e => DatabaseError::from(e),
            })?;

        tx.commit().await?;
        Ok(())
    }

    /// Returns the updated flag, or `None` if the user no longer exists.
    pub async fn set_accepting_messages(
        &self,
        id: &str,
        accepting: bool,
    ) -> Result<Option<bool>, DatabaseError> {
        let updated: Option<(bool,)> = sqlx::query_as(
            "UPDATE users SET is_accepting_messages = ?
             WHERE id = ? RETURNING is_accepting_messages",
        )
        .bind(accepting)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(updated.map(|(accepting,)| accepting))
    }
}
