use time::OffsetDateTime;
use uuid::Uuid;

use super::{Database, DatabaseError, Message};

impl Database {
    pub async fn insert_message(
        &self,
        user_id: &str,
        content: &str,
    ) -> Result<Message, DatabaseError> {
        let message = Message {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_owned(),
            content: content.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };

        sqlx::query("INSERT INTO messages (id, user_id, content, created_at) VALUES (?, ?, ?, ?)")
            .bind(&message.id)
            .bind(&message.user_id)
            .bind(&message.content)
            .bind(message.created_at)
            .execute(self.pool())
            .await?;

        Ok(message)
    }

    /// Newest first.
    pub async fn list_messages(&self, user_id: &str) -> Result<Vec<Message>, DatabaseError> {
        Ok(sqlx::query_as::<_, Message>(
            "SELECT id, user_id, content, created_at FROM messages WHERE user_id = ? ORDER BY rowid DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?)
    }

    /// Deletes only if `message_id` belongs to `user_id`.
    pub async fn delete_message(
        &self,
        user_id: &str,
        message_id: &str,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ? AND user_id = ?")
            .bind(message_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
