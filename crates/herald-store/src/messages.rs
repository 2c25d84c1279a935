use chrono::Utc;
use herald_shared::{Event, Message, Since, Topic};
use rusqlite::{params, OptionalExtension};

use crate::codec::{self, AttachmentColumns, MESSAGE_COLUMNS};
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::DeliveryState;

impl Database {
    /// Store a message, deciding its delivery state from the wall clock.
    pub fn add_message(&self, message: &Message) -> Result<()> {
        self.add_message_at(message, Utc::now().timestamp())
    }

    /// Store a message as if the current time were `now`.
    ///
    /// Messages with `time <= now` are published right away, later ones are
    /// scheduled until [`Database::mark_published`] is called for them.
    pub fn add_message_at(&self, message: &Message, now: i64) -> Result<()> {
        if message.event != Event::Message {
            return Err(StoreError::TypeMismatch(message.event));
        }
        let state = DeliveryState::at_insert(message.time, now);
        let tags = codec::encode_tags(&message.tags)?;
        let attachment = AttachmentColumns::flatten(message.attachment.as_ref())?;

        self.conn()
            .execute(
                "INSERT INTO messages (id, time, topic, message, title, priority, tags, click,
                     attachment_present, attachment_name, attachment_type, attachment_size,
                     attachment_expires, attachment_url, attachment_owner, encoding, published)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                params![
                    message.id,
                    message.time,
                    message.topic,
                    message.body,
                    message.title,
                    message.priority,
                    tags,
                    message.click_target,
                    attachment.present,
                    attachment.name,
                    attachment.mime_type,
                    attachment.size,
                    attachment.expires,
                    attachment.url,
                    attachment.owner,
                    message.encoding,
                    state.is_published(),
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(ref err, _)
                    if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
                {
                    StoreError::DuplicateId(message.id.clone())
                }
                other => StoreError::Sqlite(other),
            })?;

        tracing::trace!(id = %message.id, topic = %message.topic, ?state, "stored message");
        Ok(())
    }

    /// Messages on `topic` with `time >= since`, oldest first.
    ///
    /// Scheduled messages are only included when `include_scheduled` is set.
    /// [`Since::NoMessages`] returns nothing without touching the database.
    pub fn messages_since(
        &self,
        topic: &str,
        since: Since,
        include_scheduled: bool,
    ) -> Result<Vec<Message>> {
        let Some(since) = since.timestamp() else {
            return Ok(Vec::new());
        };
        let sql = if include_scheduled {
            format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE topic = ?1 AND time >= ?2
                 ORDER BY time ASC"
            )
        } else {
            format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE topic = ?1 AND time >= ?2 AND published = 1
                 ORDER BY time ASC"
            )
        };
        self.query_messages(&sql, params![topic, since])
    }

    /// Scheduled messages whose delivery time is at or before `now`.
    pub fn messages_due(&self, now: i64) -> Result<Vec<Message>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE time <= ?1 AND published = 0
             ORDER BY time ASC"
        );
        self.query_messages(&sql, params![now])
    }

    /// Flag a message as published.
    ///
    /// Idempotent.  Returns `false` if no message has this id, which happens
    /// when it was pruned between [`Database::messages_due`] and this call.
    pub fn mark_published(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn()
            .execute("UPDATE messages SET published = 1 WHERE id = ?1", params![id])?;
        if affected == 0 {
            tracing::debug!(id, "mark_published: message not found");
        }
        Ok(affected > 0)
    }

    /// Delivery state of the message with `id`, if it is stored.
    pub fn message_state(&self, id: &str) -> Result<Option<DeliveryState>> {
        let published: Option<bool> = self
            .conn()
            .query_row(
                "SELECT published FROM messages WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(codec::decode_error)?;
        Ok(published.map(DeliveryState::from_flag))
    }

    /// Number of stored messages on `topic`, published or scheduled.
    pub fn message_count(&self, topic: &str) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM messages WHERE topic = ?1", params![topic])
    }

    /// Number of stored messages across all topics.
    pub fn total_message_count(&self) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM messages", [])
    }

    /// Every topic with at least one stored message, sorted by name.
    pub fn topics(&self) -> Result<Vec<Topic>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT topic FROM messages GROUP BY topic ORDER BY topic")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut topics = Vec::new();
        for row in rows {
            topics.push(Topic::new(row.map_err(codec::decode_error)?));
        }
        Ok(topics)
    }

    /// Delete published messages with `time < older_than`.  Scheduled
    /// messages are kept no matter how old they are.
    pub fn prune(&self, older_than: i64) -> Result<usize> {
        let deleted = self.conn().execute(
            "DELETE FROM messages WHERE time < ?1 AND published = 1",
            params![older_than],
        )?;
        tracing::debug!(older_than, deleted, "pruned message cache");
        Ok(deleted)
    }

    fn query_messages<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Message>> {
        let mut stmt = self.conn().prepare(sql)?;
        let rows = stmt.query_map(params, codec::row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row.map_err(codec::decode_error)?);
        }
        Ok(messages)
    }

    fn count<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<u64> {
        let count: i64 = self
            .conn()
            .query_row(sql, params, |row| row.get(0))
            .optional()?
            .ok_or_else(|| StoreError::Read("count query returned no rows".to_string()))?;
        u64::try_from(count).map_err(|_| StoreError::Read(format!("negative count {count}")))
    }
}
