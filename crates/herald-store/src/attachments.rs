use rusqlite::params;

use crate::codec;
use crate::database::Database;
use crate::error::{Result, StoreError};

impl Database {
    /// Total size of the unexpired attachments owned by `owner`.
    ///
    /// Attachments with `expires = 0` never expire and always count.
    pub fn attachments_size(&self, owner: &str, now: i64) -> Result<u64> {
        let size: i64 = self
            .conn()
            .query_row(
                "SELECT IFNULL(SUM(attachment_size), 0) FROM messages
                 WHERE attachment_present = 1
                   AND attachment_owner = ?1
                   AND (attachment_expires = 0 OR attachment_expires >= ?2)",
                params![owner, now],
                |row| row.get(0),
            )
            .map_err(codec::decode_error)?;
        u64::try_from(size).map_err(|_| StoreError::Decode(format!("negative attachment total {size}")))
    }

    /// Ids of messages whose attachment expired before `now`.
    pub fn attachments_expired(&self, now: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn().prepare(
            "SELECT id FROM messages
             WHERE attachment_present = 1 AND attachment_expires > 0 AND attachment_expires < ?1
             ORDER BY attachment_expires ASC",
        )?;
        let rows = stmt.query_map(params![now], |row| row.get::<_, String>(0))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }
}
