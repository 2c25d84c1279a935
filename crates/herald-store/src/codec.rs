//! Conversion between [`Message`] and its flat row in the `messages` table.
//!
//! Tags are stored as one comma-joined string.  The optional attachment is
//! spread over the `attachment_*` columns with an explicit
//! `attachment_present` flag; absent attachments store empty strings and
//! zeros.

use herald_shared::{Attachment, Event, Message};
use rusqlite::types::Type;

use crate::error::{Result, StoreError};

/// Separator between tags in the `tags` column.
pub const TAG_SEPARATOR: char = ',';

/// Columns read back by every message query, in [`row_to_message`] order.
pub(crate) const MESSAGE_COLUMNS: &str = "id, time, topic, message, title, priority, tags, click, \
     attachment_present, attachment_name, attachment_type, attachment_size, attachment_expires, \
     attachment_url, attachment_owner, encoding";

/// Join tags into the stored form.
///
/// Empty tags and tags containing [`TAG_SEPARATOR`] cannot be decoded back to
/// the same list, so they are rejected instead of being stored mangled.
pub fn encode_tags(tags: &[String]) -> Result<String> {
    if let Some(bad) = tags
        .iter()
        .find(|t| t.is_empty() || t.contains(TAG_SEPARATOR))
    {
        return Err(StoreError::InvalidTag(bad.clone()));
    }
    let separator = TAG_SEPARATOR.to_string();
    Ok(tags.join(separator.as_str()))
}

/// Split the stored form back into tags.  The empty string is the empty list.
pub fn decode_tags(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }
    stored.split(TAG_SEPARATOR).map(str::to_string).collect()
}

/// Attachment fields as they are laid out in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AttachmentColumns {
    pub present: bool,
    pub name: String,
    pub mime_type: String,
    pub size: i64,
    pub expires: i64,
    pub url: String,
    pub owner: String,
}

impl AttachmentColumns {
    pub fn flatten(attachment: Option<&Attachment>) -> Result<Self> {
        let Some(a) = attachment else {
            return Ok(Self::default());
        };
        let size = i64::try_from(a.size).map_err(|_| {
            StoreError::InvalidMessage(format!("attachment size {} out of range", a.size))
        })?;
        Ok(Self {
            present: true,
            name: a.name.clone(),
            mime_type: a.mime_type.clone(),
            size,
            expires: a.expires,
            url: a.url.clone(),
            owner: a.owner.clone(),
        })
    }

    fn into_attachment(self) -> std::result::Result<Option<Attachment>, std::num::TryFromIntError> {
        if !self.present {
            return Ok(None);
        }
        Ok(Some(Attachment {
            name: self.name,
            mime_type: self.mime_type,
            size: u64::try_from(self.size)?,
            expires: self.expires,
            url: self.url,
            owner: self.owner,
        }))
    }
}

/// Decode one row selected with [`MESSAGE_COLUMNS`].
pub(crate) fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let priority: i64 = row.get(5)?;
    let priority = u8::try_from(priority)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(e)))?;
    let tags: String = row.get(6)?;

    let attachment = AttachmentColumns {
        present: row.get::<_, i64>(8)? != 0,
        name: row.get(9)?,
        mime_type: row.get(10)?,
        size: row.get(11)?,
        expires: row.get(12)?,
        url: row.get(13)?,
        owner: row.get(14)?,
    }
    .into_attachment()
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(11, Type::Integer, Box::new(e)))?;

    Ok(Message {
        id: row.get(0)?,
        time: row.get(1)?,
        event: Event::Message,
        topic: row.get(2)?,
        body: row.get(3)?,
        title: row.get(4)?,
        priority,
        tags: decode_tags(&tags),
        click_target: row.get(7)?,
        attachment,
        encoding: row.get(15)?,
    })
}

/// Surface row conversion failures as decode errors, everything else as a
/// plain SQLite error.
pub(crate) fn decode_error(e: rusqlite::Error) -> StoreError {
    match e {
        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => StoreError::Decode(e.to_string()),
        other => StoreError::Sqlite(other),
    }
}
