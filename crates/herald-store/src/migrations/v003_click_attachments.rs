//! v003 -- Click target and file attachments.

use rusqlite::Transaction;

const UP_SQL: &str = r#"
ALTER TABLE messages ADD COLUMN click TEXT NOT NULL DEFAULT('');
ALTER TABLE messages ADD COLUMN attachment_name TEXT NOT NULL DEFAULT('');
ALTER TABLE messages ADD COLUMN attachment_type TEXT NOT NULL DEFAULT('');
ALTER TABLE messages ADD COLUMN attachment_size INT NOT NULL DEFAULT(0);
ALTER TABLE messages ADD COLUMN attachment_expires INT NOT NULL DEFAULT(0);
ALTER TABLE messages ADD COLUMN attachment_owner TEXT NOT NULL DEFAULT('');
ALTER TABLE messages ADD COLUMN attachment_url TEXT NOT NULL DEFAULT('');
"#;

pub fn up(tx: &Transaction<'_>) -> Result<(), rusqlite::Error> {
    tx.execute_batch(UP_SQL)
}
