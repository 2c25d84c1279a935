//! v005 -- Explicit attachment presence flag.
//!
//! Up to v004 an attachment was assumed present when both its name and url
//! were non-empty.  Rows written under that rule are backfilled with the same
//! inference; new rows carry the flag directly.

use rusqlite::Transaction;

const UP_SQL: &str = r#"
ALTER TABLE messages ADD COLUMN attachment_present INT NOT NULL DEFAULT(0);

UPDATE messages
SET attachment_present = 1
WHERE attachment_name != '' AND attachment_url != '';
"#;

pub fn up(tx: &Transaction<'_>) -> Result<(), rusqlite::Error> {
    tx.execute_batch(UP_SQL)
}
