use rusqlite::Transaction;

const UP_SQL: &str = r#"
ALTER TABLE messages ADD COLUMN encoding TEXT NOT NULL DEFAULT('');
"#;

pub fn up(tx: &Transaction<'_>) -> Result<(), rusqlite::Error> {
    tx.execute_batch(UP_SQL)
}
