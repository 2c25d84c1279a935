use herald_shared::Event;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error not covered by a more specific variant.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error (e.g. creating the cache directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The messages table exists but the schema version record is missing
    /// or unreadable.
    #[error("Cannot determine schema version: cache file may be corrupt")]
    CorruptStore,

    /// The store was written by a newer release.
    #[error("Unsupported schema version {found}, this build supports up to {current}")]
    UnsupportedVersion { found: u32, current: u32 },

    /// No step is registered to upgrade from this version.
    #[error("No migration defined from schema version {0}")]
    MissingMigration(u32),

    /// A migration step failed; the store stays at version `from`.
    #[error("Migration from schema version {from} to {to} failed: {source}")]
    Migration {
        from: u32,
        to: u32,
        #[source]
        source: rusqlite::Error,
    },

    /// A message with this id is already stored.
    #[error("Message {0} already exists")]
    DuplicateId(String),

    /// Only message events can be stored.
    #[error("Unexpected event type {0}, only message events can be stored")]
    TypeMismatch(Event),

    /// Tag that cannot survive the comma-joined encoding.
    #[error("Invalid tag {0:?}: tags must be non-empty and must not contain ','")]
    InvalidTag(String),

    /// Message field that cannot be persisted.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// A stored row could not be turned back into a message.
    #[error("Cannot decode stored message: {0}")]
    Decode(String),

    /// An aggregate read did not produce a value.
    #[error("Read error: {0}")]
    Read(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
