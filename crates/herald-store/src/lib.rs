//! # herald-store
//!
//! Durable message cache for the Herald publish/subscribe service, backed by
//! SQLite.
//!
//! Opening a [`Database`] brings the on-disk schema up to the current version
//! before any other call is possible.  The handle then exposes the storage
//! contract used by the API and broadcaster layers: inserting messages,
//! polling a topic since a point in time, finding scheduled messages that are
//! due, pruning old published messages, and attachment quota accounting.

pub mod attachments;
pub mod codec;
pub mod config;
pub mod database;
pub mod messages;
pub mod migrations;
pub mod models;

mod error;

pub use config::StoreConfig;
pub use database::Database;
pub use error::{Result, StoreError};
pub use migrations::{MigrationObserver, TracingObserver, CURRENT_VERSION};
pub use models::DeliveryState;
