//! # herald-shared
//!
//! Entity model shared between the Herald message store and the layers
//! that consume it (HTTP API, broadcaster).

pub mod constants;
pub mod types;

pub use types::{Attachment, Event, Message, Since, Topic};
