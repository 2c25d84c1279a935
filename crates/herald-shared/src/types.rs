use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PRIORITY, MESSAGE_ID_LENGTH};

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Kind of event flowing through a topic.  Only [`Event::Message`] is ever
/// persisted; the others are connection-level signals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Open,
    Keepalive,
    Message,
    PollRequest,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Open => "open",
            Event::Keepalive => "keepalive",
            Event::Message => "message",
            Event::PollRequest => "poll_request",
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// File attached to a message.  Owned by its message; there is no separate
/// attachment lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Unix timestamp after which the file may be reclaimed, `0` = never.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub expires: i64,
    pub url: String,
    /// Identity the attachment counts against for quota purposes.
    /// Never sent to subscribers.
    #[serde(skip_serializing, default)]
    pub owner: String,
}

impl Attachment {
    pub fn never_expires(&self) -> bool {
        self.expires == 0
    }
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A message published to a topic.
///
/// `time` is the creation time for messages that are delivered right away,
/// and the delivery time for scheduled ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub time: i64,
    pub event: Event,
    pub topic: String,
    #[serde(rename = "message", default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// `0` means the publisher did not set a priority.
    #[serde(default, skip_serializing_if = "is_unset_priority")]
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "click", default, skip_serializing_if = "String::is_empty")]
    pub click_target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub encoding: String,
}

fn is_unset_priority(v: &u8) -> bool {
    *v == 0
}

impl Message {
    /// New message-kind event on `topic`, stamped with the current time and
    /// a random id.
    pub fn new(topic: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: random_id(),
            time: Utc::now().timestamp(),
            event: Event::Message,
            topic: topic.into(),
            body: body.into(),
            title: String::new(),
            priority: 0,
            tags: Vec::new(),
            click_target: String::new(),
            attachment: None,
            encoding: String::new(),
        }
    }

    /// Non-message event on `topic` (open, keepalive, poll request).
    pub fn event(event: Event, topic: impl Into<String>) -> Self {
        Self {
            event,
            ..Self::new(topic, "")
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Deliver at `time` (unix seconds) instead of now.
    pub fn scheduled_at(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_click(mut self, click: impl Into<String>) -> Self {
        self.click_target = click.into();
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Priority with the unset value resolved to the default.
    pub fn effective_priority(&self) -> u8 {
        if self.priority == 0 {
            DEFAULT_PRIORITY
        } else {
            self.priority
        }
    }
}

fn random_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(MESSAGE_ID_LENGTH)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Topic / Since
// ---------------------------------------------------------------------------

/// A topic, as seen by the store: just a grouping key over messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic {
    pub id: String,
}

impl Topic {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Lower bound for a poll, as requested by a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Since {
    /// The subscriber wants no cached messages at all.
    NoMessages,
    /// Everything that is still cached.
    All,
    /// Messages with `time >= ` this unix timestamp.
    At(i64),
}

impl Since {
    pub fn is_none(&self) -> bool {
        matches!(self, Since::NoMessages)
    }

    /// Unix timestamp of the lower bound, `None` when nothing was requested.
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            Since::NoMessages => None,
            Since::All => Some(0),
            Since::At(ts) => Some(*ts),
        }
    }
}
