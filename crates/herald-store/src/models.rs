//! Store-side views of a message that are not part of the shared entity
//! model.

/// Delivery state of a stored message.
///
/// A message is `Scheduled` only if its delivery time was in the future when
/// it was inserted.  It moves to `Published` exactly once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryState {
    Scheduled,
    Published,
}

impl DeliveryState {
    /// State a message enters at insertion time.
    pub fn at_insert(time: i64, now: i64) -> Self {
        if time <= now {
            DeliveryState::Published
        } else {
            DeliveryState::Scheduled
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, DeliveryState::Published)
    }

    pub(crate) fn from_flag(published: bool) -> Self {
        if published {
            DeliveryState::Published
        } else {
            DeliveryState::Scheduled
        }
    }
}
