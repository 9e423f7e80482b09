//! Transient success notices.

use jiff::{SignedDuration, Timestamp};

/// How long a success notice stays visible.
pub const NOTICE_WINDOW: SignedDuration = SignedDuration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub shown_at: Timestamp,
    pub expires_at: Timestamp,
}

impl Notice {
    pub fn new(message: impl Into<String>, shown_at: Timestamp) -> Self {
        Self {
            message: message.into(),
            shown_at,
            expires_at: shown_at
                .checked_add(NOTICE_WINDOW)
                .unwrap_or(Timestamp::MAX),
        }
    }

    /// Whether the notice is still shown at `now`; it dismisses itself after
    /// [`NOTICE_WINDOW`].
    #[must_use]
    pub fn is_visible_at(&self, now: Timestamp) -> bool {
        now >= self.shown_at && now < self.expires_at
    }
}
