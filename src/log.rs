//! Fixed-capacity message log shared by chat and action history.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One chat line or action record.
///
/// `Message::default()` is the empty sentinel that fills unused log slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Message {
    /// When the message was written.
    creation_time: DateTime<Utc>,
    /// Who wrote it.
    player_name: String,
    /// Colour the writer's text is shown in.
    text_color: String,
    /// The message body.
    text: String,
}

impl Message {
    /// Creates a message stamped with the current time.
    pub fn new(
        player_name: impl Into<String>,
        text_color: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            creation_time: Utc::now(),
            player_name: player_name.into(),
            text_color: text_color.into(),
            text: text.into(),
        }
    }

    /// Returns true for the unused-slot sentinel.
    pub fn is_empty(&self) -> bool {
        self.player_name.is_empty() && self.text_color.is_empty() && self.text.is_empty()
    }
}

/// A log holding the most recent `capacity` messages.
///
/// Always reads out exactly `capacity` entries; slots that have never been
/// written hold [`Message::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollingLog {
    messages: VecDeque<Message>,
}

impl RollingLog {
    /// Creates a log of `capacity` empty slots.
    #[instrument]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: std::iter::repeat_with(Message::default)
                .take(capacity)
                .collect(),
        }
    }

    /// Creates a log pre-filled with `initial`, oldest first.
    ///
    /// The capacity is the number of messages supplied.
    pub fn from_messages(initial: Vec<Message>) -> Self {
        Self {
            messages: initial.into(),
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.messages.len()
    }

    /// Appends a message, dropping the oldest one.
    #[instrument(skip(self, text), fields(capacity = self.messages.len()))]
    pub fn append(&mut self, player_name: &str, text_color: &str, text: &str) {
        self.append_message(Message::new(player_name, text_color, text));
    }

    /// Appends an already built message, dropping the oldest one.
    pub fn append_message(&mut self, message: Message) {
        if self.messages.pop_front().is_none() {
            debug!("Zero-capacity log, message dropped");
            return;
        }
        self.messages.push_back(message);
    }

    /// Copy of every slot, oldest first.
    pub fn sorted_copy(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    /// The most recently appended message.
    pub fn newest(&self) -> Option<&Message> {
        self.messages.back().filter(|m| !m.is_empty())
    }
}
