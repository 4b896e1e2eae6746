//! # Channels
//!
//! A [`Channel`] is the ingestion-side owner of one conversation: a
//! bounded message history plus the side bookkeeping that rides along
//! with it (recently active chatters for name completion). Network
//! threads append, render threads snapshot; returns from the mutating
//! calls tell the caller exactly what changed so it can notify listeners
//! (remove an evicted widget, prepend backfilled ones).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::debug;

use crate::history::{BoundedHistory, HistorySnapshot};
use crate::message::Message;

pub struct Channel {
    name: String,
    messages: BoundedHistory<Arc<Message>>,
    /// login name → display name, for completion. Low-frequency access,
    /// plain mutual exclusion is enough.
    recent_chatters: Mutex<HashMap<String, String>>,
}

impl Channel {
    pub fn new(name: impl Into<String>, message_limit: usize) -> Self {
        Self {
            name: name.into(),
            messages: BoundedHistory::new(message_limit),
            recent_chatters: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message_snapshot(&self) -> HistorySnapshot<Arc<Message>> {
        self.messages.snapshot()
    }

    /// Appends a message, recording its sender as a recent chatter.
    /// Returns the message evicted to make room, if any.
    pub fn add_message(&self, message: Arc<Message>) -> Option<Arc<Message>> {
        if !message.login_name().is_empty() {
            self.add_recent_chatter(&message);
        }

        let evicted = self.messages.push_back(message);
        if let Some(old) = &evicted {
            debug!("channel {}: evicted message {}", self.name, old.id());
        }
        evicted
    }

    /// Prepends older messages (history backfill). Returns the subset
    /// actually inserted; see `BoundedHistory::push_front` for the
    /// trimming policy.
    pub fn add_messages_at_start(&self, messages: &[Arc<Message>]) -> Vec<Arc<Message>> {
        let inserted = self.messages.push_front(messages);
        debug!(
            "channel {}: backfilled {} of {} messages",
            self.name,
            inserted.len(),
            messages.len()
        );
        inserted
    }

    /// Replaces the message at a snapshot-stable index in place.
    /// Panics when `index` is out of range.
    pub fn replace_message(&self, index: usize, message: Arc<Message>) {
        self.messages.replace_item(index, message);
    }

    /// Disables every stored message sent by `login_name`. Returns how
    /// many messages were newly disabled.
    pub fn disable_messages_from(&self, login_name: &str) -> usize {
        let snapshot = self.messages.snapshot();
        let mut count = 0;
        for message in snapshot.iter() {
            if message.login_name() == login_name && !message.is_disabled() {
                message.set_disabled(true);
                count += 1;
            }
        }
        count
    }

    /// Full timeout flow: disables the user's existing messages, then
    /// appends the system message describing the timeout. Returns the
    /// message evicted by the append, if any.
    pub fn apply_timeout(
        &self,
        login_name: &str,
        duration_secs: u32,
        reason: &str,
    ) -> Option<Arc<Message>> {
        let disabled = self.disable_messages_from(login_name);
        debug!(
            "channel {}: timed out {} for {}s, disabled {} messages",
            self.name, login_name, duration_secs, disabled
        );
        self.add_message(Arc::new(Message::timeout_message(
            login_name,
            duration_secs,
            reason,
        )))
    }

    fn add_recent_chatter(&self, message: &Message) {
        let mut chatters = self.recent_chatters.lock().unwrap();
        chatters.insert(
            message.login_name().to_string(),
            message.display_name().to_string(),
        );
    }

    /// Display names of recently active chatters, for completion.
    pub fn usernames_for_completion(&self) -> Vec<String> {
        let chatters = self.recent_chatters.lock().unwrap();
        chatters.values().cloned().collect()
    }
}
