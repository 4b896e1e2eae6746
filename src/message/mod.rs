//! # Chat messages
//!
//! A [`Message`] is an ordered sequence of content elements plus sender
//! metadata. Messages are immutable once constructed — history snapshots
//! and layout passes may reference them from several threads — with one
//! documented exception: the `disabled` flag, flipped by moderation
//! actions after the fact and guarded by its own atomic, never by a
//! whole-message lock.

pub mod element;

use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use element::{ContentElement, ElementFlags};

use crate::layout::metrics::FontMetrics;
use crate::layout::{FontStyle, LayoutContainer, LayoutSettings, MessageLayout};

pub struct Message {
    id: Uuid,
    login_name: String,
    display_name: String,
    /// For timeout/ban system messages: the moderated user.
    timeout_user: Option<String>,
    elements: Vec<ContentElement>,
    disabled: AtomicBool,
}

impl Message {
    pub fn new(
        login_name: impl Into<String>,
        display_name: impl Into<String>,
        elements: Vec<ContentElement>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            login_name: login_name.into(),
            display_name: display_name.into(),
            timeout_user: None,
            elements,
            disabled: AtomicBool::new(false),
        }
    }

    /// A message with no sender (notices, status lines).
    pub fn system(elements: Vec<ContentElement>) -> Self {
        Self::new("", "", elements)
    }

    /// The system message appended to a channel when a user is timed out.
    pub fn timeout_message(username: &str, duration_secs: u32, reason: &str) -> Self {
        let mut text = format!("{username} has been timed out for {duration_secs} seconds");
        if !reason.is_empty() {
            text.push_str(": ");
            text.push_str(reason);
        }
        text.push('.');

        let mut message = Self::system(vec![
            ContentElement::timestamp_now(),
            ContentElement::text(
                &text,
                ElementFlags::SYSTEM | ElementFlags::TEXT,
                FontStyle::Medium,
            ),
        ]);
        message.timeout_user = Some(username.to_string());
        message
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn login_name(&self) -> &str {
        &self.login_name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn timeout_user(&self) -> Option<&str> {
        self.timeout_user.as_deref()
    }

    pub fn elements(&self) -> &[ContentElement] {
        &self.elements
    }

    /// Whether moderation has hidden this message's content.
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    pub fn set_disabled(&self, value: bool) {
        self.disabled.store(value, Ordering::Relaxed);
    }

    /// Runs one full layout pass over this message.
    pub fn layout(
        &self,
        target_width: f32,
        scale: f32,
        metrics: &dyn FontMetrics,
        settings: &LayoutSettings,
        flags: ElementFlags,
    ) -> MessageLayout {
        let mut container = LayoutContainer::new(target_width, scale, metrics, settings);
        for element in &self.elements {
            element.contribute(&mut container, flags);
        }
        container.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TableMetrics;

    #[test]
    fn test_disabled_flag_is_post_hoc_mutable() {
        let message = Message::new("forsen", "Forsen", Vec::new());
        assert!(!message.is_disabled());
        message.set_disabled(true);
        assert!(message.is_disabled());
    }

    #[test]
    fn test_timeout_message_carries_target_and_reason() {
        let message = Message::timeout_message("forsen", 600, "spam");
        assert_eq!(message.timeout_user(), Some("forsen"));
        assert!(message.login_name().is_empty());
        assert_eq!(message.elements().len(), 2);
    }

    #[test]
    fn test_layout_drives_elements_in_order() {
        let metrics = TableMetrics::new(10.0, 16.0);
        let settings = LayoutSettings::default();
        let message = Message::new(
            "forsen",
            "Forsen",
            vec![
                ContentElement::text("Forsen:", ElementFlags::USERNAME, FontStyle::MediumBold),
                ContentElement::text("hi", ElementFlags::TEXT, FontStyle::Medium),
            ],
        );

        let layout = message.layout(400.0, 1.0, &metrics, &settings, ElementFlags::DEFAULT);

        assert_eq!(layout.pieces.len(), 2);
        assert_eq!(layout.pieces[0].as_text(), Some("Forsen:"));
        assert_eq!(layout.pieces[1].as_text(), Some("hi"));
        // Username then text, left to right on one line.
        assert_eq!(layout.pieces[1].rect.x, 70.0);
        assert_eq!(layout.line_count(), 1);
    }

    #[test]
    fn test_layout_respects_visibility_flags() {
        let metrics = TableMetrics::new(10.0, 16.0);
        let settings = LayoutSettings::default();
        let message = Message::new(
            "forsen",
            "Forsen",
            vec![
                ContentElement::timestamp(chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap()),
                ContentElement::text("hi", ElementFlags::TEXT, FontStyle::Medium),
            ],
        );

        // Without the TIMESTAMP bit only the text run renders.
        let layout = message.layout(400.0, 1.0, &metrics, &settings, ElementFlags::TEXT);

        assert_eq!(layout.pieces.len(), 1);
        assert_eq!(layout.pieces[0].as_text(), Some("hi"));
    }
}
