//! # weft
//!
//! Rendering-surface-independent chat core: lays chat messages out into
//! wrapped visual lines and keeps a bounded, snapshot-isolated history
//! of messages per channel.
//!
//! - [`message`] — messages and their typed content elements
//! - [`layout`] — the line-breaking engine and its injected services
//! - [`history`] — the bounded, concurrently snapshottable queue
//! - [`channel`] — per-conversation ownership and moderation flows
//! - [`config`] — `~/.weft/config.toml` loading and resolution

pub mod channel;
pub mod config;
pub mod history;
pub mod layout;
pub mod message;

#[cfg(test)]
pub mod test_support;
