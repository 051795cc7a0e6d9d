//! Trait seams over the browser services the background worker touches.
//!
//! The store talks to these traits instead of the chrome bridge directly, so
//! the whole pipeline runs under plain `cargo test` against a fake.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HostError;
use crate::message::RuntimeMessage;

/// Async key-value storage, chrome.storage.local shaped: whole JSON values
/// under string keys, absent keys read back as `None`.
#[async_trait(?Send)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), HostError>;
}

/// Everything else the background worker asks of the browser.
#[async_trait(?Send)]
pub trait Host: KeyValueStore {
    /// Capture the visible tab as a data URI.
    async fn capture_visible_tab(&self) -> Result<String, HostError>;

    /// Replace the toolbar badge text. Fire and forget.
    fn set_badge_text(&self, text: &str);

    /// Broadcast a runtime message. Delivery is best effort; nobody may be
    /// listening.
    fn broadcast(&self, message: &RuntimeMessage);

    /// Monotonic-enough wall clock in milliseconds.
    fn now_ms(&self) -> f64;

    /// Locale-formatted time of day for display.
    fn local_time_string(&self) -> String;
}
