//! The persisted event log and the pipeline that feeds it.

use serde_json::Value;

use crate::event::{resolve_key, EventKind, ParamMap, TrackEvent};
use crate::host::{Host, KeyValueStore};
use crate::message::RuntimeMessage;
use crate::screenshot::ScreenshotThrottle;
use crate::storage::EventLog;

/// Storage key holding the whole event log.
pub const EVENTS_KEY: &str = "urlArray";
/// Storage key holding the pause flag.
pub const PAUSED_KEY: &str = "paused";

/// Toolbar badge text for a log of `len` events.
pub fn badge_text(len: usize, paused: bool) -> String {
    if paused {
        "OFF".to_string()
    } else if len == 0 {
        String::new()
    } else {
        len.to_string()
    }
}

/// Owns the in-memory mirror of the persisted log and drives every mutation
/// through storage. The mirror only advances after a successful write, so a
/// flaky backend costs single events, never the log's integrity.
pub struct TrackStore<H: Host> {
    host: H,
    log: EventLog,
    paused: bool,
    shots: ScreenshotThrottle,
}

impl<H: Host> TrackStore<H> {
    pub fn new(host: H) -> Self {
        TrackStore {
            host,
            log: EventLog::new(),
            paused: false,
            shots: ScreenshotThrottle::new(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn events(&self) -> &[TrackEvent] {
        self.log.events()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn refresh_badge(&self) {
        self.host
            .set_badge_text(&badge_text(self.log.len(), self.paused));
    }

    /// Load the persisted log and pause flag, then paint the badge. Called
    /// once when the worker wakes; unreadable state falls back to defaults.
    pub async fn preload(&mut self) {
        match self.host.get(EVENTS_KEY).await.and_then(EventLog::from_value) {
            Ok(log) => self.log = log,
            Err(error) => log::debug!("stored log unreadable, starting empty: {error}"),
        }
        match self.host.get(PAUSED_KEY).await {
            Ok(value) => self.paused = value.and_then(|v| v.as_bool()).unwrap_or(false),
            Err(error) => log::debug!("stored pause flag unreadable: {error}"),
        }
        self.refresh_badge();
    }

    /// Append one observed beacon.
    ///
    /// Runs a full read-modify-write against the persisted log. Any failure
    /// along the way drops this event and leaves both the stored log and the
    /// mirror as they were.
    pub async fn record(&mut self, params: ParamMap, kind: EventKind, tab_id: Option<i32>) {
        if self.paused {
            return;
        }

        let mut log = match self.host.get(EVENTS_KEY).await.and_then(EventLog::from_value)
        {
            Ok(log) => log,
            Err(error) => {
                log::debug!(
                    "dropping {} event, storage read failed: {error}",
                    kind.label()
                );
                return;
            }
        };

        let now_ms = self.host.now_ms();
        let screenshot = self.shots.capture(&self.host, now_ms).await;
        log.push(TrackEvent {
            key: resolve_key(kind, &params),
            values: params.clone(),
            kind,
            time: self.host.local_time_string(),
            tab_id,
            screenshot,
        });

        let encoded = match log.to_value() {
            Ok(encoded) => encoded,
            Err(error) => {
                log::debug!("dropping {} event, encode failed: {error}", kind.label());
                return;
            }
        };
        if let Err(error) = self.host.set(EVENTS_KEY, encoded).await {
            log::debug!(
                "dropping {} event, storage write failed: {error}",
                kind.label()
            );
            return;
        }

        self.log = log;
        self.refresh_badge();
        self.host.broadcast(&RuntimeMessage::tracks(params));
    }

    /// Wipe the log. Listeners hear an empty notification; the pause flag is
    /// untouched.
    pub async fn clear(&mut self) {
        if let Err(error) = self.host.set(EVENTS_KEY, Value::Array(Vec::new())).await {
            log::debug!("clear failed, keeping current log: {error}");
            return;
        }
        self.log = EventLog::new();
        self.refresh_badge();
        self.host.broadcast(&RuntimeMessage::empty());
    }

    /// Persist a new pause flag. The in-memory flag follows the write, so a
    /// failed write changes nothing.
    pub async fn set_paused(&mut self, paused: bool) {
        if let Err(error) = self.host.set(PAUSED_KEY, Value::Bool(paused)).await {
            log::debug!("pause flag write failed: {error}");
            return;
        }
        self.paused = paused;
        self.refresh_badge();
    }

    /// Flip the pause flag, returning the value now in effect.
    pub async fn toggle_paused(&mut self) -> bool {
        let next = !self.paused;
        self.set_paused(next).await;
        self.paused
    }
}
