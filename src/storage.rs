/// Storage serialization for chrome.storage.local

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HostError;
use crate::event::TrackEvent;

/// The persisted event log. Stored wholesale under one key as a bare JSON
/// array, so an empty value and a fresh install look the same.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<TrackEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    pub fn push(&mut self, event: TrackEvent) {
        self.events.push(event);
    }

    /// Decode the stored value. An absent key is an empty log; a present but
    /// malformed value is an error the caller must not write over.
    pub fn from_value(value: Option<Value>) -> Result<Self, HostError> {
        match value {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(EventLog::new()),
        }
    }

    pub fn to_value(&self) -> Result<Value, HostError> {
        Ok(serde_json::to_value(self)?)
    }
}
