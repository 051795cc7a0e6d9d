//! Data structures for observed pixel events.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Decoded query parameters, insertion order = URL order.
pub type ParamMap = IndexMap<String, String>;

/// Classification of one observed beacon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    TracksEvent,
    External,
    Grafana,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::TracksEvent => "tracks-event",
            EventKind::External => "external",
            EventKind::Grafana => "grafana",
        }
    }
}

/// One observed beacon, serialized with the field names the popup reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackEvent {
    /// Display key resolved from the parameters (see [`resolve_key`]).
    pub key: String,
    /// All decoded query parameters.
    pub values: ParamMap,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Human-readable capture timestamp.
    pub time: String,
    #[serde(rename = "tabId", default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<i32>,
    /// Data URI of a throttled visible-tab capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

/// Resolve the display key for an event.
///
/// Tracks events are named by `_en`. External events prefer `v` and fall back
/// to `_en`. Grafana beacons always read "Error". A missing parameter resolves
/// to an empty key, which the popup treats as unnamed.
pub fn resolve_key(kind: EventKind, params: &ParamMap) -> String {
    match kind {
        EventKind::TracksEvent => params.get("_en").cloned().unwrap_or_default(),
        EventKind::External => params
            .get("v")
            .or_else(|| params.get("_en"))
            .cloned()
            .unwrap_or_default(),
        EventKind::Grafana => "Error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ParamMap {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_key_tracks_event() {
        let map = params(&[("_en", "my_event"), ("foo", "bar")]);
        assert_eq!(resolve_key(EventKind::TracksEvent, &map), "my_event");
    }

    #[test]
    fn test_resolve_key_tracks_event_missing_en() {
        let map = params(&[("foo", "bar")]);
        assert_eq!(resolve_key(EventKind::TracksEvent, &map), "");
    }

    #[test]
    fn test_resolve_key_external_prefers_v() {
        let map = params(&[("v", "ext_name"), ("_en", "ignored")]);
        assert_eq!(resolve_key(EventKind::External, &map), "ext_name");
    }

    #[test]
    fn test_resolve_key_external_falls_back_to_en() {
        let map = params(&[("_en", "fallback"), ("x", "1")]);
        assert_eq!(resolve_key(EventKind::External, &map), "fallback");
    }

    #[test]
    fn test_resolve_key_grafana_ignores_params() {
        let map = params(&[("_en", "whatever"), ("v", "also ignored")]);
        assert_eq!(resolve_key(EventKind::Grafana, &map), "Error");
        assert_eq!(resolve_key(EventKind::Grafana, &ParamMap::new()), "Error");
    }

    #[test]
    fn test_resolve_key_does_not_mutate_params() {
        let map = params(&[("v", "name"), ("x", "1")]);
        let before = map.clone();
        resolve_key(EventKind::External, &map);
        assert_eq!(map, before);
    }

    #[test]
    fn test_kind_wire_strings() {
        assert_eq!(
            serde_json::to_value(EventKind::TracksEvent).unwrap(),
            serde_json::json!("tracks-event")
        );
        assert_eq!(
            serde_json::to_value(EventKind::External).unwrap(),
            serde_json::json!("external")
        );
        assert_eq!(
            serde_json::to_value(EventKind::Grafana).unwrap(),
            serde_json::json!("grafana")
        );
    }

    #[test]
    fn test_serialization() {
        let event = TrackEvent {
            key: "my_event".to_string(),
            values: params(&[("_en", "my_event"), ("foo", "bar")]),
            kind: EventKind::TracksEvent,
            time: "10:15:30 AM".to_string(),
            tab_id: Some(42),
            screenshot: Some("data:image/png;base64,abc".to_string()),
        };

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: TrackEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, event);
        // Wire names, not Rust names.
        assert!(json.contains("\"type\":\"tracks-event\""));
        assert!(json.contains("\"tabId\":42"));
        assert!(!json.contains("kind"));
    }

    #[test]
    fn test_optional_fields_omitted() {
        let event = TrackEvent {
            key: "k".to_string(),
            values: ParamMap::new(),
            kind: EventKind::External,
            time: "10:15:30 AM".to_string(),
            tab_id: None,
            screenshot: None,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("tabId"));
        assert!(!json.contains("screenshot"));
    }

    #[test]
    fn test_values_preserve_insertion_order() {
        let event = TrackEvent {
            key: "k".to_string(),
            values: params(&[("z", "1"), ("a", "2"), ("m", "3")]),
            kind: EventKind::TracksEvent,
            time: "10:15:30 AM".to_string(),
            tab_id: None,
            screenshot: None,
        };

        let keys: Vec<&String> = event.values.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);

        // Order survives a round trip through JSON.
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: TrackEvent = serde_json::from_str(&json).unwrap();
        let keys: Vec<&String> = deserialized.values.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
