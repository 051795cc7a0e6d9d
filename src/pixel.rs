//! Classification and decoding of pixel beacon URLs.

use regex::Regex;

use crate::event::{EventKind, ParamMap};

/// Chrome match pattern for the requests we watch.
pub const PIXEL_URL_PATTERN: &str = "*://pixel.wp.com/*";

/// Known beacon prefixes, most specific classification first. A URL that
/// carries one of these prefixes is that kind regardless of what its query
/// string contains.
const PIXEL_PREFIXES: [(&str, EventKind); 6] = [
    ("https://pixel.wp.com/t.gif?", EventKind::TracksEvent),
    ("http://pixel.wp.com/t.gif?", EventKind::TracksEvent),
    ("https://pixel.wp.com/g.gif?", EventKind::External),
    ("http://pixel.wp.com/g.gif?", EventKind::External),
    ("https://pixel.wp.com/boom.gif?", EventKind::Grafana),
    ("http://pixel.wp.com/boom.gif?", EventKind::Grafana),
];

/// Classify a beacon URL by its prefix, returning the kind and the raw query
/// string. A URL without a recognized prefix (including one with no query at
/// all) is not a beacon we track.
pub fn classify(url: &str) -> Option<(EventKind, &str)> {
    PIXEL_PREFIXES
        .iter()
        .find_map(|(prefix, kind)| url.strip_prefix(prefix).map(|query| (*kind, query)))
}

/// Decode a raw query string into an ordered parameter map.
///
/// Percent escapes and `+` are decoded. Duplicate names keep the position of
/// the first occurrence and the value of the last.
pub fn parse_query(query: &str) -> ParamMap {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Translate a Chrome match pattern into an anchored regex. A leading `*://`
/// widens to http or https; any other `*` matches a run of characters and the
/// rest is escaped literally.
fn match_pattern_to_regex(pattern: &str) -> String {
    let mut regex = String::from("^");
    let rest = if let Some(rest) = pattern.strip_prefix("*://") {
        regex.push_str("https?://");
        rest
    } else {
        pattern
    };
    for ch in rest.chars() {
        if ch == '*' {
            regex.push_str(".*");
        } else {
            regex.push_str(&regex::escape(&ch.to_string()));
        }
    }
    regex.push('$');
    regex
}

/// Watches completed requests and picks out the pixel beacons.
pub struct Interceptor {
    filter: Regex,
}

impl Interceptor {
    pub fn new() -> Self {
        let filter = Regex::new(&match_pattern_to_regex(PIXEL_URL_PATTERN))
            .expect("compiled request filter");
        Self { filter }
    }

    /// Inspect one completed request. Returns the classification and decoded
    /// parameters when the URL is a known beacon, `None` otherwise.
    pub fn observe(&self, url: &str) -> Option<(EventKind, ParamMap)> {
        if !self.filter.is_match(url) {
            return None;
        }
        match classify(url) {
            Some((kind, query)) => Some((kind, parse_query(query))),
            None => {
                log::debug!("Unknown pixel {url}");
                None
            }
        }
    }
}

impl Default for Interceptor {
    fn default() -> Self {
        Self::new()
    }
}
