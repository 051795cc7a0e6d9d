//! Runtime messages exchanged with the popup.

use serde::{Deserialize, Serialize};

use crate::event::ParamMap;

/// Messages on chrome.runtime, tagged by `kind`.
///
/// `Tracks` flows outward after every log change; `Clear` flows inward when
/// the popup asks to wipe the log. Anything else on the channel is not ours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum RuntimeMessage {
    Tracks { data: TracksData },
    Clear,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TracksData {
    #[serde(rename = "queryParams")]
    pub query_params: ParamMap,
}

impl RuntimeMessage {
    pub fn tracks(query_params: ParamMap) -> Self {
        RuntimeMessage::Tracks {
            data: TracksData { query_params },
        }
    }

    /// The notification sent when the log empties.
    pub fn empty() -> Self {
        RuntimeMessage::tracks(ParamMap::new())
    }
}
