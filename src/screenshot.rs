//! Throttled visible-tab capture.

use crate::host::Host;

/// Minimum spacing between capture attempts; Chrome rate-limits
/// captureVisibleTab.
pub const CAPTURE_WINDOW_MS: f64 = 200.0;

/// Remembers the last capture attempt and reuses its result for any event
/// that lands inside the window, including a failed attempt's `None`.
#[derive(Debug, Default)]
pub struct ScreenshotThrottle {
    last_attempt_ms: Option<f64>,
    cached: Option<String>,
}

impl ScreenshotThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A screenshot for an event observed at `now_ms`, fresh or reused.
    pub async fn capture<H: Host>(&mut self, host: &H, now_ms: f64) -> Option<String> {
        if let Some(last) = self.last_attempt_ms {
            if now_ms - last < CAPTURE_WINDOW_MS {
                return self.cached.clone();
            }
        }

        // The window anchors at the attempt, successful or not.
        self.last_attempt_ms = Some(now_ms);
        self.cached = match host.capture_visible_tab().await {
            Ok(data_uri) => Some(data_uri),
            Err(error) => {
                log::debug!("screenshot capture failed: {error}");
                None
            }
        };
        self.cached.clone()
    }
}
