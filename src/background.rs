//! Service-worker entry points and the chrome.* bridge.
//!
//! Chrome fires listeners concurrently. Every entry point locks one shared
//! async mutex around the store, so log mutations happen one at a time in
//! arrival order.

use std::rc::Rc;

use async_trait::async_trait;
use futures::lock::Mutex;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::error::HostError;
use crate::host::{Host, KeyValueStore};
use crate::message::RuntimeMessage;
use crate::pixel::Interceptor;
use crate::store::TrackStore;

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn captureVisibleTab() -> Result<JsValue, JsValue>;

    fn setBadgeText(text: &str);

    fn sendRuntimeMessage(message: JsValue);
}

/// Browser services backed by the chrome.* APIs.
struct ChromeHost;

#[async_trait(?Send)]
impl KeyValueStore for ChromeHost {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        let raw = getStorage(key)
            .await
            .map_err(|error| HostError::Storage(format!("get {key}: {error:?}")))?;
        if raw.is_null() || raw.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(raw)
            .map(Some)
            .map_err(|error| HostError::Storage(format!("decode {key}: {error}")))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        // chrome.storage drops Map values, so maps cross as plain objects.
        let encoded = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|error| HostError::Storage(format!("encode {key}: {error}")))?;
        setStorage(key, encoded)
            .await
            .map_err(|error| HostError::Storage(format!("set {key}: {error:?}")))
    }
}

#[async_trait(?Send)]
impl Host for ChromeHost {
    async fn capture_visible_tab(&self) -> Result<String, HostError> {
        let raw = captureVisibleTab()
            .await
            .map_err(|error| HostError::Capture(format!("{error:?}")))?;
        raw.as_string()
            .ok_or_else(|| HostError::Capture("capture returned a non-string".to_string()))
    }

    fn set_badge_text(&self, text: &str) {
        setBadgeText(text);
    }

    fn broadcast(&self, message: &RuntimeMessage) {
        match message.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
            Ok(encoded) => sendRuntimeMessage(encoded),
            Err(error) => log::warn!("dropping runtime message: {error}"),
        }
    }

    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn local_time_string(&self) -> String {
        js_sys::Date::new_0().to_locale_time_string("en-US").into()
    }
}

thread_local! {
    static STORE: Rc<Mutex<TrackStore<ChromeHost>>> =
        Rc::new(Mutex::new(TrackStore::new(ChromeHost)));
    static INTERCEPTOR: Interceptor = Interceptor::new();
}

fn store() -> Rc<Mutex<TrackStore<ChromeHost>>> {
    STORE.with(Rc::clone)
}

/// Restore persisted state when the service worker wakes.
#[wasm_bindgen]
pub async fn init_background() {
    store().lock().await.preload().await;
    web_sys::console::log_1(&"pixel-vigil background ready".into());
}

/// webRequest.onCompleted handler. Classifies the URL and records a beacon.
#[wasm_bindgen]
pub async fn on_request_completed(url: String, tab_id: Option<i32>) {
    let store = store();
    let mut store = store.lock().await;
    // Paused skips classification outright, not just the store write.
    if store.is_paused() {
        return;
    }
    let observed = INTERCEPTOR.with(|interceptor| interceptor.observe(&url));
    if let Some((kind, params)) = observed {
        store.record(params, kind, tab_id).await;
    }
}

/// runtime.onMessage handler.
#[wasm_bindgen]
pub async fn on_runtime_message(message: JsValue) {
    let message = match serde_wasm_bindgen::from_value::<RuntimeMessage>(message) {
        Ok(message) => message,
        // Traffic for some other listener.
        Err(_) => return,
    };
    if let RuntimeMessage::Clear = message {
        store().lock().await.clear().await;
    }
}

/// Context-menu handler. Flips the pause flag and returns the state now in
/// effect so the menu can relabel itself.
#[wasm_bindgen]
pub async fn toggle_paused() -> bool {
    store().lock().await.toggle_paused().await
}

/// Current pause flag, for menu setup.
#[wasm_bindgen]
pub async fn is_paused() -> bool {
    store().lock().await.is_paused()
}
