use log::warn;
use scene::{DrawList, FeedEvent, SceneFeed};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Browser-side viewer state: the latest good scene and its draw list.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct Viewer {
    feed: SceneFeed,
    draw_list: DrawList,
}

#[wasm_bindgen]
impl Viewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Viewer {
        Viewer::default()
    }

    /// Applies one transport message. Returns `true` when the scene changed.
    /// A document that fails to decode is reported and the previous scene kept.
    #[wasm_bindgen]
    pub fn push(&mut self, payload: &[u8]) -> Result<bool, JsValue> {
        match self.feed.accept(payload) {
            FeedEvent::Updated { .. } => {
                if let Some(scene) = self.feed.latest().take() {
                    self.draw_list = DrawList::from_scene(&scene);
                }
                Ok(true)
            }
            FeedEvent::Skipped(err) => Err(JsValue::from_str(&format!("Invalid scene: {err}"))),
            FeedEvent::Stopped => Ok(false),
            FeedEvent::Ignored => {
                warn!("update after stop ignored");
                Ok(false)
            }
        }
    }

    #[wasm_bindgen(getter)]
    pub fn stopped(&self) -> bool {
        self.feed.is_stopped()
    }

    #[wasm_bindgen]
    pub fn draw_list(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.draw_list).map_err(|e| e.into())
    }

    /// Extent of the current scene, or `undefined` when there is nothing to frame.
    #[wasm_bindgen]
    pub fn bounds(&self) -> Result<JsValue, JsValue> {
        let bounds = self.feed.latest().current().and_then(|s| s.bounds());
        serde_wasm_bindgen::to_value(&bounds).map_err(|e| e.into())
    }

    /// Canonical encoding of the current scene.
    #[wasm_bindgen]
    pub fn scene_json(&self) -> Result<Option<String>, JsValue> {
        self.feed
            .latest()
            .current()
            .map(|scene| scene::encode_string(&scene))
            .transpose()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
