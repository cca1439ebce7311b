//! WASM bindings for the break preview

use crate::config::{MarkerStyle, Settings};
use crate::host::{MarkerRenderer, MirroredHost};
use crate::render::{DisplayMarker, MarkerPatch};
use crate::sync::ViewSynchronizer;
use crate::{ContainerId, ViewId};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Level diagnostics are forwarded to the browser console at
pub const CONSOLE_LOG_LEVEL: log::Level = log::Level::Warn;

/// Initialize panic hook and console logging for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Fails only when a logger is already installed
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(CONSOLE_LOG_LEVEL);
}

/// Message handed to the JavaScript render callback
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum RenderMessage<'a> {
    Patch {
        patch: &'a MarkerPatch,
        markers: Vec<DisplayMarker>,
    },
    Visibility {
        visible: bool,
    },
    Detach,
}

/// Forwards marker patches to a JavaScript callback as
/// `callback(containerId | null, messageJson)`
pub struct JsRenderer {
    callback: js_sys::Function,
}

impl JsRenderer {
    pub fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }

    fn send(&self, container: Option<ContainerId>, message: &RenderMessage<'_>) {
        let json = match serde_json::to_string(message) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("cannot encode render message: {err}");
                return;
            }
        };
        let target = container
            .map(|c| JsValue::from_f64(c.0 as f64))
            .unwrap_or(JsValue::NULL);

        if let Err(err) = self
            .callback
            .call2(&JsValue::NULL, &target, &JsValue::from_str(&json))
        {
            log::warn!("render callback threw: {:?}", err);
        }
    }
}

impl MarkerRenderer for JsRenderer {
    fn apply(&mut self, container: ContainerId, patch: &MarkerPatch, style: &MarkerStyle) {
        let message = RenderMessage::Patch {
            patch,
            markers: patch.display(style),
        };
        self.send(Some(container), &message);
    }

    fn set_visible(&mut self, visible: bool) {
        self.send(None, &RenderMessage::Visibility { visible });
    }

    fn detach(&mut self, container: ContainerId) {
        self.send(Some(container), &RenderMessage::Detach);
    }
}

fn view_id(id: f64) -> ViewId {
    ViewId(id as u64)
}

fn container_id(id: f64) -> ContainerId {
    ContainerId(id as u64)
}

fn to_js(err: crate::BreakError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-exposed break preview
#[wasm_bindgen]
pub struct WasmBreakPreview {
    sync: ViewSynchronizer<MirroredHost, JsRenderer>,
}

#[wasm_bindgen]
impl WasmBreakPreview {
    /// Create a preview from persisted settings (empty string for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(
        settings_json: &str,
        render_callback: js_sys::Function,
    ) -> Result<WasmBreakPreview, JsValue> {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).map_err(to_js)?
        };

        Ok(Self {
            sync: ViewSynchronizer::new(
                MirroredHost::new(),
                JsRenderer::new(render_callback),
                settings,
            ),
        })
    }

    /// Report a view and its content region; `container` is omitted while
    /// the view has no scrollable region
    #[wasm_bindgen(js_name = setView)]
    pub fn set_view(&mut self, view: f64, container: Option<f64>, height: Option<f32>) {
        let container = container.map(container_id);
        self.sync.host_mut().set_view(view_id(view), container);
        if let (Some(container), Some(height)) = (container, height) {
            self.sync.host_mut().set_height(container, height);
        }
    }

    #[wasm_bindgen(js_name = closeView)]
    pub fn close_view(&mut self, view: f64) {
        self.sync.host_mut().close_view(view_id(view));
        self.sync.on_view_closed(view_id(view));
    }

    /// Record a height without signalling growth
    #[wasm_bindgen(js_name = setHeight)]
    pub fn set_height(&mut self, container: f64, height: f32) {
        self.sync.host_mut().set_height(container_id(container), height);
    }

    #[wasm_bindgen(js_name = layoutChanged)]
    pub fn layout_changed(&mut self, now_ms: f64) {
        self.sync.on_layout_changed(now_ms as u64);
    }

    #[wasm_bindgen(js_name = activeViewChanged)]
    pub fn active_view_changed(&mut self, view: f64, now_ms: f64) {
        self.sync.on_active_view_changed(view_id(view), now_ms as u64);
    }

    #[wasm_bindgen(js_name = documentOpened)]
    pub fn document_opened(&mut self, view: f64, now_ms: f64) {
        self.sync.on_document_opened(view_id(view), now_ms as u64);
    }

    /// Resize observer callback
    #[wasm_bindgen(js_name = heightChanged)]
    pub fn height_changed(&mut self, container: f64, height: f32) {
        let container = container_id(container);
        self.sync.host_mut().set_height(container, height);
        self.sync.on_height_changed(container);
    }

    #[wasm_bindgen(js_name = saveSettings)]
    pub fn save_settings(&mut self, settings_json: &str, now_ms: f64) -> Result<(), JsValue> {
        self.sync
            .load_settings(settings_json, now_ms as u64)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = settingsJson)]
    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.sync.settings().to_json().map_err(to_js)
    }

    pub fn recalibrate(&mut self) {
        self.sync.recalibrate();
    }

    #[wasm_bindgen(js_name = toggleVisibility)]
    pub fn toggle_visibility(&mut self) -> bool {
        self.sync.toggle_visibility()
    }

    /// Run due deferred work. Returns the number of tasks that fired.
    pub fn tick(&mut self, now_ms: f64) -> usize {
        self.sync.tick(now_ms as u64)
    }

    /// When `tick` next has work, if ever
    #[wasm_bindgen(js_name = nextDue)]
    pub fn next_due(&self) -> Option<f64> {
        self.sync.tasks().next_due().map(|due| due as f64)
    }

    /// Current break offsets for a container (computing them if stale)
    pub fn breaks(&mut self, container: f64) -> js_sys::Float32Array {
        match self.sync.update(container_id(container)) {
            Ok(breaks) => js_sys::Float32Array::from(breaks.offsets()),
            Err(err) => {
                log::debug!("no breaks for container {container}: {err}");
                js_sys::Float32Array::new_with_length(0)
            }
        }
    }

    /// Resolved page height, absent while the configuration is invalid
    #[wasm_bindgen(js_name = pageHeight)]
    pub fn page_height(&self) -> Option<f32> {
        self.sync.params().map(|p| p.page_height)
    }
}
