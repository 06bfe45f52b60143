//! Browser backend
//!
//! [`WebEnvironment`], [`WebGeometry`], and [`WebClipboard`] read the live
//! page through `web-sys`. Anything the browser does not expose (for example
//! `navigator.deviceMemory` outside Chromium) surfaces as
//! [`PlatformError::Unavailable`] and falls back to the documented default.

use std::cell::RefCell;

use cadence_core::{CadenceError, ElementId, Rect, Size, Timestamp};
use js_sys::{Function, Promise, Reflect};
use rustc_hash::FxHashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Window};

use crate::clipboard::Clipboard;
use crate::environment::Environment;
use crate::error::{PlatformError, Result};
use crate::geometry::GeometrySource;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    fn performance_now() -> f64;
}

/// Current frame-clock time (`performance.now()`)
pub fn now() -> Timestamp {
    Timestamp::from_millis_f64(performance_now())
}

fn js_error(value: JsValue) -> PlatformError {
    PlatformError::Other(format!("{value:?}"))
}

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| PlatformError::Unavailable("window".into()))
}

/// Device signals from `navigator` and `window`
#[derive(Debug, Default, Clone, Copy)]
pub struct WebEnvironment;

impl WebEnvironment {
    pub fn new() -> Self {
        Self
    }
}

impl Environment for WebEnvironment {
    fn device_memory_gb(&self) -> Result<f32> {
        let navigator = window()?.navigator();
        // Not in web-sys: Chromium-only and absent from the WebIDL
        Reflect::get(&navigator, &JsValue::from_str("deviceMemory"))
            .map_err(js_error)?
            .as_f64()
            .map(|gb| gb as f32)
            .ok_or_else(|| PlatformError::Unavailable("navigator.deviceMemory".into()))
    }

    fn hardware_concurrency(&self) -> Result<u32> {
        let count = window()?.navigator().hardware_concurrency();
        if count.is_finite() && count >= 1.0 {
            Ok(count as u32)
        } else {
            Err(PlatformError::Unavailable(
                "navigator.hardwareConcurrency".into(),
            ))
        }
    }

    fn viewport_width(&self) -> Result<f32> {
        window()?
            .inner_width()
            .map_err(js_error)?
            .as_f64()
            .map(|w| w as f32)
            .ok_or_else(|| PlatformError::Unavailable("window.innerWidth".into()))
    }

    fn prefers_reduced_motion(&self) -> Result<bool> {
        window()?
            .match_media(REDUCED_MOTION_QUERY)
            .map_err(js_error)?
            .map(|list| list.matches())
            .ok_or_else(|| PlatformError::Unsupported("matchMedia".into()))
    }
}

/// Maps element ids to live DOM elements
#[derive(Debug, Default)]
pub struct WebGeometry {
    elements: RefCell<FxHashMap<ElementId, Element>>,
}

impl WebGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a DOM element with an id
    pub fn bind(&self, id: ElementId, element: Element) {
        self.elements.borrow_mut().insert(id, element);
    }

    pub fn unbind(&self, id: ElementId) {
        self.elements.borrow_mut().remove(&id);
    }

    fn element(&self, id: ElementId) -> cadence_core::Result<Element> {
        let element = self
            .elements
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| CadenceError::UnknownElement(format!("{id:?}")))?;
        if !element.is_connected() {
            return Err(CadenceError::Detached);
        }
        Ok(element)
    }
}

impl GeometrySource for WebGeometry {
    fn document_rect(&self, element: ElementId) -> cadence_core::Result<Rect> {
        let element = self.element(element)?;
        let html = element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| CadenceError::Geometry("not an HTML element".into()))?;
        Ok(Rect::new(
            html.offset_left() as f32,
            html.offset_top() as f32,
            html.offset_width() as f32,
            html.offset_height() as f32,
        ))
    }

    fn client_rect(&self, element: ElementId) -> cadence_core::Result<Rect> {
        let rect = self.element(element)?.get_bounding_client_rect();
        Ok(Rect::new(
            rect.x() as f32,
            rect.y() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    fn viewport(&self) -> Size {
        let Ok(window) = window() else {
            return Size::ZERO;
        };
        let read = |value: std::result::Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
        };
        Size::new(read(window.inner_width()), read(window.inner_height()))
    }
}

/// `navigator.clipboard.writeText`.
///
/// The browser API is promise-based: a synchronous `Ok` means the write was
/// issued, and a later rejection is logged at `error`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebClipboard;

impl WebClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for WebClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let navigator = window()?.navigator();
        let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .map_err(js_error)?;
        if clipboard.is_undefined() || clipboard.is_null() {
            return Err(PlatformError::Clipboard(
                "navigator.clipboard is not available".into(),
            ));
        }

        let write: Function = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| PlatformError::Clipboard("writeText is not a function".into()))?;
        let promise: Promise = write
            .call1(&clipboard, &JsValue::from_str(text))
            .map_err(|err| PlatformError::Clipboard(format!("{err:?}")))?
            .dyn_into()
            .map_err(js_error)?;

        let on_reject = Closure::once_into_js(|err: JsValue| {
            tracing::error!(error = ?err, "clipboard write rejected");
        });
        let catch: Function = Reflect::get(&promise, &JsValue::from_str("catch"))
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;
        catch.call1(&promise, &on_reject).map_err(js_error)?;
        Ok(())
    }
}
