//! WASM bindings so a page can restructure itself in the browser.
//!
//! The host passes the page's HTML and swaps in the result, or asks for the
//! outline alone to build its own navigation.

use wasm_bindgen::prelude::*;

use crate::{RestructureOptions, restructure_html};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Restructure an HTML document with the default selectors.
///
/// Returns the serialized document.
#[wasm_bindgen]
pub fn restructure(html: &str) -> Result<String, JsValue> {
    let page = restructure_html(html, &RestructureOptions::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(page.html)
}

/// Restructure with custom selectors for the navigation list and content
/// container.
#[wasm_bindgen(js_name = restructureWith)]
pub fn restructure_with(html: &str, nav_list: &str, content: &str) -> Result<String, JsValue> {
    let options = RestructureOptions::default()
        .with_nav_list(nav_list)
        .with_content_container(content);
    let page = restructure_html(html, &options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(page.html)
}

/// Outline of a document as JSON: blocks and navigation entries.
#[wasm_bindgen]
pub fn outline(html: &str) -> Result<String, JsValue> {
    restructure_html(html, &RestructureOptions::default())
        .and_then(|page| page.outline.to_json())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Fragment identifier for a piece of heading text.
#[wasm_bindgen]
pub fn slugify(text: &str) -> String {
    crate::slugify(text)
}
