//! WASM bindings for fragmenter
//!
//! This module provides JavaScript-friendly bindings for building order fragments.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::commands;
use crate::domain::Address;

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Use wee_alloc as the global allocator for smaller WASM binary size
#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Result of a build (for JSON serialization)
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    /// Base64 order id
    pub order_id: String,
    /// Open-order request body for the ingress
    pub request: serde_json::Value,
    /// One message per darknode whose fragment could not be encrypted
    pub warnings: Vec<String>,
}

/// Build the open-order request for an order
///
/// # Arguments
/// * `order_json` - The order as JSON
/// * `registry_json` - Registry snapshot as JSON
/// * `address` - Trader address, `0x`-prefixed hex
///
/// # Returns
/// JSON string containing the order id, request body and warnings, or an error message
///
/// # Example (JavaScript)
/// ```javascript
/// const result = JSON.parse(wasm_build_fragments(orderJson, registryJson, "0x…"));
/// for (const w of result.warnings) console.warn(w);
/// await fetch(ingressUrl, { method: "POST", body: JSON.stringify(result.request) });
/// ```
#[wasm_bindgen]
pub fn wasm_build_fragments(
    order_json: &str,
    registry_json: &str,
    address: &str,
) -> Result<String, JsValue> {
    let address: Address = address
        .parse()
        .map_err(|e| JsValue::from_str(&format!("Invalid address: {e}")))?;

    let output = commands::build_fragments(order_json, registry_json, address)
        .map_err(|e| JsValue::from_str(&format!("Build failed: {e:#}")))?;

    let result = BuildResult {
        order_id: output.order_id.to_base64(),
        request: serde_json::to_value(&output.request)
            .map_err(|e| JsValue::from_str(&format!("Serialization failed: {e}")))?,
        warnings: output.failures.iter().map(ToString::to_string).collect(),
    };

    serde_json::to_string(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {e}")))
}

/// Compute the id of an order
///
/// # Returns
/// The base64 order id, or an error message
#[wasm_bindgen]
pub fn wasm_order_id(order_json: &str) -> Result<String, JsValue> {
    commands::order_id(order_json)
        .map(|id| id.to_base64())
        .map_err(|e| JsValue::from_str(&format!("Invalid order: {e:#}")))
}

/// Compute the pods for a registry snapshot
///
/// # Returns
/// An array of `{ id, darknodes }` objects, or an error message
#[wasm_bindgen]
pub fn wasm_pods(registry_json: &str) -> Result<JsValue, JsValue> {
    let pods = commands::list_pods(registry_json)
        .map_err(|e| JsValue::from_str(&format!("Pod assignment failed: {e:#}")))?;

    serde_wasm_bindgen::to_value(&pods)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {e}")))
}
