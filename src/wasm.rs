//! WebAssembly bindings for LED Matrix Studio.
//!
//! Provides thin wrappers around the encoder and the bundle format for the
//! browser editor, which downloads the returned bytes itself.

use wasm_bindgen::prelude::*;

use crate::{
    compute::{self, encode_frame, export_loop},
    schema::{ExportConfig, Grid, Project},
    sink::{CompressionType, bundle_bytes},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// Export a project document as a single `.lmsb` bundle.
///
/// # Arguments
/// * `project_json` - JSON string containing a project document
#[wasm_bindgen(js_name = exportBundle)]
pub fn export_bundle(project_json: &str) -> Result<js_sys::Uint8Array, JsValue> {
    let project = Project::from_json(project_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid project: {e}")))?;
    project
        .export_config
        .validate()
        .map_err(|e| JsValue::from_str(&format!("Invalid export configuration: {e}")))?;

    let images = export_loop(&project.frames, &project.export_config)
        .map_err(|e| JsValue::from_str(&format!("Export failed: {e}")))?;
    let stem = compute::file_stem(&project.name);

    let bytes = bundle_bytes(&images.into_named_buffers(&stem), CompressionType::None)
        .map_err(|e| JsValue::from_str(&format!("Bundle error: {e}")))?;

    log::info!("Bundled '{}' ({} bytes)", project.name, bytes.len());
    Ok(js_sys::Uint8Array::from(bytes.as_slice()))
}

/// Encode one grid into 32 bytes: the TL, TR, BL and BR blocks in order.
#[wasm_bindgen(js_name = encodeFrame)]
pub fn encode_frame_bytes(grid_json: &str, config_json: &str) -> Result<js_sys::Uint8Array, JsValue> {
    let grid: Grid = serde_json::from_str(grid_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid grid JSON: {e}")))?;
    let config: ExportConfig = serde_json::from_str(config_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?;

    let bytes = encode_frame(&grid, &config).concat();
    Ok(js_sys::Uint8Array::from(bytes.as_slice()))
}

/// File stem the exported images are named with.
#[wasm_bindgen(js_name = fileStem)]
pub fn file_stem(name: &str) -> String {
    compute::file_stem(name)
}
