//! Wire payloads for the color-suggestion service.
//!
//! The editor posts the current layer colors and eventually receives a
//! suggested replacement palette of the same length, which is applied back to
//! the layers by positional index. The exchange is fire-and-forget: the core
//! only defines the payload shapes and never blocks on the response.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Status value the service expects on every request.
pub const PALETTE_STATUS_RUN: &str = "run";

/// Request payload: one color entry per layer, in current layer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteRequest {
    pub status: String,
    pub data: Vec<Color>,
}

impl PaletteRequest {
    /// Builds a `"run"` request from the given layer colors.
    pub fn new(data: Vec<Color>) -> Self {
        Self {
            status: PALETTE_STATUS_RUN.to_string(),
            data,
        }
    }
}

/// Response payload. The service reports `status: "done"`, but the editor
/// consumes only `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub data: Vec<Color>,
}
