//! # StitchKit Core
//!
//! Shared foundation for StitchKit: configuration constants, the RGB color
//! type carried by pattern layers, error types, and the wire payloads
//! exchanged with the color-suggestion service.

pub mod color;
pub mod constants;
pub mod error;
pub mod palette;

pub use color::Color;
pub use constants::{
    DEFAULT_STITCH_MAX, EXP_MAX_SIZE, LINE_DETECT_TOLERANCE, MAX_HISTORY_STATES, POINT_RADIUS,
};
pub use error::ColorParseError;
pub use palette::{PaletteRequest, PaletteResponse};
