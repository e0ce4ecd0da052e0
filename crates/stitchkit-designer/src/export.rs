//! Binary .exp export encoding.
//!
//! Converts a pattern's continuous stitch geometry into the machine
//! instruction stream: two-byte stitch commands carrying signed per-axis
//! deltas, four-byte jump commands for travel between layers, and four-byte
//! color-change/stop markers. The whole program must fit a 500-byte buffer.
//!
//! Command layout:
//!
//! ```text
//! stitch        dx dy          (each a signed byte in [-127, 127])
//! jump          80 04 dx dy
//! color change  80 01 00 00
//! ```

use thiserror::Error;
use tracing::debug;

use stitchkit_core::constants::EXP_MAX_SIZE;

use crate::model::Pattern;

/// Export failure, surfaced as a result so the caller owns user messaging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The scale target is outside the machine's byte-delta range.
    #[error("stitch scale {stitch_max} outside the valid range 1..=127")]
    Validation {
        /// The rejected scale target.
        stitch_max: i32,
    },

    /// The pattern has nothing encodable.
    #[error("degenerate pattern: {reason}")]
    DegeneratePattern {
        /// Why the pattern cannot be encoded.
        reason: String,
    },

    /// The encoded program would overflow the fixed-size command buffer.
    #[error("encoded pattern exceeds the {limit}-byte buffer capacity")]
    CapacityExceeded {
        /// The buffer capacity in bytes.
        limit: usize,
    },
}

/// Clamps a scaled per-axis delta into the signed byte range the format
/// allows. Note -128 is excluded: the machine range is symmetric.
fn clamp_delta(value: i64) -> i8 {
    value.clamp(-127, 127) as i8
}

/// Fixed-capacity command buffer. Every write checks remaining space first;
/// a short write never happens.
struct ExpBuffer {
    bytes: Vec<u8>,
    limit: usize,
}

impl ExpBuffer {
    fn new(limit: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(limit),
            limit,
        }
    }

    fn reserve(&mut self, len: usize) -> Result<(), ExportError> {
        if self.bytes.len() + len > self.limit {
            return Err(ExportError::CapacityExceeded { limit: self.limit });
        }
        Ok(())
    }

    fn write_stitch(&mut self, dx: i8, dy: i8) -> Result<(), ExportError> {
        self.reserve(2)?;
        self.bytes.push(dx as u8);
        self.bytes.push(dy as u8);
        Ok(())
    }

    fn write_jump(&mut self, dx: i8, dy: i8) -> Result<(), ExportError> {
        self.reserve(4)?;
        self.bytes.extend_from_slice(&[0x80, 0x04, dx as u8, dy as u8]);
        Ok(())
    }

    fn write_color_change(&mut self) -> Result<(), ExportError> {
        self.reserve(4)?;
        self.bytes.extend_from_slice(&[0x80, 0x01, 0x00, 0x00]);
        Ok(())
    }

    /// Walks the cursor from `from` to `to` with as many jump commands as it
    /// takes, each axis advancing by at most 127 per jump. Terminates because
    /// every jump strictly shrinks the remaining distance on any non-zero
    /// axis.
    fn write_jumps(&mut self, from: (i64, i64), to: (i64, i64)) -> Result<(), ExportError> {
        let mut cursor = from;
        while cursor != to {
            let dx = clamp_delta(to.0 - cursor.0);
            let dy = clamp_delta(to.1 - cursor.1);
            cursor.0 += dx as i64;
            cursor.1 += dy as i64;
            self.write_jump(dx, dy)?;
        }
        Ok(())
    }
}

/// Leftmost and topmost stitch coordinates across the whole pattern, the
/// reference origin for normalization. `None` when the pattern has no
/// stitches.
fn pattern_origin(pattern: &Pattern) -> Option<(f64, f64)> {
    let mut origin: Option<(f64, f64)> = None;
    for layer in pattern.layers() {
        for stitch in layer.stitches() {
            origin = Some(match origin {
                None => (stitch.x, stitch.y),
                Some((left, top)) => (left.min(stitch.x), top.min(stitch.y)),
            });
        }
    }
    origin
}

/// Maximum absolute per-axis delta between consecutive stitches within the
/// same layer, over all layers. Travel between layers does not count.
fn max_axis_delta(pattern: &Pattern) -> f64 {
    let mut max_change = 0.0f64;
    for layer in pattern.layers() {
        for pair in layer.stitches().windows(2) {
            max_change = max_change
                .max((pair[1].x - pair[0].x).abs())
                .max((pair[1].y - pair[0].y).abs());
        }
    }
    max_change
}

/// Encodes the pattern as an .exp command stream.
///
/// `stitch_max` is the scale target in `1..=127`: a uniform coefficient is
/// chosen so the largest consecutive same-layer delta maps to at most
/// `stitch_max` units (patterns already within range are not scaled up).
/// Layers are emitted in order, skipping empty ones, with a color-change
/// marker between consecutively emitted layers of differing colors. Travel
/// to each layer's first stitch is decomposed into jump commands; deltas
/// between consecutive stitches within a layer are clamped to the byte range
/// instead, matching the machine format's asymmetry between the two paths.
pub fn encode_exp(pattern: &Pattern, stitch_max: i32) -> Result<Vec<u8>, ExportError> {
    if !(1..=127).contains(&stitch_max) {
        return Err(ExportError::Validation { stitch_max });
    }

    let (left, top) = pattern_origin(pattern).ok_or_else(|| ExportError::DegeneratePattern {
        reason: "pattern contains no stitches".to_string(),
    })?;
    let max_change = max_axis_delta(pattern);
    if max_change == 0.0 {
        return Err(ExportError::DegeneratePattern {
            reason: "all stitches coincide, nothing to encode".to_string(),
        });
    }

    let coeff = (f64::from(stitch_max) / max_change).min(1.0);
    let scale = |x: f64, y: f64| -> (i64, i64) {
        (
            ((x - left) * coeff).floor() as i64,
            ((y - top) * coeff).floor() as i64,
        )
    };

    let mut buffer = ExpBuffer::new(EXP_MAX_SIZE);
    let mut cursor = (0i64, 0i64);
    let mut last_color = None;

    for layer in pattern.layers() {
        if layer.is_empty() {
            continue;
        }
        if let Some(previous) = last_color {
            if layer.color != previous {
                buffer.write_color_change()?;
            }
        }

        for (k, stitch) in layer.stitches().iter().enumerate() {
            let target = scale(stitch.x, stitch.y);
            if k == 0 {
                // Travel to the layer start, then stitch in place to anchor.
                buffer.write_jumps(cursor, target)?;
                cursor = target;
                buffer.write_stitch(0, 0)?;
            } else {
                let dx = clamp_delta(target.0 - cursor.0);
                let dy = clamp_delta(target.1 - cursor.1);
                buffer.write_stitch(dx, dy)?;
                // The cursor tracks the scaled target even when the delta was
                // clamped, so later travel starts from the intended position.
                cursor = target;
            }
        }
        last_color = Some(layer.color);
    }

    debug!(bytes = buffer.bytes.len(), coeff, "encoded pattern to exp commands");
    Ok(buffer.bytes)
}
