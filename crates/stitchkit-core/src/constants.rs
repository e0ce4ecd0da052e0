//! Editor configuration constants.
//!
//! These are the fixed defaults; hit-test radii and history depth can be
//! overridden per session.

/// Hit radius around a stitch point, in document units.
pub const POINT_RADIUS: f64 = 8.0;

/// Slack added to the taut-string proximity test when probing stitch lines.
pub const LINE_DETECT_TOLERANCE: f64 = 3.0;

/// Number of pattern snapshots retained for undo/redo.
pub const MAX_HISTORY_STATES: usize = 5;

/// Capacity of an encoded .exp command buffer, in bytes.
pub const EXP_MAX_SIZE: usize = 500;

/// Default scale target for .exp export.
pub const DEFAULT_STITCH_MAX: i32 = 50;
