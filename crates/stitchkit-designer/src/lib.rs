//! # StitchKit Designer
//!
//! Interactive editing core for embroidery stitch patterns: place, select,
//! move, and delete stitch points organized into colored layers, then export
//! the pattern as a binary .exp machine instruction stream.
//!
//! ## Core Components
//!
//! - **Model**: stitches, single-colored layers with invariant-protected
//!   selection bookkeeping, and the pattern aggregate
//! - **Selection**: the selection operations and the per-layer selection
//!   characterization that decides deletion granularity
//! - **Hit testing**: pure coordinate probes with point-over-line priority
//! - **History**: bounded whole-pattern snapshot stack for undo/redo
//! - **Session**: the explicit editing context a front end drives
//! - **Export**: the .exp encoder (byte-range deltas, jump decomposition,
//!   color-change markers, 500-byte capacity)
//!
//! ## Architecture
//!
//! ```text
//! EditorSession (one editing context per session)
//!   ├── PatternHistory (bounded snapshots, undo/redo)
//!   │     └── Pattern ── Layer ── Stitch
//!   ├── HitTester (pointer coordinate → stitch/line)
//!   └── encode_exp (pattern → .exp bytes)
//! ```
//!
//! Rendering, widget refresh, event wiring, and the color-suggestion network
//! call are external collaborators; the session exposes everything they need
//! (hover probes, the rubber-band rectangle, palette payloads) without
//! depending on them.

pub mod export;
pub mod history;
pub mod model;
pub mod selection;
pub mod session;

pub use export::{encode_exp, ExportError};
pub use history::PatternHistory;
pub use hit_test::{Hit, HitKind, HitTester};
pub use model::{Layer, Pattern, Stitch};
pub use selection::{LayerSelection, SelectedStitch};
pub use session::{EditorSession, Press, SelectionRect};
