//! Pattern data model: stitches, colored layers, and the pattern aggregate.
//!
//! Selection bookkeeping lives in a single sorted index set per layer; a
//! stitch is selected iff its index is a member. The set is never handed out
//! mutably, so it stays sorted, duplicate-free, and in range through every
//! mutation path. Cloning a [`Pattern`] is a structural deep copy: layers and
//! stitches are plain values, so history snapshots never alias each other.

use smallvec::SmallVec;
use stitchkit_core::Color;

/// A single point in a layer's stitch path, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stitch {
    pub x: f64,
    pub y: f64,
}

impl Stitch {
    /// Creates a stitch at the given document coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Per-layer selected stitch indices, kept strictly ascending.
pub(crate) type SelectedIndices = SmallVec<[usize; 8]>;

/// An ordered, single-colored path of stitches plus its own selection state.
///
/// A layer may be selected without any of its stitches being selected (an
/// explicitly selected, stitch-less focus); any selected stitch implies the
/// layer itself is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub(crate) stitches: Vec<Stitch>,
    pub color: Color,
    pub(crate) selected: bool,
    pub(crate) selected_stitches: SelectedIndices,
}

impl Layer {
    /// Creates an empty, unselected layer with the default (black) color.
    pub fn new() -> Self {
        Self::with_color(Color::default())
    }

    /// Creates an empty, unselected layer with the given color.
    pub fn with_color(color: Color) -> Self {
        Self {
            stitches: Vec::new(),
            color,
            selected: false,
            selected_stitches: SelectedIndices::new(),
        }
    }

    /// The layer's stitch path, in insertion order.
    pub fn stitches(&self) -> &[Stitch] {
        &self.stitches
    }

    pub fn stitch_count(&self) -> usize {
        self.stitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stitches.is_empty()
    }

    /// Appends a stitch to the end of the path. Appending never disturbs the
    /// selected index set.
    pub fn push_stitch(&mut self, stitch: Stitch) {
        self.stitches.push(stitch);
    }

    /// Whether the layer itself is selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether the stitch at `stitch_index` is selected.
    pub fn is_stitch_selected(&self, stitch_index: usize) -> bool {
        self.selected_stitches.binary_search(&stitch_index).is_ok()
    }

    /// Selected stitch indices, strictly ascending.
    pub fn selected_stitch_indices(&self) -> &[usize] {
        &self.selected_stitches
    }

    pub fn selected_stitch_count(&self) -> usize {
        self.selected_stitches.len()
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

/// The full ordered collection of layers being edited.
///
/// The pattern exclusively owns its layers; a layer is never shared outside
/// its owning pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern {
    pub(crate) layers: Vec<Layer>,
}

impl Pattern {
    /// Creates a pattern with no layers.
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Creates a pattern holding one default layer, the state a fresh editing
    /// session starts from.
    pub fn with_default_layer() -> Self {
        Self {
            layers: vec![Layer::new()],
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, layer_index: usize) -> Option<&Layer> {
        self.layers.get(layer_index)
    }

    pub fn layer_mut(&mut self, layer_index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(layer_index)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Appends a layer to the end of the stack.
    pub fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Total number of stitches across all layers.
    pub fn stitch_count(&self) -> usize {
        self.layers.iter().map(|l| l.stitch_count()).sum()
    }

    /// Assigns colors to layers by positional index. Extra entries on either
    /// side are ignored; the caller decides whether a length mismatch is
    /// worth reporting.
    pub fn apply_layer_colors(&mut self, colors: &[Color]) {
        for (layer, &color) in self.layers.iter_mut().zip(colors) {
            layer.color = color;
        }
    }

    /// Current layer colors in layer order.
    pub fn layer_colors(&self) -> Vec<Color> {
        self.layers.iter().map(|l| l.color).collect()
    }
}
