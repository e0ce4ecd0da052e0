//! Selection operations over layers and patterns.
//!
//! All index-taking operations are defensively permissive: out-of-range layer
//! or stitch indices are silent no-ops, never errors. Deletions remove stitch
//! indices in descending order so earlier removals cannot shift later ones.

use stitchkit_core::Color;

use crate::model::{Layer, Pattern};

/// Classification of a layer's selection state, used to decide deletion
/// granularity: fully-selected layers are removed whole, partially-selected
/// layers only lose their selected stitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSelection {
    /// The layer is not selected at all.
    Unselected,
    /// The layer is selected but none of its stitches are.
    Empty,
    /// Exactly one of several stitches is selected.
    SinglePartial,
    /// More than one stitch selected, but fewer than all.
    MultiPartial,
    /// The layer's one and only stitch is selected.
    SingleFull,
    /// All stitches selected (more than one).
    MultiFull,
}

impl Layer {
    /// Classifies this layer's selection state.
    pub fn characterize_selection(&self) -> LayerSelection {
        if !self.selected {
            return LayerSelection::Unselected;
        }
        match (self.selected_stitches.len(), self.stitches.len()) {
            (0, _) => LayerSelection::Empty,
            (1, 1) => LayerSelection::SingleFull,
            (1, _) => LayerSelection::SinglePartial,
            (sel, total) if sel == total => LayerSelection::MultiFull,
            _ => LayerSelection::MultiPartial,
        }
    }

    /// Deselects this layer and every stitch within it.
    pub fn deselect(&mut self) {
        self.selected = false;
        self.selected_stitches.clear();
    }

    /// Selects the stitch at `stitch_index`, marking the layer selected too.
    /// Idempotent; out-of-range indices are ignored.
    pub fn select_stitch(&mut self, stitch_index: usize) {
        if stitch_index >= self.stitches.len() {
            return;
        }
        self.selected = true;
        if let Err(pos) = self.selected_stitches.binary_search(&stitch_index) {
            self.selected_stitches.insert(pos, stitch_index);
        }
    }

    /// Selects every stitch in the layer, and the layer itself.
    pub fn select_all_stitches(&mut self) {
        self.selected_stitches.clear();
        self.selected_stitches.extend(0..self.stitches.len());
        self.selected = true;
    }

    /// Marks this layer selected and selects its last stitch, if any.
    pub fn select_last_stitch(&mut self) {
        self.selected = true;
        if let Some(last) = self.stitches.len().checked_sub(1) {
            self.select_stitch(last);
        }
    }

    /// Removes every selected stitch (highest index first) and demotes the
    /// layer to unselected. Returns how many stitches were removed.
    pub(crate) fn remove_selected_stitches(&mut self) -> usize {
        let removed = self.selected_stitches.len();
        while let Some(index) = self.selected_stitches.pop() {
            self.stitches.remove(index);
        }
        self.selected = false;
        removed
    }
}

impl Pattern {
    /// Deselects every layer and stitch in the pattern.
    pub fn deselect_all(&mut self) {
        for layer in &mut self.layers {
            layer.deselect();
        }
    }

    /// Selects a layer without selecting any stitches.
    pub fn select_layer(&mut self, layer_index: usize) {
        if let Some(layer) = self.layers.get_mut(layer_index) {
            layer.selected = true;
        }
    }

    /// Selects a layer and a contained stitch by index.
    pub fn select_stitch(&mut self, layer_index: usize, stitch_index: usize) {
        if let Some(layer) = self.layers.get_mut(layer_index) {
            layer.select_stitch(stitch_index);
        }
    }

    /// Selects a layer and every stitch in it.
    pub fn select_all_stitches_of_layer(&mut self, layer_index: usize) {
        if let Some(layer) = self.layers.get_mut(layer_index) {
            layer.select_all_stitches();
        }
    }

    /// Selects a layer and its last stitch, if any.
    pub fn select_last_stitch_of_layer(&mut self, layer_index: usize) {
        if let Some(layer) = self.layers.get_mut(layer_index) {
            layer.select_last_stitch();
        }
    }

    /// Deselects everything, then selects every stitch whose coordinates fall
    /// within the inclusive rectangle, in document coordinates.
    pub fn reselect_within_rect(
        &mut self,
        top_left_x: f64,
        top_left_y: f64,
        bottom_right_x: f64,
        bottom_right_y: f64,
    ) {
        self.deselect_all();
        for layer_index in 0..self.layers.len() {
            for stitch_index in 0..self.layers[layer_index].stitches.len() {
                let s = self.layers[layer_index].stitches[stitch_index];
                if s.x >= top_left_x
                    && s.x <= bottom_right_x
                    && s.y >= top_left_y
                    && s.y <= bottom_right_y
                {
                    self.select_stitch(layer_index, stitch_index);
                }
            }
        }
    }

    /// Offsets every selected stitch in every layer by `(dx, dy)`.
    pub fn move_selected(&mut self, dx: f64, dy: f64) {
        for layer in &mut self.layers {
            for &index in layer.selected_stitches.iter() {
                let stitch = &mut layer.stitches[index];
                stitch.x += dx;
                stitch.y += dy;
            }
        }
    }

    /// Deletes (and deselects) all selected stitches and layers.
    ///
    /// Fully-selected layers (`Empty`, `SingleFull`, `MultiFull`) are removed
    /// whole; partially-selected layers lose only their selected stitches and
    /// are demoted to unselected. Returns the index of a layer suited for a
    /// fresh terminal selection: the lowest index among partially-deleted
    /// layers, else the new last layer, else `None`.
    pub fn delete_selected(&mut self) -> Option<usize> {
        let mut terminal: Option<usize> = None;
        for i in (0..self.layers.len()).rev() {
            match self.layers[i].characterize_selection() {
                LayerSelection::Unselected => {}
                LayerSelection::Empty
                | LayerSelection::SingleFull
                | LayerSelection::MultiFull => {
                    self.layers.remove(i);
                    // A removal below a recorded terminal index shifts it down.
                    if let Some(t) = terminal.as_mut() {
                        *t -= 1;
                    }
                }
                LayerSelection::SinglePartial | LayerSelection::MultiPartial => {
                    self.layers[i].remove_selected_stitches();
                    // Descending scan: the last write is the lowest partial index.
                    terminal = Some(i);
                }
            }
        }
        terminal.or_else(|| self.layers.len().checked_sub(1))
    }

    /// Total selected stitches across all layers.
    pub fn selected_stitch_count(&self) -> usize {
        self.layers.iter().map(|l| l.selected_stitches.len()).sum()
    }

    /// Number of selected layers.
    pub fn selected_layer_count(&self) -> usize {
        self.layers.iter().filter(|l| l.selected).count()
    }

    /// Index of the highest selected layer, if any.
    pub fn last_selected_layer_index(&self) -> Option<usize> {
        self.layers.iter().rposition(|l| l.selected)
    }

    /// Details of the single selected stitch, when exactly one stitch is
    /// selected pattern-wide. Used by the stitch-info readout.
    pub fn selected_stitch_info(&self) -> Option<SelectedStitch> {
        if self.selected_stitch_count() != 1 {
            return None;
        }
        let (layer_index, layer) = self
            .layers
            .iter()
            .enumerate()
            .find(|(_, l)| l.selected_stitches.len() == 1)?;
        let stitch_index = layer.selected_stitches[0];
        let stitch = layer.stitches[stitch_index];
        Some(SelectedStitch {
            layer: layer_index,
            stitch: stitch_index,
            x: stitch.x,
            y: stitch.y,
            color: layer.color,
        })
    }
}

/// Details of a lone selected stitch, for display in an info readout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedStitch {
    pub layer: usize,
    pub stitch: usize,
    pub x: f64,
    pub y: f64,
    pub color: Color,
}
