//! Editing session state tying the model, history, and hit-testing together.
//!
//! [`EditorSession`] is the single editing context a front end drives: every
//! user gesture maps to one method here. Destructive operations (adding,
//! moving, deleting, recoloring) checkpoint the history before mutating the
//! fresh clone; pure selection changes and hover probes never checkpoint.

use tracing::warn;

use stitchkit_core::constants::DEFAULT_STITCH_MAX;
use stitchkit_core::palette::{PaletteRequest, PaletteResponse};
use stitchkit_core::Color;

use crate::export::{encode_exp, ExportError};
use crate::history::PatternHistory;
use crate::hit_test::{Hit, HitTester};
use crate::model::{Layer, Pattern, Stitch};

/// Rubber-band selection rectangle, normalized around its origin as the
/// cursor moves: the origin stays a fixed corner and the tracked corners
/// re-sort per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    origin: (f64, f64),
    top_left: (f64, f64),
    bottom_right: (f64, f64),
}

impl SelectionRect {
    fn new(x: f64, y: f64) -> Self {
        Self {
            origin: (x, y),
            top_left: (x, y),
            bottom_right: (x, y),
        }
    }

    fn resize(&mut self, x: f64, y: f64) {
        if x > self.origin.0 {
            self.top_left.0 = self.origin.0;
            self.bottom_right.0 = x;
        } else {
            self.top_left.0 = x;
            self.bottom_right.0 = self.origin.0;
        }
        if y > self.origin.1 {
            self.top_left.1 = self.origin.1;
            self.bottom_right.1 = y;
        } else {
            self.top_left.1 = y;
            self.bottom_right.1 = self.origin.1;
        }
    }

    /// `(top_left_x, top_left_y, bottom_right_x, bottom_right_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.top_left.0,
            self.top_left.1,
            self.bottom_right.0,
            self.bottom_right.1,
        )
    }
}

/// Outcome of a select-mode pointer press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Press {
    /// A stitch or line was grabbed and can now be dragged.
    Grabbed(Hit),
    /// Empty space: a rubber-band selection rectangle was opened.
    RubberBand,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    last: (f64, f64),
    moved: bool,
}

/// One editing session over a pattern: bounded history, hit-test settings,
/// draw/select mode, and in-flight drag or rubber-band state.
#[derive(Debug, Clone)]
pub struct EditorSession {
    history: PatternHistory,
    hit_tester: HitTester,
    draw_mode: bool,
    drag: Option<DragState>,
    selection_rect: Option<SelectionRect>,
}

impl EditorSession {
    /// Creates a session with default settings, starting in draw mode on a
    /// pattern with one empty layer holding the terminal selection.
    pub fn new() -> Self {
        let mut session = Self::with_settings(HitTester::default(), PatternHistory::new());
        session.history.active_mut().select_last_stitch_of_layer(0);
        session
    }

    /// Creates a session with custom hit-test settings and history.
    pub fn with_settings(hit_tester: HitTester, history: PatternHistory) -> Self {
        Self {
            history,
            hit_tester,
            draw_mode: true,
            drag: None,
            selection_rect: None,
        }
    }

    /// The active pattern.
    pub fn pattern(&self) -> &Pattern {
        self.history.active()
    }

    /// The active pattern, for direct edits between checkpoints.
    pub fn pattern_mut(&mut self) -> &mut Pattern {
        self.history.active_mut()
    }

    pub fn history(&self) -> &PatternHistory {
        &self.history
    }

    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> &Pattern {
        self.history.undo()
    }

    pub fn redo(&mut self) -> &Pattern {
        self.history.redo()
    }

    pub fn draw_mode(&self) -> bool {
        self.draw_mode
    }

    /// Switches between draw and select modes. Entering draw mode collapses
    /// any selection to the last selected layer's terminal stitch, falling
    /// back to the last layer when nothing is selected.
    pub fn set_draw_mode(&mut self, enabled: bool) {
        self.draw_mode = enabled;
        if !enabled {
            return;
        }
        let pattern = self.history.active_mut();
        if let Some(index) = pattern.last_selected_layer_index() {
            pattern.deselect_all();
            pattern.select_last_stitch_of_layer(index);
        } else if pattern.layer_count() > 0 {
            pattern.select_last_stitch_of_layer(pattern.layer_count() - 1);
        }
    }

    /// Read-only probe for hover feedback; never changes selection.
    pub fn locate(&self, x: f64, y: f64) -> Option<Hit> {
        self.hit_tester.locate(self.history.active(), x, y)
    }

    /// Appends a fresh layer and gives it the terminal selection.
    pub fn add_layer(&mut self) {
        let pattern = self.history.checkpoint();
        pattern.push_layer(Layer::new());
        pattern.deselect_all();
        pattern.select_last_stitch_of_layer(pattern.layer_count() - 1);
    }

    /// Draw-mode click: appends a stitch to the last selected layer and moves
    /// the terminal selection onto it. When the pattern has layers but none
    /// is selected the click is ignored; when it has no layers at all, a
    /// layer is created to hold the stitch. Returns whether a stitch was
    /// placed.
    pub fn add_stitch(&mut self, x: f64, y: f64) -> bool {
        let needs_layer = self.history.active().layer_count() == 0;
        let layer_index = if needs_layer {
            0
        } else {
            match self.history.active().last_selected_layer_index() {
                Some(index) => index,
                None => {
                    warn!("draw-mode click ignored: no layer selected");
                    return false;
                }
            }
        };

        let pattern = self.history.checkpoint();
        if needs_layer {
            pattern.push_layer(Layer::new());
        }
        if let Some(layer) = pattern.layer_mut(layer_index) {
            layer.push_stitch(Stitch::new(x, y));
        }
        pattern.deselect_all();
        pattern.select_last_stitch_of_layer(layer_index);
        true
    }

    /// Select-mode click: resolves the coordinate and, when it lands on a
    /// stitch or line that is not already selected, makes that stitch the
    /// sole selection. Returns the hit, if any.
    pub fn select_at(&mut self, x: f64, y: f64) -> Option<Hit> {
        let hit = self.locate(x, y)?;
        let pattern = self.history.active_mut();
        let already = pattern
            .layer(hit.layer)
            .is_some_and(|l| l.is_stitch_selected(hit.stitch));
        if !already {
            pattern.deselect_all();
            pattern.select_stitch(hit.layer, hit.stitch);
        }
        Some(hit)
    }

    /// Select-mode pointer press: grabs the hit stitch (reselecting it first
    /// if needed) or opens a rubber-band rectangle on empty space. No-op in
    /// draw mode.
    pub fn press_at(&mut self, x: f64, y: f64) -> Option<Press> {
        if self.draw_mode {
            return None;
        }
        match self.locate(x, y) {
            Some(hit) => {
                let pattern = self.history.active_mut();
                let already = pattern
                    .layer(hit.layer)
                    .is_some_and(|l| l.is_stitch_selected(hit.stitch));
                if !already {
                    pattern.deselect_all();
                    pattern.select_stitch(hit.layer, hit.stitch);
                }
                self.drag = Some(DragState {
                    last: (x, y),
                    moved: false,
                });
                Some(Press::Grabbed(hit))
            }
            None => {
                self.selection_rect = Some(SelectionRect::new(x, y));
                Some(Press::RubberBand)
            }
        }
    }

    /// Pointer move while pressed: drags the held selection or resizes the
    /// rubber-band rectangle. The first movement of a drag checkpoints, so
    /// one whole drag gesture is one undo step.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        if let Some(drag) = self.drag.as_mut() {
            let dx = x - drag.last.0;
            let dy = y - drag.last.1;
            if dx == 0.0 && dy == 0.0 {
                return;
            }
            drag.last = (x, y);
            let first_move = !std::mem::replace(&mut drag.moved, true);
            let pattern = if first_move {
                self.history.checkpoint()
            } else {
                self.history.active_mut()
            };
            pattern.move_selected(dx, dy);
        } else if let Some(rect) = self.selection_rect.as_mut() {
            rect.resize(x, y);
        }
    }

    /// Pointer release: ends a drag, or closes the rubber-band rectangle and
    /// reselects every stitch within its final inclusive bounds.
    pub fn release(&mut self) {
        if self.drag.take().is_some() {
            return;
        }
        if let Some(rect) = self.selection_rect.take() {
            let (tlx, tly, brx, bry) = rect.bounds();
            self.history.active_mut().reselect_within_rect(tlx, tly, brx, bry);
        }
    }

    /// Whether a drag is in progress.
    pub fn is_holding(&self) -> bool {
        self.drag.is_some()
    }

    /// The open rubber-band rectangle, for rendering.
    pub fn selection_rect(&self) -> Option<&SelectionRect> {
        self.selection_rect.as_ref()
    }

    /// Deletes the current selection. No-op when nothing is selected. In
    /// draw mode the terminal selection moves to the layer the deletion
    /// reports as next. Returns the `(stitches, layers)` counts that were
    /// selected, or `None` when there was nothing to delete.
    pub fn delete_selected(&mut self) -> Option<(usize, usize)> {
        let active = self.history.active();
        let counts = (active.selected_stitch_count(), active.selected_layer_count());
        if counts == (0, 0) {
            return None;
        }

        let draw_mode = self.draw_mode;
        let pattern = self.history.checkpoint();
        let terminal = pattern.delete_selected();
        if draw_mode {
            if let Some(index) = terminal {
                pattern.select_last_stitch_of_layer(index);
            }
        }
        Some(counts)
    }

    /// Layer-list click: in draw mode the layer receives the terminal
    /// selection; in select mode all of its stitches are selected.
    pub fn select_layer_row(&mut self, layer_index: usize) {
        let draw_mode = self.draw_mode;
        let pattern = self.history.active_mut();
        if layer_index >= pattern.layer_count() {
            return;
        }
        pattern.deselect_all();
        if draw_mode {
            pattern.select_last_stitch_of_layer(layer_index);
        } else {
            pattern.select_all_stitches_of_layer(layer_index);
        }
    }

    /// Recolors one layer. Out-of-range indices are ignored without touching
    /// history.
    pub fn set_layer_color(&mut self, layer_index: usize, color: Color) {
        if layer_index >= self.history.active().layer_count() {
            return;
        }
        let pattern = self.history.checkpoint();
        if let Some(layer) = pattern.layer_mut(layer_index) {
            layer.color = color;
        }
    }

    /// Builds the color-suggestion request for the current layer stack.
    pub fn build_palette_request(&self) -> PaletteRequest {
        PaletteRequest::new(self.pattern().layer_colors())
    }

    /// Applies a suggested palette positionally, as one undoable step. A
    /// length mismatch applies the common prefix and is logged, never an
    /// error: the response arrives asynchronously and the layer stack may
    /// have changed in the meantime.
    pub fn apply_layer_colors(&mut self, colors: &[Color]) {
        let layer_count = self.history.active().layer_count();
        if colors.len() != layer_count {
            warn!(
                layers = layer_count,
                colors = colors.len(),
                "palette length mismatch, applying common prefix"
            );
        }
        self.history.checkpoint().apply_layer_colors(colors);
    }

    /// Applies a color-suggestion response payload.
    pub fn apply_palette_response(&mut self, response: &PaletteResponse) {
        self.apply_layer_colors(&response.data);
    }

    /// Encodes the active pattern as .exp bytes with the given scale target.
    pub fn export_exp(&self, stitch_max: i32) -> Result<Vec<u8>, ExportError> {
        encode_exp(self.pattern(), stitch_max)
    }

    /// Encodes with the default scale target.
    pub fn export_exp_default(&self) -> Result<Vec<u8>, ExportError> {
        self.export_exp(DEFAULT_STITCH_MAX)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_stitches(points: &[(f64, f64)]) -> EditorSession {
        let mut session = EditorSession::new();
        for &(x, y) in points {
            assert!(session.add_stitch(x, y));
        }
        session
    }

    #[test]
    fn test_add_stitch_selects_the_new_terminal_stitch() {
        let session = session_with_stitches(&[(10.0, 10.0), (20.0, 20.0)]);
        let layer = &session.pattern().layers()[0];
        assert_eq!(layer.stitch_count(), 2);
        assert_eq!(layer.selected_stitch_indices(), &[1]);
    }

    #[test]
    fn test_add_stitch_checkpoints_before_mutating() {
        let mut session = session_with_stitches(&[(10.0, 10.0)]);
        assert!(session.can_undo());
        session.undo();
        assert_eq!(session.pattern().stitch_count(), 0);
        session.redo();
        assert_eq!(session.pattern().stitch_count(), 1);
    }

    #[test]
    fn test_add_stitch_without_layer_selection_is_ignored() {
        let mut session = EditorSession::new();
        session.pattern_mut().deselect_all();

        assert!(!session.add_stitch(5.0, 5.0));
        assert_eq!(session.pattern().stitch_count(), 0);
        assert!(!session.can_undo());

        session.select_layer_row(0);
        assert!(session.add_stitch(5.0, 5.0));
        assert_eq!(session.pattern().stitch_count(), 1);
    }

    #[test]
    fn test_add_stitch_recreates_a_layer_after_total_deletion() {
        let mut session = session_with_stitches(&[(0.0, 0.0)]);
        session.pattern_mut().select_all_stitches_of_layer(0);
        session.delete_selected();
        assert_eq!(session.pattern().layer_count(), 0);

        assert!(session.add_stitch(7.0, 7.0));
        assert_eq!(session.pattern().layer_count(), 1);
        assert_eq!(session.pattern().stitch_count(), 1);
    }

    #[test]
    fn test_add_layer_moves_the_terminal_selection() {
        let mut session = session_with_stitches(&[(0.0, 0.0)]);
        session.add_layer();
        let pattern = session.pattern();
        assert_eq!(pattern.layer_count(), 2);
        assert!(!pattern.layers()[0].is_selected());
        assert!(pattern.layers()[1].is_selected());
        assert_eq!(pattern.last_selected_layer_index(), Some(1));
    }

    #[test]
    fn test_delete_selected_in_draw_mode_reselects_terminal_stitch() {
        // Three stitches, middle one selected: after deletion the terminal
        // selection lands on the survivor that is now index 1.
        let mut session = session_with_stitches(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let pattern = session.pattern_mut();
        pattern.deselect_all();
        pattern.select_stitch(0, 1);

        let deleted = session.delete_selected();
        assert_eq!(deleted, Some((1, 1)));
        let layer = &session.pattern().layers()[0];
        assert_eq!(layer.stitch_count(), 2);
        assert_eq!(layer.selected_stitch_indices(), &[1]);
    }

    #[test]
    fn test_delete_selected_with_no_selection_does_not_checkpoint() {
        let mut session = EditorSession::new();
        assert_eq!(session.delete_selected(), None);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_mode_switch_collapses_selection_to_terminal_stitch() {
        let mut session = session_with_stitches(&[(0.0, 0.0), (10.0, 0.0)]);
        session.set_draw_mode(false);
        session.select_layer_row(0);
        assert_eq!(session.pattern().layers()[0].selected_stitch_indices(), &[0, 1]);

        session.set_draw_mode(true);
        assert_eq!(session.pattern().layers()[0].selected_stitch_indices(), &[1]);
    }

    #[test]
    fn test_select_at_reselects_only_unselected_targets() {
        let mut session = session_with_stitches(&[(0.0, 0.0), (100.0, 0.0)]);
        session.set_draw_mode(false);

        let hit = session.select_at(0.0, 0.0).unwrap();
        assert_eq!(hit.stitch, 0);
        assert_eq!(session.pattern().layers()[0].selected_stitch_indices(), &[0]);

        // Clicking the already-selected stitch leaves the selection alone.
        session.pattern_mut().select_stitch(0, 1);
        let again = session.select_at(0.0, 0.0).unwrap();
        assert_eq!(again.stitch, 0);
        assert_eq!(
            session.pattern().layers()[0].selected_stitch_indices(),
            &[0, 1]
        );
    }

    #[test]
    fn test_drag_gesture_is_one_undo_step() {
        let mut session = session_with_stitches(&[(0.0, 0.0), (50.0, 0.0)]);
        session.set_draw_mode(false);

        let press = session.press_at(50.0, 0.0);
        assert!(matches!(press, Some(Press::Grabbed(_))));
        assert!(session.is_holding());

        let before_undo_depth = session.history().len();
        session.drag_to(60.0, 5.0);
        session.drag_to(70.0, 10.0);
        session.release();
        assert!(!session.is_holding());

        let moved = session.pattern().layers()[0].stitches()[1];
        assert_eq!((moved.x, moved.y), (70.0, 10.0));
        // Both drag_to calls share one checkpoint.
        assert_eq!(session.history().len(), before_undo_depth + 1);

        session.undo();
        let back = session.pattern().layers()[0].stitches()[1];
        assert_eq!((back.x, back.y), (50.0, 0.0));
    }

    #[test]
    fn test_press_on_empty_space_rubber_band_selects() {
        let mut session = session_with_stitches(&[(10.0, 10.0), (30.0, 30.0), (90.0, 90.0)]);
        session.set_draw_mode(false);
        session.pattern_mut().deselect_all();

        assert_eq!(session.press_at(60.0, 5.0), Some(Press::RubberBand));
        // Drag left and down past two stitches: the rectangle normalizes.
        session.drag_to(5.0, 35.0);
        let (tlx, tly, brx, bry) = session.selection_rect().unwrap().bounds();
        assert_eq!((tlx, tly, brx, bry), (5.0, 5.0, 60.0, 35.0));

        session.release();
        assert!(session.selection_rect().is_none());
        assert_eq!(
            session.pattern().layers()[0].selected_stitch_indices(),
            &[0, 1]
        );
    }

    #[test]
    fn test_press_is_ignored_in_draw_mode() {
        let mut session = session_with_stitches(&[(0.0, 0.0)]);
        assert_eq!(session.press_at(0.0, 0.0), None);
        assert!(!session.is_holding());
    }

    #[test]
    fn test_set_layer_color_checkpoints_and_applies() {
        let mut session = session_with_stitches(&[(0.0, 0.0)]);
        let depth = session.history().len();
        session.set_layer_color(0, Color::new(200, 100, 50));
        assert_eq!(session.pattern().layers()[0].color, Color::new(200, 100, 50));
        assert_eq!(session.history().len(), depth + 1);

        // Out of range: neither history nor layers change.
        session.set_layer_color(9, Color::new(1, 1, 1));
        assert_eq!(session.history().len(), depth + 1);
    }

    #[test]
    fn test_palette_round_trip_applies_positionally() {
        let mut session = session_with_stitches(&[(0.0, 0.0)]);
        session.add_layer();
        session.set_layer_color(1, Color::new(9, 9, 9));

        let request = session.build_palette_request();
        assert_eq!(request.status, "run");
        assert_eq!(request.data, vec![Color::default(), Color::new(9, 9, 9)]);

        let response = PaletteResponse {
            status: Some("done".to_string()),
            data: vec![Color::new(1, 2, 3), Color::new(4, 5, 6)],
        };
        session.apply_palette_response(&response);
        assert_eq!(session.pattern().layers()[0].color, Color::new(1, 2, 3));
        assert_eq!(session.pattern().layers()[1].color, Color::new(4, 5, 6));

        session.undo();
        assert_eq!(session.pattern().layers()[1].color, Color::new(9, 9, 9));
    }

    #[test]
    fn test_palette_length_mismatch_applies_common_prefix() {
        let mut session = session_with_stitches(&[(0.0, 0.0)]);
        session.apply_layer_colors(&[Color::new(7, 7, 7), Color::new(8, 8, 8)]);
        assert_eq!(session.pattern().layers()[0].color, Color::new(7, 7, 7));
        assert_eq!(session.pattern().layer_count(), 1);
    }

    #[test]
    fn test_export_uses_the_active_pattern() {
        let session = session_with_stitches(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let bytes = session.export_exp_default().unwrap();
        assert_eq!(bytes, vec![0, 0, 10, 0, 0, 10]);
    }
}
