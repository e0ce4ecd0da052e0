//! Property tests for selection bookkeeping, history bounds, and the export
//! jump decomposition.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use stitchkit_designer::{encode_exp, Layer, Pattern, PatternHistory, Stitch};

#[derive(Debug, Clone)]
enum Op {
    PushLayer,
    PushStitch(usize, f64, f64),
    SelectLayer(usize),
    SelectStitch(usize, usize),
    SelectAllOfLayer(usize),
    SelectLastOfLayer(usize),
    DeselectAll,
    MoveSelected(f64, f64),
    RectSelect(f64, f64, f64, f64),
    DeleteSelected,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::PushLayer),
        (0..6usize, -500.0..500.0, -500.0..500.0)
            .prop_map(|(l, x, y)| Op::PushStitch(l, x, y)),
        (0..8usize).prop_map(Op::SelectLayer),
        (0..8usize, 0..12usize).prop_map(|(l, s)| Op::SelectStitch(l, s)),
        (0..8usize).prop_map(Op::SelectAllOfLayer),
        (0..8usize).prop_map(Op::SelectLastOfLayer),
        Just(Op::DeselectAll),
        (-50.0..50.0, -50.0..50.0).prop_map(|(dx, dy)| Op::MoveSelected(dx, dy)),
        (-500.0..500.0, -500.0..500.0, -500.0..500.0, -500.0..500.0)
            .prop_map(|(a, b, c, d): (f64, f64, f64, f64)| Op::RectSelect(a.min(c), b.min(d), a.max(c), b.max(d))),
        Just(Op::DeleteSelected),
    ]
}

fn apply(pattern: &mut Pattern, op: &Op) {
    match *op {
        Op::PushLayer => pattern.push_layer(Layer::new()),
        Op::PushStitch(layer_index, x, y) => {
            if let Some(layer) = pattern.layer_mut(layer_index) {
                layer.push_stitch(Stitch::new(x, y));
            }
        }
        Op::SelectLayer(i) => pattern.select_layer(i),
        Op::SelectStitch(l, s) => pattern.select_stitch(l, s),
        Op::SelectAllOfLayer(i) => pattern.select_all_stitches_of_layer(i),
        Op::SelectLastOfLayer(i) => pattern.select_last_stitch_of_layer(i),
        Op::DeselectAll => pattern.deselect_all(),
        Op::MoveSelected(dx, dy) => pattern.move_selected(dx, dy),
        Op::RectSelect(tlx, tly, brx, bry) => pattern.reselect_within_rect(tlx, tly, brx, bry),
        Op::DeleteSelected => {
            pattern.delete_selected();
        }
    }
}

fn check_selection_invariants(pattern: &Pattern) -> Result<(), TestCaseError> {
    for layer in pattern.layers() {
        let indices = layer.selected_stitch_indices();
        for pair in indices.windows(2) {
            prop_assert!(pair[0] < pair[1], "indices not strictly ascending");
        }
        if let Some(&last) = indices.last() {
            prop_assert!(last < layer.stitch_count(), "selected index out of range");
        }
        for &index in indices {
            prop_assert!(layer.is_stitch_selected(index));
        }
        if !indices.is_empty() {
            prop_assert!(layer.is_selected(), "stitch selected in unselected layer");
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn selection_bookkeeping_survives_arbitrary_edits(
        ops in proptest::collection::vec(op_strategy(), 1..60)
    ) {
        let mut pattern = Pattern::with_default_layer();
        for op in &ops {
            apply(&mut pattern, op);
            check_selection_invariants(&pattern)?;
        }
    }

    #[test]
    fn history_window_stays_bounded(
        ops in proptest::collection::vec(0u8..3, 1..40),
        cap in 1usize..8,
    ) {
        let mut history = PatternHistory::with_capacity(cap);
        for op in ops {
            match op {
                0 => {
                    history.checkpoint();
                }
                1 => {
                    history.undo();
                }
                _ => {
                    history.redo();
                }
            }
            prop_assert!(history.len() <= cap);
            prop_assert!(history.position() < history.len());
        }
    }

    #[test]
    fn jump_decomposition_lands_exactly_on_target(
        dx in -7_000i64..7_000,
        dy in -7_000i64..7_000,
    ) {
        // Two short layers far apart; unit in-layer deltas keep the scale
        // coefficient at one, so travel between them is pure jumps.
        let mut pattern = Pattern::new();
        let mut first = Layer::new();
        first.push_stitch(Stitch::new(0.0, 0.0));
        first.push_stitch(Stitch::new(1.0, 0.0));
        pattern.push_layer(first);
        let mut second = Layer::new();
        second.push_stitch(Stitch::new(dx as f64, dy as f64));
        second.push_stitch(Stitch::new(dx as f64 + 1.0, dy as f64));
        pattern.push_layer(second);

        let bytes = encode_exp(&pattern, 50).unwrap();

        // Replay the command stream: every per-axis component must stay in
        // the symmetric byte range and the cursor must land exactly on the
        // normalized position of the last stitch.
        let (mut x, mut y) = (0i64, 0i64);
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == 0x80 {
                prop_assert!(bytes[i + 1] == 0x04 || bytes[i + 1] == 0x01);
                if bytes[i + 1] == 0x04 {
                    let jx = bytes[i + 2] as i8;
                    let jy = bytes[i + 3] as i8;
                    prop_assert!(jx >= -127 && jy >= -127);
                    x += jx as i64;
                    y += jy as i64;
                }
                i += 4;
            } else {
                x += (bytes[i] as i8) as i64;
                y += (bytes[i + 1] as i8) as i64;
                i += 2;
            }
        }

        let left = 0i64.min(dx);
        let top = 0i64.min(dy);
        prop_assert_eq!((x, y), (dx + 1 - left, dy - top));
    }
}
