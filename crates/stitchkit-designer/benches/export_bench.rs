use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stitchkit_designer::{encode_exp, Layer, Pattern, Stitch};

/// A dense two-layer zigzag that nearly fills the export buffer.
fn dense_pattern() -> Pattern {
    let mut pattern = Pattern::new();
    for layer_index in 0..2 {
        let mut layer = Layer::new();
        for i in 0..110 {
            let x = (i % 2) as f64 * 40.0 + layer_index as f64 * 200.0;
            layer.push_stitch(Stitch::new(x, i as f64 * 3.0));
        }
        pattern.push_layer(layer);
    }
    pattern
}

fn bench_encode_exp(c: &mut Criterion) {
    let pattern = dense_pattern();
    c.bench_function("encode_exp_dense", |b| {
        b.iter(|| encode_exp(black_box(&pattern), black_box(50)))
    });
}

criterion_group!(benches, bench_encode_exp);
criterion_main!(benches);
