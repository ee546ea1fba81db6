use criterion::{black_box, criterion_group, criterion_main, Criterion};
use visage_avatar_core::blender::{evaluate, BlendScratch};
use visage_avatar_core::mesh::{ShapeDelta, ShapeGeometry};

/// A face-sized mesh: 5k vertices, 32 shapes, every delta populated.
fn mk_geometry() -> ShapeGeometry {
    let floats = 5_000 * 3;
    ShapeGeometry {
        name: "bench_face".to_string(),
        neutral_vertices: (0..floats).map(|i| i as f32 * 0.001).collect(),
        neutral_normals: vec![0.5; floats],
        deltas: (0..32)
            .map(|s| ShapeDelta {
                name: format!("shape{s}"),
                vertices: (0..floats).map(|i| ((i + s) % 7) as f32 * 0.01).collect(),
                normals: (0..floats).map(|i| ((i + s) % 5) as f32 * 0.01).collect(),
            })
            .collect(),
    }
}

fn bench_blend_eval(c: &mut Criterion) {
    let geometry = mk_geometry();
    let mut out = BlendScratch::for_geometry(&geometry);

    // Typical frame: a handful of active shapes, the rest at zero.
    let mut sparse = vec![0.0f32; 32];
    for slot in [1, 4, 9, 17] {
        sparse[slot] = 0.6;
    }
    c.bench_function("blend_eval_sparse", |b| {
        b.iter(|| evaluate(black_box(&geometry), black_box(&sparse), &mut out))
    });

    let dense: Vec<f32> = (0..32).map(|i| 0.02 * i as f32).collect();
    c.bench_function("blend_eval_dense", |b| {
        b.iter(|| evaluate(black_box(&geometry), black_box(&dense), &mut out))
    });
}

criterion_group!(benches, bench_blend_eval);
criterion_main!(benches);
