use criterion::{Criterion, criterion_group, criterion_main};
use narwhal_core::geom::{Point, point};
use remora::LayoutForce;
use std::hint::black_box;

fn grid(n: usize, spacing: f64) -> Vec<Point> {
    let side = (n as f64).sqrt().ceil() as usize;
    (0..n)
        .map(|i| point((i % side) as f64 * spacing, (i / side) as f64 * spacing))
        .collect()
}

fn bench_explosion(c: &mut Criterion) {
    let layout = LayoutForce::default();

    let mut group = c.benchmark_group("explosion");
    group.sample_size(50);

    for n in [16usize, 64, 256] {
        // Spacing below the repulsion threshold keeps most pairs active.
        let positions = grid(n, 120.0);
        group.bench_function(format!("grid_{n}"), |b| {
            b.iter(|| {
                let forces = layout.explosion(black_box(&positions));
                black_box(remora::total_magnitude(&forces));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_explosion);
criterion_main!(benches);
