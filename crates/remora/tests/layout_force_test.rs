use narwhal_core::geom::{Bounds, point, vector};
use narwhal_core::{GraphModel, ModelOptions, Properties};
use remora::{LayoutForce, RecenterOptions, RepulsionOptions};

fn model_with_positions(positions: &[(f64, f64)]) -> GraphModel {
    let mut g = GraphModel::new(ModelOptions::default());
    for (i, &(x, y)) in positions.iter().enumerate() {
        let h = g
            .add_vertex(Properties::new().with("id", i as i64))
            .expect("add vertex");
        g.vertex_mut(h).expect("vertex").set_position(point(x, y));
    }
    g.restore_outlines();
    g
}

#[test]
fn explosion_for_model_follows_vertex_order() {
    let g = model_with_positions(&[(0.0, 0.0), (100.0, 0.0), (1000.0, 1000.0)]);
    let lf = LayoutForce::default();
    let forces = lf.explosion_for(&g);
    assert_eq!(forces.len(), 3);

    let handles: Vec<_> = g.vertices().map(|(h, _)| h).collect();
    for ((h, _), expected) in forces.iter().zip(&handles) {
        assert_eq!(h, expected);
    }
    assert!(forces[0].1.x < 0.0, "left vertex is pushed left");
    assert!(forces[1].1.x > 0.0, "right vertex is pushed right");
    assert_eq!(forces[2].1, vector(0.0, 0.0));
}

#[test]
fn recenter_pulls_cluster_toward_viewport_center() {
    let mut g = model_with_positions(&[(1000.0, 800.0), (1200.0, 800.0)]);
    let lf = LayoutForce::default();
    let viewport = g.options().viewport();

    let before: Vec<_> = g.positions();
    let offset = lf.recenter(&mut g, &viewport).expect("non-empty");
    // Outline box spans x 950..1250, y 790..810 -> center (1100, 800); viewport center (400, 300).
    assert!((offset.x - 0.7).abs() < 1e-12);
    assert!((offset.y - 0.5).abs() < 1e-12);

    for (b, (_, v)) in before.iter().zip(g.vertices()) {
        let p = v.position();
        assert!((p.x - (b.x - 0.7)).abs() < 1e-9);
        assert!((p.y - (b.y - 0.5)).abs() < 1e-9);
        let bounds = v.bounds().expect("outline");
        assert!((bounds.min.x - (p.x - 50.0)).abs() < 1e-9, "outline follows position");
    }
}

#[test]
fn recenter_within_uses_the_given_bounds() {
    let mut g = model_with_positions(&[(400.0, 300.0)]);
    let viewport = g.options().viewport();
    // Bounds reported from elsewhere, centered 1000 to the right of the viewport center.
    let reported = Bounds::new(point(1350.0, 290.0), point(1450.0, 310.0));

    let offset = LayoutForce::default().recenter_within(&mut g, &reported, &viewport);
    assert!((offset.x - 1.0).abs() < 1e-12, "{offset:?}");
    assert!(offset.y.abs() < 1e-12, "{offset:?}");

    let (_, v) = g.vertices().next().expect("vertex");
    assert!((v.position().x - 399.0).abs() < 1e-9);
    let min = v.bounds().expect("outline").min;
    assert!((min.x - 349.0).abs() < 1e-9 && (min.y - 290.0).abs() < 1e-9, "{min:?}");
}

#[test]
fn recenter_on_empty_model_is_a_no_op() {
    let mut g = GraphModel::default();
    let viewport = g.options().viewport();
    assert!(LayoutForce::default().recenter(&mut g, &viewport).is_none());
}

#[test]
fn repeated_recentering_converges_slowly() {
    let mut g = model_with_positions(&[(2400.0, 300.0)]);
    let lf = LayoutForce::new(RepulsionOptions::default(), RecenterOptions { damping: 0.5 });
    let viewport = g.options().viewport();
    let mut last = f64::INFINITY;
    for _ in 0..20 {
        lf.recenter(&mut g, &viewport);
        let dx = (g.positions()[0].x - 400.0).abs();
        assert!(dx < last);
        last = dx;
    }
    assert!(last < 0.01);
}

#[test]
fn restore_shapes_discards_stale_outline() {
    let mut g = model_with_positions(&[(0.0, 0.0)]);
    let (h, _) = g.vertices().next().expect("vertex");
    g.vertex_mut(h).expect("vertex").set_position(point(500.0, 500.0));
    assert_eq!(g.vertex(h).expect("vertex").outline()[0], point(-50.0, -10.0));

    LayoutForce::default().restore_shapes(&mut g);
    assert_eq!(g.vertex(h).expect("vertex").outline()[0], point(450.0, 490.0));
}
