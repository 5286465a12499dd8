//! Integration tests: radial layout → tree → verify geometry.
//!
//! Exercises the `spokes-core` pipeline: hub + count → RadialLayout → Tree.

use pretty_assertions::assert_eq;
use spokes_core::layout::{DEFAULT_HUB, DEFAULT_RADIUS, spoke_angle};
use spokes_core::{
    LayoutConfig, MAX_SPOKES, MIN_SPOKES, Point, Tree, compute_layout, initial_hub,
};
use std::f64::consts::TAU;

const EPS: f64 = 1e-9;

fn assert_near(actual: Point, expected: Point) {
    assert!(
        (actual - expected).hypot() < EPS,
        "expected {expected:?}, got {actual:?}"
    );
}

// ─── Purity ──────────────────────────────────────────────────────────────

#[test]
fn layout_is_idempotent() {
    let config = LayoutConfig::default();
    for n in MIN_SPOKES..=MAX_SPOKES {
        let hub = Point::new(37.25, -812.5);
        let a = compute_layout(hub, n, &config);
        let b = compute_layout(hub, n, &config);
        assert_eq!(a, b);
    }
}

// ─── Placement ──────────────────────────────────────────────────────────

#[test]
fn spokes_sit_on_radius_evenly_spaced() {
    let config = LayoutConfig::default();
    let hub = Point::new(400.0, 300.0);

    for n in MIN_SPOKES..=MAX_SPOKES {
        let layout = compute_layout(hub, n, &config);
        assert_eq!(layout.spokes.len(), n);
        assert_eq!(layout.connectors.len(), n);

        for (i, spoke) in layout.spokes.iter().enumerate() {
            let offset = *spoke - hub;
            assert!(
                (offset.hypot() - DEFAULT_RADIUS).abs() < EPS,
                "n={n} i={i}: distance {}",
                offset.hypot()
            );

            let expected = TAU * i as f64 / n as f64;
            assert!((spoke_angle(i, n) - expected).abs() < EPS);
            // atan2 folds into (-π, π]; compare on the unit circle instead
            let angle = offset.angle();
            assert!(
                (angle.cos() - expected.cos()).abs() < EPS
                    && (angle.sin() - expected.sin()).abs() < EPS,
                "n={n} i={i}: angle {angle}, expected {expected}"
            );
        }
    }
}

#[test]
fn first_spoke_starts_at_angle_zero() {
    let layout = compute_layout(Point::new(0.0, 0.0), 5, &LayoutConfig::default());
    assert_near(layout.spokes[0], Point::new(DEFAULT_RADIUS, 0.0));
}

#[test]
fn custom_radius_is_respected() {
    let config = LayoutConfig {
        radius: 42.0,
        ring_radius: Some(10.0),
    };
    let layout = compute_layout(Point::new(0.0, 0.0), 6, &config);
    for (spoke, line) in layout.spokes.iter().zip(&layout.connectors) {
        assert!((spoke.distance(Point::ORIGIN) - 42.0).abs() < EPS);
        assert!((line.p0.distance(Point::ORIGIN) - 10.0).abs() < EPS);
    }
}

// ─── Concrete scenario ──────────────────────────────────────────────────

#[test]
fn default_mount_with_two_then_three_spokes() {
    let config = LayoutConfig::default();
    let hub = initial_hub(Default::default());
    assert_eq!(hub, DEFAULT_HUB);

    let two = compute_layout(hub, 2, &config);
    assert_near(two.spokes[0], Point::new(250.0, 150.0));
    assert_near(two.spokes[1], Point::new(50.0, 150.0));

    let three = compute_layout(hub, 3, &config);
    let deg = |d: f64| d.to_radians();
    assert_near(three.spokes[0], Point::new(250.0, 150.0));
    assert_near(
        three.spokes[1],
        Point::new(150.0 + 100.0 * deg(120.0).cos(), 150.0 + 100.0 * deg(120.0).sin()),
    );
    assert_near(
        three.spokes[2],
        Point::new(150.0 + 100.0 * deg(240.0).cos(), 150.0 + 100.0 * deg(240.0).sin()),
    );
}

// ─── Tree construction ──────────────────────────────────────────────────

#[test]
fn tree_mirrors_layout_order() {
    let layout = compute_layout(DEFAULT_HUB, 4, &LayoutConfig::default());
    let tree = Tree::from_layout(&layout);

    assert_eq!(tree.hub().position, layout.hub);
    let positions: Vec<Point> = tree
        .spokes()
        .iter()
        .map(|&idx| tree.graph[idx].position)
        .collect();
    assert_eq!(positions, layout.spokes.to_vec());

    let labels: Vec<&str> = tree.nodes().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, ["Hub", "Spoke 1", "Spoke 2", "Spoke 3", "Spoke 4"]);
}
