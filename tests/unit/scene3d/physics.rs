use super::*;

fn world() -> PhysicsWorld {
    PhysicsWorld::new(PhysicsConfig::default())
}

#[test]
fn mass_follows_area_with_floor() {
    let w = world();
    assert_eq!(w.mass_for_area(224_000), 22.4);
    assert_eq!(w.mass_for_area(6_400), 0.64);
    assert_eq!(w.mass_for_area(10), 0.1);
}

#[test]
fn fixed_bodies_never_move() {
    let mut w = world();
    let rest = Vec3::new(1.0, 2.0, 0.0);
    let pinned = w.add_body(Body::new(rest, 1.0, 1.0, true));
    for i in 0..200 {
        let input = Vec2::new((i as f32).sin(), (i as f32).cos());
        w.step(input, 1.0 / 60.0);
    }
    assert_eq!(w.body(pinned).unwrap().position, rest);
}

#[test]
fn free_body_moves_with_input_and_returns() {
    let mut w = world();
    let id = w.add_body(Body::new(Vec3::ZERO, 1.0, 0.5, false));
    for _ in 0..30 {
        w.step(Vec2::new(1.0, 0.0), 1.0 / 60.0);
    }
    let pushed = w.body(id).unwrap().position;
    assert!(pushed.x > 0.0);
    assert_eq!(pushed.z, 0.0);

    for _ in 0..2_000 {
        w.step(Vec2::ZERO, 1.0 / 60.0);
    }
    assert!(w.body(id).unwrap().position.length() < 1e-3);
}

#[test]
fn damping_bounds_motion_under_sustained_input() {
    let mut w = world();
    let id = w.add_body(Body::new(Vec3::ZERO, 0.1, 1.0, false));
    for _ in 0..5_000 {
        w.step(Vec2::new(1.0, 1.0), 0.05);
    }
    let p = w.body(id).unwrap().position;
    assert!(p.is_finite());
    // Spring equilibrium: force_scale * parallax / stiffness.
    assert!((p.x - 4.0 / 6.0).abs() < 1e-2, "{p:?}");
}

#[test]
fn zero_parallax_body_stays_put() {
    let mut w = world();
    let id = w.add_body(Body::new(Vec3::ZERO, 1.0, 0.0, false));
    w.step(Vec2::ONE, 0.016);
    assert_eq!(w.body(id).unwrap().position, Vec3::ZERO);
}

#[test]
fn invalid_dt_is_ignored() {
    let mut w = world();
    let id = w.add_body(Body::new(Vec3::ZERO, 1.0, 1.0, false));
    w.step(Vec2::ONE, f32::NAN);
    w.step(Vec2::ONE, -1.0);
    w.step(Vec2::ONE, 0.0);
    assert_eq!(w.body(id).unwrap().position, Vec3::ZERO);
}

#[test]
fn constraint_moves_only_the_free_body() {
    let mut w = world();
    let anchor = w.add_body(Body::new(Vec3::ZERO, 1.0, 0.0, true));
    let free = w.add_body(Body::new(Vec3::new(2.0, 0.0, 0.0), 1.0, 0.0, false));
    w.add_constraint(anchor, free, 1.0).unwrap();
    w.step(Vec2::ZERO, 0.016);
    assert_eq!(w.body(anchor).unwrap().position, Vec3::ZERO);
    let d = w.body(free).unwrap().position.length();
    assert!((d - 1.0).abs() < 0.05, "{d}");
}

#[test]
fn constraint_splits_correction_by_inverse_mass() {
    let mut w = world();
    let a = w.add_body(Body::new(Vec3::ZERO, 1.0, 0.0, false));
    let b = w.add_body(Body::new(Vec3::new(3.0, 0.0, 0.0), 1.0, 0.0, false));
    w.add_constraint(a, b, 1.0).unwrap();
    w.solve_constraints();
    assert!((w.body(a).unwrap().position.x - 1.0).abs() < 1e-6);
    assert!((w.body(b).unwrap().position.x - 2.0).abs() < 1e-6);
}

#[test]
fn bad_constraints_are_rejected() {
    let mut w = world();
    let a = w.add_body(Body::new(Vec3::ZERO, 1.0, 0.0, false));
    assert!(w.add_constraint(a, a, 1.0).is_err());
    assert!(w.add_constraint(a, BodyId(9), 1.0).is_err());
}
