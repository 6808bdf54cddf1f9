use approx::assert_relative_eq;
use tumble_core::{vec3, BodyId, Quat, Vec3, Velocity, WorldConfig};
use tumble_dynamics::{Body, BodyDesc};
use tumble_geom::Shape;
use tumble_materials::MaterialId;
use tumble_world::World;

const DT: f64 = 1.0 / 60.0;

fn sphere_mat() -> MaterialId { MaterialId::from_name("sphere") }
fn floor_mat() -> MaterialId { MaterialId::from_name("floor") }

/// Rotated 6x6x1 slab at y = -5 (top face at -4.5) and a radius-1, mass-5 ball at y = 10.
fn drop_scene(restitution: f64) -> (World, BodyId, BodyId) {
    let mut w = World::new(WorldConfig::default()).unwrap();
    w.add_contact_material(sphere_mat(), floor_mat(), 0.1, restitution).unwrap();
    let floor = w
        .create_body_with(
            BodyDesc::new(Shape::cuboid(3.0, 3.0, 0.5), 0.0, floor_mat(), vec3(0.0, -5.0, 0.0))
                .with_rotation(Quat::from_rotation_x(-std::f64::consts::FRAC_PI_2)),
        )
        .unwrap();
    let ball = w.create_body(Shape::sphere(1.0), 5.0, sphere_mat(), vec3(0.0, 10.0, 0.0)).unwrap();
    (w, floor, ball)
}

#[test]
fn sphere_comes_to_rest_on_floor() {
    let (mut w, _, ball) = drop_scene(0.0);
    for _ in 0..600 {
        w.step(DT);
    }
    let pos = w.pose(ball).unwrap().pos;
    let vel = w.velocity(ball).unwrap();
    assert_relative_eq!(pos.y, -5.0 + 0.5 + 1.0, epsilon = 0.02);
    assert!(pos.x.abs() < 1e-9 && pos.z.abs() < 1e-9);
    assert!(vel.lin.length() < 0.05, "still moving: {:?}", vel.lin);
}

#[test]
fn bounce_apexes_never_grow() {
    let (mut w, _, ball) = drop_scene(0.5);
    let mut apexes = Vec::new();
    let mut prev_vy = 0.0;
    for _ in 0..900 {
        w.step(DT);
        let vy = w.velocity(ball).unwrap().lin.y;
        if prev_vy > 0.0 && vy <= 0.0 {
            apexes.push(w.pose(ball).unwrap().pos.y);
        }
        prev_vy = vy;
    }
    assert!(apexes.len() >= 2, "expected several bounces, got {apexes:?}");
    assert!(apexes[0] < 10.0);
    for pair in apexes.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-9, "apex grew: {apexes:?}");
    }
    // eventually settles
    assert!(w.velocity(ball).unwrap().lin.length() < 0.05);
}

#[test]
fn zero_step_changes_nothing() {
    let (mut w, _, _) = drop_scene(0.5);
    for _ in 0..45 {
        w.step(DT);
    }
    let before: Vec<Body> = w.bodies().cloned().collect();
    let tick = w.tick();
    let report = w.step(0.0);
    assert_eq!(report.stats.substeps, 0);
    assert_eq!(w.tick(), tick);
    let after: Vec<Body> = w.bodies().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn static_body_never_moves() {
    let (mut w, floor, _) = drop_scene(0.5);
    let start = w.pose(floor).unwrap();
    for i in 0..300 {
        w.apply_force(floor, vec3(1.0e12, -1.0e12, 3.0e9), vec3(1.0e9, 0.0, 0.0)).unwrap();
        if i % 20 == 0 {
            let id = w.create_body(Shape::cuboid(0.4, 0.4, 0.4), 3.0, sphere_mat(), vec3(0.3, 2.0, -0.2)).unwrap();
            w.apply_force(id, vec3(0.0, -500.0, 0.0), Vec3::ZERO).unwrap();
        }
        w.step(DT);
        let now = w.pose(floor).unwrap();
        assert_eq!(now.pos, start.pos);
        assert_eq!(now.rot, start.rot);
        assert_eq!(w.velocity(floor).unwrap().lin, Vec3::ZERO);
    }
}

#[test]
fn identical_runs_are_bit_identical() {
    let run = || {
        let (mut w, _, ball) = drop_scene(0.5);
        let mut hashes = Vec::new();
        for i in 0..400 {
            w.apply_force(ball, vec3(0.4, 0.0, -0.7), Vec3::ZERO).unwrap();
            if i == 100 {
                w.create_body(Shape::cuboid(0.5, 0.5, 0.5), 2.0, sphere_mat(), vec3(0.2, 6.0, 0.1)).unwrap();
            }
            // irregular frame times still produce whole fixed substeps
            let dt = if i % 3 == 0 { DT * 1.7 } else { DT * 0.6 };
            w.step(dt);
            hashes.push(w.step_hash());
        }
        (hashes, w.bodies().cloned().collect::<Vec<_>>())
    };
    let (ha, ba) = run();
    let (hb, bb) = run();
    assert_eq!(ha, hb);
    assert_eq!(ba, bb);
}

#[test]
fn accumulator_decouples_frame_rate() {
    // same simulated time through different frame slicing reaches the same tick count
    let (mut a, _, ball_a) = drop_scene(0.0);
    let (mut b, _, ball_b) = drop_scene(0.0);
    for _ in 0..60 {
        a.step(DT);
    }
    for _ in 0..30 {
        b.step(DT * 2.0);
    }
    assert_eq!(a.tick(), 60);
    assert_eq!(b.tick(), 60);
    assert_relative_eq!(a.pose(ball_a).unwrap().pos.y, b.pose(ball_b).unwrap().pos.y, epsilon = 1e-9);
}

#[test]
fn boxes_stack_without_sinking() {
    let (mut w, _, ball) = drop_scene(0.0);
    w.remove_body(ball).unwrap();
    let crate_id = w.create_body(Shape::cuboid(0.5, 0.5, 0.5), 2.0, sphere_mat(), vec3(0.0, -3.0, 0.0)).unwrap();
    for _ in 0..300 {
        w.step(DT);
    }
    let p = w.pose(crate_id).unwrap();
    assert_relative_eq!(p.pos.y, -4.0, epsilon = 0.02);
    assert!(w.velocity(crate_id).unwrap().lin.length() < 0.05);
}

/// Unit crate sliding along +x at 5 m/s across a wide flat slab with the given friction.
fn slide_scene(friction: f64) -> (World, BodyId) {
    let mut w = World::new(WorldConfig::default()).unwrap();
    w.add_contact_material(sphere_mat(), floor_mat(), friction, 0.0).unwrap();
    w.create_body(Shape::cuboid(10.0, 0.5, 10.0), 0.0, floor_mat(), Vec3::ZERO).unwrap();
    let slider = w
        .create_body_with(
            BodyDesc::new(Shape::cuboid(0.5, 0.5, 0.5), 2.0, sphere_mat(), vec3(0.0, 1.0, 0.0))
                .with_velocity(Velocity { lin: vec3(5.0, 0.0, 0.0), ang: Vec3::ZERO }),
        )
        .unwrap();
    (w, slider)
}

#[test]
fn friction_decelerates_at_mu_g() {
    let (mut w, slider) = slide_scene(0.5);
    for _ in 0..30 {
        w.step(DT);
    }
    // v = 5 - mu * g * t after half a second
    let expected = 5.0 - 0.5 * 9.82 * 0.5;
    let v = w.velocity(slider).unwrap().lin;
    assert_relative_eq!(v.x, expected, epsilon = 0.02);
    assert!(v.z.abs() < 1e-9);
    assert_relative_eq!(w.pose(slider).unwrap().pos.y, 1.0, epsilon = 0.02);
}

#[test]
fn frictionless_contact_keeps_sliding() {
    let (mut w, slider) = slide_scene(0.0);
    for _ in 0..30 {
        w.step(DT);
    }
    assert_relative_eq!(w.velocity(slider).unwrap().lin.x, 5.0, epsilon = 1e-6);
    assert_relative_eq!(w.pose(slider).unwrap().pos.x, 2.5, epsilon = 1e-6);
}
