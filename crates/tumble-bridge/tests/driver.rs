use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use tumble_bridge::{FrameDriver, PoseLog, RenderProxy, SceneDescriptor};
use tumble_core::{SimWarning, Vec3};
use tumble_materials::MaterialId;

const DT: f64 = 1.0 / 60.0;

type Shared = Rc<RefCell<PoseLog>>;

fn demo_driver(seed: u64) -> (FrameDriver<Shared, impl FnMut(&tumble_world::Spawned) -> Shared>, Vec<Shared>) {
    let scene = SceneDescriptor::demo(seed).build(None).unwrap();
    let mut driver = FrameDriver::new(scene.world, |_: &tumble_world::Spawned| Rc::new(RefCell::new(PoseLog::default())));
    let mut logs = Vec::new();
    for b in &scene.bodies {
        let log: Shared = Rc::default();
        driver.bind(b.id, log.clone(), b.constant_force);
        logs.push(log);
    }
    (driver, logs)
}

#[test]
fn proxies_follow_bodies_once_per_frame() {
    let (mut driver, logs) = demo_driver(4);
    for _ in 0..30 {
        // two substeps per frame; proxies are still written once
        let r = driver.frame(DT * 2.0).unwrap();
        assert_eq!(r.stats.substeps, 2);
    }
    let ball = driver.synchronizer().bindings()[1].body;
    let pose = driver.world().pose(ball).unwrap();
    let log = logs[1].borrow();
    assert_eq!(log.writes, 30);
    assert_eq!(log.last.unwrap(), pose);
    assert!(pose.pos.y < 10.0);
}

#[test]
fn floor_proxy_never_moves() {
    let (mut driver, logs) = demo_driver(9);
    driver.frame(DT).unwrap();
    let first = logs[0].borrow().last.unwrap();
    for _ in 0..200 {
        driver.frame(DT).unwrap();
    }
    assert_eq!(logs[0].borrow().last.unwrap(), first);
    assert_relative_eq!(first.pos.y, -5.0);
}

#[test]
fn spawned_bodies_get_bound_and_pushed() {
    let (mut driver, _) = demo_driver(2);
    let mut spawner = driver.world().spawner(MaterialId::from_name("sphere"), 77);
    let bounds = tumble_core::SpawnBounds::default();
    spawner.request_spawn(&bounds).unwrap();
    spawner.request_spawn(&bounds).unwrap();

    let r = driver.frame(DT).unwrap();
    assert_eq!(r.spawned.len(), 2);
    assert_eq!(driver.synchronizer().len(), 4);
    for s in &r.spawned {
        let b = driver.synchronizer().bindings().iter().find(|b| b.body == s.id).unwrap();
        assert_eq!(b.force, Some(s.command.force));
        assert_eq!(b.proxy.borrow().writes, 1);
    }
}

#[test]
fn removed_body_binding_goes_stale_once() {
    let (mut driver, logs) = demo_driver(5);
    let ball = driver.synchronizer().bindings()[1].body;
    driver.frame(DT).unwrap();
    driver.world_mut().remove_body(ball).unwrap();

    let r = driver.frame(DT).unwrap();
    assert_eq!(r.warnings, vec![SimWarning::StaleBinding { body: ball }]);
    assert_eq!(driver.synchronizer().len(), 1);
    assert!(driver.frame(DT).unwrap().warnings.is_empty());
    assert_eq!(logs[1].borrow().writes, 1);
}

#[test]
fn demo_ball_without_push_settles_on_the_floor() {
    let mut desc = SceneDescriptor::demo(0);
    desc.bodies[1].constant_force = None;
    let scene = desc.build(None).unwrap();
    let ball = scene.bodies[1].id;
    let mut driver = FrameDriver::new(scene.world, |_: &tumble_world::Spawned| PoseLog::default());
    driver.bind(ball, PoseLog::default(), None);
    for _ in 0..900 {
        driver.frame(DT).unwrap();
    }
    let pose = driver.world().pose(ball).unwrap();
    assert_relative_eq!(pose.pos.y, -3.5, epsilon = 0.02);
    assert!(driver.world().velocity(ball).unwrap().lin.length() < 0.05);
    assert_eq!(driver.synchronizer().proxy(ball).unwrap().last.unwrap(), pose);
}

#[test]
fn any_proxy_type_can_be_driven() {
    struct Counter(u32);
    impl RenderProxy for Counter {
        fn set_transform(&mut self, _: Vec3, _: tumble_core::Quat) { self.0 += 1; }
    }
    let scene = SceneDescriptor::demo(1).build(None).unwrap();
    let mut driver = FrameDriver::new(scene.world, |_: &tumble_world::Spawned| Counter(0));
    driver.bind(scene.bodies[1].id, Counter(0), None);
    driver.frame(DT).unwrap();
    driver.frame(DT).unwrap();
    assert_eq!(driver.synchronizer().bindings()[0].proxy.0, 2);
}
