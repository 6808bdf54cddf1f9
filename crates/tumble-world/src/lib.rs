pub mod det_harness;
pub mod solver;
pub mod spawn;

use tracing::{debug, info, warn};
use tumble_collision::{collide, pairs_sap};
use tumble_core::{
    BodyId, ConfigError, Isometry, OverflowPolicy, Scalar,
    ScheduleRecorder, SimWarning, StepHasher, StepStage, StepStats, Vec3, Velocity, WorldConfig, WorldError,
};
use tumble_dynamics::{integrate_forces, integrate_pose, renormalize, Body, BodyDesc, BodySet};
use tumble_geom::{Aabb, Shape};
use tumble_materials::{ContactMaterialTable, MaterialId};

use crate::solver::PairContact;
pub use crate::spawn::{SpawnCommand, SpawnQueue, Spawned, Spawner};

/// Everything one `World::step` call produced besides the new state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub stats: StepStats,
    /// Bodies created from the spawn queue at the start of this step, in queue order.
    pub spawned: Vec<Spawned>,
    /// Bodies removed to make room under `OverflowPolicy::EvictOldest`, both by
    /// this step's spawns and by `create_body` calls since the previous step.
    pub evicted: Vec<BodyId>,
    pub warnings: Vec<SimWarning>,
}

/* ---------------- Builder ---------------- */
pub struct WorldBuilder {
    config: WorldConfig,
    capacity: usize,
}

impl WorldBuilder {
    pub fn new() -> Self { Self { config: WorldConfig::default(), capacity: 64 } }
    pub fn config(mut self, config: WorldConfig) -> Self { self.config = config; self }
    pub fn gravity(mut self, g: Vec3) -> Self { self.config.gravity = g.to_array(); self }
    pub fn with_capacity(mut self, bodies: usize) -> Self { self.capacity = bodies; self }

    pub fn build(self) -> Result<World, ConfigError> {
        self.config.validate()?;
        Ok(World {
            gravity: self.config.gravity_vec(),
            bodies: BodySet::with_capacity(self.capacity.min(self.config.max_bodies)),
            config: self.config,
            materials: ContactMaterialTable::new(),
            accumulator: 0.0,
            time: 0.0,
            tick: 0,
            next_id: 0,
            schedule: ScheduleRecorder::new(),
            spawn_queue: SpawnQueue::new(),
            evicted: Vec::new(),
        })
    }
}

impl Default for WorldBuilder {
    fn default() -> Self { Self::new() }
}

/// Fixed-step rigid-body world.
pub struct World {
    config: WorldConfig,
    gravity: Vec3,
    bodies: BodySet,
    materials: ContactMaterialTable,
    /// Unconsumed frame time, always `< fixed_dt` after a step.
    accumulator: Scalar,
    time: Scalar,
    /// Substeps executed since creation.
    tick: u64,
    next_id: u32,
    schedule: ScheduleRecorder,
    spawn_queue: SpawnQueue,
    /// Evictions not yet handed out in a `FrameReport`.
    evicted: Vec<BodyId>,
}

impl Default for World {
    fn default() -> Self {
        Self {
            config: WorldConfig::default(),
            gravity: WorldConfig::default().gravity_vec(),
            bodies: BodySet::new(),
            materials: ContactMaterialTable::new(),
            accumulator: 0.0,
            time: 0.0,
            tick: 0,
            next_id: 0,
            schedule: ScheduleRecorder::new(),
            spawn_queue: SpawnQueue::new(),
            evicted: Vec::new(),
        }
    }
}

impl World {
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        WorldBuilder::new().config(config).build()
    }

    /* ---------- queries ---------- */
    #[inline] pub fn config(&self) -> &WorldConfig { &self.config }
    #[inline] pub fn gravity(&self) -> Vec3 { self.gravity }
    #[inline] pub fn len(&self) -> usize { self.bodies.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.bodies.is_empty() }
    /// Simulated seconds (substeps * fixed_dt).
    #[inline] pub fn time(&self) -> Scalar { self.time }
    #[inline] pub fn tick(&self) -> u64 { self.tick }
    #[inline] pub fn accumulator(&self) -> Scalar { self.accumulator }
    #[inline] pub fn materials(&self) -> &ContactMaterialTable { &self.materials }
    #[inline] pub fn contains(&self, id: BodyId) -> bool { self.bodies.contains(id) }
    #[inline] pub fn body(&self, id: BodyId) -> Option<&Body> { self.bodies.get(id) }
    /// All bodies in id order.
    pub fn bodies(&self) -> impl ExactSizeIterator<Item = &Body> + '_ { self.bodies.iter() }

    pub fn pose(&self, id: BodyId) -> Result<Isometry, WorldError> {
        self.bodies.get(id).map(|b| b.pose).ok_or(WorldError::UnknownBody(id))
    }
    pub fn velocity(&self, id: BodyId) -> Result<Velocity, WorldError> {
        self.bodies.get(id).map(|b| b.vel).ok_or(WorldError::UnknownBody(id))
    }

    /* ---------- mutation ---------- */
    pub fn set_gravity(&mut self, g: Vec3) {
        self.gravity = g;
        self.config.gravity = g.to_array();
    }

    /// Sphere or box with identity orientation and zero velocity.
    pub fn create_body(&mut self, shape: Shape, mass: Scalar, material: MaterialId, position: Vec3) -> Result<BodyId, WorldError> {
        self.create_body_with(BodyDesc::new(shape, mass, material, position))
    }

    /// Same as [`World::create_body`] with explicit orientation / initial velocity.
    /// At capacity under `EvictOldest` the oldest dynamic body is removed first;
    /// it is listed in the next step's [`FrameReport::evicted`].
    pub fn create_body_with(&mut self, desc: BodyDesc) -> Result<BodyId, WorldError> {
        desc.validate()?;
        self.make_room()?;
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(Body::from_desc(id, &desc));
        debug!(body = %id, mass = desc.mass, "body created");
        Ok(id)
    }

    pub fn remove_body(&mut self, id: BodyId) -> Result<(), WorldError> {
        self.bodies.remove(id).ok_or(WorldError::UnknownBody(id))?;
        info!(body = %id, "body removed");
        Ok(())
    }

    /// Accumulates onto the body's force/torque; consumed by the next substep.
    /// Static bodies silently ignore it.
    pub fn apply_force(&mut self, id: BodyId, force: Vec3, torque: Vec3) -> Result<(), WorldError> {
        let body = self.bodies.get_mut(id).ok_or(WorldError::UnknownBody(id))?;
        body.add_force(force, torque);
        Ok(())
    }

    /// Force applied at a world point; the offset from the centre adds torque.
    pub fn apply_force_at(&mut self, id: BodyId, force: Vec3, point: Vec3) -> Result<(), WorldError> {
        let body = self.bodies.get_mut(id).ok_or(WorldError::UnknownBody(id))?;
        let torque = (point - body.pose.pos).cross(force);
        body.add_force(force, torque);
        Ok(())
    }

    pub fn add_contact_material(&mut self, a: MaterialId, b: MaterialId, friction: Scalar, restitution: Scalar) -> Result<(), WorldError> {
        self.materials.insert(a, b, friction, restitution)
    }

    /// Base properties mixed for pairs that have no explicit record.
    pub fn set_material_props(&mut self, id: MaterialId, friction: Scalar, restitution: Scalar) -> Result<(), WorldError> {
        self.materials.set_material_props(id, friction, restitution)
    }

    /// Producer side of the spawn queue. Clones share the same queue.
    pub fn spawn_queue(&self) -> SpawnQueue { self.spawn_queue.clone() }

    pub fn spawner(&self, material: MaterialId, seed: u64) -> Spawner {
        Spawner::new(self.spawn_queue(), material, seed)
    }

    /// Frees a slot under `max_bodies`, evicting if the policy allows.
    fn make_room(&mut self) -> Result<(), WorldError> {
        let max = self.config.max_bodies;
        if self.bodies.len() < max { return Ok(()); }
        match self.config.overflow {
            OverflowPolicy::Reject => Err(WorldError::BodyLimitReached { max }),
            OverflowPolicy::EvictOldest => {
                let victim = self.bodies.oldest_dynamic().ok_or(WorldError::BodyLimitReached { max })?;
                self.bodies.remove(victim);
                info!(body = %victim, max, "body evicted at capacity");
                self.evicted.push(victim);
                Ok(())
            }
        }
    }

    /* ---------- stepping ---------- */
    /// Advances by real frame time `dt`. Queued spawns are applied first, then
    /// whole `fixed_dt` substeps run while the accumulator allows, up to
    /// `max_substeps`. Backlog beyond the cap is dropped (the fractional
    /// remainder is kept). Non-finite or negative `dt` counts as zero.
    pub fn step(&mut self, dt: Scalar) -> FrameReport {
        let mut report = FrameReport::default();
        self.schedule.clear();

        self.schedule.push(StepStage::ApplySpawns);
        self.apply_spawns(&mut report);
        report.evicted = std::mem::take(&mut self.evicted);

        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.accumulator += dt;
        let fixed = self.config.fixed_dt;
        while self.accumulator >= fixed && report.stats.substeps < self.config.max_substeps {
            self.substep(&mut report);
            self.accumulator -= fixed;
            report.stats.substeps += 1;
        }
        if self.accumulator >= fixed {
            let kept = self.accumulator % fixed;
            report.stats.dropped_time = self.accumulator - kept;
            self.accumulator = kept;
            debug!(dropped = report.stats.dropped_time, "substep cap hit, backlog dropped");
        }

        for w in &report.warnings {
            warn!("{w}");
        }
        debug!(
            substeps = report.stats.substeps,
            pairs = report.stats.pairs_tested,
            contacts = report.stats.contacts,
            spawned = report.stats.spawned,
            bodies = self.bodies.len(),
            "frame stepped"
        );
        report
    }

    fn apply_spawns(&mut self, report: &mut FrameReport) {
        for command in self.spawn_queue.drain() {
            let desc = BodyDesc::new(Shape::sphere(command.radius), command.mass, command.material, command.position);
            if let Err(e) = desc.validate() {
                warn!(error = %e, "dropping invalid spawn command");
                continue;
            }
            match self.make_room() {
                Ok(()) => {}
                Err(WorldError::BodyLimitReached { max }) => {
                    report.warnings.push(SimWarning::SpawnRejected { max });
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, "dropping spawn command");
                    continue;
                }
            }
            let id = BodyId(self.next_id);
            self.next_id += 1;
            self.bodies.insert(Body::from_desc(id, &desc));
            info!(body = %id, radius = command.radius, mass = command.mass, "spawned");
            report.spawned.push(Spawned { id, command });
        }
        report.stats.spawned = report.spawned.len() as u32;
    }

    fn substep(&mut self, report: &mut FrameReport) {
        let dt = self.config.fixed_dt;
        let start: Vec<Isometry> = self.bodies.iter().map(|b| b.pose).collect();

        self.schedule.push(StepStage::IntegrateForces);
        for b in self.bodies.iter_mut() {
            integrate_forces(b, self.gravity, dt);
        }
        self.schedule.push(StepStage::IntegratePoses);
        for b in self.bodies.iter_mut() {
            integrate_pose(b, dt);
        }
        self.numeric_guard(&start, report);

        self.schedule.push(StepStage::BroadphaseSap);
        let aabbs: Vec<Aabb> = self.bodies.iter().map(Body::aabb).collect();
        let pairs = pairs_sap(&aabbs);

        self.schedule.push(StepStage::Narrowphase);
        let set = self.bodies.as_slice();
        let mut contacts: Vec<PairContact> = Vec::new();
        let mut tested = 0u32;
        for (i, k) in pairs {
            let (a, b) = (&set[i], &set[k]);
            if a.is_static() && b.is_static() { continue; }
            tested += 1;
            if let Some(manifold) = collide(&a.shape, &a.pose, &b.shape, &b.pose) {
                let material = self.materials.lookup(a.material, b.material);
                contacts.push(PairContact { a: i, b: k, manifold, material });
            }
        }
        report.stats.pairs_tested += tested;
        report.stats.contacts += contacts.iter().map(|c| c.manifold.points.len() as u32).sum::<u32>();

        self.schedule.push(StepStage::Solve);
        solver::solve(&mut self.bodies, &contacts, &self.config.solver);

        self.schedule.push(StepStage::Renormalize);
        for b in self.bodies.iter_mut().filter(|b| !b.is_static()) {
            b.pose.rot = renormalize(b.pose.rot);
        }
        self.numeric_guard(&start, report);

        self.tick += 1;
        self.time += dt;
    }

    /// Non-finite state rolls back to the substep-start pose with zero velocity.
    fn numeric_guard(&mut self, start: &[Isometry], report: &mut FrameReport) {
        for (b, pose) in self.bodies.iter_mut().zip(start) {
            if b.is_finite() { continue; }
            b.pose = *pose;
            b.vel = Velocity::default();
            b.clear_forces();
            report.warnings.push(SimWarning::NumericInstability { body: b.id });
        }
    }

    /// blake3 over config, the last step's stage schedule and every body's state in id order.
    pub fn step_hash(&self) -> [u8; 32] {
        let c = &self.config;
        let mut h = StepHasher::new();
        h.feed(&c.fixed_dt).feed(&c.max_substeps).feed(&self.gravity);
        h.feed(&c.solver.iterations).feed(&c.solver.slop)
            .feed(&c.solver.position_correction).feed(&c.solver.restitution_threshold);
        for (a, b, m) in self.materials.iter() {
            h.feed(&a.0).feed(&b.0).feed(&m.friction).feed(&m.restitution);
        }
        h.feed(&self.tick).feed(&self.accumulator).bytes(&self.schedule.digest());
        for b in self.bodies.iter() {
            h.feed(&b.id.0).feed(&b.pose).feed(&b.vel);
        }
        h.finalize()
    }
}
