use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tumble_core::types::Vec3;
use tumble_core::{BodyId, Scalar, SpawnBounds, WorldError};
use tumble_materials::MaterialId;

/// A queued "create a sphere" request. Applied by `World::step` before any substep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpawnCommand {
    pub radius: Scalar,
    pub mass: Scalar,
    pub material: MaterialId,
    pub position: Vec3,
    /// Constant force the caller keeps applying every frame.
    pub force: Vec3,
}

/// A body created from a [`SpawnCommand`] during the last step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spawned {
    pub id: BodyId,
    pub command: SpawnCommand,
}

/// Shared FIFO between input callbacks (push) and the loop (drain).
#[derive(Clone, Debug, Default)]
pub struct SpawnQueue {
    inner: Arc<Mutex<VecDeque<SpawnCommand>>>,
}

impl SpawnQueue {
    pub fn new() -> Self { Self::default() }
    pub fn push(&self, cmd: SpawnCommand) { self.inner.lock().push_back(cmd); }
    pub fn len(&self) -> usize { self.inner.lock().len() }
    pub fn is_empty(&self) -> bool { self.inner.lock().is_empty() }

    /// Takes everything queued so far, in arrival order.
    pub fn drain(&self) -> Vec<SpawnCommand> {
        self.inner.lock().drain(..).collect()
    }
}

/// Turns a trigger (a click) into a randomized [`SpawnCommand`].
pub struct Spawner {
    queue: SpawnQueue,
    rng: ChaCha8Rng,
    material: MaterialId,
}

impl Spawner {
    pub fn new(queue: SpawnQueue, material: MaterialId, seed: u64) -> Self {
        Self { queue, rng: ChaCha8Rng::seed_from_u64(seed), material }
    }

    pub fn queue(&self) -> &SpawnQueue { &self.queue }

    /// Draws a command within `bounds`, enqueues it and returns a copy.
    pub fn request_spawn(&mut self, bounds: &SpawnBounds) -> Result<SpawnCommand, WorldError> {
        bounds.validate()?;
        let cmd = self.draw(bounds);
        self.queue.push(cmd);
        Ok(cmd)
    }

    fn draw(&mut self, b: &SpawnBounds) -> SpawnCommand {
        let radius = self.rng.gen_range(b.radius[0]..=b.radius[1]);
        let mass = self.rng.gen_range(b.mass[0]..=b.mass[1]);
        let dx = self.rng.gen_range(-b.offset..=b.offset);
        let dz = self.rng.gen_range(-b.offset..=b.offset);
        let fx = self.rng.gen_range(-b.force..=b.force);
        let fz = self.rng.gen_range(-b.force..=b.force);
        SpawnCommand {
            radius,
            mass,
            material: self.material,
            position: Vec3::new(dx, b.height, dz),
            force: Vec3::new(fx, 0.0, fz),
        }
    }
}
