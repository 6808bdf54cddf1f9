pub mod types;

pub use types::{InputEvent, Inputs, SimWorld, StepReport};

use tracing::warn;
use tumble_core::{vec3, Scalar};
use tumble_materials::MaterialId;

use crate::{SpawnCommand, World};

// ---- glue: adapt World to the harness surface ----
impl SimWorld for World {
    fn step_dt(&mut self, dt: Scalar) -> StepReport {
        let frame = self.step(dt);
        StepReport {
            dt,
            tick: self.tick(),
            hash: self.step_hash(),
            substeps: frame.stats.substeps,
            pairs_tested: frame.stats.pairs_tested,
            contacts: frame.stats.contacts,
            spawned: frame.stats.spawned,
            warnings: frame.warnings.len() as u32,
        }
    }

    fn tick(&self) -> u64 { World::tick(self) }
    fn step_hash(&self) -> [u8; 32] { World::step_hash(self) }

    fn apply_inputs(&mut self, inputs: &Inputs) {
        for ev in &inputs.events {
            let res = match *ev {
                InputEvent::ApplyForce { body, force, torque } => {
                    self.apply_force(body, vec3(force[0], force[1], force[2]), vec3(torque[0], torque[1], torque[2]))
                }
                InputEvent::Spawn { radius, mass, material, position, force } => {
                    self.spawn_queue().push(SpawnCommand {
                        radius,
                        mass,
                        material: MaterialId(material),
                        position: vec3(position[0], position[1], position[2]),
                        force: vec3(force[0], force[1], force[2]),
                    });
                    Ok(())
                }
                InputEvent::RemoveBody { body } => self.remove_body(body),
            };
            if let Err(e) = res {
                warn!(tick = inputs.tick_index, error = %e, "replay input skipped");
            }
        }
    }
}

/// Feeds `frames` (frame dt + inputs) through `world` and collects one report per frame.
pub fn replay<W: SimWorld>(world: &mut W, frames: &[(Scalar, Inputs)]) -> Vec<StepReport> {
    frames
        .iter()
        .map(|(dt, inputs)| {
            world.apply_inputs(inputs);
            world.step_dt(*dt)
        })
        .collect()
}

/// Index of the first frame whose hashes differ, if any.
pub fn first_divergence(a: &[StepReport], b: &[StepReport]) -> Option<usize> {
    a.iter().zip(b).position(|(x, y)| x.hash != y.hash).or_else(|| {
        if a.len() != b.len() { Some(a.len().min(b.len())) } else { None }
    })
}
