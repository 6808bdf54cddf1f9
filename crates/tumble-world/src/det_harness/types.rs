use tumble_core::{BodyId, Scalar};

/// What the harness expects from any sim world (`World` implements this).
pub trait SimWorld {
    fn step_dt(&mut self, dt: Scalar) -> StepReport;
    fn tick(&self) -> u64;
    fn step_hash(&self) -> [u8; 32];
    fn apply_inputs(&mut self, inputs: &Inputs);
}

/// Minimal per-frame report used for comparison between runs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    pub dt: Scalar,
    pub tick: u64,
    pub hash: [u8; 32],
    pub substeps: u32,
    pub pairs_tested: u32,
    pub contacts: u32,
    pub spawned: u32,
    pub warnings: u32,
}

/// Replayable inputs for one frame. Tags are stable.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    ApplyForce { body: BodyId, force: [Scalar; 3], torque: [Scalar; 3] },
    Spawn { radius: Scalar, mass: Scalar, material: u32, position: [Scalar; 3], force: [Scalar; 3] },
    RemoveBody { body: BodyId },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs {
    pub tick_index: u64,
    pub events: Vec<InputEvent>,
}
