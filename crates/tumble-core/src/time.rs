/// Counters for one `World::step` call (one render frame).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepStats {
    pub substeps: u32,
    pub pairs_tested: u32,
    pub contacts: u32,
    pub spawned: u32,
    /// Simulation time thrown away because the substep cap was hit.
    pub dropped_time: f64,
}
