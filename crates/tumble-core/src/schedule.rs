use crate::StepHasher;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepStage {
    ApplySpawns = 1,
    IntegrateForces = 2,
    IntegratePoses = 3,
    BroadphaseSap = 4,
    Narrowphase = 5,
    Solve = 6,
    Renormalize = 7,
}

pub fn schedule_digest(stages: &[StepStage]) -> [u8; 32] {
    let mut h = StepHasher::new();
    for s in stages { h.feed(&(*s as u8)); }
    h.finalize()
}

/// Records the stages executed during the last frame; folded into the step hash.
#[derive(Default, Debug, Clone)]
pub struct ScheduleRecorder { stages: Vec<StepStage> }

impl ScheduleRecorder {
    pub fn new() -> Self { Self { stages: Vec::new() } }
    pub fn push(&mut self, s: StepStage) { self.stages.push(s); }
    pub fn clear(&mut self) { self.stages.clear(); }
    pub fn stages(&self) -> &[StepStage] { &self.stages }
    pub fn digest(&self) -> [u8; 32] { schedule_digest(&self.stages) }
}
