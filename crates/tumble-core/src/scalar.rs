/// Simulation scalar. Everything in the loop runs in double precision so that
/// replays stay bit-identical across the accumulator and the solver.
pub type Scalar = f64;
