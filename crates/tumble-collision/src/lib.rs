pub mod broadphase;
pub mod narrowphase;

pub use broadphase::pairs_sap;
pub use narrowphase::{collide, ContactPoint, Manifold};
