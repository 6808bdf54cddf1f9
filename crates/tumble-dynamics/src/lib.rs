pub mod body;
pub mod bodies;
pub mod integrate;

pub use body::{Body, BodyDesc};
pub use bodies::BodySet;
pub use integrate::{integrate_forces, integrate_pose, integrate_rotation, renormalize};
