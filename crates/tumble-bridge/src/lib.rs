//! Glue between the physics world and whatever draws it: render proxies, the
//! per-frame synchronizer, the loop driver and JSON scene loading.

pub mod proxy;
pub mod sync;
pub mod driver;
pub mod scene;

pub use proxy::{PoseLog, RenderProxy};
pub use sync::{Binding, Synchronizer};
pub use driver::FrameDriver;
pub use scene::{LoadedScene, SceneBody, SceneDescriptor, SceneError};
