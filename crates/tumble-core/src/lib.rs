pub mod scalar;
pub mod ids;
pub mod types;
pub mod hash;
pub mod time;
pub mod schedule;
pub mod config;
pub mod error;

pub use scalar::Scalar;
pub use ids::BodyId;
pub use types::{Vec3, Mat3, Quat, Isometry, Velocity, vec3, iso};
pub use hash::{HashInto, StepHasher};
pub use time::StepStats;
pub use schedule::{StepStage, ScheduleRecorder, schedule_digest};
pub use config::{WorldConfig, SolverConfig, SpawnBounds, OverflowPolicy};
pub use error::{WorldError, ConfigError, SimWarning};
