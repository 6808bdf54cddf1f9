use thiserror::Error;

use crate::BodyId;

/// Caller-input errors. Reported synchronously by the call that caused them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("invalid shape: {dim} = {value} (must be finite and > 0)")]
    InvalidShape { dim: &'static str, value: f64 },

    #[error("invalid mass: {0} (must be 0 or positive with finite inverse mass and inertia)")]
    InvalidMass(f64),

    #[error("invalid contact material: friction={friction} (>= 0), restitution={restitution} (0..=1)")]
    InvalidMaterialParams { friction: f64, restitution: f64 },

    #[error("unknown body: {0}")]
    UnknownBody(BodyId),

    #[error("body limit reached: {max} bodies")]
    BodyLimitReached { max: usize },

    #[error("invalid spawn bounds for {field}: {message}")]
    InvalidSpawnBounds { field: &'static str, message: String },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid fixed_dt: {0} (must be finite and > 0)")]
    InvalidFixedDt(f64),

    #[error("max_substeps must be >= 1")]
    InvalidMaxSubsteps,

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Recoverable conditions surfaced to the caller. The loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimWarning {
    #[error("numeric instability on {body}: pose reset to last valid state, velocities zeroed")]
    NumericInstability { body: BodyId },

    #[error("stale binding for {body}: body no longer exists, binding dropped")]
    StaleBinding { body: BodyId },

    #[error("spawn rejected: body limit of {max} reached")]
    SpawnRejected { max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_error_display_messages() {
        assert_eq!(
            WorldError::InvalidShape { dim: "radius", value: 0.0 }.to_string(),
            "invalid shape: radius = 0 (must be finite and > 0)"
        );
        assert_eq!(WorldError::InvalidMass(-1.0).to_string(), "invalid mass: -1 (must be 0 or positive with finite inverse mass and inertia)");
        assert_eq!(WorldError::UnknownBody(BodyId(7)).to_string(), "unknown body: BodyId(7)");
        assert_eq!(
            WorldError::BodyLimitReached { max: 4 }.to_string(),
            "body limit reached: 4 bodies"
        );
    }

    #[test]
    fn config_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConfigError = io.into();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn warning_is_copy() {
        let w = SimWarning::StaleBinding { body: BodyId(3) };
        let w2 = w;
        assert_eq!(w, w2);
        assert!(w.to_string().contains("BodyId(3)"));
    }
}
