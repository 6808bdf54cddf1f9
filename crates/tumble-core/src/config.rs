use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, WorldError};
use crate::types::Vec3;
use crate::Scalar;

/* ---------------- serde defaults ---------------- */
const fn default_fixed_dt() -> Scalar { 1.0 / 60.0 }
const fn default_max_substeps() -> u32 { 5 }
const fn default_gravity() -> [Scalar; 3] { [0.0, -9.82, 0.0] }
const fn default_max_bodies() -> usize { 256 }
const fn default_iterations() -> u32 { 8 }
const fn default_slop() -> Scalar { 0.001 }
const fn default_position_correction() -> Scalar { 1.0 }
const fn default_restitution_threshold() -> Scalar { 0.5 }
const fn default_radius_range() -> [Scalar; 2] { [0.5, 1.5] }
const fn default_mass_range() -> [Scalar; 2] { [0.5, 5.5] }
const fn default_one() -> Scalar { 1.0 }
const fn default_spawn_height() -> Scalar { 10.0 }

/// What `World` does when a create/spawn would exceed `max_bodies`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Refuse the new body (`BodyLimitReached` / `SpawnRejected`).
    #[default]
    Reject,
    /// Remove the dynamic body with the smallest id, then insert.
    EvictOldest,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Sequential-impulse passes per substep.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Penetration left uncorrected to keep resting contacts alive.
    #[serde(default = "default_slop")]
    pub slop: Scalar,
    /// Fraction of (depth - slop) removed by the positional pass (1.0 = all of it).
    #[serde(default = "default_position_correction")]
    pub position_correction: Scalar,
    /// Approach speeds below this (m/s) get no restitution bounce.
    #[serde(default = "default_restitution_threshold")]
    pub restitution_threshold: Scalar,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            slop: default_slop(),
            position_correction: default_position_correction(),
            restitution_threshold: default_restitution_threshold(),
        }
    }
}

/// World construction parameters. All fields have defaults so a partial TOML
/// file (or an empty one) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_fixed_dt")]
    pub fixed_dt: Scalar,
    #[serde(default = "default_max_substeps")]
    pub max_substeps: u32,
    #[serde(default = "default_gravity")]
    pub gravity: [Scalar; 3],
    #[serde(default = "default_max_bodies")]
    pub max_bodies: usize,
    #[serde(default)]
    pub overflow: OverflowPolicy,
    #[serde(default)]
    pub solver: SolverConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fixed_dt: default_fixed_dt(),
            max_substeps: default_max_substeps(),
            gravity: default_gravity(),
            max_bodies: default_max_bodies(),
            overflow: OverflowPolicy::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(ConfigError::InvalidFixedDt(self.fixed_dt));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::InvalidMaxSubsteps);
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(ConfigError::InvalidValue { field: "gravity", message: "components must be finite".into() });
        }
        if self.max_bodies == 0 {
            return Err(ConfigError::InvalidValue { field: "max_bodies", message: "must be >= 1".into() });
        }
        let s = &self.solver;
        if !(s.slop.is_finite() && s.slop >= 0.0) {
            return Err(ConfigError::InvalidValue { field: "solver.slop", message: "must be finite and >= 0".into() });
        }
        if !(0.0..=1.0).contains(&s.position_correction) {
            return Err(ConfigError::InvalidValue { field: "solver.position_correction", message: "must be in 0..=1".into() });
        }
        if !(s.restitution_threshold.is_finite() && s.restitution_threshold >= 0.0) {
            return Err(ConfigError::InvalidValue { field: "solver.restitution_threshold", message: "must be finite and >= 0".into() });
        }
        Ok(())
    }

    #[inline] pub fn gravity_vec(&self) -> Vec3 { Vec3::from_array(self.gravity) }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Ranges the spawner draws from. Defaults reproduce the demo's click handler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBounds {
    #[serde(default = "default_radius_range")]
    pub radius: [Scalar; 2],
    #[serde(default = "default_mass_range")]
    pub mass: [Scalar; 2],
    /// Horizontal offsets are drawn from `[-offset, offset]` on x and z.
    #[serde(default = "default_one")]
    pub offset: Scalar,
    /// Constant-force components are drawn from `[-force, force]` on x and z.
    #[serde(default = "default_one")]
    pub force: Scalar,
    #[serde(default = "default_spawn_height")]
    pub height: Scalar,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self {
            radius: default_radius_range(),
            mass: default_mass_range(),
            offset: default_one(),
            force: default_one(),
            height: default_spawn_height(),
        }
    }
}

/// Widest span a uniform draw can scale without overflowing.
const MAX_SPAN: Scalar = Scalar::MAX / 2.0;

#[inline]
fn drawable_span(span: Scalar) -> bool { span.is_finite() && span <= MAX_SPAN }

impl SpawnBounds {
    pub fn validate(&self) -> Result<(), WorldError> {
        let range = |field: &'static str, r: [Scalar; 2], min_exclusive: bool| -> Result<(), WorldError> {
            let [lo, hi] = r;
            if !drawable_span(hi - lo) || lo > hi {
                return Err(WorldError::InvalidSpawnBounds { field, message: format!("[{lo}, {hi}] is not an ordered finite range") });
            }
            if (min_exclusive && lo <= 0.0) || lo < 0.0 {
                return Err(WorldError::InvalidSpawnBounds { field, message: format!("lower bound {lo} out of domain") });
            }
            Ok(())
        };
        range("radius", self.radius, true)?;
        range("mass", self.mass, false)?;
        for (field, v) in [("offset", self.offset), ("force", self.force)] {
            // Drawn from [-v, v].
            if !(drawable_span(2.0 * v) && v >= 0.0) {
                return Err(WorldError::InvalidSpawnBounds { field, message: format!("{v} must be >= 0 with a finite span") });
            }
        }
        if !self.height.is_finite() {
            return Err(WorldError::InvalidSpawnBounds { field: "height", message: "must be finite".into() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo() {
        let c = WorldConfig::default();
        assert!((c.fixed_dt - 1.0 / 60.0).abs() < 1e-15);
        assert_eq!(c.max_substeps, 5);
        assert_eq!(c.gravity, [0.0, -9.82, 0.0]);
        assert!(c.validate().is_ok());
        assert!(SpawnBounds::default().validate().is_ok());
    }

    #[test]
    fn empty_toml_is_default() {
        let c = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(c, WorldConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let c = WorldConfig::from_toml_str(
            "fixed_dt = 0.01\noverflow = \"evict_oldest\"\n[solver]\niterations = 3\n",
        )
        .unwrap();
        assert_eq!(c.fixed_dt, 0.01);
        assert_eq!(c.overflow, OverflowPolicy::EvictOldest);
        assert_eq!(c.solver.iterations, 3);
        assert_eq!(c.solver.slop, default_slop());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(WorldConfig::from_toml_str("fixed_dt = 0.0"), Err(ConfigError::InvalidFixedDt(_))));
        assert!(matches!(WorldConfig::from_toml_str("max_substeps = 0"), Err(ConfigError::InvalidMaxSubsteps)));
        assert!(matches!(WorldConfig::from_toml_str("fixed_dt = \"x\""), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn spawn_bounds_validation() {
        let mut b = SpawnBounds::default();
        b.radius = [0.0, 1.0];
        assert!(matches!(b.validate(), Err(WorldError::InvalidSpawnBounds { field: "radius", .. })));
        let mut b = SpawnBounds::default();
        b.mass = [3.0, 1.0];
        assert!(b.validate().is_err());
        let mut b = SpawnBounds::default();
        b.force = -1.0;
        assert!(b.validate().is_err());
    }

    #[test]
    fn spawn_bounds_span_must_be_finite() {
        let b = SpawnBounds { offset: 1.0e308, ..SpawnBounds::default() };
        assert!(matches!(b.validate(), Err(WorldError::InvalidSpawnBounds { field: "offset", .. })));
        let b = SpawnBounds { force: f64::MAX, ..SpawnBounds::default() };
        assert!(matches!(b.validate(), Err(WorldError::InvalidSpawnBounds { field: "force", .. })));
        let b = SpawnBounds { mass: [0.0, f64::MAX], ..SpawnBounds::default() };
        assert!(matches!(b.validate(), Err(WorldError::InvalidSpawnBounds { field: "mass", .. })));
        let b = SpawnBounds { offset: 1.0e300, mass: [1.0, 1.0e300], ..SpawnBounds::default() };
        assert!(b.validate().is_ok());
    }
}
