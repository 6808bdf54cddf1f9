use std::collections::BTreeSet;
use std::path::Path;

use glam::EulerRot;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use tumble_core::{vec3, BodyId, ConfigError, Quat, Scalar, SpawnBounds, Vec3, WorldConfig, WorldError};
use tumble_dynamics::BodyDesc;
use tumble_geom::Shape;
use tumble_materials::{ContactMaterial, MaterialId};
use tumble_world::World;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("world error: {0}")]
    World(#[from] WorldError),

    #[error("unknown material: {0:?}")]
    UnknownMaterial(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    pub name: String,
    /// Base properties, mixed for pairs with no explicit record.
    #[serde(default)]
    pub friction: Option<Scalar>,
    #[serde(default)]
    pub restitution: Option<Scalar>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContactMaterialDesc {
    pub a: String,
    pub b: String,
    pub friction: Scalar,
    pub restitution: Scalar,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDesc {
    Sphere { radius: Scalar },
    Box { half_extents: [Scalar; 3] },
}

impl From<ShapeDesc> for Shape {
    fn from(s: ShapeDesc) -> Self {
        match s {
            ShapeDesc::Sphere { radius } => Shape::Sphere { radius },
            ShapeDesc::Box { half_extents } => Shape::Box { half: Vec3::from_array(half_extents) },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BodyEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub shape: ShapeDesc,
    pub mass: Scalar,
    pub material: String,
    pub position: [Scalar; 3],
    /// XYZ Euler angles in radians.
    #[serde(default)]
    pub orientation_euler: Option<[Scalar; 3]>,
    /// Re-applied at the body's centre every frame.
    #[serde(default)]
    pub constant_force: Option<[Scalar; 3]>,
}

/// A whole scene as JSON: world config, materials, pair records, bodies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SceneDescriptor {
    #[serde(default)]
    pub config: Option<WorldConfig>,
    #[serde(default)]
    pub spawn: Option<SpawnBounds>,
    #[serde(default)]
    pub materials: Vec<MaterialDesc>,
    #[serde(default)]
    pub contact_materials: Vec<ContactMaterialDesc>,
    #[serde(default)]
    pub bodies: Vec<BodyEntry>,
}

/// A created body and what the caller still has to do for it each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneBody {
    pub id: BodyId,
    pub name: Option<String>,
    pub constant_force: Option<Vec3>,
}

pub struct LoadedScene {
    pub world: World,
    pub bodies: Vec<SceneBody>,
    pub spawn: SpawnBounds,
}

impl SceneDescriptor {
    pub fn from_json_str(s: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Declared material names resolve to stable ids; anything else is an error.
    pub fn material_id(&self, name: &str) -> Result<MaterialId, SceneError> {
        if self.materials.iter().any(|m| m.name == name) {
            Ok(MaterialId::from_name(name))
        } else {
            Err(SceneError::UnknownMaterial(name.to_string()))
        }
    }

    /// Builds a fresh world. `config` overrides the descriptor's own config.
    pub fn build(&self, config: Option<WorldConfig>) -> Result<LoadedScene, SceneError> {
        let config = config.or_else(|| self.config.clone()).unwrap_or_default();
        let mut world = World::new(config)?;

        let mut seen = BTreeSet::new();
        for m in &self.materials {
            if !seen.insert(m.name.as_str()) { continue; }
            if m.friction.is_some() || m.restitution.is_some() {
                let fallback = ContactMaterial::FALLBACK;
                world.set_material_props(
                    MaterialId::from_name(&m.name),
                    m.friction.unwrap_or(fallback.friction),
                    m.restitution.unwrap_or(fallback.restitution),
                )?;
            }
        }
        for c in &self.contact_materials {
            let (a, b) = (self.material_id(&c.a)?, self.material_id(&c.b)?);
            world.add_contact_material(a, b, c.friction, c.restitution)?;
        }

        let mut bodies = Vec::with_capacity(self.bodies.len());
        for e in &self.bodies {
            let material = self.material_id(&e.material)?;
            let rot = e.orientation_euler.map_or(Quat::IDENTITY, |[x, y, z]| Quat::from_euler(EulerRot::XYZ, x, y, z));
            let desc = BodyDesc::new(e.shape.into(), e.mass, material, Vec3::from_array(e.position)).with_rotation(rot);
            let id = world.create_body_with(desc)?;
            bodies.push(SceneBody { id, name: e.name.clone(), constant_force: e.constant_force.map(Vec3::from_array) });
        }
        info!(bodies = bodies.len(), pairs = world.materials().len(), "scene loaded");

        Ok(LoadedScene { world, bodies, spawn: self.spawn.unwrap_or_default() })
    }

    /// The physics demo: a 6x6x1 floor slab laid flat at y = -5 and a
    /// radius-1, mass-5 ball at y = 10 pushed by a small random horizontal
    /// force. Sphere/floor contacts use friction 0.1, restitution 0.5.
    pub fn demo(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let force = [rng.gen_range(-1.0..=1.0), 0.0, rng.gen_range(-1.0..=1.0)];
        let material = |name: &str| MaterialDesc { name: name.into(), friction: None, restitution: None };
        SceneDescriptor {
            config: Some(WorldConfig::default()),
            spawn: Some(SpawnBounds::default()),
            materials: vec![material("sphere"), material("floor")],
            contact_materials: vec![ContactMaterialDesc {
                a: "sphere".into(),
                b: "floor".into(),
                friction: 0.1,
                restitution: 0.5,
            }],
            bodies: vec![
                BodyEntry {
                    name: Some("floor".into()),
                    shape: ShapeDesc::Box { half_extents: [3.0, 3.0, 0.5] },
                    mass: 0.0,
                    material: "floor".into(),
                    position: [0.0, -5.0, 0.0],
                    orientation_euler: Some([-std::f64::consts::FRAC_PI_2, 0.0, 0.0]),
                    constant_force: None,
                },
                BodyEntry {
                    name: Some("sphere".into()),
                    shape: ShapeDesc::Sphere { radius: 1.0 },
                    mass: 5.0,
                    material: "sphere".into(),
                    position: vec3(0.0, 10.0, 0.0).to_array(),
                    orientation_euler: None,
                    constant_force: Some(force),
                },
            ],
        }
    }
}
