use tumble_core::types::{Isometry, Mat3, Quat, Vec3, Velocity};
use tumble_core::{BodyId, Scalar, WorldError};
use tumble_geom::{aabb_of, Aabb, MassProps, Shape};
use tumble_materials::MaterialId;

/// Input descriptor when creating a body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BodyDesc {
    pub shape: Shape,
    /// 0 means static.
    pub mass: Scalar,
    pub material: MaterialId,
    pub pose: Isometry,
    pub vel: Velocity,
}

impl BodyDesc {
    pub fn new(shape: Shape, mass: Scalar, material: MaterialId, position: Vec3) -> Self {
        Self { shape, mass, material, pose: Isometry { pos: position, rot: Quat::IDENTITY }, vel: Velocity::default() }
    }
    pub fn with_rotation(mut self, rot: Quat) -> Self { self.pose.rot = rot; self }
    pub fn with_velocity(mut self, vel: Velocity) -> Self { self.vel = vel; self }

    pub fn validate(&self) -> Result<(), WorldError> {
        self.shape.validate()?;
        if !(self.mass.is_finite() && self.mass >= 0.0) {
            return Err(WorldError::InvalidMass(self.mass));
        }
        if self.mass > 0.0 {
            // subnormal masses invert to infinity
            let props = MassProps::from_shape(&self.shape, self.mass);
            if !(props.inv_mass.is_finite() && props.inv_inertia_local.is_finite()) {
                return Err(WorldError::InvalidMass(self.mass));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub shape: Shape,
    pub material: MaterialId,
    pub mass: MassProps,
    pub pose: Isometry,
    pub vel: Velocity,
    pub force: Vec3,
    pub torque: Vec3,
}

impl Body {
    /// Builds the body from an already validated descriptor. Static bodies start at rest.
    pub fn from_desc(id: BodyId, desc: &BodyDesc) -> Self {
        let mass = MassProps::from_shape(&desc.shape, desc.mass);
        let vel = if mass.is_static() { Velocity::default() } else { desc.vel };
        let rot = crate::integrate::renormalize(desc.pose.rot);
        Self {
            id,
            shape: desc.shape,
            material: desc.material,
            mass,
            pose: Isometry { pos: desc.pose.pos, rot },
            vel,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    #[inline] pub fn is_static(&self) -> bool { self.mass.is_static() }
    #[inline] pub fn inv_mass(&self) -> Scalar { self.mass.inv_mass }
    #[inline] pub fn aabb(&self) -> Aabb { aabb_of(&self.shape, &self.pose) }
    #[inline] pub fn is_finite(&self) -> bool { self.pose.is_finite() && self.vel.is_finite() }

    /// World-space inverse inertia: R * I^-1_local * R^T.
    pub fn inv_inertia_world(&self) -> Mat3 {
        if self.is_static() { return Mat3::ZERO; }
        let r = Mat3::from_quat(self.pose.rot);
        r * self.mass.inv_inertia_local * r.transpose()
    }

    /// Velocity of the material point at offset `r` from the centre.
    #[inline] pub fn velocity_at(&self, r: Vec3) -> Vec3 { self.vel.lin + self.vel.ang.cross(r) }

    /// No-op on static bodies.
    pub fn add_force(&mut self, force: Vec3, torque: Vec3) {
        if self.is_static() { return; }
        self.force += force;
        self.torque += torque;
    }

    #[inline] pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Impulse `j` applied at offset `r` from the centre.
    pub fn apply_impulse_at(&mut self, j: Vec3, r: Vec3) {
        if self.is_static() { return; }
        self.vel.lin += j * self.mass.inv_mass;
        self.vel.ang += self.inv_inertia_world() * r.cross(j);
    }

    #[inline] pub fn apply_position_delta(&mut self, dp: Vec3) {
        if self.is_static() { return; }
        self.pose.pos += dp;
    }
}
