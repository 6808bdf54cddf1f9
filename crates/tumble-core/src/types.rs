use glam::{DMat3, DQuat, DVec3};
use crate::Scalar;

pub type Vec3 = DVec3;
pub type Mat3 = DMat3;
pub type Quat = DQuat;

#[inline] pub fn vec3(x: Scalar, y: Scalar, z: Scalar) -> Vec3 { Vec3::new(x, y, z) }
#[inline] pub fn iso(pos: Vec3, rot: Quat) -> Isometry { Isometry { pos, rot } }

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Isometry { pub pos: Vec3, pub rot: Quat }

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Velocity { pub lin: Vec3, pub ang: Vec3 }

impl Default for Isometry {
    fn default() -> Self { Self { pos: Vec3::ZERO, rot: Quat::IDENTITY } }
}

impl Isometry {
    #[inline] pub fn is_finite(&self) -> bool { self.pos.is_finite() && self.rot.is_finite() }
    /// World point -> local frame of this pose.
    #[inline] pub fn to_local(&self, p: Vec3) -> Vec3 { self.rot.inverse() * (p - self.pos) }
    #[inline] pub fn to_world(&self, p: Vec3) -> Vec3 { self.pos + self.rot * p }
}

impl Velocity {
    #[inline] pub fn is_finite(&self) -> bool { self.lin.is_finite() && self.ang.is_finite() }
}
