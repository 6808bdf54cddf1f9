use tumble_core::types::{Isometry, Mat3, Vec3};
use tumble_core::{Scalar, WorldError};
use crate::aabb::Aabb;

/// Collision primitive. Closed set: the loop only ever needs spheres and boxes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere { radius: Scalar },
    Box { half: Vec3 },
}

impl Shape {
    #[inline] pub fn sphere(radius: Scalar) -> Self { Shape::Sphere { radius } }
    #[inline] pub fn cuboid(hx: Scalar, hy: Scalar, hz: Scalar) -> Self { Shape::Box { half: Vec3::new(hx, hy, hz) } }

    /// Every dimension must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), WorldError> {
        let check = |dim: &'static str, value: Scalar| {
            if value.is_finite() && value > 0.0 { Ok(()) } else { Err(WorldError::InvalidShape { dim, value }) }
        };
        match *self {
            Shape::Sphere { radius } => check("radius", radius),
            Shape::Box { half } => {
                check("half_extents.x", half.x)?;
                check("half_extents.y", half.y)?;
                check("half_extents.z", half.z)
            }
        }
    }
}

#[inline]
pub fn aabb_of(shape: &Shape, xf: &Isometry) -> Aabb {
    match *shape {
        Shape::Sphere { radius } => Aabb::from_center_half_extents(xf.pos, Vec3::splat(radius)),
        Shape::Box { half } => {
            let rot = Mat3::from_quat(xf.rot);
            let m = Mat3::from_cols(rot.x_axis.abs(), rot.y_axis.abs(), rot.z_axis.abs());
            Aabb::from_center_half_extents(xf.pos, m * half)
        }
    }
}
