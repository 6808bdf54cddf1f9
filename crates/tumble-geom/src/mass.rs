use tumble_core::types::{Mat3, Vec3};
use tumble_core::Scalar;
use crate::shape::Shape;

/// Mass and local-space inverse inertia for a body. `mass == 0` means static:
/// both inverses are zero, so impulses and forces never move it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MassProps {
    pub mass: Scalar,
    pub inv_mass: Scalar,
    pub inv_inertia_local: Mat3,
}

impl MassProps {
    pub fn infinite() -> Self {
        Self { mass: 0.0, inv_mass: 0.0, inv_inertia_local: Mat3::ZERO }
    }

    /// Solid sphere / solid box of total mass `mass`.
    pub fn from_shape(shape: &Shape, mass: Scalar) -> Self {
        if mass <= 0.0 { return Self::infinite(); }
        let inertia = match *shape {
            Shape::Sphere { radius } => Vec3::splat(0.4 * mass * radius * radius),
            Shape::Box { half } => {
                let dims = half * 2.0;
                let x2 = dims.x * dims.x;
                let y2 = dims.y * dims.y;
                let z2 = dims.z * dims.z;
                Vec3::new(
                    (1.0 / 12.0) * mass * (y2 + z2),
                    (1.0 / 12.0) * mass * (x2 + z2),
                    (1.0 / 12.0) * mass * (x2 + y2),
                )
            }
        };
        Self { mass, inv_mass: 1.0 / mass, inv_inertia_local: Mat3::from_diagonal(inertia.recip()) }
    }

    #[inline] pub fn is_static(&self) -> bool { self.inv_mass == 0.0 }
}
