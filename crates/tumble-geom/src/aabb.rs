use tumble_core::types::Vec3;

/// World-space axis-aligned bounds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb { pub min: Vec3, pub max: Vec3 }

impl Aabb {
    #[inline] pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self { min: center - half, max: center + half }
    }

    #[inline] pub fn is_finite(&self) -> bool { self.min.is_finite() && self.max.is_finite() }

    /// Closed intervals on every axis: touching faces overlap, NaN never does.
    #[inline] pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tumble_core::vec3;

    #[test] fn touching_counts_as_overlap() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_half_extents(vec3(2.0, 0.0, 0.0), Vec3::ONE);
        assert!(a.overlaps(&b) && b.overlaps(&a));
        let c = Aabb::from_center_half_extents(vec3(2.1, 0.0, 0.0), Vec3::ONE);
        assert!(!a.overlaps(&c));
    }

    #[test] fn separated_on_one_axis_is_enough() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_half_extents(vec3(0.5, 0.5, 3.0), Vec3::ONE);
        assert!(!a.overlaps(&b));
    }

    #[test] fn nan_bounds_never_overlap() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        let mut b = a;
        b.min.y = f64::NAN;
        assert!(!b.is_finite());
        assert!(!a.overlaps(&b));
    }
}
