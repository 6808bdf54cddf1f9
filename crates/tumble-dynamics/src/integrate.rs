use tumble_core::types::{Quat, Vec3};
use tumble_core::Scalar;

use crate::body::Body;

/// v += (g + F/m) dt, w += I^-1 T dt, then clears the accumulators.
/// Static bodies are skipped.
pub fn integrate_forces(body: &mut Body, gravity: Vec3, dt: Scalar) {
    if body.is_static() {
        body.clear_forces();
        return;
    }
    let inv_i = body.inv_inertia_world();
    body.vel.lin += (gravity + body.force * body.inv_mass()) * dt;
    body.vel.ang += inv_i * body.torque * dt;
    body.clear_forces();
}

/// Semi-implicit Euler: uses the velocity already updated by [`integrate_forces`].
pub fn integrate_pose(body: &mut Body, dt: Scalar) {
    if body.is_static() { return; }
    body.pose.pos += body.vel.lin * dt;
    body.pose.rot = integrate_rotation(body.pose.rot, body.vel.ang, dt);
}

/// q' = normalize(q + 0.5 * (w, 0) * q * dt)
#[inline]
pub fn integrate_rotation(q: Quat, w: Vec3, dt: Scalar) -> Quat {
    let spin = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * q;
    renormalize(q + spin * (0.5 * dt))
}

/// Unit quaternion, or identity if `q` is degenerate.
#[inline]
pub fn renormalize(q: Quat) -> Quat {
    let len = q.length();
    if len.is_finite() && len > 1.0e-12 { q / len } else { Quat::IDENTITY }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tumble_core::{vec3, BodyId};
    use tumble_geom::Shape;
    use tumble_materials::MaterialId;
    use crate::BodyDesc;

    const G: Vec3 = Vec3::new(0.0, -9.82, 0.0);

    fn ball(mass: Scalar) -> Body {
        Body::from_desc(BodyId(0), &BodyDesc::new(Shape::sphere(1.0), mass, MaterialId(0), vec3(0.0, 10.0, 0.0)))
    }

    #[test] fn gravity_then_pose() {
        let mut b = ball(5.0);
        let dt = 1.0 / 60.0;
        integrate_forces(&mut b, G, dt);
        integrate_pose(&mut b, dt);
        assert_relative_eq!(b.vel.lin.y, -9.82 * dt);
        // semi-implicit: position uses the new velocity
        assert_relative_eq!(b.pose.pos.y, 10.0 - 9.82 * dt * dt, epsilon = 1e-12);
    }

    #[test] fn force_is_consumed() {
        let mut b = ball(2.0);
        b.add_force(vec3(4.0, 0.0, 0.0), Vec3::ZERO);
        integrate_forces(&mut b, Vec3::ZERO, 0.5);
        assert_relative_eq!(b.vel.lin.x, 1.0);
        assert_eq!(b.force, Vec3::ZERO);
        integrate_forces(&mut b, Vec3::ZERO, 0.5);
        assert_relative_eq!(b.vel.lin.x, 1.0);
    }

    #[test] fn static_never_moves() {
        let mut b = ball(0.0);
        integrate_forces(&mut b, G, 1.0);
        integrate_pose(&mut b, 1.0);
        assert_eq!(b.pose.pos, vec3(0.0, 10.0, 0.0));
        assert_eq!(b.vel.lin, Vec3::ZERO);
    }

    #[test] fn rotation_stays_unit() {
        let mut q = Quat::IDENTITY;
        for _ in 0..1000 { q = integrate_rotation(q, vec3(3.0, -1.0, 7.0), 1.0 / 60.0); }
        assert_relative_eq!(q.length(), 1.0, epsilon = 1e-12);
    }

    #[test] fn degenerate_quat_resets() {
        assert_eq!(renormalize(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)), Quat::IDENTITY);
        assert_eq!(renormalize(Quat::from_xyzw(f64::NAN, 0.0, 0.0, 1.0)), Quat::IDENTITY);
    }
}
