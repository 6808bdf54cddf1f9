use tracing::trace;
use tumble_collision::Manifold;
use tumble_core::types::Vec3;
use tumble_core::{Scalar, SolverConfig};
use tumble_dynamics::{Body, BodySet};
use tumble_materials::ContactMaterial;

/// Narrow-phase result for one body pair, with its combined material.
/// `a`/`b` are indices into the body set; the normal points from a to b.
#[derive(Clone, Debug)]
pub struct PairContact {
    pub a: usize,
    pub b: usize,
    pub manifold: Manifold,
    pub material: ContactMaterial,
}

/// Per contact point solver state. Lever arms are fixed for the substep.
struct Row {
    pair: usize,
    ra: Vec3,
    rb: Vec3,
    t1: Vec3,
    t2: Vec3,
    k_n: Scalar,
    k_t1: Scalar,
    k_t2: Scalar,
    target_vn: Scalar,
    jn: Scalar,
    jt1: Scalar,
    jt2: Scalar,
}

#[inline]
fn effective_mass(a: &Body, b: &Body, ra: Vec3, rb: Vec3, dir: Vec3) -> Scalar {
    let ang_a = (a.inv_inertia_world() * ra.cross(dir)).cross(ra);
    let ang_b = (b.inv_inertia_world() * rb.cross(dir)).cross(rb);
    a.inv_mass() + b.inv_mass() + dir.dot(ang_a + ang_b)
}

#[inline]
fn relative_velocity(a: &Body, b: &Body, ra: Vec3, rb: Vec3) -> Vec3 {
    b.velocity_at(rb) - a.velocity_at(ra)
}

#[inline]
fn push_impulse(a: &mut Body, b: &mut Body, ra: Vec3, rb: Vec3, j: Vec3) {
    a.apply_impulse_at(-j, ra);
    b.apply_impulse_at(j, rb);
}

/// Sequential impulses with accumulated clamping, then one positional
/// correction per pair.
pub fn solve(bodies: &mut BodySet, contacts: &[PairContact], cfg: &SolverConfig) {
    if contacts.is_empty() { return; }

    let mut rows: Vec<Row> = Vec::with_capacity(contacts.len() * 2);
    for (pair, c) in contacts.iter().enumerate() {
        let (a, b) = bodies.pair_mut(c.a, c.b);
        if a.is_static() && b.is_static() { continue; }
        let n = c.manifold.normal;
        let (t1, t2) = orthonormal_basis(n);
        for p in &c.manifold.points {
            let ra = p.point - a.pose.pos;
            let rb = p.point - b.pose.pos;
            let k_n = effective_mass(a, b, ra, rb, n);
            if k_n <= 0.0 { continue; }
            let vn0 = relative_velocity(a, b, ra, rb).dot(n);
            // slow approaches get no bounce so resting contacts stay at rest
            let target_vn = if vn0 < -cfg.restitution_threshold { -c.material.restitution * vn0 } else { 0.0 };
            rows.push(Row {
                pair, ra, rb, t1, t2, k_n,
                k_t1: effective_mass(a, b, ra, rb, t1),
                k_t2: effective_mass(a, b, ra, rb, t2),
                target_vn,
                jn: 0.0, jt1: 0.0, jt2: 0.0,
            });
        }
    }

    for _ in 0..cfg.iterations {
        for row in rows.iter_mut() {
            let c = &contacts[row.pair];
            let n = c.manifold.normal;
            let (a, b) = bodies.pair_mut(c.a, c.b);

            // normal: accumulated impulse never pulls
            let vn = relative_velocity(a, b, row.ra, row.rb).dot(n);
            let jn_new = (row.jn + (row.target_vn - vn) / row.k_n).max(0.0);
            let djn = jn_new - row.jn;
            row.jn = jn_new;
            if djn != 0.0 { push_impulse(a, b, row.ra, row.rb, n * djn); }

            // friction: Coulomb cone on the accumulated tangential impulse
            let vrel = relative_velocity(a, b, row.ra, row.rb);
            let mut jt1 = row.jt1 - vrel.dot(row.t1) / row.k_t1.max(Scalar::EPSILON);
            let mut jt2 = row.jt2 - vrel.dot(row.t2) / row.k_t2.max(Scalar::EPSILON);
            let max_t = c.material.friction * row.jn;
            let len = (jt1 * jt1 + jt2 * jt2).sqrt();
            if len > max_t {
                let scale = if len > 1.0e-12 { max_t / len } else { 0.0 };
                jt1 *= scale;
                jt2 *= scale;
            }
            let dj = row.t1 * (jt1 - row.jt1) + row.t2 * (jt2 - row.jt2);
            row.jt1 = jt1;
            row.jt2 = jt2;
            if dj != Vec3::ZERO { push_impulse(a, b, row.ra, row.rb, dj); }
        }
    }

    for row in &rows {
        let c = &contacts[row.pair];
        trace!(a = ?c.a, b = ?c.b, jn = row.jn, jt1 = row.jt1, jt2 = row.jt2, "contact impulse");
    }

    for c in contacts {
        let (a, b) = bodies.pair_mut(c.a, c.b);
        let denom = a.inv_mass() + b.inv_mass();
        if denom == 0.0 { continue; }
        let corr = (c.manifold.max_depth() - cfg.slop).max(0.0) * cfg.position_correction;
        if corr <= 0.0 { continue; }
        let n = c.manifold.normal;
        a.apply_position_delta(-n * (corr * a.inv_mass() / denom));
        b.apply_position_delta(n * (corr * b.inv_mass() / denom));
    }
}

/// Two unit tangents perpendicular to `n`.
pub(crate) fn orthonormal_basis(n: Vec3) -> (Vec3, Vec3) {
    let ax = n.x.abs(); let ay = n.y.abs(); let az = n.z.abs();
    let base = if ax <= ay && ax <= az { Vec3::X }
    else if ay <= az { Vec3::Y }
    else { Vec3::Z };
    let t1 = base.cross(n).normalize_or_zero();
    let t2 = n.cross(t1);
    (t1, t2)
}
