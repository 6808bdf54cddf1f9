use tumble_core::types::{Isometry, Mat3, Vec3};
use tumble_core::Scalar;
use tumble_geom::Shape;

const EPS: Scalar = 1.0e-9;
const INSIDE_TOL: Scalar = 1.0e-6;
const MAX_POINTS: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactPoint {
    /// World-space point halfway between the two surfaces.
    pub point: Vec3,
    pub depth: Scalar,
}

/// Contact set for one shape pair. `normal` points from A to B.
#[derive(Clone, Debug, PartialEq)]
pub struct Manifold {
    pub normal: Vec3,
    pub points: Vec<ContactPoint>,
}

impl Manifold {
    fn single(normal: Vec3, point: Vec3, depth: Scalar) -> Self {
        Self { normal, points: vec![ContactPoint { point, depth }] }
    }
    fn flipped(mut self) -> Self { self.normal = -self.normal; self }

    pub fn max_depth(&self) -> Scalar {
        self.points.iter().fold(0.0, |m, p| m.max(p.depth))
    }
}

/// Exact test for one candidate pair. `None` means separated or just touching.
pub fn collide(sa: &Shape, xa: &Isometry, sb: &Shape, xb: &Isometry) -> Option<Manifold> {
    match (*sa, *sb) {
        (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => sphere_sphere(xa.pos, ra, xb.pos, rb),
        (Shape::Sphere { radius }, Shape::Box { half }) => sphere_box(xa.pos, radius, xb, half).map(Manifold::flipped),
        (Shape::Box { half }, Shape::Sphere { radius }) => sphere_box(xb.pos, radius, xa, half),
        (Shape::Box { half: ha }, Shape::Box { half: hb }) => box_box(xa, ha, xb, hb),
    }
}

fn sphere_sphere(pa: Vec3, ra: Scalar, pb: Vec3, rb: Scalar) -> Option<Manifold> {
    let d = pb - pa;
    let dist2 = d.length_squared();
    let rsum = ra + rb;
    if dist2 >= rsum * rsum { return None; }
    let dist = dist2.sqrt();
    let normal = if dist > 1.0e-6 { d / dist } else { Vec3::X };
    let depth = rsum - dist;
    Some(Manifold::single(normal, pa + normal * (ra - 0.5 * depth), depth))
}

/// Normal points from the box to the sphere. Works in the box's local frame,
/// so rotated boxes need no special casing.
fn sphere_box(center: Vec3, r: Scalar, bx: &Isometry, half: Vec3) -> Option<Manifold> {
    let c = bx.to_local(center);
    let q = c.clamp(-half, half);
    let diff = c - q;
    let dist2 = diff.length_squared();

    let (n_local, depth, surface_local) = if dist2 > EPS * EPS {
        if dist2 >= r * r { return None; }
        let dist = dist2.sqrt();
        (diff / dist, r - dist, q)
    } else {
        // centre inside the box: leave through the nearest face
        let gap = half - c.abs();
        let axis = if gap.x <= gap.y && gap.x <= gap.z { 0 } else if gap.y <= gap.z { 1 } else { 2 };
        let s = if c[axis] < 0.0 { -1.0 } else { 1.0 };
        let mut n = Vec3::ZERO;
        n[axis] = s;
        let mut on_face = c;
        on_face[axis] = s * half[axis];
        (n, r + gap[axis], on_face)
    };

    let normal = bx.rot * n_local;
    let surface = bx.to_world(surface_local);
    Some(Manifold::single(normal, surface + normal * (0.5 * depth), depth))
}

#[inline]
fn axes_of(rot: Mat3) -> [Vec3; 3] { [rot.x_axis, rot.y_axis, rot.z_axis] }

/// Half-length of an oriented box projected onto `axis`.
#[inline]
fn project(axes: &[Vec3; 3], half: Vec3, axis: Vec3) -> Scalar {
    axes[0].dot(axis).abs() * half.x + axes[1].dot(axis).abs() * half.y + axes[2].dot(axis).abs() * half.z
}

fn corners(xf: &Isometry, half: Vec3) -> [Vec3; 8] {
    let mut out = [Vec3::ZERO; 8];
    let mut i = 0;
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                out[i] = xf.to_world(Vec3::new(sx * half.x, sy * half.y, sz * half.z));
                i += 1;
            }
        }
    }
    out
}

#[inline]
fn inside(xf: &Isometry, half: Vec3, p: Vec3) -> bool {
    let l = xf.to_local(p).abs();
    l.x <= half.x + INSIDE_TOL && l.y <= half.y + INSIDE_TOL && l.z <= half.z + INSIDE_TOL
}

/// Oriented-box SAT over the 15 candidate axes. Face axes win ties against
/// edge-edge axes so resting stacks keep a stable face normal.
fn box_box(xa: &Isometry, ha: Vec3, xb: &Isometry, hb: Vec3) -> Option<Manifold> {
    let axes_a = axes_of(Mat3::from_quat(xa.rot));
    let axes_b = axes_of(Mat3::from_quat(xb.rot));
    let d = xb.pos - xa.pos;

    let mut candidates: Vec<(Vec3, bool)> = Vec::with_capacity(15);
    candidates.extend(axes_a.iter().map(|&a| (a, false)));
    candidates.extend(axes_b.iter().map(|&b| (b, false)));
    for a in axes_a {
        for b in axes_b {
            let c = a.cross(b);
            let l2 = c.length_squared();
            if l2 > 1.0e-10 { candidates.push((c / l2.sqrt(), true)); }
        }
    }

    let mut depth = Scalar::INFINITY;
    let mut normal = Vec3::Y;
    for (axis, is_edge) in candidates {
        let along = d.dot(axis);
        let overlap = project(&axes_a, ha, axis) + project(&axes_b, hb, axis) - along.abs();
        if overlap <= 0.0 { return None; }
        let better = if is_edge { overlap < depth * 0.95 - 1.0e-4 } else { overlap < depth };
        if better {
            depth = overlap;
            normal = if along < 0.0 { -axis } else { axis };
        }
    }

    // Penetrating corners of either box, measured along the chosen normal.
    let top_a = xa.pos.dot(normal) + project(&axes_a, ha, normal);
    let bottom_b = xb.pos.dot(normal) - project(&axes_b, hb, normal);
    let mut points: Vec<ContactPoint> = Vec::with_capacity(16);
    for v in corners(xb, hb) {
        let pen = top_a - v.dot(normal);
        if pen > 0.0 && inside(xa, ha, v) {
            let pen = pen.min(depth);
            points.push(ContactPoint { point: v + normal * (0.5 * pen), depth: pen });
        }
    }
    for v in corners(xa, ha) {
        let pen = v.dot(normal) - bottom_b;
        if pen > 0.0 && inside(xb, hb, v) {
            let pen = pen.min(depth);
            points.push(ContactPoint { point: v - normal * (0.5 * pen), depth: pen });
        }
    }
    points.sort_by(|p, q| q.depth.total_cmp(&p.depth));
    points.truncate(MAX_POINTS);

    if points.is_empty() {
        // edge-edge: no corner is inside the other box
        let point = xa.pos + normal * (project(&axes_a, ha, normal) - 0.5 * depth);
        points.push(ContactPoint { point, depth });
    }
    Some(Manifold { normal, points })
}
