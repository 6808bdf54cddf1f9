use tumble_geom::Aabb;

/// Sort-and-sweep on X. Each box scans forward through the sorted list until a
/// box starts past its right edge; candidates then get the full 3-axis test.
/// Non-finite boxes are left out. Pairs come back as `(i, k)` with `i < k`, sorted.
pub fn pairs_sap(aabbs: &[Aabb]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..aabbs.len()).filter(|&i| aabbs[i].is_finite()).collect();
    order.sort_by(|&i, &k| aabbs[i].min.x.total_cmp(&aabbs[k].min.x).then(i.cmp(&k)));

    let mut out = Vec::new();
    for (n, &i) in order.iter().enumerate() {
        let reach = aabbs[i].max.x;
        for &k in order[n + 1..].iter().take_while(|&&k| aabbs[k].min.x <= reach) {
            if aabbs[i].overlaps(&aabbs[k]) {
                out.push((i.min(k), i.max(k)));
            }
        }
    }
    out.sort_unstable();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tumble_core::{vec3, Vec3};

    fn cube(x: f64, y: f64, z: f64) -> Aabb { Aabb::from_center_half_extents(vec3(x, y, z), Vec3::splat(0.5)) }

    fn all_pairs(aabbs: &[Aabb]) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for i in 0..aabbs.len() {
            for k in (i + 1)..aabbs.len() {
                if aabbs[i].is_finite() && aabbs[k].is_finite() && aabbs[i].overlaps(&aabbs[k]) {
                    out.push((i, k));
                }
            }
        }
        out
    }

    #[test] fn matches_all_pairs() {
        let boxes = vec![
            cube(0.0, 0.0, 0.0), cube(0.8, 0.0, 0.0), cube(0.4, 0.9, 0.0),
            cube(5.0, 0.0, 0.0), cube(0.0, 0.0, 0.9), cube(-0.7, 0.2, 0.3),
        ];
        let pairs = pairs_sap(&boxes);
        assert_eq!(pairs, all_pairs(&boxes));
        assert!(pairs.contains(&(0, 1)));
        assert!(!pairs.iter().any(|&(i, k)| i == 3 || k == 3));
    }

    #[test] fn long_box_reaches_past_short_neighbours() {
        // the wide floor starts first and must still pair with the box beyond the gap
        let floor = Aabb::from_center_half_extents(vec3(0.0, -1.0, 0.0), vec3(10.0, 0.6, 10.0));
        let boxes = vec![cube(-3.0, 0.0, 0.0), floor, cube(4.0, 0.0, 0.0)];
        assert_eq!(pairs_sap(&boxes), vec![(0, 1), (1, 2)]);
    }

    #[test] fn nan_boxes_are_skipped() {
        let mut bad = cube(0.0, 0.0, 0.0);
        bad.min.x = f64::NAN;
        let boxes = vec![cube(0.0, 0.0, 0.0), bad, cube(0.5, 0.0, 0.0)];
        assert_eq!(pairs_sap(&boxes), vec![(0, 2)]);
    }
}
