//! Bounding-volume collision engine.
//!
//! Each hull class gets a hierarchical tree of spheres built once from its
//! dimensions; instances are parameterized by a rigid transform. Pair tests
//! descend both hierarchies simultaneously, pruning subtrees whose enclosing
//! spheres do not overlap under the relative transform, and only test
//! leaf-level spheres once both sides have narrowed to leaves.
//!
//! The test is conservative: coarse levels may briefly overlap without a
//! leaf contact, but a real surface intersection is never missed.

use glam::{DQuat, DVec3};

use depthwatch_core::components::HullProfile;
use depthwatch_core::types::{Orientation, Position};

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
}

impl Sphere {
    fn overlaps(&self, other: &Sphere) -> bool {
        let r = self.radius + other.radius;
        self.center.distance_squared(other.center) <= r * r
    }
}

#[derive(Debug, Clone)]
pub struct BvNode {
    pub sphere: Sphere,
    pub children: Vec<BvNode>,
}

impl BvNode {
    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Sphere hierarchy over one hull class. Read-only during simulation.
#[derive(Debug, Clone)]
pub struct SphereTree {
    pub root: BvNode,
}

/// Collision component: the sphere hierarchy an entity carries.
#[derive(Debug, Clone)]
pub struct BoundingHull {
    pub tree: SphereTree,
}

impl BoundingHull {
    pub fn for_hull(hull: &HullProfile) -> Self {
        Self {
            tree: SphereTree::for_hull(hull),
        }
    }
}

/// Rigid placement of a tree instance in world space.
#[derive(Debug, Clone, Copy)]
pub struct BvTransform {
    pub position: DVec3,
    pub rotation: DQuat,
}

impl BvTransform {
    pub fn new(position: &Position, orientation: &Orientation) -> Self {
        Self {
            position: position.to_dvec3(),
            rotation: orientation.quat(),
        }
    }

    fn apply(&self, s: &Sphere) -> Sphere {
        Sphere {
            center: self.rotation * s.center + self.position,
            radius: s.radius,
        }
    }
}

/// Approximate contact between two hull surfaces. The normal points from
/// B's surface toward A's.
#[derive(Debug, Clone, Copy)]
pub struct ContactPoint {
    pub point: DVec3,
    pub normal: DVec3,
    pub depth: f64,
}

impl SphereTree {
    /// Build the hierarchy for a hull: a chain of leaf spheres laid along
    /// the bow axis (+Y in hull space), grouped pairwise up to a root
    /// sphere enclosing the whole hull.
    pub fn for_hull(hull: &HullProfile) -> Self {
        let half_len = (hull.length_m * 0.5).max(0.1);
        let leaf_r = (hull.width_m.max(hull.draft_m * 2.0) * 0.5).max(0.1);
        Self {
            root: build_segment(-half_len, half_len, leaf_r),
        }
    }

    /// Radius of the root enclosing sphere (broad-phase reject distance).
    pub fn root_radius(&self) -> f64 {
        self.root.sphere.radius
    }
}

/// Recursively cover the hull span [y0, y1] with spheres of radius `leaf_r`.
fn build_segment(y0: f64, y1: f64, leaf_r: f64) -> BvNode {
    let span = y1 - y0;
    let mid = (y0 + y1) * 0.5;
    if span <= leaf_r * 2.0 {
        return BvNode {
            sphere: Sphere {
                center: DVec3::new(0.0, mid, 0.0),
                radius: (span * 0.5).max(leaf_r),
            },
            children: Vec::new(),
        };
    }
    let left = build_segment(y0, mid, leaf_r);
    let right = build_segment(mid, y1, leaf_r);
    BvNode {
        sphere: Sphere {
            center: DVec3::new(0.0, mid, 0.0),
            radius: span * 0.5 + leaf_r,
        },
        children: vec![left, right],
    }
}

/// Test two transformed hierarchies for surface intersection.
pub fn test_pair(
    a: &SphereTree,
    xa: &BvTransform,
    b: &SphereTree,
    xb: &BvTransform,
) -> Option<ContactPoint> {
    descend(&a.root, xa, &b.root, xb)
}

fn descend(na: &BvNode, xa: &BvTransform, nb: &BvNode, xb: &BvTransform) -> Option<ContactPoint> {
    let sa = xa.apply(&na.sphere);
    let sb = xb.apply(&nb.sphere);
    if !sa.overlaps(&sb) {
        return None;
    }

    if na.is_leaf() && nb.is_leaf() {
        return Some(leaf_contact(&sa, &sb));
    }

    // Open the larger volume first so both sides narrow at a similar rate.
    let open_a = !na.is_leaf() && (nb.is_leaf() || na.sphere.radius >= nb.sphere.radius);
    if open_a {
        for child in &na.children {
            if let Some(c) = descend(child, xa, nb, xb) {
                return Some(c);
            }
        }
    } else {
        for child in &nb.children {
            if let Some(c) = descend(na, xa, child, xb) {
                return Some(c);
            }
        }
    }
    None
}

fn leaf_contact(sa: &Sphere, sb: &Sphere) -> ContactPoint {
    let delta = sa.center - sb.center;
    let dist = delta.length();
    let normal = if dist > 1e-9 { delta / dist } else { DVec3::Z };
    let depth = sa.radius + sb.radius - dist;
    let surface_a = sa.center - normal * sa.radius;
    let surface_b = sb.center + normal * sb.radius;
    ContactPoint {
        point: (surface_a + surface_b) * 0.5,
        normal,
        depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hull(length: f64, width: f64, draft: f64) -> HullProfile {
        HullProfile {
            length_m: length,
            width_m: width,
            draft_m: draft,
            displacement_kg: 1.0e6,
            hull_strength: 100.0,
        }
    }

    fn at(x: f64, y: f64) -> BvTransform {
        BvTransform {
            position: DVec3::new(x, y, 0.0),
            rotation: DQuat::IDENTITY,
        }
    }

    #[test]
    fn test_tree_covers_hull_length() {
        let tree = SphereTree::for_hull(&hull(120.0, 12.0, 6.0));
        assert!(tree.root_radius() >= 60.0);
        // Leaves exist and are smaller than the root.
        fn max_depth(n: &BvNode) -> usize {
            1 + n.children.iter().map(max_depth).max().unwrap_or(0)
        }
        assert!(max_depth(&tree.root) >= 3, "long hull should subdivide");
    }

    #[test]
    fn test_pair_hit_and_miss() {
        let tree = SphereTree::for_hull(&hull(100.0, 10.0, 5.0));
        // Side by side, 8 m apart: hull half-widths are 5 m each, so surfaces touch.
        let hit = test_pair(&tree, &at(0.0, 0.0), &tree, &at(8.0, 0.0));
        assert!(hit.is_some(), "overlapping hulls must intersect");

        let miss = test_pair(&tree, &at(0.0, 0.0), &tree, &at(50.0, 0.0));
        assert!(miss.is_none(), "separated hulls must not intersect");
    }

    #[test]
    fn test_pair_symmetry() {
        let a = SphereTree::for_hull(&hull(100.0, 10.0, 5.0));
        let b = SphereTree::for_hull(&hull(60.0, 8.0, 4.0));
        for dx in [0.0, 5.0, 9.0, 14.0, 30.0, 80.0] {
            let ab = test_pair(&a, &at(0.0, 0.0), &b, &at(dx, 20.0)).is_some();
            let ba = test_pair(&b, &at(dx, 20.0), &a, &at(0.0, 0.0)).is_some();
            assert_eq!(ab, ba, "symmetry broken at dx={dx}");
        }
    }

    #[test]
    fn test_rotation_matters() {
        // Two long thin hulls crossing at right angles through the same
        // point must intersect; parallel and offset beyond beam must not.
        let tree = SphereTree::for_hull(&hull(100.0, 6.0, 3.0));
        let crossed = BvTransform {
            position: DVec3::new(0.0, 0.0, 0.0),
            rotation: DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2),
        };
        assert!(test_pair(&tree, &at(0.0, 0.0), &tree, &crossed).is_some());

        let offset_parallel = at(20.0, 0.0);
        assert!(test_pair(&tree, &at(0.0, 0.0), &tree, &offset_parallel).is_none());
    }

    #[test]
    fn test_contact_normal_points_from_b_to_a() {
        let tree = SphereTree::for_hull(&hull(40.0, 8.0, 4.0));
        let contact = test_pair(&tree, &at(6.0, 0.0), &tree, &at(0.0, 0.0)).unwrap();
        assert!(contact.normal.x > 0.9, "normal should point toward A (+x)");
        assert!(contact.depth > 0.0);
    }
}
