//=========================================================================
// Collision Shapes
//=========================================================================
//
// Rays and axis-aligned boxes, plus the slab-method intersection test
// shared by ray queries and pick tests.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Constants ===========================================================

/// Overlap tolerance. Boxes touching within this distance do not overlap,
/// which lets a body rest flush against a wall or floor.
pub const CONTACT_EPSILON: f32 = 1e-4;

/// Stand-in for 1/0 on axis-parallel rays (avoids inf * 0 = NaN).
const INV_DIR_LIMIT: f32 = 1e8;

//=== Ray =================================================================

/// Half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray; `direction` is normalized (zero stays zero).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

//=== Aabb ================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Entry point of a ray into a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayEntry {
    pub distance: f32,
    pub normal: Vec3,
}

impl Aabb {
    /// Creates a box from two opposite corners in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Strict overlap test (touching faces do not count).
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x - CONTACT_EPSILON
            && self.max.x > other.min.x + CONTACT_EPSILON
            && self.min.y < other.max.y - CONTACT_EPSILON
            && self.max.y > other.min.y + CONTACT_EPSILON
            && self.min.z < other.max.z - CONTACT_EPSILON
            && self.max.z > other.min.z + CONTACT_EPSILON
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Ray-AABB intersection using the slab method.
    ///
    /// Returns where the ray enters the box. A ray that starts inside the
    /// box never hits it: a pick ray cast from inside the player's own
    /// collider sees through it.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayEntry> {
        let inv = Vec3::new(
            inverse_component(ray.direction.x),
            inverse_component(ray.direction.y),
            inverse_component(ray.direction.z),
        );

        let t_min = (self.min - ray.origin) * inv;
        let t_max = (self.max - ray.origin) * inv;

        let t1 = t_min.min(t_max);
        let t2 = t_min.max(t_max);

        let t_near = t1.max_element();
        let t_far = t2.min_element();

        if t_far < t_near || t_far < 0.0 || t_near < 0.0 {
            return None;
        }

        // Entry face is the slab that was crossed last
        let axis = if t1.x >= t1.y && t1.x >= t1.z {
            0
        } else if t1.y >= t1.z {
            1
        } else {
            2
        };
        let mut normal = Vec3::ZERO;
        normal[axis] = -ray.direction[axis].signum();

        Some(RayEntry {
            distance: t_near,
            normal,
        })
    }
}

fn inverse_component(d: f32) -> f32 {
    if d.abs() < 1e-8 {
        INV_DIR_LIMIT
    } else {
        1.0 / d
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
