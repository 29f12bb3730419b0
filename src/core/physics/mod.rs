//=========================================================================
// Physics
//=========================================================================
//
// Collision queries and kinematic movement.
//
// Gameplay code talks to physics through the `PhysicsWorld` trait so the
// controller can be driven by the built-in `CollisionWorld` or by a test
// double.
//
//=========================================================================

//=== Submodules ==========================================================

mod collision_world;
mod shapes;

//=== Public API ==========================================================

pub use collision_world::{BodyDesc, ColliderHandle, CollisionWorld};
pub use shapes::{Aabb, Ray, RayEntry, CONTACT_EPSILON};

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::entity::EntityId;

//=== Types ===============================================================

/// Handle to a kinematic body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) usize);

/// Position and facing of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    /// Rotates a local-space direction into world space.
    pub fn transform_direction(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Nearest intersection reported by a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,

    /// Scene entity that owns the struck collider, if any.
    pub entity: Option<EntityId>,
}

//=== PhysicsWorld ========================================================

/// Collision queries and kinematic body control.
pub trait PhysicsWorld {
    /// Nearest hit along `ray` within `max_distance`.
    fn cast_ray(&self, ray: &Ray, max_distance: f32) -> Option<RayHit>;

    /// Whether `body` refers to a body in this world.
    fn contains_body(&self, body: BodyHandle) -> bool;

    /// Current transform of a body. Panics on a foreign handle.
    fn body_transform(&self, body: BodyHandle) -> Transform;

    /// Sets a body's facing. Panics on a foreign handle.
    fn set_body_rotation(&mut self, body: BodyHandle, rotation: Quat);

    /// Moves a body toward `target`, stopping at static geometry.
    /// Returns the resolved position. Panics on a foreign handle.
    fn move_position(&mut self, body: BodyHandle, target: Vec3) -> Vec3;
}

//=========================================================================
// Unit Tests
//=========================================================================
