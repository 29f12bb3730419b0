//=========================================================================
// Collision World
//=========================================================================
//
// Box-based collision world for a first-person prototype.
//
// Responsibilities:
// - Store static colliders (level geometry and props)
// - Store kinematic bodies driven by gameplay code
// - Answer nearest-hit ray queries
// - Resolve kinematic moves against static geometry, one axis at a time
//
// Bodies are never removed, so a `BodyHandle` stays valid for the life of
// the world it came from.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};
use log::trace;

//=== Internal Dependencies ===============================================

use super::shapes::{Aabb, Ray};
use super::{BodyHandle, PhysicsWorld, RayHit, Transform};
use crate::core::entity::EntityId;

//=== Handles & Descriptors ===============================================

/// Handle to a static collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(usize);

/// Description of a kinematic body to add to the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub position: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
    pub entity: Option<EntityId>,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            half_extents: Vec3::new(0.3, 0.9, 0.3),
            entity: None,
        }
    }
}

#[derive(Debug)]
struct StaticCollider {
    bounds: Aabb,
    entity: Option<EntityId>,
}

#[derive(Debug)]
struct KinematicBody {
    position: Vec3,
    rotation: Quat,
    half_extents: Vec3,
    entity: Option<EntityId>,
}

impl KinematicBody {
    fn bounds_at(&self, position: Vec3) -> Aabb {
        Aabb::from_center_half_extents(position, self.half_extents)
    }
}

//=== CollisionWorld ======================================================

/// Static boxes plus kinematic bodies.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    statics: Vec<StaticCollider>,
    bodies: Vec<KinematicBody>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Construction -----------------------------------------------------

    /// Adds a static box, optionally tied to a scene entity.
    pub fn add_static(&mut self, bounds: Aabb, entity: Option<EntityId>) -> ColliderHandle {
        self.statics.push(StaticCollider { bounds, entity });
        ColliderHandle(self.statics.len() - 1)
    }

    /// Adds a kinematic body.
    pub fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        self.bodies.push(KinematicBody {
            position: desc.position,
            rotation: desc.rotation.normalize(),
            half_extents: desc.half_extents.abs(),
            entity: desc.entity,
        });
        BodyHandle(self.bodies.len() - 1)
    }

    //--- Queries ----------------------------------------------------------

    pub fn static_count(&self) -> usize {
        self.statics.len()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn static_bounds(&self, collider: ColliderHandle) -> Option<Aabb> {
        self.statics.get(collider.0).map(|s| s.bounds)
    }

    /// World bounds of a body.
    ///
    /// # Panics
    /// If `body` did not come from this world.
    pub fn body_bounds(&self, body: BodyHandle) -> Aabb {
        let body = &self.bodies[body.0];
        body.bounds_at(body.position)
    }
}

//=== PhysicsWorld Impl ===================================================

impl PhysicsWorld for CollisionWorld {
    fn cast_ray(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        let statics = self
            .statics
            .iter()
            .filter_map(|s| s.bounds.intersect_ray(ray).map(|entry| (entry, s.entity)));

        let bodies = self.bodies.iter().filter_map(|b| {
            b.bounds_at(b.position)
                .intersect_ray(ray)
                .map(|entry| (entry, b.entity))
        });

        statics
            .chain(bodies)
            .filter(|(entry, _)| entry.distance <= max_distance)
            .min_by(|(a, _), (b, _)| a.distance.total_cmp(&b.distance))
            .map(|(entry, entity)| RayHit {
                point: ray.at(entry.distance),
                normal: entry.normal,
                distance: entry.distance,
                entity,
            })
    }

    fn contains_body(&self, body: BodyHandle) -> bool {
        body.0 < self.bodies.len()
    }

    fn body_transform(&self, body: BodyHandle) -> Transform {
        let body = &self.bodies[body.0];
        Transform {
            position: body.position,
            rotation: body.rotation,
        }
    }

    fn set_body_rotation(&mut self, body: BodyHandle, rotation: Quat) {
        self.bodies[body.0].rotation = rotation.normalize();
    }

    fn move_position(&mut self, body: BodyHandle, target: Vec3) -> Vec3 {
        let index = body.0;
        let start = self.bodies[index].position;
        let half = self.bodies[index].half_extents;
        let start_bounds = self.bodies[index].bounds_at(start);
        let delta = target - start;

        // Geometry the body already intersects is ignored so it can walk out
        let blockers: Vec<Aabb> = self
            .statics
            .iter()
            .map(|s| s.bounds)
            .filter(|bounds| !start_bounds.overlaps(bounds))
            .collect();

        let mut position = start;
        for axis in 0..3 {
            let step = delta[axis];
            if step == 0.0 {
                continue;
            }

            position[axis] += step;
            let moved = Aabb::from_center_half_extents(position, half);

            for blocker in blockers.iter().filter(|b| moved.overlaps(b)) {
                position[axis] = if step > 0.0 {
                    position[axis].min(blocker.min[axis] - half[axis])
                } else {
                    position[axis].max(blocker.max[axis] + half[axis])
                };
            }
        }

        if position != target {
            trace!(target: "physics", "Body {} blocked: {} -> {}", index, target, position);
        }

        self.bodies[index].position = position;
        position
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn player_desc(position: Vec3) -> BodyDesc {
        BodyDesc {
            position,
            half_extents: Vec3::splat(0.5),
            ..BodyDesc::default()
        }
    }

    fn wall_at_z(z: f32) -> Aabb {
        Aabb::new(Vec3::new(-10.0, -10.0, z), Vec3::new(10.0, 10.0, z + 1.0))
    }

    //=====================================================================
    // Ray Query Tests
    //=====================================================================

    #[test]
    fn ray_reports_nearest_hit() {
        let mut world = CollisionWorld::new();
        let near = EntityId::from_raw(1);
        let far = EntityId::from_raw(2);
        world.add_static(wall_at_z(10.0), Some(far));
        world.add_static(wall_at_z(4.0), Some(near));

        let hit = world
            .cast_ray(&Ray::new(Vec3::ZERO, Vec3::Z), f32::INFINITY)
            .expect("ray should hit");

        assert_eq!(hit.entity, Some(near));
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
        assert_eq!(hit.normal, Vec3::NEG_Z);
    }

    #[test]
    fn ray_respects_max_distance() {
        let mut world = CollisionWorld::new();
        world.add_static(wall_at_z(4.0), None);

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(world.cast_ray(&ray, 3.0).is_none());
        assert!(world.cast_ray(&ray, 5.0).is_some());
    }

    #[test]
    fn ray_from_inside_body_sees_past_it() {
        let mut world = CollisionWorld::new();
        let target = EntityId::from_raw(7);
        world.add_body(player_desc(Vec3::ZERO));
        world.add_static(wall_at_z(3.0), Some(target));

        let hit = world
            .cast_ray(&Ray::new(Vec3::new(0.0, 0.2, 0.0), Vec3::Z), f32::INFINITY)
            .expect("ray should hit the wall");
        assert_eq!(hit.entity, Some(target));
    }

    #[test]
    fn ray_hits_other_bodies() {
        let mut world = CollisionWorld::new();
        let other = EntityId::from_raw(3);
        world.add_body(BodyDesc {
            entity: Some(other),
            ..player_desc(Vec3::new(0.0, 0.0, 5.0))
        });

        let hit = world.cast_ray(&Ray::new(Vec3::ZERO, Vec3::Z), f32::INFINITY);
        assert_eq!(hit.and_then(|h| h.entity), Some(other));
    }

    #[test]
    fn empty_world_misses() {
        let world = CollisionWorld::new();
        assert!(world.cast_ray(&Ray::new(Vec3::ZERO, Vec3::Z), f32::INFINITY).is_none());
    }

    //=====================================================================
    // Kinematic Move Tests
    //=====================================================================

    #[test]
    fn free_move_reaches_target() {
        let mut world = CollisionWorld::new();
        let body = world.add_body(player_desc(Vec3::ZERO));

        let resolved = world.move_position(body, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(resolved, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(world.body_transform(body).position, resolved);
    }

    #[test]
    fn move_stops_flush_against_wall() {
        let mut world = CollisionWorld::new();
        world.add_static(wall_at_z(2.0), None);
        let body = world.add_body(player_desc(Vec3::ZERO));

        let resolved = world.move_position(body, Vec3::new(0.0, 0.0, 3.0));
        assert!((resolved.z - 1.5).abs() < 1e-5);

        // Pushing further keeps it in contact
        let again = world.move_position(body, resolved + Vec3::Z);
        assert!((again.z - 1.5).abs() < 1e-5);
    }

    #[test]
    fn blocked_axis_still_slides_along_wall() {
        let mut world = CollisionWorld::new();
        world.add_static(wall_at_z(1.0), None);
        let body = world.add_body(player_desc(Vec3::ZERO));

        let resolved = world.move_position(body, Vec3::new(2.0, 0.0, 2.0));
        assert!((resolved.x - 2.0).abs() < 1e-5);
        assert!((resolved.z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn body_rests_on_floor_while_moving() {
        let mut world = CollisionWorld::new();
        world.add_static(
            Aabb::new(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0)),
            None,
        );
        let body = world.add_body(player_desc(Vec3::new(0.0, 0.5, 0.0)));

        let resolved = world.move_position(body, Vec3::new(0.0, 0.5, 1.0));
        assert!((resolved - Vec3::new(0.0, 0.5, 1.0)).length() < 1e-5);
    }

    #[test]
    fn body_inside_geometry_can_walk_out() {
        let mut world = CollisionWorld::new();
        world.add_static(Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)), None);
        let body = world.add_body(player_desc(Vec3::ZERO));

        let resolved = world.move_position(body, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(resolved, Vec3::new(3.0, 0.0, 0.0));
    }

    //=====================================================================
    // Body Tests
    //=====================================================================

    #[test]
    fn handles_are_scoped_to_world() {
        let mut world = CollisionWorld::new();
        let body = world.add_body(BodyDesc::default());
        assert!(world.contains_body(body));
        assert_eq!(world.body_count(), 1);

        let empty = CollisionWorld::new();
        assert!(!empty.contains_body(body));
    }

    #[test]
    fn rotation_is_stored_normalized() {
        let mut world = CollisionWorld::new();
        let body = world.add_body(BodyDesc::default());
        world.set_body_rotation(body, Quat::from_xyzw(0.0, 2.0, 0.0, 0.0));

        let rotation = world.body_transform(body).rotation;
        assert!((rotation.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn body_bounds_follow_position() {
        let mut world = CollisionWorld::new();
        let body = world.add_body(player_desc(Vec3::ZERO));
        world.move_position(body, Vec3::new(1.0, 0.0, 0.0));

        let bounds = world.body_bounds(body);
        assert_eq!(bounds.center(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(world.static_count(), 0);
    }
}
