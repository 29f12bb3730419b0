//=========================================================================
// Movement Controller
//=========================================================================
//
// First-person player control.
//
// Responsibilities:
// - Sample the movement axes every frame into a planar input vector
// - Turn the body about +Y by horizontal pointer movement
// - On Interact, cast the screen-centre ray and show any note it hits
// - On CloseNote, close an open note
// - On every fixed step, move the body by facing · input · speed · dt
//
// Frame / Step Split:
// ```text
//   look()            pointer dx · sensitivity → yaw about +Y
//   update(dt)        axes → input (x = Horizontal, z = Vertical, y = 0)
//                     Interact → camera ray → physics → entity → presenter
//   fixed_update(dt)  body.position + rotation · input · speed · dt
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};
use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::camera::Camera;
use super::presenter::{NotePanel, NotePresenter};
use super::NoteAction;
use crate::core::entity::{EntityId, EntityStore};
use crate::core::input::{Axis, InputSource};
use crate::core::physics::{BodyHandle, PhysicsWorld, Transform};
use crate::error::{NotesError, Result};

//=== MovementController ==================================================

#[derive(Debug, Clone)]
pub struct MovementController {
    body: BodyHandle,
    input: Vec3,
    speed: f32,
    look_sensitivity: f32,
    interact_distance: f32,
}

impl MovementController {
    /// Units per second at full deflection.
    pub const DEFAULT_SPEED: f32 = 5.0;

    /// Radians of yaw per pixel of horizontal pointer movement.
    pub const DEFAULT_LOOK_SENSITIVITY: f32 = 0.003;

    /// Binds a controller to a body of `physics`.
    ///
    /// The handle is checked once here. The world never removes bodies,
    /// so it stays valid afterwards.
    pub fn new<W>(body: BodyHandle, physics: &W) -> Result<Self>
    where
        W: PhysicsWorld + ?Sized,
    {
        if !physics.contains_body(body) {
            return Err(NotesError::UnknownBody);
        }

        Ok(Self {
            body,
            input: Vec3::ZERO,
            speed: Self::DEFAULT_SPEED,
            look_sensitivity: Self::DEFAULT_LOOK_SENSITIVITY,
            interact_distance: f32::INFINITY,
        })
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Zero disables turning.
    pub fn with_look_sensitivity(mut self, sensitivity: f32) -> Self {
        self.look_sensitivity = sensitivity;
        self
    }

    /// Limits how far a note can be read from. Unlimited by default.
    pub fn with_interact_distance(mut self, distance: f32) -> Self {
        self.interact_distance = distance;
        self
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Input vector sampled in the last `update`.
    pub fn input(&self) -> Vec3 {
        self.input
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    //--- Per Frame --------------------------------------------------------

    /// Turns the body by this frame's horizontal pointer movement.
    /// Positive movement turns right. Returns the new facing.
    pub fn look<I, W>(&self, input: &I, physics: &mut W) -> Quat
    where
        I: InputSource<NoteAction> + ?Sized,
        W: PhysicsWorld + ?Sized,
    {
        let rotation = physics.body_transform(self.body).rotation;
        let (dx, _) = input.pointer_delta();
        let yaw = dx * self.look_sensitivity;
        if yaw == 0.0 || !yaw.is_finite() {
            return rotation;
        }

        let turned = Quat::from_rotation_y(yaw) * rotation;
        physics.set_body_rotation(self.body, turned);
        turned
    }

    /// Samples input and handles note interaction.
    pub fn update<I, W, P>(
        &mut self,
        input: &I,
        physics: &W,
        entities: &EntityStore,
        camera: &Camera,
        presenter: &mut NotePresenter<P>,
    ) where
        I: InputSource<NoteAction> + ?Sized,
        W: PhysicsWorld + ?Sized,
        P: NotePanel,
    {
        self.input = Vec3::new(
            input.axis(Axis::Horizontal).clamp(-1.0, 1.0),
            0.0,
            input.axis(Axis::Vertical).clamp(-1.0, 1.0),
        );

        if input.triggered(NoteAction::Interact) {
            self.read_at_centre(physics, entities, camera, presenter);
        }

        if input.triggered(NoteAction::CloseNote) && presenter.is_open() {
            presenter.close();
        }
    }

    /// Casts the centre ray and displays the note it hits, if any.
    /// Returns the entity that was read.
    fn read_at_centre<W, P>(
        &self,
        physics: &W,
        entities: &EntityStore,
        camera: &Camera,
        presenter: &mut NotePresenter<P>,
    ) -> Option<EntityId>
    where
        W: PhysicsWorld + ?Sized,
        P: NotePanel,
    {
        let ray = camera.viewport_point_to_ray(Camera::CENTER);
        let Some(hit) = physics.cast_ray(&ray, self.interact_distance) else {
            debug!("Read ray hit nothing");
            return None;
        };

        let entity = hit.entity?;
        let Some(readable) = entities.readable(entity) else {
            debug!(
                "Read ray hit {:?} ({}) at {:.2}, nothing to read",
                entity,
                entities.name(entity).unwrap_or("unnamed"),
                hit.distance
            );
            return None;
        };

        presenter.display(&readable.read());
        info!("Clicked {}", entities.name(entity).unwrap_or("unnamed"));
        Some(entity)
    }

    //--- Per Fixed Step ---------------------------------------------------

    /// World-space displacement for one step from `transform`.
    pub fn displacement(&self, transform: &Transform, dt: f32) -> Vec3 {
        transform.transform_direction(self.input) * self.speed * dt
    }

    /// Moves the body one step. Returns the resolved position.
    ///
    /// # Panics
    /// If `physics` is not the world the controller was created with.
    pub fn fixed_update<W>(&mut self, physics: &mut W, dt: f32) -> Vec3
    where
        W: PhysicsWorld + ?Sized,
    {
        let transform = physics.body_transform(self.body);
        let target = transform.position + self.displacement(&transform, dt);
        physics.move_position(self.body, target)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
