//=========================================================================
// Global Systems
//=========================================================================
//
// Container for engine-level systems with logic.
//
// Contains systems that process input, manage scenes, and pace the
// fixed physics step. Systems operate on GlobalContext data.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::clock::FixedTimestep;
use crate::core::input::{Action, InputEvent, InputSystem};
use crate::core::scene::{SceneKey, SceneManager};

//=== GlobalSystems =======================================================

/// Container for engine-level logic systems.
///
/// # Available Systems
///
/// - `input`: bindings, action mapping and virtual axes
/// - `scene_manager`: stack-based scene lifecycle manager
/// - `timestep`: accumulator that paces `fixed_update`
pub struct GlobalSystems<S: SceneKey, A: Action> {
    /// The input system for action mapping and input processing.
    pub input: InputSystem<A>,

    /// The scene manager for scene lifecycle and stack management.
    pub scene_manager: SceneManager<S, A>,

    /// Fixed-step accumulator driving `Scene::fixed_update`.
    pub timestep: FixedTimestep,
}

impl<S: SceneKey, A: Action> GlobalSystems<S, A> {
    /// Creates a new systems container with default-initialized systems.
    ///
    /// Users access systems via [`crate::Engine::init`].
    pub(crate) fn new(timestep: FixedTimestep) -> Self {
        Self {
            input: InputSystem::new(),
            scene_manager: SceneManager::new(),
            timestep,
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one logic tick.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Input**: fold event batches into `context.input`
    /// 2. **Scene Update**: `update(dt)` on active scenes
    /// 3. **Fixed Steps**: `fixed_update(step)` once per accumulated step
    /// 4. **Transitions**: apply queued scene transitions
    pub(crate) fn update(
        &mut self,
        context: &mut GlobalContext<S, A>,
        batches: &[Vec<InputEvent>],
        dt: f32,
    ) {
        context.advance_time(dt);

        // 1. Process input events into state, actions and axes
        self.input.process_frame(&mut context.input, batches, dt);

        // 2. Per-frame scene logic
        self.scene_manager.update(context, dt);

        // 3. Fixed physics steps
        let step = self.timestep.step();
        for _ in 0..self.timestep.advance(dt) {
            self.scene_manager.fixed_update(context, step);
        }

        // 4. Process scene transitions
        self.scene_manager.process_transitions(context);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
