//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container for scenes.
//
// Contains state data that scenes read/write:
// - input: this tick's axes, actions and raw key state
// - scene_transitions: command queue for scene changes
// - time: tick counter and elapsed simulation time
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::{Action, FrameInput};
use crate::core::scene::{SceneKey, TransitionQueue};

//=== FrameTime ===========================================================

/// Timing of the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Number of the current tick, starting at 1.
    pub tick: u64,

    /// Frame time of this tick in seconds.
    pub dt: f32,

    /// Simulated seconds since start, including this tick.
    pub elapsed: f64,
}

//=== GlobalContext =======================================================

/// Shared context data accessible to scenes during updates.
///
/// Scenes receive `&GlobalContext` in lifecycle hooks and `&mut` in
/// `update` / `fixed_update`. This separates scene-accessible data from
/// internal engine systems.
#[derive(Debug)]
pub struct GlobalContext<S: SceneKey, A: Action> {
    /// Input snapshot for this tick. Read it through `InputSource`.
    pub input: FrameInput<A>,

    /// Transition queue for scene changes.
    ///
    /// Scenes queue transitions here during updates. The scene manager
    /// processes this queue at tick boundaries.
    pub scene_transitions: TransitionQueue<S>,

    /// Timing of the current tick.
    pub time: FrameTime,
}

impl<S: SceneKey, A: Action> GlobalContext<S, A> {
    /// Creates a new context with empty state.
    pub(crate) fn new() -> Self {
        Self {
            input: FrameInput::new(),
            scene_transitions: TransitionQueue::new(),
            time: FrameTime::default(),
        }
    }

    pub(crate) fn advance_time(&mut self, dt: f32) {
        self.time.tick += 1;
        self.time.dt = dt;
        self.time.elapsed += f64::from(dt);
    }
}
