//=========================================================================
// Global Engine State
//=========================================================================
//
// Separates systems (logic components) from context (shared data).
//
// Architecture:
//   GlobalSystems: InputSystem + SceneManager + FixedTimestep
//                  (owned by orchestrator)
//   GlobalContext: FrameInput + TransitionQueue (passed to scenes)
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod global_systems;

//=== Public API ==========================================================

pub use global_context::{FrameTime, GlobalContext};
pub use global_systems::GlobalSystems;
