//=========================================================================
// Prelude
//=========================================================================
//
// Re-exports the types most scenes and binaries touch.
//
// Usage:
//   use aetheric_notes::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::config::Config;
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::error::NotesError;

// Global systems and context
pub use crate::core::globals::{GlobalContext, GlobalSystems};

// Input
pub use crate::core::input::{
    Action, Axis, InputContext, InputSource, KeyCode, Modifiers, MouseButton,
};

// Scenes
pub use crate::core::scene::{Scene, SceneKey, SceneTransition};

// Entities and physics
pub use crate::core::entity::{Capability, EntityId, EntityStore, Readable};
pub use crate::core::physics::{Aabb, CollisionWorld, PhysicsWorld, Ray, RayHit};

// Game
pub use crate::game::{
    bind_controls, Camera, ConsolePanel, GameScene, LevelScene, LevelSource, MovementController,
    NoteAction, NoteContent, NoteMarker, NotePanel, NotePresenter, TextPanel,
};
