//=========================================================================
// Scene System
//=========================================================================
//
// Manages scene lifecycle and stack-based scene switching.
//
// Architecture:
//   SceneManager
//     ├─ scenes: HashMap<S, Box<dyn Scene<S, A>>>
//     └─ stack: Vec<S>
//
// Flow (per tick):
//   update(dt)         → collect_active_scenes() → Scene::update()
//   fixed_update(step) → collect_active_scenes() → Scene::fixed_update()
//   process_transitions()
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::globals::GlobalContext;
use crate::core::input::Action;

//=== Module Declarations =================================================

mod scene_manager;
mod transition_queue;

//=== Public API ==========================================================

pub use scene_manager::{SceneKey, SceneManager, SceneTransition};
pub use transition_queue::TransitionQueue;

//=== Scene Trait =========================================================

/// Defines scene behavior with lifecycle hooks and update logic.
///
/// Scenes are registered in SceneManager and activated via the scene stack.
/// Each scene keeps its own state between activations.
///
/// # Callbacks
///
/// - `update(dt)` runs once per logic tick with the tick's frame time.
///   Sample input and react to actions here.
/// - `fixed_update(step)` runs zero or more times per tick with a
///   constant step. Move bodies here.
///
/// Only `update()` is required:
///
/// ```ignore
/// struct Title;
///
/// impl Scene<GameScene, NoteAction> for Title {
///     fn update(&mut self, context: &mut GlobalContext<GameScene, NoteAction>, _dt: f32) {
///         if context.input.triggered(NoteAction::Interact) {
///             context.scene_transitions.push(SceneTransition::Replace(GameScene::Title, GameScene::Level));
///         }
///     }
/// }
/// ```
pub trait Scene<S: SceneKey, A: Action>: Send {
    /// Called when the scene enters the active stack.
    fn on_enter(&mut self, _context: &GlobalContext<S, A>) {}

    /// Called when the scene leaves the active stack.
    fn on_exit(&mut self, _context: &GlobalContext<S, A>) {}

    /// Called every tick while the scene is active.
    fn update(&mut self, context: &mut GlobalContext<S, A>, dt: f32);

    /// Called once per fixed step while the scene is active.
    fn fixed_update(&mut self, _context: &mut GlobalContext<S, A>, _dt: f32) {}

    /// Whether scenes below this one should receive updates.
    ///
    /// Transparent scenes (e.g., overlays) allow underlying scenes
    /// to continue updating. Opaque scenes block updates to lower stack.
    fn is_transparent(&self) -> bool {
        false
    }
}
