//=========================================================================
// Game
//=========================================================================
//
// The note-reading prototype built on the engine layer.
//
// Components:
// - `movement`: first-person controller (axes, read ray, fixed-step move)
// - `note`: note assets, markers and the note library
// - `presenter`: note panel and open flag
// - `camera`: view used for the screen-centre ray
// - `level`: level definitions and the playable scene
//
//=========================================================================

//=== Module Declarations =================================================

pub mod camera;
pub mod level;
pub mod movement;
pub mod note;
pub mod presenter;

//=== Public API ==========================================================

pub use camera::Camera;
pub use level::{LevelDefinition, LevelScene, LevelSource};
pub use movement::MovementController;
pub use note::{NoteContent, NoteLibrary, NoteMarker, SharedNote};
pub use presenter::{ConsolePanel, NotePanel, NotePresenter, TextPanel};

//=== Internal Dependencies ===============================================

use crate::config::InputConfig;
use crate::core::input::{Action, Axis, InputContext, InputSystem, KeyCode};
use crate::core::scene::SceneKey;

//=== Keys & Actions ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameScene {
    Level,
}

impl SceneKey for GameScene {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteAction {
    /// Read whatever is under the crosshair.
    Interact,

    /// Put the open note down.
    CloseNote,

    /// Rebuild the level from its files.
    ReloadLevel,
}

impl Action for NoteAction {}

//=== Bindings ============================================================

/// Installs movement axes (WASD and arrows) and the configured buttons.
pub fn bind_controls(input: &mut InputSystem<NoteAction>, config: &InputConfig) {
    input.bind_axis(Axis::Horizontal, KeyCode::KeyD, KeyCode::KeyA);
    input.bind_axis(Axis::Horizontal, KeyCode::ArrowRight, KeyCode::ArrowLeft);
    input.bind_axis(Axis::Vertical, KeyCode::KeyW, KeyCode::KeyS);
    input.bind_axis(Axis::Vertical, KeyCode::ArrowUp, KeyCode::ArrowDown);
    input.set_axis_smoothing(config.smoothing);

    let ctx = InputContext::Primary;
    input.bind_mouse(config.interact_button, NoteAction::Interact, ctx);
    input.bind_key(config.close_key, NoteAction::CloseNote, ctx);
    input.bind_key(config.reload_key, NoteAction::ReloadLevel, ctx);
}

//=========================================================================
// Unit Tests
//=========================================================================
