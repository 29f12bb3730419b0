//=========================================================================
// Aetheric Notes: Library Root
//
// A first-person prototype: walk around a room, click a marked object
// to read its note, press Escape to put it down.
//
// Layout:
// - `core`: engine systems (input, scenes, fixed clock, physics, entities)
// - `game`: movement controller, notes, presenter, camera, level scene
// - `config` / `error`: settings file and crate error type
// - `platform` (private): winit window and input capture
//
// Typical usage:
// ```no_run
// use aetheric_notes::{Config, EngineBuilder};
// use aetheric_notes::game::{GameScene, NoteAction};
//
// let config = Config::default();
// EngineBuilder::<GameScene, NoteAction>::from_config(&config)
//     .build()
//     .init(|systems| { /* bind controls, register scenes */ })
//     .run()?;
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` holds the winit integration and is not part of the public
// API. `engine` re-exports through the crate root.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::config::Config;
pub use crate::core::platform_bridge::PlatformError;
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::error::{NotesError, Result};
