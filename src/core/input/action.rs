//=========================================================================
// Action Trait & Input Context
//=========================================================================
//
// Game-defined action trait and input context system.
//
// Actions: opaque identifiers routed by the engine, interpreted by the game.
// Contexts: different bindings for different game states.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Action Trait ========================================================

/// Marker trait for game-defined action enums.
///
/// Actions are high-level commands (read a note, close it) mapped from
/// raw inputs. The engine routes them without interpreting them.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum NoteAction { Interact, CloseNote }
///
/// impl Action for NoteAction {}
/// ```
pub trait Action: 'static + Send + Copy + Eq + Hash + Debug {}

//=== InputContext ========================================================

/// Identifies which set of bindings is active.
///
/// `Primary` is the default gameplay context; `Custom(id)` contexts let a
/// game swap binding sets (for example while a note is open) without
/// rebinding keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputContext {
    /// Default context for primary gameplay.
    #[default]
    Primary,

    /// User-defined context.
    Custom(u32),
}

impl InputContext {
    /// Creates a custom context.
    #[inline]
    pub const fn custom(id: u32) -> Self {
        Self::Custom(id)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
