//=========================================================================
// Input System
//
// High-level input handling for the logic thread.
//
// Responsibilities:
// - Fold each frame's event batches into the `StateTracker`
// - Resolve press edges into game actions (`ActionMapper`)
// - Evaluate virtual axes (`AxisMapper`)
// - Publish the result as a `FrameInput` that scenes read through the
//   `InputSource` trait
//
// Frame Pipeline:
// ```text
//   Vec<Vec<InputEvent>> ──► StateTracker ──┬─► ActionMapper ──► actions
//                                            └─► AxisMapper   ──► axes
//                                                         ↓
//                                                    FrameInput<A>
// ```
//
//=========================================================================

//=== Submodules ==========================================================

mod action;
mod action_mapper;
mod axis;
pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use action::{Action, InputContext};
pub use axis::{Axis, AxisSmoothing};
pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use state_tracker::StateTracker;

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::trace;

//=== Internal Dependencies ===============================================

use action_mapper::ActionMapper;
use axis::AxisMapper;

//=== InputSource =========================================================

/// Per-frame input as seen by gameplay code.
///
/// Axis values lie in [-1, 1]. `triggered` has press-this-frame
/// semantics: it is `true` for exactly one frame per press.
pub trait InputSource<A: Action> {
    /// Current value of a virtual axis (0 when unbound).
    fn axis(&self, axis: Axis) -> f32;

    /// Whether the action fired this frame.
    fn triggered(&self, action: A) -> bool;

    /// Pointer movement since the previous frame, in pixels (+x right,
    /// +y down).
    fn pointer_delta(&self) -> (f32, f32) {
        (0.0, 0.0)
    }
}

//=== FrameInput ==========================================================

/// Input snapshot for the current frame, shared with scenes.
#[derive(Debug)]
pub struct FrameInput<A: Action> {
    state: StateTracker,
    actions: Vec<A>,
    axes: HashMap<Axis, f32>,
}

impl<A: Action> FrameInput<A> {
    pub fn new() -> Self {
        Self {
            state: StateTracker::new(),
            actions: Vec::new(),
            axes: HashMap::new(),
        }
    }

    /// Raw key/button state for queries the action layer does not cover.
    pub fn state(&self) -> &StateTracker {
        &self.state
    }

    /// Actions fired this frame, in key-then-button order.
    pub fn actions(&self) -> &[A] {
        &self.actions
    }
}

impl<A: Action> Default for FrameInput<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> InputSource<A> for FrameInput<A> {
    fn axis(&self, axis: Axis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    fn triggered(&self, action: A) -> bool {
        self.actions.contains(&action)
    }

    fn pointer_delta(&self) -> (f32, f32) {
        self.state.mouse_delta()
    }
}

//=== InputSystem =========================================================

/// Owns input bindings and produces a [`FrameInput`] every tick.
///
/// Configure it through [`crate::Engine::init`]:
///
/// ```ignore
/// systems.input.bind_mouse(MouseButton::Left, NoteAction::Interact, InputContext::Primary);
/// systems.input.bind_key(KeyCode::Escape, NoteAction::CloseNote, InputContext::Primary);
/// systems.input.bind_axis(Axis::Vertical, KeyCode::KeyW, KeyCode::KeyS);
/// ```
pub struct InputSystem<A: Action> {
    actions: ActionMapper<A>,
    axes: AxisMapper,
}

impl<A: Action> InputSystem<A> {
    pub fn new() -> Self {
        Self {
            actions: ActionMapper::new(),
            axes: AxisMapper::new(),
        }
    }

    //--- Binding API ------------------------------------------------------

    pub fn bind_key(&mut self, key: KeyCode, action: A, context: InputContext) {
        self.actions.bind_key(key, action, context);
    }

    pub fn bind_key_with_mods(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        action: A,
        context: InputContext,
    ) {
        self.actions.bind_key_with_mods(key, modifiers, action, context);
    }

    pub fn bind_mouse(&mut self, button: MouseButton, action: A, context: InputContext) {
        self.actions.bind_mouse(button, action, context);
    }

    pub fn unbind_key(&mut self, key: KeyCode, context: InputContext) {
        self.actions.unbind_key(key, context);
    }

    pub fn unbind_mouse(&mut self, button: MouseButton, context: InputContext) {
        self.actions.unbind_mouse(button, context);
    }

    pub fn clear_context(&mut self, context: InputContext) {
        self.actions.clear_context(context);
    }

    /// Binds a positive/negative key pair to an axis.
    pub fn bind_axis(&mut self, axis: Axis, positive: KeyCode, negative: KeyCode) {
        self.axes.bind(axis, positive, negative);
    }

    /// Enables (`Some`) or disables (`None`) axis smoothing.
    pub fn set_axis_smoothing(&mut self, smoothing: Option<AxisSmoothing>) {
        self.axes.set_smoothing(smoothing);
    }

    //--- Context ----------------------------------------------------------

    pub fn set_context(&mut self, context: InputContext) {
        self.actions.set_context(context);
    }

    pub fn context(&self) -> InputContext {
        self.actions.current_context()
    }

    //--- Frame Processing -------------------------------------------------

    /// Processes this frame's event batches into `frame`.
    pub fn process_frame(
        &mut self,
        frame: &mut FrameInput<A>,
        batches: &[Vec<InputEvent>],
        dt: f32,
    ) {
        frame.state.clear();
        for batch in batches {
            frame.state.process_events(batch);
        }
        frame.state.finalize_frame();

        frame.actions.clear();
        self.actions.map_frame(&frame.state, &mut frame.actions);

        self.axes.update(&frame.state, dt);
        frame.axes.clone_from(self.axes.values());

        if !frame.actions.is_empty() {
            trace!(target: "input", "Actions this frame: {:?}", frame.actions);
        }
    }
}

impl<A: Action> Default for InputSystem<A> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
