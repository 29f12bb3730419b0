//=========================================================================
// State Tracker
//=========================================================================
//
// Low-level input state with per-frame edge tracking.
//
// Architecture:
//   InputEvent → process_events() → held sets + frame deltas → query
//
// Frame lifecycle: clear() → process_events() → finalize_frame() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== StateTracker ========================================================

/// Tracks persistent state (keys held) and per-frame deltas (pressed/released).
///
/// "Pressed" means the UP → DOWN transition happened during the current
/// frame. It is what reading a note and closing it react to; holding the
/// mouse button never re-opens a note.
#[derive(Debug, Default)]
pub struct StateTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    mouse_position: (f32, f32),
    modifiers: Modifiers,

    //--- Frame Deltas (reset each frame via clear()) --------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,

    //--- Continuous Input ------------------------------------------------
    mouse_delta: (f32, f32),
    last_mouse_position: (f32, f32),
    cursor_seen: bool,
}

impl StateTracker {
    /// Creates a tracker with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears frame-specific deltas.
    pub(crate) fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.last_mouse_position = self.mouse_position;
    }

    /// Folds a batch of events into the state.
    pub(crate) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Finalizes frame calculations (mouse delta).
    pub(crate) fn finalize_frame(&mut self) {
        self.mouse_delta = (
            self.mouse_position.0 - self.last_mouse_position.0,
            self.mouse_position.1 - self.last_mouse_position.1,
        );
    }

    fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = *modifiers;
                // OS key repeat sends extra downs; only the first counts
                if self.keys_down.insert(*key) {
                    self.keys_pressed.insert(*key);
                }
            }
            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = *modifiers;
                if self.keys_down.remove(key) {
                    self.keys_released.insert(*key);
                }
            }
            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = *modifiers;
                if self.buttons_down.insert(*button) {
                    self.buttons_pressed.insert(*button);
                }
            }
            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = *modifiers;
                if self.buttons_down.remove(button) {
                    self.buttons_released.insert(*button);
                }
            }
            InputEvent::MouseMoved { x, y } => {
                // The first position has no predecessor to measure from
                if !self.cursor_seen {
                    self.cursor_seen = true;
                    self.last_mouse_position = (*x, *y);
                }
                self.mouse_position = (*x, *y);
            }
            InputEvent::Unidentified => {}
        }
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// Returns `true` if the key went UP → DOWN this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns `true` if the key went DOWN → UP this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    //=====================================================================
    // Query API - Mouse
    //=====================================================================

    /// Like [`is_key_pressed`](Self::is_key_pressed) but for mouse buttons.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    /// Like [`is_key_down`](Self::is_key_down) but for mouse buttons.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Like [`is_key_released`](Self::is_key_released) but for mouse buttons.
    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Cursor position in screen coordinates.
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    /// Cursor movement since the previous frame.
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    /// Modifier state reported with the most recent key/button event.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //=====================================================================
    // Query API - Iteration
    //=====================================================================

    /// Keys pressed this frame.
    pub fn keys_pressed(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_pressed.iter()
    }

    /// Mouse buttons pressed this frame.
    pub fn buttons_pressed(&self) -> impl Iterator<Item = &MouseButton> {
        self.buttons_pressed.iter()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    fn key_up(key: KeyCode) -> InputEvent {
        InputEvent::KeyUp { key, modifiers: Modifiers::NONE }
    }

    fn mouse_down(button: MouseButton) -> InputEvent {
        InputEvent::MouseButtonDown { button, modifiers: Modifiers::NONE }
    }

    fn mouse_up(button: MouseButton) -> InputEvent {
        InputEvent::MouseButtonUp { button, modifiers: Modifiers::NONE }
    }

    fn frame(tracker: &mut StateTracker, events: &[InputEvent]) {
        tracker.clear();
        tracker.process_events(events);
        tracker.finalize_frame();
    }

    //=====================================================================
    // Keyboard Tests
    //=====================================================================

    #[test]
    fn key_pressed_only_on_transition_frame() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[key_down(KeyCode::Escape)]);
        assert!(tracker.is_key_pressed(KeyCode::Escape));
        assert!(tracker.is_key_down(KeyCode::Escape));

        frame(&mut tracker, &[]);
        assert!(!tracker.is_key_pressed(KeyCode::Escape));
        assert!(tracker.is_key_down(KeyCode::Escape));

        frame(&mut tracker, &[key_up(KeyCode::Escape)]);
        assert!(!tracker.is_key_down(KeyCode::Escape));
        assert!(tracker.is_key_released(KeyCode::Escape));
    }

    #[test]
    fn repeated_key_down_does_not_press_again() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[key_down(KeyCode::KeyW)]);
        assert!(tracker.is_key_pressed(KeyCode::KeyW));

        // OS auto-repeat while held
        frame(&mut tracker, &[key_down(KeyCode::KeyW), key_down(KeyCode::KeyW)]);
        assert!(!tracker.is_key_pressed(KeyCode::KeyW));
        assert!(tracker.is_key_down(KeyCode::KeyW));
    }

    #[test]
    fn fast_tap_captures_both_transitions() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[key_down(KeyCode::KeyA), key_up(KeyCode::KeyA)]);

        assert!(tracker.is_key_pressed(KeyCode::KeyA));
        assert!(tracker.is_key_released(KeyCode::KeyA));
        assert!(!tracker.is_key_down(KeyCode::KeyA));
    }

    #[test]
    fn spurious_key_up_is_ignored() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[key_up(KeyCode::KeyZ)]);

        assert!(!tracker.is_key_released(KeyCode::KeyZ));
    }

    //=====================================================================
    // Mouse Tests
    //=====================================================================

    #[test]
    fn click_is_pressed_for_one_frame() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[mouse_down(MouseButton::Left)]);
        assert!(tracker.is_button_pressed(MouseButton::Left));

        frame(&mut tracker, &[]);
        assert!(!tracker.is_button_pressed(MouseButton::Left));
        assert!(tracker.is_button_down(MouseButton::Left));

        frame(&mut tracker, &[mouse_up(MouseButton::Left)]);
        assert!(tracker.is_button_released(MouseButton::Left));
    }

    #[test]
    fn mouse_delta_tracks_movement_between_frames() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[InputEvent::MouseMoved { x: 100.0, y: 50.0 }]);
        frame(&mut tracker, &[InputEvent::MouseMoved { x: 110.0, y: 45.0 }]);

        assert_eq!(tracker.mouse_position(), (110.0, 45.0));
        assert_eq!(tracker.mouse_delta(), (10.0, -5.0));

        frame(&mut tracker, &[]);
        assert_eq!(tracker.mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn first_cursor_position_is_not_movement() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[InputEvent::MouseMoved { x: 640.0, y: 360.0 }]);
        assert_eq!(tracker.mouse_delta(), (0.0, 0.0));

        frame(&mut tracker, &[InputEvent::MouseMoved { x: 650.0, y: 360.0 }]);
        assert_eq!(tracker.mouse_delta(), (10.0, 0.0));
    }

    #[test]
    fn modifiers_follow_latest_event() {
        let mut tracker = StateTracker::new();

        frame(
            &mut tracker,
            &[InputEvent::KeyDown { key: KeyCode::KeyA, modifiers: Modifiers::CTRL }],
        );

        assert_eq!(tracker.modifiers(), Modifiers::CTRL);
    }
}
