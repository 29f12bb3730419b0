//=========================================================================
// Action Mapper
//=========================================================================
//
// Maps pressed keys and buttons to game actions based on bindings and
// the active context.
//
// Architecture:
//   (key/button, modifiers, context) → HashMap → Action
//
// Only press edges resolve to actions, so a held key fires once. A
// binding made without modifiers fires whatever modifiers are held,
// unless a binding for that exact modifier set exists.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{
    action::{Action, InputContext},
    event::{KeyCode, Modifiers, MouseButton},
    state_tracker::StateTracker,
};

//=== ActionMapper ========================================================

/// Maps input edges to actions via (key/button, modifiers, context) lookups.
pub(crate) struct ActionMapper<A: Action> {
    key_bindings: HashMap<(KeyCode, Modifiers, InputContext), A>,
    mouse_bindings: HashMap<(MouseButton, Modifiers, InputContext), A>,
    current_context: InputContext,
}

impl<A: Action> ActionMapper<A> {
    /// Creates a mapper with the Primary context active and no bindings.
    pub(crate) fn new() -> Self {
        Self {
            key_bindings: HashMap::new(),
            mouse_bindings: HashMap::new(),
            current_context: InputContext::Primary,
        }
    }

    //--- Binding API ------------------------------------------------------

    pub(crate) fn bind_key(&mut self, key: KeyCode, action: A, context: InputContext) {
        self.bind_key_with_mods(key, Modifiers::NONE, action, context);
    }

    pub(crate) fn bind_key_with_mods(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        action: A,
        context: InputContext,
    ) {
        self.key_bindings.insert((key, modifiers, context), action);
    }

    pub(crate) fn bind_mouse(&mut self, button: MouseButton, action: A, context: InputContext) {
        self.bind_mouse_with_mods(button, Modifiers::NONE, action, context);
    }

    pub(crate) fn bind_mouse_with_mods(
        &mut self,
        button: MouseButton,
        modifiers: Modifiers,
        action: A,
        context: InputContext,
    ) {
        self.mouse_bindings.insert((button, modifiers, context), action);
    }

    /// Removes the unmodified binding for a key (modified variants stay).
    pub(crate) fn unbind_key(&mut self, key: KeyCode, context: InputContext) {
        self.key_bindings.remove(&(key, Modifiers::NONE, context));
    }

    /// Removes the unmodified binding for a mouse button.
    pub(crate) fn unbind_mouse(&mut self, button: MouseButton, context: InputContext) {
        self.mouse_bindings.remove(&(button, Modifiers::NONE, context));
    }

    /// Clears all bindings of a context.
    pub(crate) fn clear_context(&mut self, context: InputContext) {
        self.key_bindings.retain(|&(_, _, ctx), _| ctx != context);
        self.mouse_bindings.retain(|&(_, _, ctx), _| ctx != context);
    }

    //--- Context ----------------------------------------------------------

    pub(crate) fn set_context(&mut self, context: InputContext) {
        if context != self.current_context {
            debug!("Input context {:?} -> {:?}", self.current_context, context);
        }
        self.current_context = context;
    }

    pub(crate) fn current_context(&self) -> InputContext {
        self.current_context
    }

    //--- Mapping ----------------------------------------------------------

    /// Appends every action whose key or button was pressed this frame.
    pub(crate) fn map_frame(&self, state: &StateTracker, out: &mut Vec<A>) {
        let modifiers = state.modifiers();

        out.extend(state.keys_pressed().filter_map(|&key| self.map_key(key, modifiers)));
        out.extend(
            state
                .buttons_pressed()
                .filter_map(|&button| self.map_button(button, modifiers)),
        );
    }

    /// Exact-modifier binding first, then the unmodified one.
    pub(super) fn map_key(&self, key: KeyCode, modifiers: Modifiers) -> Option<A> {
        let ctx = self.current_context;
        self.key_bindings
            .get(&(key, modifiers, ctx))
            .or_else(|| self.key_bindings.get(&(key, Modifiers::NONE, ctx)))
            .copied()
    }

    pub(super) fn map_button(&self, button: MouseButton, modifiers: Modifiers) -> Option<A> {
        let ctx = self.current_context;
        self.mouse_bindings
            .get(&(button, modifiers, ctx))
            .or_else(|| self.mouse_bindings.get(&(button, Modifiers::NONE, ctx)))
            .copied()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::InputEvent;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestAction {
        Interact,
        Close,
        Inspect,
    }

    impl Action for TestAction {}

    //--- Test Helpers -----------------------------------------------------

    fn pressed(events: &[InputEvent]) -> StateTracker {
        let mut state = StateTracker::new();
        state.clear();
        state.process_events(events);
        state.finalize_frame();
        state
    }

    fn mapped(mapper: &ActionMapper<TestAction>, state: &StateTracker) -> Vec<TestAction> {
        let mut out = Vec::new();
        mapper.map_frame(state, &mut out);
        out
    }

    //=====================================================================
    // Binding Tests
    //=====================================================================

    #[test]
    fn bind_and_map_simple_key() {
        let mut mapper = ActionMapper::new();
        mapper.bind_key(KeyCode::Escape, TestAction::Close, InputContext::Primary);

        assert_eq!(mapper.map_key(KeyCode::Escape, Modifiers::NONE), Some(TestAction::Close));
        assert_eq!(mapper.map_key(KeyCode::Enter, Modifiers::NONE), None);
    }

    #[test]
    fn exact_modifier_binding_wins_over_unmodified() {
        let mut mapper = ActionMapper::new();
        mapper.bind_key(KeyCode::KeyE, TestAction::Interact, InputContext::Primary);
        mapper.bind_key_with_mods(
            KeyCode::KeyE,
            Modifiers::SHIFT,
            TestAction::Inspect,
            InputContext::Primary,
        );

        assert_eq!(mapper.map_key(KeyCode::KeyE, Modifiers::NONE), Some(TestAction::Interact));
        assert_eq!(mapper.map_key(KeyCode::KeyE, Modifiers::SHIFT), Some(TestAction::Inspect));
        assert_eq!(mapper.map_key(KeyCode::KeyE, Modifiers::CTRL), Some(TestAction::Interact));
    }

    #[test]
    fn unmodified_bindings_fire_with_modifiers_held() {
        let mut mapper = ActionMapper::new();
        mapper.bind_mouse(MouseButton::Left, TestAction::Interact, InputContext::Primary);
        mapper.bind_key(KeyCode::Escape, TestAction::Close, InputContext::Primary);

        let shifted = pressed(&[
            InputEvent::MouseButtonDown { button: MouseButton::Left, modifiers: Modifiers::SHIFT },
            InputEvent::KeyDown { key: KeyCode::Escape, modifiers: Modifiers::SHIFT },
        ]);

        let actions = mapped(&mapper, &shifted);
        assert!(actions.contains(&TestAction::Interact));
        assert!(actions.contains(&TestAction::Close));
    }

    #[test]
    fn modified_only_binding_needs_its_modifiers() {
        let mut mapper = ActionMapper::new();
        mapper.bind_key_with_mods(
            KeyCode::KeyE,
            Modifiers::SHIFT,
            TestAction::Inspect,
            InputContext::Primary,
        );

        assert_eq!(mapper.map_key(KeyCode::KeyE, Modifiers::NONE), None);
        assert_eq!(mapper.map_key(KeyCode::KeyE, Modifiers::ALT), None);
    }

    #[test]
    fn unbind_removes_only_unmodified_binding() {
        let mut mapper = ActionMapper::new();
        mapper.bind_mouse(MouseButton::Left, TestAction::Interact, InputContext::Primary);
        mapper.bind_mouse_with_mods(
            MouseButton::Left,
            Modifiers::SHIFT,
            TestAction::Inspect,
            InputContext::Primary,
        );

        mapper.unbind_mouse(MouseButton::Left, InputContext::Primary);

        assert_eq!(mapper.map_button(MouseButton::Left, Modifiers::NONE), None);
        assert_eq!(
            mapper.map_button(MouseButton::Left, Modifiers::SHIFT),
            Some(TestAction::Inspect)
        );
    }

    //=====================================================================
    // Context Tests
    //=====================================================================

    #[test]
    fn bindings_only_resolve_in_active_context() {
        const READING: InputContext = InputContext::custom(0);

        let mut mapper = ActionMapper::new();
        mapper.bind_key(KeyCode::Space, TestAction::Interact, InputContext::Primary);
        mapper.bind_key(KeyCode::Space, TestAction::Close, READING);

        assert_eq!(mapper.map_key(KeyCode::Space, Modifiers::NONE), Some(TestAction::Interact));

        mapper.set_context(READING);
        assert_eq!(mapper.current_context(), READING);
        assert_eq!(mapper.map_key(KeyCode::Space, Modifiers::NONE), Some(TestAction::Close));
    }

    #[test]
    fn clear_context_leaves_other_contexts() {
        const READING: InputContext = InputContext::custom(0);

        let mut mapper = ActionMapper::new();
        mapper.bind_key(KeyCode::KeyE, TestAction::Interact, InputContext::Primary);
        mapper.bind_key(KeyCode::Escape, TestAction::Close, READING);

        mapper.clear_context(InputContext::Primary);
        mapper.unbind_key(KeyCode::KeyE, InputContext::Primary);

        assert_eq!(mapper.map_key(KeyCode::KeyE, Modifiers::NONE), None);
        mapper.set_context(READING);
        assert_eq!(mapper.map_key(KeyCode::Escape, Modifiers::NONE), Some(TestAction::Close));
    }

    //=====================================================================
    // Frame Mapping Tests
    //=====================================================================

    #[test]
    fn map_frame_collects_key_and_button_edges() {
        let mut mapper = ActionMapper::new();
        mapper.bind_mouse(MouseButton::Left, TestAction::Interact, InputContext::Primary);
        mapper.bind_key(KeyCode::Escape, TestAction::Close, InputContext::Primary);

        let state = pressed(&[
            InputEvent::MouseButtonDown { button: MouseButton::Left, modifiers: Modifiers::NONE },
            InputEvent::KeyDown { key: KeyCode::Escape, modifiers: Modifiers::NONE },
        ]);

        let actions = mapped(&mapper, &state);
        assert_eq!(actions.len(), 2);
        assert!(actions.contains(&TestAction::Interact));
        assert!(actions.contains(&TestAction::Close));
    }

    #[test]
    fn map_frame_ignores_releases() {
        let mut mapper = ActionMapper::new();
        mapper.bind_key(KeyCode::Escape, TestAction::Close, InputContext::Primary);

        let mut state = pressed(&[InputEvent::KeyDown {
            key: KeyCode::Escape,
            modifiers: Modifiers::NONE,
        }]);
        state.clear();
        state.process_events(&[InputEvent::KeyUp { key: KeyCode::Escape, modifiers: Modifiers::NONE }]);
        state.finalize_frame();

        assert!(mapped(&mapper, &state).is_empty());
    }
}
