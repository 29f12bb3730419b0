//=========================================================================
// Scene Manager
//=========================================================================
//
// Manages scene registration, stack operations, and lifecycle.
//
// Scenes are stored in a HashMap by key and referenced via a stack
// of keys. This allows scenes to maintain state between activations.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::Scene;
use crate::core::globals::GlobalContext;
use crate::core::input::Action;

//=== Scene Transition ====================================================

/// Encapsulates scene stack operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTransition<K: SceneKey> {
    /// Adds a new scene to the top of the stack.
    Push(K),

    /// Removes a specific scene from the stack by key.
    Remove(K),

    /// Replaces a specific scene with another scene.
    Replace(K, K),

    /// Exits and re-enters a scene in place.
    Reload(K),

    /// Clears all scenes from the stack.
    Clear,

    /// No transition occurs.
    Empty,
}

impl<K: SceneKey> Default for SceneTransition<K> {
    fn default() -> Self {
        Self::Empty
    }
}

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Scene keys uniquely identify scenes in the SceneManager's HashMap.
/// Typically implemented by game-specific enums.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Scene Manager =======================================================

/// Manages scene lifecycle and stack-based scene switching.
///
/// Scenes are registered once and referenced by key. The scene stack
/// determines which scenes are active; the topmost opaque scene and any
/// transparent scenes above it receive updates.
pub struct SceneManager<S: SceneKey, A: Action> {
    scenes: HashMap<S, Box<dyn Scene<S, A>>>,
    stack: Vec<S>,
}

impl<S: SceneKey, A: Action> SceneManager<S, A> {
    //--- Construction -----------------------------------------------------

    /// Creates a new scene manager with an empty stack.
    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            stack: Vec::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene with the manager.
    ///
    /// Scenes must be registered before being pushed to the stack.
    pub fn register_scene<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S, A> + 'static,
    {
        if self.scenes.insert(key, Box::new(scene)).is_some() {
            warn!("Scene {:?} was already registered and has been replaced", key);
        }
    }

    /// Registers a scene and adds it to the stack as the default scene.
    ///
    /// `on_enter` runs when the manager is started.
    pub fn register_default<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S, A> + 'static,
    {
        self.register_scene(key, scene);

        if self.stack.contains(&key) {
            warn!("Scene {:?} is already in the stack", key);
        } else {
            debug!("Registered scene {:?} as default and added to stack", key);
            self.stack.push(key);
        }
    }

    /// Calls `on_enter` on every scene already on the stack, bottom-up.
    pub fn start(&mut self, context: &GlobalContext<S, A>) {
        for &key in &self.stack {
            match self.scenes.get_mut(&key) {
                Some(scene) => {
                    info!("Entering initial scene {:?}", key);
                    scene.on_enter(context);
                }
                None => warn!("Initial scene {:?} not registered", key),
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Current stack, bottom first.
    pub fn stack(&self) -> &[S] {
        &self.stack
    }

    pub fn is_registered(&self, key: S) -> bool {
        self.scenes.contains_key(&key)
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates active scenes.
    pub fn update(&mut self, context: &mut GlobalContext<S, A>, dt: f32) {
        for key in self.collect_active_scenes() {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.update(context, dt);
            }
        }
    }

    /// Runs one fixed step on active scenes.
    pub fn fixed_update(&mut self, context: &mut GlobalContext<S, A>, dt: f32) {
        for key in self.collect_active_scenes() {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.fixed_update(context, dt);
            }
        }
    }

    //--- Transition Processing --------------------------------------------

    /// Processes all queued scene transitions in FIFO order.
    ///
    /// Called at the tick boundary after scene updates.
    pub fn process_transitions(&mut self, context: &mut GlobalContext<S, A>) {
        for transition in context.scene_transitions.take() {
            debug!("Processing transition {:?}", transition);
            match transition {
                SceneTransition::Push(key) => self.push_internal(key, context),
                SceneTransition::Remove(key) => self.remove_internal(key, context),
                SceneTransition::Replace(old_key, new_key) => {
                    self.replace_internal(old_key, new_key, context)
                }
                SceneTransition::Reload(key) => self.reload_internal(key, context),
                SceneTransition::Clear => self.clear_internal(context),
                SceneTransition::Empty => {}
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn push_internal(&mut self, key: S, context: &GlobalContext<S, A>) {
        if self.stack.contains(&key) {
            warn!("Scene {:?} is already in the stack, skipping push", key);
            return;
        }

        let Some(scene) = self.scenes.get_mut(&key) else {
            warn!("Attempted to push unregistered scene {:?}", key);
            return;
        };

        debug!("Pushing scene {:?} onto stack", key);
        self.stack.push(key);
        scene.on_enter(context);
    }

    fn remove_internal(&mut self, key: S, context: &GlobalContext<S, A>) {
        let Some(pos) = self.stack.iter().position(|&k| k == key) else {
            debug!("Scene {:?} not found in stack, skipping removal", key);
            return;
        };

        debug!("Removing scene {:?} from stack at position {}", key, pos);
        self.stack.remove(pos);

        if let Some(scene) = self.scenes.get_mut(&key) {
            scene.on_exit(context);
        }
    }

    fn replace_internal(&mut self, old_key: S, new_key: S, context: &GlobalContext<S, A>) {
        let Some(pos) = self.stack.iter().position(|&k| k == old_key) else {
            warn!("Scene {:?} not found in stack, skipping replacement", old_key);
            return;
        };

        if self.stack.contains(&new_key) {
            warn!("Scene {:?} is already in the stack, skipping replacement", new_key);
            return;
        }

        if !self.scenes.contains_key(&new_key) {
            warn!("Attempted to replace with unregistered scene {:?}", new_key);
            return;
        }

        debug!("Replacing scene {:?} with {:?} at position {}", old_key, new_key, pos);

        if let Some(scene) = self.scenes.get_mut(&old_key) {
            scene.on_exit(context);
        }

        self.stack[pos] = new_key;

        if let Some(scene) = self.scenes.get_mut(&new_key) {
            scene.on_enter(context);
        }
    }

    fn reload_internal(&mut self, key: S, context: &GlobalContext<S, A>) {
        if !self.stack.contains(&key) {
            warn!("Scene {:?} not in stack, skipping reload", key);
            return;
        }

        if let Some(scene) = self.scenes.get_mut(&key) {
            info!("Reloading scene {:?}", key);
            scene.on_exit(context);
            scene.on_enter(context);
        }
    }

    fn clear_internal(&mut self, context: &GlobalContext<S, A>) {
        debug!("Clearing all scenes from stack");

        // Top-down, mirroring push order
        for &key in self.stack.iter().rev() {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.on_exit(context);
            }
        }

        self.stack.clear();
    }

    fn collect_active_scenes(&self) -> Vec<S> {
        let mut active = Vec::new();

        // Iterate stack top-down, stop at first opaque scene
        for &key in self.stack.iter().rev() {
            active.insert(0, key);

            if let Some(scene) = self.scenes.get(&key) {
                if !scene.is_transparent() {
                    break;
                }
            }
        }

        active
    }
}

impl<S: SceneKey, A: Action> Default for SceneManager<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestScene {
        A,
        B,
        C,
    }

    impl SceneKey for TestScene {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestAction {
        Go,
    }

    impl Action for TestAction {}

    type Log = Arc<Mutex<Vec<String>>>;
    type Ctx = GlobalContext<TestScene, TestAction>;

    struct Recorder {
        name: &'static str,
        log: Log,
        transparent: bool,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self { name, log: Arc::clone(log), transparent: false }
        }

        fn transparent(name: &'static str, log: &Log) -> Self {
            Self { transparent: true, ..Self::new(name, log) }
        }

        fn record(&self, event: &str) {
            self.log.lock().push(format!("{}:{}", self.name, event));
        }
    }

    impl Scene<TestScene, TestAction> for Recorder {
        fn on_enter(&mut self, _context: &Ctx) {
            self.record("enter");
        }

        fn on_exit(&mut self, _context: &Ctx) {
            self.record("exit");
        }

        fn update(&mut self, _context: &mut Ctx, _dt: f32) {
            self.record("update");
        }

        fn fixed_update(&mut self, _context: &mut Ctx, _dt: f32) {
            self.record("fixed");
        }

        fn is_transparent(&self) -> bool {
            self.transparent
        }
    }

    fn drain(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.lock())
    }

    fn manager_with_default(log: &Log) -> (SceneManager<TestScene, TestAction>, Ctx) {
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::A, Recorder::new("a", log));
        manager.register_scene(TestScene::B, Recorder::new("b", log));
        manager.register_scene(TestScene::C, Recorder::transparent("c", log));

        let context = GlobalContext::new();
        manager.start(&context);
        (manager, context)
    }

    //=====================================================================
    // SceneTransition Tests
    //=====================================================================

    #[test]
    fn transition_default_is_empty() {
        let transition: SceneTransition<TestScene> = SceneTransition::default();
        assert_eq!(transition, SceneTransition::Empty);
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn start_enters_default_scene() {
        let log = Log::default();
        let (manager, _context) = manager_with_default(&log);

        assert_eq!(manager.stack(), &[TestScene::A]);
        assert_eq!(drain(&log), vec!["a:enter"]);
    }

    #[test]
    fn update_and_fixed_update_reach_active_scene() {
        let log = Log::default();
        let (mut manager, mut context) = manager_with_default(&log);
        drain(&log);

        manager.update(&mut context, 0.016);
        manager.fixed_update(&mut context, 0.02);

        assert_eq!(drain(&log), vec!["a:update", "a:fixed"]);
    }

    #[test]
    fn opaque_scene_blocks_lower_scenes() {
        let log = Log::default();
        let (mut manager, mut context) = manager_with_default(&log);

        context.scene_transitions.push(SceneTransition::Push(TestScene::B));
        manager.process_transitions(&mut context);
        drain(&log);

        manager.update(&mut context, 0.016);
        assert_eq!(drain(&log), vec!["b:update"]);
    }

    #[test]
    fn transparent_scene_lets_lower_scene_update() {
        let log = Log::default();
        let (mut manager, mut context) = manager_with_default(&log);

        context.scene_transitions.push(SceneTransition::Push(TestScene::C));
        manager.process_transitions(&mut context);
        drain(&log);

        manager.update(&mut context, 0.016);
        assert_eq!(drain(&log), vec!["a:update", "c:update"]);
    }

    //=====================================================================
    // Transition Tests
    //=====================================================================

    #[test]
    fn replace_exits_old_and_enters_new() {
        let log = Log::default();
        let (mut manager, mut context) = manager_with_default(&log);
        drain(&log);

        context
            .scene_transitions
            .push(SceneTransition::Replace(TestScene::A, TestScene::B));
        manager.process_transitions(&mut context);

        assert_eq!(manager.stack(), &[TestScene::B]);
        assert_eq!(drain(&log), vec!["a:exit", "b:enter"]);
        assert!(context.scene_transitions.is_empty());
    }

    #[test]
    fn reload_exits_then_enters_in_place() {
        let log = Log::default();
        let (mut manager, mut context) = manager_with_default(&log);
        drain(&log);

        context.scene_transitions.push(SceneTransition::Reload(TestScene::A));
        manager.process_transitions(&mut context);

        assert_eq!(manager.stack(), &[TestScene::A]);
        assert_eq!(drain(&log), vec!["a:exit", "a:enter"]);
    }

    #[test]
    fn reload_of_inactive_scene_is_ignored() {
        let log = Log::default();
        let (mut manager, mut context) = manager_with_default(&log);
        drain(&log);

        context.scene_transitions.push(SceneTransition::Reload(TestScene::B));
        manager.process_transitions(&mut context);

        assert!(drain(&log).is_empty());
    }

    #[test]
    fn push_rejects_duplicates_and_unregistered() {
        #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
        enum Other {
            Known,
            Unknown,
        }
        impl SceneKey for Other {}

        let log = Log::default();
        let mut manager = SceneManager::<Other, TestAction>::new();
        manager.register_scene(Other::Known, OtherScene(Arc::clone(&log)));
        let mut context = GlobalContext::new();

        context.scene_transitions.push(SceneTransition::Push(Other::Known));
        context.scene_transitions.push(SceneTransition::Push(Other::Known));
        context.scene_transitions.push(SceneTransition::Push(Other::Unknown));
        manager.process_transitions(&mut context);

        assert_eq!(manager.stack(), &[Other::Known]);
        assert!(manager.is_registered(Other::Known));
        assert!(!manager.is_registered(Other::Unknown));
        assert_eq!(drain(&log), vec!["other:enter"]);

        struct OtherScene(Log);

        impl<S: SceneKey> Scene<S, TestAction> for OtherScene {
            fn on_enter(&mut self, _context: &GlobalContext<S, TestAction>) {
                self.0.lock().push("other:enter".to_string());
            }

            fn update(&mut self, _context: &mut GlobalContext<S, TestAction>, _dt: f32) {}
        }
    }

    #[test]
    fn clear_exits_top_down() {
        let log = Log::default();
        let (mut manager, mut context) = manager_with_default(&log);

        context.scene_transitions.push(SceneTransition::Push(TestScene::B));
        context.scene_transitions.push(SceneTransition::Clear);
        manager.process_transitions(&mut context);

        assert!(manager.stack().is_empty());
        assert_eq!(drain(&log), vec!["a:enter", "b:enter", "b:exit", "a:exit"]);
    }
}
