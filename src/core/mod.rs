//=========================================================================
// Core Systems Orchestrator
//
// Central coordinator for all engine subsystems running on the logic
// (non-platform) thread.
//
// Responsibilities:
// - Own the global systems (input, scenes, fixed step) and the context
//   shared with scenes
// - Receive platform events via the bounded crossbeam channel
// - Maintain deterministic pacing using a fixed tick rate (TPS)
// - Drive `update(dt)` and `fixed_update(step)` on active scenes
//
// Notes:
// The orchestrator runs independently from the platform layer. Every
// tick advances simulated time by exactly 1/TPS, whatever the wall
// clock did, so gameplay stays reproducible. Communication with the
// platform happens only through message passing.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod clock;
pub mod entity;
pub mod globals;
pub mod input;
pub mod physics;
pub(crate) mod platform_bridge;
pub mod scene;

//=== Public API ==========================================================

pub use globals::{GlobalContext, GlobalSystems};
pub use input::Action;
pub use scene::SceneKey;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use clock::FixedTimestep;
use input::InputEvent;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};

//=== CoreSystemsOrchestrator =============================================

/// Owns engine systems and ticks them on the logic thread.
pub(crate) struct CoreSystemsOrchestrator<S: SceneKey, A: Action> {
    systems: GlobalSystems<S, A>,
    context: GlobalContext<S, A>,
    started: bool,
}

impl<S: SceneKey, A: Action> CoreSystemsOrchestrator<S, A> {
    //--- Construction -----------------------------------------------------

    /// Creates all core systems but does not start the logic thread.
    pub(crate) fn new(timestep: FixedTimestep) -> Self {
        Self {
            systems: GlobalSystems::new(timestep),
            context: GlobalContext::new(),
            started: false,
        }
    }

    /// Gives the game mutable access to systems before the first tick.
    pub(crate) fn init_systems<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut GlobalSystems<S, A>),
    {
        init_fn(&mut self.systems);
    }

    //--- Ticking ----------------------------------------------------------

    /// Enters the initial scenes. Runs once, before the first tick.
    pub(crate) fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        debug!("Starting scene stack: {:?}", self.systems.scene_manager.stack());
        self.systems.scene_manager.start(&self.context);
    }

    /// Runs one logic tick over this tick's input batches.
    pub(crate) fn tick(&mut self, batches: &[Vec<InputEvent>], dt: f32) {
        self.start();
        self.systems.update(&mut self.context, batches, dt);
    }

    pub(crate) fn systems(&self) -> &GlobalSystems<S, A> {
        &self.systems
    }

    pub(crate) fn context(&self) -> &GlobalContext<S, A> {
        &self.context
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Each tick:
    //  1. Collects input batches from the platform
    //  2. Ticks the global systems with dt = 1/TPS
    //  3. Sleeps to maintain fixed pacing
    //  4. Exits cleanly when a shutdown signal is received
    //
    pub(crate) fn spawn_core_thread(
        mut self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);
        let dt = frame_duration.as_secs_f32();

        thread::spawn(move || {
            let mut collector = EventCollector::new(receiver);
            self.start();

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if let TickControl::Exit = collector.collect_frame() {
                    info!("Core thread exiting after {} ticks", self.context.time.tick);
                    break;
                }

                //--- Step 2: Update systems --------------------------------
                self.tick(collector.batches(), dt);

                //--- Step 3: Maintain deterministic pacing ----------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                } else {
                    warn!("Tick {} overran: {:?}", self.context.time.tick, elapsed);
                }
            }
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossbeam_channel::unbounded;
    use parking_lot::Mutex;

    use super::input::{InputContext, InputSource, KeyCode, Modifiers};
    use super::scene::Scene;

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestScene {
        Main,
    }

    impl SceneKey for TestScene {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestAction {
        Use,
    }

    impl Action for TestAction {}

    #[derive(Default)]
    struct Seen {
        enters: u32,
        ticks: u32,
        uses: u32,
    }

    struct Watcher(Arc<Mutex<Seen>>);

    impl Scene<TestScene, TestAction> for Watcher {
        fn on_enter(&mut self, _context: &GlobalContext<TestScene, TestAction>) {
            self.0.lock().enters += 1;
        }

        fn update(&mut self, context: &mut GlobalContext<TestScene, TestAction>, _dt: f32) {
            let mut seen = self.0.lock();
            seen.ticks += 1;
            if context.input.triggered(TestAction::Use) {
                seen.uses += 1;
            }
        }
    }

    fn orchestrator(seen: &Arc<Mutex<Seen>>) -> CoreSystemsOrchestrator<TestScene, TestAction> {
        let mut core = CoreSystemsOrchestrator::new(FixedTimestep::default());
        let scene = Watcher(Arc::clone(seen));
        core.init_systems(move |systems| {
            systems.input.bind_key(KeyCode::KeyE, TestAction::Use, InputContext::Primary);
            systems.scene_manager.register_default(TestScene::Main, scene);
        });
        core
    }

    #[test]
    fn first_tick_starts_scenes_once() {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let mut core = orchestrator(&seen);

        core.tick(&[], 0.016);
        core.tick(&[], 0.016);

        let seen = seen.lock();
        assert_eq!(seen.enters, 1);
        assert_eq!(seen.ticks, 2);
        assert_eq!(core.context().time.tick, 2);
        assert_eq!(core.systems().scene_manager.stack(), &[TestScene::Main]);
    }

    #[test]
    fn tick_forwards_input_to_scenes() {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let mut core = orchestrator(&seen);

        let press = vec![InputEvent::KeyDown { key: KeyCode::KeyE, modifiers: Modifiers::NONE }];
        core.tick(&[press], 0.016);

        assert_eq!(seen.lock().uses, 1);
    }

    #[test]
    fn core_thread_exits_on_window_closed() {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let core = orchestrator(&seen);
        let (tx, rx) = unbounded();

        let handle = core.spawn_core_thread(rx, 240.0);
        tx.send(PlatformEvent::WindowClosed).unwrap();

        handle.join().expect("core thread should exit cleanly");
        assert_eq!(seen.lock().enters, 1);
    }
}
