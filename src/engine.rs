//=========================================================================
// Engine
//=========================================================================
//
// Entry point that wires the platform and logic threads together.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ spawns the logic thread
//         ├─ with_channel_capacity() ├─ runs the platform (main thread)
//         ├─ with_fixed_timestep()   └─ joins on window close
//         ├─ with_window()
//         └─ from_config()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::marker::PhantomData;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::config::{Config, WindowConfig};
use crate::core::clock::FixedTimestep;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::{Action, CoreSystemsOrchestrator, GlobalSystems, SceneKey};
use crate::error::{NotesError, Result};
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Builder for an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 logic ticks per second
/// - **Channel capacity**: 128 frames
/// - **Fixed timestep**: 0.02 s, at most 5 steps per tick
/// - **Window**: [`WindowConfig::default`]
///
/// # Examples
///
/// ```no_run
/// use aetheric_notes::EngineBuilder;
/// use aetheric_notes::game::{GameScene, NoteAction};
///
/// EngineBuilder::<GameScene, NoteAction>::new()
///     .with_tps(120.0)
///     .with_fixed_timestep(0.01, 8)
///     .build()
///     .init(|systems| {
///         // bind controls, register scenes
///         let _ = &mut systems.input;
///     })
///     .run()?;
/// # Ok::<(), aetheric_notes::NotesError>(())
/// ```
pub struct EngineBuilder<S: SceneKey, A: Action> {
    tps: f64,
    channel_capacity: usize,
    fixed_timestep: f32,
    max_fixed_steps: u32,
    window: WindowConfig,
    _phantom: PhantomData<(S, A)>,
}

impl<S: SceneKey, A: Action> EngineBuilder<S, A> {
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            fixed_timestep: 0.02,
            max_fixed_steps: 5,
            window: WindowConfig::default(),
            _phantom: PhantomData,
        }
    }

    /// Builder seeded from a validated [`Config`].
    ///
    /// # Panics
    ///
    /// Panics on values [`Config::validate`] rejects.
    pub fn from_config(config: &Config) -> Self {
        let engine = &config.engine;
        Self::new()
            .with_tps(engine.tps)
            .with_channel_capacity(engine.channel_capacity)
            .with_fixed_timestep(engine.fixed_timestep, engine.max_fixed_steps)
            .with_window(config.window.clone())
    }

    /// Logic ticks per second.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Platform → core channel capacity, in frames. When the logic thread
    /// falls this far behind, the platform holds input until there is room.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Physics step length and the per-tick step cap.
    ///
    /// # Panics
    ///
    /// Panics if `step <= 0.0` or `max_steps == 0`.
    pub fn with_fixed_timestep(mut self, step: f32, max_steps: u32) -> Self {
        assert!(step > 0.0, "Fixed timestep must be positive, got {}", step);
        assert!(max_steps > 0, "max_steps must be at least 1");
        self.fixed_timestep = step;
        self.max_fixed_steps = max_steps;
        self
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn build(self) -> Engine<S, A> {
        info!(
            "Building engine (TPS: {}, channel: {}, fixed step: {}s x{})",
            self.tps, self.channel_capacity, self.fixed_timestep, self.max_fixed_steps
        );

        let timestep = FixedTimestep::new(self.fixed_timestep, self.max_fixed_steps);

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(timestep),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window: self.window,
        }
    }
}

impl<S: SceneKey, A: Action> Default for EngineBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Configured runtime. Create with [`EngineBuilder`].
pub struct Engine<S: SceneKey, A: Action> {
    orchestrator: CoreSystemsOrchestrator<S, A>,
    tps: f64,
    channel_capacity: usize,
    window: WindowConfig,
}

impl<S: SceneKey, A: Action> Engine<S, A> {
    //--- Initialization ---------------------------------------------------

    /// Gives mutable access to [`GlobalSystems`] before the first tick:
    /// bind input, register scenes.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalSystems<S, A>),
    {
        info!("Initializing engine systems");
        self.orchestrator.init_systems(init_fn);
        self
    }

    //--- Execution --------------------------------------------------------

    /// Runs until the window closes.
    ///
    /// Spawns the logic thread, then runs the platform on the calling
    /// thread. When the platform returns, its sender is dropped, so the
    /// logic thread exits even if no `WindowClosed` was delivered.
    ///
    /// # Errors
    ///
    /// [`NotesError::Platform`] if the event loop fails, otherwise
    /// [`NotesError::CoreThread`] if the logic thread panicked.
    pub fn run(self) -> Result<()> {
        info!("Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Channel ---------------------------------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        //--- 2. Logic thread ----------------------------------------------
        let core_handle = self.orchestrator.spawn_core_thread(rx, self.tps);
        info!("Core logic thread spawned");

        //--- 3. Platform --------------------------------------------------
        let platform_result = Platform::new(tx, self.window).run();
        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }
        info!("Platform event loop exited");

        //--- 4. Join ------------------------------------------------------
        let core_result = core_handle.join().map_err(|payload| {
            let message = panic_message(payload.as_ref());
            error!("Core thread panicked: {}", message);
            NotesError::CoreThread(message)
        });

        platform_result?;
        core_result?;

        info!("Engine shutdown complete");
        Ok(())
    }
}

/// Text of a thread panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
