//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Owns the OS window and feeds input to the logic thread.
//
// Architecture:
// ```text
//  Main Thread                         Logic Thread
//  ┌───────────────────────────┐      ┌──────────────────────┐
//  │ winit event loop          │      │ EventCollector       │
//  │   ↓                       │      │   ↓                  │
//  │ InputProcessor            │      │ InputSystem          │
//  │   ↓                       │      │   ↓                  │
//  │ InputBuffer               │      │ LevelScene           │
//  │   ↓ RedrawRequested       │      │   (movement, notes)  │
//  │ bounded channel ──────────┼─────►│                      │
//  └───────────────────────────┘      └──────────────────────┘
//                       PlatformEvent
// ```
//
// RedrawRequested is the frame boundary: everything buffered since the
// last redraw is sent as one `PlatformEvent::Inputs`. Empty frames send
// nothing. When the channel is full the frame goes back into the buffer
// and rides along with the next one, so no key or button edge is lost
// and the window never stalls.
//
// winit requires the event loop on the main thread (macOS/iOS), so this
// runs on the thread that called `Engine::run()`.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Dependencies ===============================================

use crossbeam_channel::{Sender, TrySendError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use crate::config::WindowConfig;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window owner and input aggregator. Not `Send`; stays on the main thread.
pub(crate) struct Platform {
    /// Created lazily in `resumed()`.
    window: Option<Window>,
    window_config: WindowConfig,
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    input_processor: InputProcessor,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(event_sender: Sender<PlatformEvent>, window_config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            window_config,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// [`PlatformError::EventLoopCreation`] if no event loop can be created
    /// (no display, for instance), [`PlatformError::EventLoopExecution`] if
    /// the loop itself fails.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread on platforms that require it.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    fn window_attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(self.window_config.title.clone())
            .with_inner_size(LogicalSize::new(self.window_config.width, self.window_config.height))
    }

    /// Sends this frame's input to the core thread.
    fn flush_input_buffer(&mut self) {
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };

        let discrete_count = discrete.len();
        let continuous_count = continuous.len();

        trace!(
            target: "platform::input",
            "Flushing {} discrete + {} continuous events",
            discrete_count,
            continuous_count
        );

        match self.event_sender.try_send(PlatformEvent::Inputs { discrete, continuous }) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!(
                    target: "platform::input",
                    "Channel full, holding {} discrete + {} continuous events",
                    discrete_count,
                    continuous_count
                );
                if let PlatformEvent::Inputs { discrete, continuous } = event {
                    self.buffer.requeue(discrete, continuous);
                }
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} events",
                    discrete_count + continuous_count
                );
            }
        }
    }

    /// Tells the core thread to stop. Blocks if the channel is full so the
    /// close is never lost.
    fn notify_closed(&self) {
        if self.event_sender.send(PlatformEvent::WindowClosed).is_err() {
            debug!(target: "platform", "Core thread already gone");
        }
    }

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (resume)");
            return;
        }

        match event_loop.create_window(self.window_attributes()) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.notify_closed();
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.notify_closed();
                event_loop.exit();
            }

            WindowEvent::ModifiersChanged(state) => {
                self.input_processor.update_modifiers(state.state());
                trace!(
                    target: "platform::input",
                    "Modifiers changed: {:?}",
                    self.input_processor.modifiers()
                );
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.process_cursor(position.x, position.y);
                self.buffer.push_continuous(event);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                match self.input_processor.process_key_event(&event) {
                    Some(event) => self.buffer.push_discrete(event),
                    None => trace!(target: "platform::input", "Unmapped key ignored"),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(button, state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{
        Axis, FrameInput, InputEvent, InputSource, InputSystem, KeyCode, Modifiers,
    };
    use crate::game::NoteAction;
    use crossbeam_channel::{bounded, unbounded};

    fn platform() -> (Platform, crossbeam_channel::Receiver<PlatformEvent>) {
        let (tx, rx) = unbounded();
        (Platform::new(tx, WindowConfig::default()), rx)
    }

    fn key(key: KeyCode, down: bool) -> InputEvent {
        let modifiers = Modifiers::NONE;
        if down {
            InputEvent::KeyDown { key, modifiers }
        } else {
            InputEvent::KeyUp { key, modifiers }
        }
    }

    fn discrete_of(
        received: Result<PlatformEvent, crossbeam_channel::TryRecvError>,
    ) -> Vec<InputEvent> {
        match received {
            Ok(PlatformEvent::Inputs { discrete, .. }) => discrete,
            other => panic!("Expected Inputs, got {:?}", other),
        }
    }

    fn space() -> InputEvent {
        InputEvent::KeyDown { key: KeyCode::Space, modifiers: Modifiers::NONE }
    }

    #[test]
    fn window_is_created_lazily() {
        let (platform, _rx) = platform();
        assert!(platform.window().is_none());
    }

    #[test]
    fn window_attributes_follow_config() {
        let (tx, _rx) = unbounded();
        let config = WindowConfig {
            title: "Archive".into(),
            width: 640,
            height: 480,
        };
        let platform = Platform::new(tx, config);

        let attrs = platform.window_attributes();
        assert_eq!(attrs.title, "Archive");
        assert!(attrs.inner_size.is_some());
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (mut platform, rx) = platform();
        platform.flush_input_buffer();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_sends_buffered_events_once() {
        let (mut platform, rx) = platform();
        platform.buffer.push_discrete(space());
        platform.buffer.push_continuous(InputEvent::MouseMoved { x: 1.0, y: 2.0 });

        platform.flush_input_buffer();
        platform.flush_input_buffer();

        match rx.try_recv() {
            Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                assert_eq!(discrete.len(), 1);
                assert_eq!(continuous.len(), 1);
            }
            other => panic!("Expected Inputs, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn full_channel_holds_frame_until_there_is_room() {
        let (tx, rx) = bounded(1);
        let mut platform = Platform::new(tx, WindowConfig::default());

        platform.buffer.push_discrete(key(KeyCode::KeyW, true));
        platform.flush_input_buffer();
        platform.buffer.push_discrete(key(KeyCode::KeyW, false));
        platform.flush_input_buffer();

        assert_eq!(rx.len(), 1);
        assert!(!platform.buffer.is_empty());

        let mut batches = vec![discrete_of(rx.try_recv())];
        platform.flush_input_buffer();
        batches.push(discrete_of(rx.try_recv()));
        assert!(platform.buffer.is_empty());

        // The release still reaches the logic side, so W is not stuck
        let mut input = InputSystem::<NoteAction>::new();
        input.bind_axis(Axis::Vertical, KeyCode::KeyW, KeyCode::KeyS);
        let mut frame = FrameInput::new();
        for batch in batches {
            input.process_frame(&mut frame, &[batch], 0.016);
        }
        for _ in 0..10 {
            input.process_frame(&mut frame, &[], 0.016);
        }

        assert_eq!(frame.axis(Axis::Vertical), 0.0);
        assert!(!frame.state().is_key_down(KeyCode::KeyW));
    }

    #[test]
    fn flush_survives_disconnected_channel() {
        let (mut platform, rx) = platform();
        drop(rx);

        platform.buffer.push_discrete(space());
        platform.flush_input_buffer();
    }

    #[test]
    fn notify_closed_reaches_core() {
        let (platform, rx) = platform();
        platform.notify_closed();
        assert!(matches!(rx.try_recv(), Ok(PlatformEvent::WindowClosed)));
    }
}
