//! Main loop

use crate::config::EngineConfig;
use crate::graphics::GraphicsDevice;
use crate::platform::{CallbackId, Platform, PumpStatus, Window, WindowMessage};
use easy_core::{EngineError, Result};
use easy_input::{DeviceType, GamepadBackend, InputManager};
use easy_runtime::{priority, Clock, FrameGate, TaskHandle, UpdateManager};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Instant;

/// Asks the main loop to stop after the current frame
#[derive(Debug, Clone, Default)]
pub struct ExitHandle(Rc<Cell<bool>>);

impl ExitHandle {
    pub fn request(&self) {
        if !self.0.replace(true) {
            log::info!("Exit requested");
        }
    }

    pub fn is_requested(&self) -> bool {
        self.0.get()
    }
}

/// Owns the window, input devices, update tasks and graphics backend.
///
/// Each frame runs in this order: window messages, clock, input devices,
/// then every update task by priority. Rendering and presentation are
/// themselves update tasks at [`priority::RENDER_BEGIN`] and
/// [`priority::PRESENT`].
pub struct Engine<P> {
    config: EngineConfig,
    window: Window<P>,
    input: Rc<RefCell<InputManager>>,
    updates: UpdateManager,
    clock: Clock,
    gate: FrameGate,
    exit: ExitHandle,
    graphics_tasks: Vec<TaskHandle>,
    message_callback: Option<CallbackId>,
}

impl<P: Platform> Engine<P> {
    pub fn new(
        config: EngineConfig,
        platform: P,
        graphics: Box<dyn GraphicsDevice>,
        gamepads: Box<dyn GamepadBackend>,
    ) -> Result<Self> {
        Self::build(config, platform, graphics, gamepads)
            .inspect_err(|e| log::error!("Engine start-up failed: {e}"))
    }

    fn build(
        config: EngineConfig,
        platform: P,
        graphics: Box<dyn GraphicsDevice>,
        gamepads: Box<dyn GamepadBackend>,
    ) -> Result<Self> {
        config.validate()?;
        let gate = FrameGate::from_fps(config.timing.target_fps)?;

        let mut input = InputManager::new(gamepads);
        input.create_device(DeviceType::Keyboard)?;
        for slot in 0..config.input.gamepad_slots {
            input.create_device(DeviceType::Gamepad(slot))?;
        }
        let input = Rc::new(RefCell::new(input));

        let graphics = Rc::new(RefCell::new(graphics));
        let exit = ExitHandle::default();

        let mut window = Window::new(platform, config.window.width, config.window.height);
        let message_callback = {
            let input = Rc::downgrade(&input);
            let graphics = Rc::downgrade(&graphics);
            window.add_callback(move |message, live| {
                match message {
                    WindowMessage::Key { message, vk, extra } => {
                        if let Some(input) = input.upgrade() {
                            input
                                .borrow()
                                .process_key_event(*message, *vk, *extra, live);
                        }
                    }
                    WindowMessage::Focus(false) => {
                        if let Some(input) = input.upgrade() {
                            input.borrow().focus_lost();
                        }
                    }
                    WindowMessage::Resized { width, height } => {
                        if let Some(graphics) = graphics.upgrade() {
                            graphics.borrow_mut().resize(*width, *height);
                        }
                    }
                    WindowMessage::Focus(true) | WindowMessage::CloseRequested => {}
                }
            })
        };

        let updates = UpdateManager::new();
        let render = {
            let graphics = graphics.clone();
            let exit = exit.clone();
            updates.register_fn_with_priority(
                move |dt| {
                    if let Err(e) = graphics.borrow_mut().render(dt) {
                        log::error!("Render failed: {e}");
                        exit.request();
                    }
                },
                priority::RENDER_BEGIN,
            )
        };
        let present = {
            let exit = exit.clone();
            updates.register_fn_with_priority(
                move |_| {
                    if let Err(e) = graphics.borrow_mut().present() {
                        log::error!("Present failed: {e}");
                        exit.request();
                    }
                },
                priority::PRESENT,
            )
        };

        log::info!(
            "Engine ready: \"{}\" {}x{} at {} FPS ({}µs per frame)",
            config.window.title,
            config.window.width,
            config.window.height,
            config.timing.target_fps,
            gate.micros_per_frame()
        );

        Ok(Self {
            config,
            window,
            input,
            updates,
            clock: Clock::new(),
            gate,
            exit,
            graphics_tasks: vec![render, present],
            message_callback: Some(message_callback),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn updates(&self) -> &UpdateManager {
        &self.updates
    }

    pub fn input(&self) -> &Rc<RefCell<InputManager>> {
        &self.input
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn window(&self) -> &Window<P> {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window<P> {
        &mut self.window
    }

    pub fn exit_handle(&self) -> ExitHandle {
        self.exit.clone()
    }

    /// Pump messages and run a frame if one is due.
    /// Returns `Ok(false)` once the loop should stop.
    pub fn step(&mut self) -> Result<bool> {
        self.step_at(Instant::now())
    }

    /// [`step`](Self::step) with an explicit frame-gate time
    pub fn step_at(&mut self, now: Instant) -> Result<bool> {
        if self.window.pump_messages() == PumpStatus::Exit {
            self.exit.request();
        }
        if self.exit.is_requested() {
            return Ok(false);
        }
        if !self.gate.ready(now) {
            return Ok(true);
        }

        self.frame()?;
        Ok(!self.exit.is_requested())
    }

    fn frame(&mut self) -> Result<()> {
        self.clock.update();
        self.input.borrow_mut().update();

        let delta = self.clock.delta();
        let updates = &self.updates;
        match panic::catch_unwind(AssertUnwindSafe(|| updates.run(delta))) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("Update task panicked: {message}");
                self.exit.request();
                Err(EngineError::TaskPanicked(message))
            }
        }
    }

    /// Run frames until exit is requested or a frame fails, then shut down
    pub fn run(&mut self) -> Result<()> {
        log::info!("Entering main loop");
        let result = loop {
            match self.step() {
                Ok(true) => {
                    let wait = self.gate.time_until_next(Instant::now());
                    if !wait.is_zero() {
                        std::thread::sleep(wait);
                    }
                }
                Ok(false) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        self.shutdown();
        result
    }

    /// Release the graphics tasks, the window callback and every input device
    pub fn shutdown(&mut self) {
        self.graphics_tasks.clear();
        if let Some(id) = self.message_callback.take() {
            self.window.remove_callback(id);
        }
        self.input.borrow_mut().clear();
        log::info!(
            "Engine shut down after {} frames ({:.2}s)",
            self.clock.frame_count(),
            self.clock.elapsed()
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::tests::ScriptedPlatform;
    use easy_input::{vk, InputFlag, Key, KeyMessage, NullGamepadBackend};
    use std::time::Duration;

    type Log = Rc<RefCell<Vec<String>>>;

    struct RecordingGraphics {
        log: Log,
        fail_render: bool,
    }

    impl GraphicsDevice for RecordingGraphics {
        fn render(&mut self, _delta: f64) -> Result<()> {
            if self.fail_render {
                return Err(EngineError::Graphics("device lost".into()));
            }
            self.log.borrow_mut().push("render".into());
            Ok(())
        }

        fn present(&mut self) -> Result<()> {
            self.log.borrow_mut().push("present".into());
            Ok(())
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.log.borrow_mut().push(format!("resize {width}x{height}"));
        }
    }

    fn engine_with(
        config: EngineConfig,
        fail_render: bool,
    ) -> (Engine<ScriptedPlatform>, ScriptedPlatform, Log) {
        let log: Log = Rc::default();
        let platform = ScriptedPlatform::default();
        let script = ScriptedPlatform {
            frames: platform.frames.clone(),
            held: platform.held.clone(),
        };
        let graphics = RecordingGraphics {
            log: log.clone(),
            fail_render,
        };
        let engine = Engine::new(
            config,
            platform,
            Box::new(graphics),
            Box::new(NullGamepadBackend),
        )
        .unwrap();
        (engine, script, log)
    }

    fn engine() -> (Engine<ScriptedPlatform>, ScriptedPlatform, Log) {
        engine_with(EngineConfig::default(), false)
    }

    #[test]
    fn test_invalid_config_aborts_start_up() {
        let mut config = EngineConfig::default();
        config.timing.target_fps = 0;
        let result = Engine::new(
            config,
            ScriptedPlatform::default(),
            Box::new(crate::graphics::NullGraphics::new()),
            Box::new(NullGamepadBackend),
        );
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_devices_follow_config() {
        let mut config = EngineConfig::default();
        config.input.gamepad_slots = 2;
        let (engine, _, _) = engine_with(config, false);

        let input = engine.input().borrow();
        assert!(input.has_device(DeviceType::Keyboard));
        assert!(input.has_device(DeviceType::Gamepad(1)));
        assert!(!input.has_device(DeviceType::Gamepad(2)));
    }

    #[test]
    fn test_frame_order() {
        let (mut engine, script, log) = engine();
        script.frames.borrow_mut().push_back(vec![WindowMessage::Key {
            message: KeyMessage::KeyDown,
            vk: vk::A,
            extra: 0,
        }]);

        let keyboard = engine.input().borrow().keyboard().unwrap();
        let task_log = log.clone();
        let _task = engine.updates().register_fn(move |_| {
            let state = keyboard.borrow().state(Key::A);
            task_log.borrow_mut().push(format!("update {state:?}"));
        });

        assert!(engine.step_at(Instant::now()).unwrap());
        assert_eq!(
            *log.borrow(),
            vec!["update Down", "render", "present"]
        );
    }

    #[test]
    fn test_frame_gate_limits_frames() {
        let (mut engine, _, log) = engine();
        let start = Instant::now();
        let budget = Duration::from_micros(engine.config().micros_per_frame());

        engine.step_at(start).unwrap();
        engine.step_at(start + budget / 2).unwrap();
        assert_eq!(engine.clock().frame_count(), 1);

        engine.step_at(start + budget).unwrap();
        assert_eq!(engine.clock().frame_count(), 2);
        assert_eq!(log.borrow().iter().filter(|e| *e == "present").count(), 2);
    }

    #[test]
    fn test_focus_loss_releases_keys() {
        let (mut engine, script, _) = engine();
        let start = Instant::now();
        let budget = Duration::from_micros(engine.config().micros_per_frame());
        script.frames.borrow_mut().extend([
            vec![WindowMessage::Key {
                message: KeyMessage::KeyDown,
                vk: vk::SPACE,
                extra: 0,
            }],
            vec![WindowMessage::Focus(false)],
        ]);

        engine.step_at(start).unwrap();
        engine.step_at(start + budget).unwrap();

        let keyboard = engine.input().borrow().keyboard().unwrap();
        assert_eq!(keyboard.borrow().state(Key::Space), InputFlag::Up);
    }

    #[test]
    fn test_resize_reaches_graphics() {
        let (mut engine, script, log) = engine();
        script.frames.borrow_mut().push_back(vec![WindowMessage::Resized {
            width: 640,
            height: 360,
        }]);

        engine.step_at(Instant::now()).unwrap();
        assert_eq!(log.borrow()[0], "resize 640x360");
        assert_eq!(engine.window().size(), (640, 360));
    }

    #[test]
    fn test_panicking_task_stops_loop() {
        let (mut engine, _, _) = engine();
        let _task = engine.updates().register_fn(|_| panic!("boom"));

        let result = engine.step_at(Instant::now());
        match result {
            Err(EngineError::TaskPanicked(message)) => assert_eq!(message, "boom"),
            other => panic!("expected TaskPanicked, got {other:?}"),
        }
        assert!(engine.exit_handle().is_requested());
        assert!(!engine.step_at(Instant::now()).unwrap());
    }

    #[test]
    fn test_exit_handle_stops_loop() {
        let (mut engine, _, _) = engine();
        let exit = engine.exit_handle();
        let _task = engine.updates().register_fn(move |_| exit.request());

        assert!(!engine.step_at(Instant::now()).unwrap());
    }

    #[test]
    fn test_close_request_stops_loop() {
        let (mut engine, script, log) = engine();
        script
            .frames
            .borrow_mut()
            .push_back(vec![WindowMessage::CloseRequested]);

        assert!(!engine.step_at(Instant::now()).unwrap());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_graphics_error_requests_exit() {
        let (mut engine, _, log) = engine_with(EngineConfig::default(), true);

        assert!(!engine.step_at(Instant::now()).unwrap());
        assert_eq!(*log.borrow(), vec!["present"]);
    }

    #[test]
    fn test_run_until_exit_then_shutdown() {
        let mut config = EngineConfig::default();
        config.timing.target_fps = 1000;
        let (mut engine, _, _) = engine_with(config, false);

        let frames = Rc::new(Cell::new(0));
        let exit = engine.exit_handle();
        let counter = frames.clone();
        let _task = engine.updates().register_fn(move |_| {
            counter.set(counter.get() + 1);
            if counter.get() == 3 {
                exit.request();
            }
        });

        engine.run().unwrap();
        assert_eq!(frames.get(), 3);
        assert!(!engine.input().borrow().has_device(DeviceType::Keyboard));
        assert_eq!(engine.updates().len(), 1);
        assert_eq!(engine.window().callback_count(), 0);
    }
}
