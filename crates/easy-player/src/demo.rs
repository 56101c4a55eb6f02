//! A ship flown with the keyboard or a gamepad
//!
//! Arrow keys or WASD steer, Shift boosts, Space fires, Escape quits.
//! On a gamepad the left stick steers, the right trigger boosts, A fires and
//! Start quits.

use easy_engine::{Engine, ExitHandle, Platform};
use easy_input::{
    GamepadButton, GamepadController, InputFlag, Key, KeyboardController, Stick, Trigger,
};
use easy_runtime::TaskHandle;
use std::cell::RefCell;
use std::rc::Rc;

const SPEED: f32 = 200.0;
const BOOST: f32 = 2.5;

const ARROWS: usize = 0;
const WASD: usize = 1;

/// The demo's game object
pub struct Ship {
    position: (f32, f32),
    /// Digital steering per key scheme: left, right, up, down
    held: [[bool; 4]; 2],
    stick: (f32, f32),
    boost: f32,
    shots: u32,
    since_report: f64,
    exit: ExitHandle,
}

impl Ship {
    pub fn new(exit: ExitHandle) -> Self {
        Self {
            position: (0.0, 0.0),
            held: [[false; 4]; 2],
            stick: (0.0, 0.0),
            boost: 0.0,
            shots: 0,
            since_report: 0.0,
            exit,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    fn steer(&mut self, scheme: usize, direction: usize, flag: InputFlag) {
        self.held[scheme][direction] = flag.is_pressed();
    }

    fn arrow_left(&mut self, flag: InputFlag) {
        self.steer(ARROWS, 0, flag);
    }

    fn arrow_right(&mut self, flag: InputFlag) {
        self.steer(ARROWS, 1, flag);
    }

    fn arrow_up(&mut self, flag: InputFlag) {
        self.steer(ARROWS, 2, flag);
    }

    fn arrow_down(&mut self, flag: InputFlag) {
        self.steer(ARROWS, 3, flag);
    }

    fn wasd_left(&mut self, flag: InputFlag) {
        self.steer(WASD, 0, flag);
    }

    fn wasd_right(&mut self, flag: InputFlag) {
        self.steer(WASD, 1, flag);
    }

    fn wasd_up(&mut self, flag: InputFlag) {
        self.steer(WASD, 2, flag);
    }

    fn wasd_down(&mut self, flag: InputFlag) {
        self.steer(WASD, 3, flag);
    }

    fn boost_key(&mut self, flag: InputFlag) {
        self.boost = if flag.is_pressed() { 1.0 } else { 0.0 };
    }

    fn boost_trigger(&mut self, value: f32) {
        if value > 0.0 {
            self.boost = value;
        }
    }

    fn steer_stick(&mut self, x: f32, y: f32) {
        self.stick = (x, y);
    }

    fn fire(&mut self, flag: InputFlag) {
        if flag == InputFlag::Down {
            self.shots += 1;
            log::info!("Fire! ({} shots)", self.shots);
        }
    }

    fn quit(&mut self, flag: InputFlag) {
        if flag == InputFlag::Down {
            self.exit.request();
        }
    }

    /// Move by the combined steering input
    pub fn integrate(&mut self, dt: f64) {
        let [arrows, wasd] = self.held;
        let [left, right, up, down] = [0, 1, 2, 3].map(|i| f32::from(arrows[i] || wasd[i]));
        let x = (right - left + self.stick.0).clamp(-1.0, 1.0);
        let y = (up - down + self.stick.1).clamp(-1.0, 1.0);
        let speed = SPEED * (1.0 + (BOOST - 1.0) * self.boost) * dt as f32;

        self.position.0 += x * speed;
        self.position.1 += y * speed;

        self.since_report += dt;
        if self.since_report >= 1.0 {
            self.since_report = 0.0;
            log::info!(
                "Ship at ({:.1}, {:.1})",
                self.position.0,
                self.position.1
            );
        }
    }
}

/// The ship, its controllers and their scheduled tasks
pub struct Demo {
    ship: Rc<RefCell<Ship>>,
    _keyboard: Rc<RefCell<KeyboardController<Ship>>>,
    _gamepad: Option<Rc<RefCell<GamepadController<Ship>>>>,
    _tasks: Vec<TaskHandle>,
}

impl Demo {
    pub fn install<P: Platform>(engine: &Engine<P>) -> Self {
        let ship = Rc::new(RefCell::new(Ship::new(engine.exit_handle())));
        let updates = engine.updates();
        let input = engine.input().borrow();
        let mut tasks = Vec::new();

        let keyboard = Rc::new(RefCell::new(KeyboardController::new()));
        {
            let mut controller = keyboard.borrow_mut();
            controller.reset_keyboard(input.keyboard().as_ref());
            controller.reset_target(Some(&ship));
            controller
                .map(Key::Left, Ship::arrow_left)
                .map(Key::Right, Ship::arrow_right)
                .map(Key::Up, Ship::arrow_up)
                .map(Key::Down, Ship::arrow_down)
                .map(Key::A, Ship::wasd_left)
                .map(Key::D, Ship::wasd_right)
                .map(Key::W, Ship::wasd_up)
                .map(Key::S, Ship::wasd_down)
                .map(Key::LeftShift, Ship::boost_key)
                .map(Key::Space, Ship::fire)
                .map(Key::Escape, Ship::quit);
        }
        tasks.push(KeyboardController::register(&keyboard, updates));

        let gamepad = input.gamepad(0).map(|pad| {
            let controller = Rc::new(RefCell::new(GamepadController::new()));
            {
                let mut controller = controller.borrow_mut();
                controller.reset_gamepad(Some(&pad));
                controller.reset_target(Some(&ship));
                controller
                    .map(GamepadButton::A, Ship::fire)
                    .map(GamepadButton::Start, Ship::quit)
                    .map_trigger(Trigger::Right, Ship::boost_trigger)
                    .map_stick(Stick::Left, Ship::steer_stick);
            }
            tasks.push(GamepadController::register(&controller, updates));
            controller
        });

        tasks.push(updates.register_task(&ship, Ship::integrate));

        Self {
            ship,
            _keyboard: keyboard,
            _gamepad: gamepad,
            _tasks: tasks,
        }
    }

    pub fn ship(&self) -> &Rc<RefCell<Ship>> {
        &self.ship
    }
}
