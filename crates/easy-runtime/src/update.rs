//! Per-frame update tasks

use crate::priority;
use crate::task::{TaskHandle, TaskManager};
use easy_core::Result;
use std::cell::RefCell;
use std::rc::Rc;

/// The frame update task set.
///
/// Every task receives the frame delta in seconds. Methods bound with
/// [`register_task`](Self::register_task) hold only a weak reference to their
/// owner, so a dropped owner turns its task into a no-op until the handle is
/// released.
#[derive(Default)]
pub struct UpdateManager {
    tasks: TaskManager<f64, { priority::UPDATE_DEFAULT }>,
}

impl UpdateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `method` on `owner` at the default priority
    pub fn register_task<O: 'static>(
        &self,
        owner: &Rc<RefCell<O>>,
        method: fn(&mut O, f64),
    ) -> TaskHandle {
        self.register_task_with_priority(owner, method, priority::UPDATE_DEFAULT)
    }

    /// Bind `method` on `owner` at an explicit priority
    pub fn register_task_with_priority<O: 'static>(
        &self,
        owner: &Rc<RefCell<O>>,
        method: fn(&mut O, f64),
        priority: u32,
    ) -> TaskHandle {
        let owner = Rc::downgrade(owner);
        self.tasks.register_task_with_priority(
            move |dt| {
                let Some(owner) = owner.upgrade() else {
                    return;
                };
                match owner.try_borrow_mut() {
                    Ok(mut owner) => method(&mut owner, dt),
                    Err(_) => log::warn!(
                        "Skipping update of {}: owner is already borrowed",
                        std::any::type_name::<O>()
                    ),
                };
            },
            priority,
        )
    }

    /// Register a free closure at the default priority
    pub fn register_fn<F>(&self, task: F) -> TaskHandle
    where
        F: FnMut(f64) + 'static,
    {
        self.tasks.register_task(task)
    }

    /// Register a free closure at an explicit priority
    pub fn register_fn_with_priority<F>(&self, task: F, priority: u32) -> TaskHandle
    where
        F: FnMut(f64) + 'static,
    {
        self.tasks.register_task_with_priority(task, priority)
    }

    pub fn unregister_task(&self, handle: TaskHandle) -> Result<()> {
        self.tasks.unregister_task(handle)
    }

    /// Run every task with the frame delta in seconds
    pub fn run(&self, delta: f64) -> Result<()> {
        self.tasks.run(delta)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Mover {
        position: f64,
        speed: f64,
        log: Vec<&'static str>,
    }

    impl Mover {
        fn integrate(&mut self, dt: f64) {
            self.position += self.speed * dt;
            self.log.push("integrate");
        }

        fn accelerate(&mut self, _dt: f64) {
            self.speed += 1.0;
            self.log.push("accelerate");
        }
    }

    #[test]
    fn test_bound_method_receives_delta() {
        let updates = UpdateManager::new();
        let mover = Rc::new(RefCell::new(Mover {
            speed: 2.0,
            ..Default::default()
        }));

        let _task = updates.register_task(&mover, Mover::integrate);
        updates.run(0.5).unwrap();

        assert!((mover.borrow().position - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_priorities_sequence_methods() {
        let updates = UpdateManager::new();
        let mover = Rc::new(RefCell::new(Mover::default()));

        let _late = updates.register_task_with_priority(&mover, Mover::integrate, priority::UPDATE_END);
        let _early = updates.register_task_with_priority(&mover, Mover::accelerate, priority::UPDATE_BEGIN);
        updates.run(1.0).unwrap();

        let mover = mover.borrow();
        assert_eq!(mover.log, vec!["accelerate", "integrate"]);
        assert!((mover.position - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_priority_is_five() {
        let updates = UpdateManager::new();
        let mover = Rc::new(RefCell::new(Mover::default()));

        let task = updates.register_task(&mover, Mover::integrate);
        assert_eq!(task.priority(), 5);
        assert_eq!(updates.len(), 1);

        updates.unregister_task(task).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn test_dropped_owner_is_skipped() {
        let updates = UpdateManager::new();
        let mover = Rc::new(RefCell::new(Mover::default()));

        let task = updates.register_task(&mover, Mover::integrate);
        drop(mover);

        assert!(updates.run(0.016).is_ok());
        assert!(task.is_registered());
    }

    #[test]
    fn test_free_closure() {
        let updates = UpdateManager::new();
        let total = Rc::new(RefCell::new(0.0));

        let _task = {
            let total = total.clone();
            updates.register_fn_with_priority(move |dt| *total.borrow_mut() += dt, priority::RENDER_BEGIN)
        };
        updates.run(0.25).unwrap();
        updates.run(0.25).unwrap();

        assert!((*total.borrow() - 0.5).abs() < 1e-9);
    }
}
