//! Priority-bucketed task scheduling
//!
//! A [`TaskManager`] owns any number of callables grouped by priority. Lower
//! priority values run first; inside one priority, tasks run in slot order.
//! Slots vacated by cancelled tasks are left empty in place so every other
//! task keeps its slot, and are reused by later registrations before the
//! bucket grows.
//!
//! Registration hands back a [`TaskHandle`]. Dropping the handle (or calling
//! [`TaskHandle::cancel`]) unregisters the task, including from inside a
//! running pass.

use easy_core::{EngineError, Result};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;
use std::rc::{Rc, Weak};

type TaskFn<A> = Rc<RefCell<Box<dyn FnMut(A)>>>;

/// One priority level: slots in registration order plus the free list
struct Bucket<A> {
    slots: Vec<Option<TaskFn<A>>>,
    free: Vec<usize>,
}

impl<A> Bucket<A> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn insert(&mut self, task: TaskFn<A>) -> usize {
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(task);
            slot
        } else {
            self.slots.push(Some(task));
            self.slots.len() - 1
        }
    }

    fn remove(&mut self, slot: usize) -> Option<TaskFn<A>> {
        let task = self.slots.get_mut(slot)?.take()?;
        self.free.push(slot);
        Some(task)
    }
}

struct Buckets<A> {
    buckets: BTreeMap<u32, Bucket<A>>,
    registered: usize,
}

impl<A> Buckets<A> {
    fn insert(&mut self, priority: u32, task: TaskFn<A>) -> usize {
        self.registered += 1;
        self.buckets
            .entry(priority)
            .or_insert_with(Bucket::new)
            .insert(task)
    }

    fn remove(&mut self, priority: u32, slot: usize) -> Option<TaskFn<A>> {
        let task = self.buckets.get_mut(&priority)?.remove(slot)?;
        self.registered -= 1;
        Some(task)
    }

    fn task_at(&self, priority: u32, slot: usize) -> Option<Option<TaskFn<A>>> {
        let bucket = self.buckets.get(&priority)?;
        bucket.slots.get(slot).cloned()
    }

    fn next_priority(&self, after: u32) -> Option<u32> {
        self.buckets
            .range((Bound::Excluded(after), Bound::Unbounded))
            .next()
            .map(|(priority, _)| *priority)
    }
}

/// Back-reference from a handle to the manager that issued it
trait Unregister {
    fn unregister(&self, priority: u32, slot: usize);
}

impl<A: 'static> Unregister for RefCell<Buckets<A>> {
    fn unregister(&self, priority: u32, slot: usize) {
        let removed = self.borrow_mut().remove(priority, slot);

        // The task may own other handles, so it is dropped after the borrow ends
        if removed.is_some() {
            log::debug!("Unregistered task at priority {priority}, slot {slot}");
        }
        drop(removed);
    }
}

/// Ownership token for a registered task.
///
/// The task stays registered for as long as the handle lives. A handle that
/// outlives its manager is inert.
#[must_use = "dropping a TaskHandle unregisters its task immediately"]
pub struct TaskHandle {
    priority: u32,
    slot: usize,
    manager: Option<Weak<dyn Unregister>>,
}

impl TaskHandle {
    /// Priority bucket the task lives in
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Slot index inside the priority bucket
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// True while the task is registered with a live manager
    pub fn is_registered(&self) -> bool {
        self.manager
            .as_ref()
            .is_some_and(|manager| manager.strong_count() > 0)
    }

    /// Unregister the task now
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(manager) = self.manager.take().and_then(|weak| weak.upgrade()) {
            manager.unregister(self.priority, self.slot);
        }
    }

    fn belongs_to(&self, manager: *const ()) -> bool {
        self.manager
            .as_ref()
            .is_some_and(|weak| weak.as_ptr() as *const () == manager)
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("priority", &self.priority)
            .field("slot", &self.slot)
            .field("registered", &self.is_registered())
            .finish()
    }
}

/// Resets the running flag even if a task unwinds
struct RunGuard<'a>(&'a Cell<bool>);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Priority-ordered collection of cancellable callables.
///
/// `A` is the argument every task receives on each [`run`](Self::run); it is
/// cloned once per task. `DEFAULT_PRIORITY` is used by
/// [`register_task`](Self::register_task).
///
/// The manager is single-threaded. Tasks may cancel themselves or any other
/// task while a pass is running: a cancelled slot is skipped when reached.
/// Calling `run` again from inside a task is rejected.
pub struct TaskManager<A: 'static, const DEFAULT_PRIORITY: u32 = 5> {
    inner: Rc<RefCell<Buckets<A>>>,
    running: Cell<bool>,
}

impl<A: 'static, const DEFAULT_PRIORITY: u32> Default for TaskManager<A, DEFAULT_PRIORITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static, const DEFAULT_PRIORITY: u32> TaskManager<A, DEFAULT_PRIORITY> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Buckets {
                buckets: BTreeMap::new(),
                registered: 0,
            })),
            running: Cell::new(false),
        }
    }

    /// Register a task at the default priority
    pub fn register_task<F>(&self, task: F) -> TaskHandle
    where
        F: FnMut(A) + 'static,
    {
        self.register_task_with_priority(task, DEFAULT_PRIORITY)
    }

    /// Register a task at an explicit priority (lower runs first)
    pub fn register_task_with_priority<F>(&self, task: F, priority: u32) -> TaskHandle
    where
        F: FnMut(A) + 'static,
    {
        let task: Box<dyn FnMut(A)> = Box::new(task);
        let task: TaskFn<A> = Rc::new(RefCell::new(task));
        let slot = self.inner.borrow_mut().insert(priority, task);
        log::debug!("Registered task at priority {priority}, slot {slot}");

        let manager: Weak<dyn Unregister> = Rc::downgrade(&self.inner) as Weak<RefCell<Buckets<A>>>;
        TaskHandle {
            priority,
            slot,
            manager: Some(manager),
        }
    }

    /// Unregister the task behind `handle`.
    ///
    /// Fails if the handle was issued by another manager; the handle is
    /// consumed either way, which cancels the task in whichever manager owns it.
    pub fn unregister_task(&self, handle: TaskHandle) -> Result<()> {
        if !handle.belongs_to(Rc::as_ptr(&self.inner) as *const ()) {
            return Err(EngineError::InvalidOperation(
                "task handle was issued by a different task manager".into(),
            ));
        }

        handle.cancel();
        Ok(())
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.inner.borrow().registered
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every registered task once, in ascending priority then slot order.
    ///
    /// The manager is not borrowed while a task runs, so tasks may cancel
    /// handles (their own included). Tasks registered mid-pass into a bucket
    /// that has not been fully visited yet may run in the same pass.
    pub fn run(&self, args: A) -> Result<()>
    where
        A: Clone,
    {
        if self.running.replace(true) {
            return Err(EngineError::InvalidOperation(
                "TaskManager::run called from inside a running task".into(),
            ));
        }
        let _guard = RunGuard(&self.running);

        let mut cursor = self.inner.borrow().buckets.keys().next().copied();
        while let Some(priority) = cursor {
            let mut slot = 0;

            loop {
                // Re-read the slot on every step: earlier tasks may have emptied it.
                // The borrow must end before the task runs.
                let next = self.inner.borrow().task_at(priority, slot);
                let Some(task) = next else { break };

                if let Some(task) = task {
                    let mut call = task.borrow_mut();
                    (*call)(args.clone());
                }
                slot += 1;
            }

            cursor = self.inner.borrow().next_priority(priority);
        }

        Ok(())
    }
}
