use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

type Task = Box<dyn FnMut(f64) -> FrameControl>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    tasks: Vec<(TaskId, Task)>,
    running: bool,
    cleared: bool,
    cancelled: BTreeSet<TaskId>,
    waker: Option<Rc<dyn Fn()>>,
}

/// Shared per-frame task list. Every continuous effect registers here and the
/// frame loop drives them all from a single animation-frame callback.
///
/// Tasks may register or cancel other tasks while a frame is running. A
/// cancelled task is skipped for the rest of that frame; new tasks first run
/// on the next one.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    registry: Rc<RefCell<Registry>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called whenever the scheduler goes from idle to having work.
    pub fn set_waker(&self, waker: Rc<dyn Fn()>) {
        self.registry.borrow_mut().waker = Some(waker);
    }

    pub fn register(&self, task: impl FnMut(f64) -> FrameControl + 'static) -> TaskId {
        let (id, wake) = {
            let mut registry = self.registry.borrow_mut();
            let id = TaskId(registry.next_id);
            registry.next_id += 1;

            let was_idle = registry.tasks.is_empty() && !registry.running;
            registry.tasks.push((id, Box::new(task)));
            (id, was_idle.then(|| registry.waker.clone()).flatten())
        };

        if let Some(wake) = wake {
            wake();
        }
        id
    }

    pub fn cancel(&self, id: TaskId) {
        let mut registry = self.registry.borrow_mut();
        registry.tasks.retain(|(task_id, _)| *task_id != id);
        if registry.running {
            registry.cancelled.insert(id);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.registry.borrow().tasks.len()
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        let registry = self.registry.borrow();
        registry.tasks.is_empty() && !registry.running
    }

    /// Runs every registered task once. Returns `true` while work remains.
    pub fn run_frame(&self, timestamp_ms: f64) -> bool {
        let mut batch = {
            let mut registry = self.registry.borrow_mut();
            registry.running = true;
            std::mem::take(&mut registry.tasks)
        };

        let mut finished = Vec::new();
        for (id, task) in &mut batch {
            {
                let registry = self.registry.borrow();
                if registry.cleared || registry.cancelled.contains(id) {
                    continue;
                }
            }
            if task(timestamp_ms) == FrameControl::Done {
                finished.push(*id);
            }
        }

        let mut registry = self.registry.borrow_mut();
        let cancelled = std::mem::take(&mut registry.cancelled);
        if std::mem::take(&mut registry.cleared) {
            batch.clear();
        }
        batch.retain(|(id, _)| !finished.contains(id) && !cancelled.contains(id));
        batch.append(&mut registry.tasks);
        registry.tasks = batch;
        registry.running = false;

        !registry.tasks.is_empty()
    }

    /// Drops every task. During a frame this includes the batch being run;
    /// tasks registered after the call survive.
    pub fn clear(&self) {
        let mut registry = self.registry.borrow_mut();
        registry.tasks.clear();
        if registry.running {
            registry.cleared = true;
        }
    }
}
