use std::cell::RefCell;
use std::rc::Rc;

use gloo::render::{request_animation_frame, AnimationFrame};

use crate::scheduler::FrameScheduler;

type FrameSlot = Rc<RefCell<Option<AnimationFrame>>>;

/// Drives the shared [`FrameScheduler`] from one animation-frame handle. A
/// frame is pending exactly while the scheduler has work.
pub struct FrameLoop {
    scheduler: FrameScheduler,
    frame: FrameSlot,
}

impl FrameLoop {
    pub fn new() -> Self {
        let scheduler = FrameScheduler::new();
        let frame: FrameSlot = Rc::new(RefCell::new(None));

        let waker = {
            let scheduler = scheduler.clone();
            let frame = frame.clone();
            Rc::new(move || request_next(&scheduler, &frame))
        };
        scheduler.set_waker(waker);

        Self { scheduler, frame }
    }

    pub fn scheduler(&self) -> FrameScheduler {
        self.scheduler.clone()
    }

    pub fn is_running(&self) -> bool {
        self.frame.borrow().is_some()
    }

    /// Cancels the pending frame and drops every task.
    pub fn dispose(&self) {
        self.frame.borrow_mut().take();
        self.scheduler.clear();
    }
}

fn request_next(scheduler: &FrameScheduler, frame: &FrameSlot) {
    if frame.borrow().is_some() {
        return;
    }

    let next_scheduler = scheduler.clone();
    let next_frame = frame.clone();
    let handle = request_animation_frame(move |timestamp| {
        next_frame.borrow_mut().take();
        if next_scheduler.run_frame(timestamp) {
            request_next(&next_scheduler, &next_frame);
        }
    });

    *frame.borrow_mut() = Some(handle);
}
