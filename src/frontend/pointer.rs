use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent, TouchEvent};

use super::dom::{bounds, client_point, query_all, set_style};
use crate::magnetic::MagneticState;
use crate::scheduler::{FrameControl, FrameScheduler, TaskId};
use crate::settings::{magnetic_strength, TiltConfig};
use crate::tilt::{tilt_for_pointer, TiltTransform};

/// Listeners and frame tasks for every `[data-magnetic]` and `[data-tilt]`
/// element. Dropping it detaches all listeners.
pub struct PointerEffects {
    listeners: Vec<EventListener>,
    magnetic_tasks: Vec<Rc<Cell<Option<TaskId>>>>,
    scheduler: FrameScheduler,
}

impl PointerEffects {
    pub fn attach(scheduler: FrameScheduler) -> Self {
        let mut effects = Self {
            listeners: Vec::new(),
            magnetic_tasks: Vec::new(),
            scheduler,
        };

        for element in query_all("[data-magnetic]") {
            effects.attach_magnetic(element);
        }
        for element in query_all("[data-tilt]") {
            effects.attach_tilt(element);
        }

        effects
    }

    fn attach_magnetic(&mut self, element: Element) {
        let strength = magnetic_strength(element.get_attribute("data-magnetic-strength").as_deref());
        let state = Rc::new(RefCell::new(MagneticState::new(strength)));
        let task = Rc::new(Cell::new(None));

        let on_move = {
            let element = element.clone();
            let state = state.clone();
            let task = task.clone();
            let scheduler = self.scheduler.clone();
            EventListener::new(&element.clone(), "mousemove", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                state
                    .borrow_mut()
                    .pointer_move(client_point(event.client_x(), event.client_y()), bounds(&element));
                ensure_magnetic_task(&scheduler, &element, &state, &task);
            })
        };

        let on_leave = {
            let element = element.clone();
            let state = state.clone();
            let task = task.clone();
            let scheduler = self.scheduler.clone();
            EventListener::new(&element.clone(), "mouseleave", move |_| {
                state.borrow_mut().pointer_leave();
                ensure_magnetic_task(&scheduler, &element, &state, &task);
            })
        };

        self.listeners.push(on_move);
        self.listeners.push(on_leave);
        self.magnetic_tasks.push(task);
    }

    fn attach_tilt(&mut self, element: Element) {
        let config = TiltConfig::from_attributes(
            element.get_attribute("data-tilt-max").as_deref(),
            element.get_attribute("data-tilt-perspective").as_deref(),
            element.get_attribute("data-tilt-scale").as_deref(),
        );

        let apply = {
            let element = element.clone();
            move |client_x: i32, client_y: i32| {
                let transform = tilt_for_pointer(&config, bounds(&element), client_point(client_x, client_y));
                set_style(&element, "transform", &transform.css());
            }
        };

        let on_mouse = {
            let apply = apply.clone();
            EventListener::new(&element, "mousemove", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    apply(event.client_x(), event.client_y());
                }
            })
        };

        let on_touch = EventListener::new(&element, "touchmove", move |event| {
            if let Some(touch) = event
                .dyn_ref::<TouchEvent>()
                .and_then(|event| event.touches().get(0))
            {
                apply(touch.client_x(), touch.client_y());
            }
        });

        let on_leave = {
            let element = element.clone();
            EventListener::new(&element.clone(), "mouseleave", move |_| {
                set_style(&element, "transform", &TiltTransform::neutral(&config).css());
            })
        };

        self.listeners.push(on_mouse);
        self.listeners.push(on_touch);
        self.listeners.push(on_leave);
    }

    pub fn detach(&mut self) {
        for task in self.magnetic_tasks.drain(..) {
            if let Some(id) = task.take() {
                self.scheduler.cancel(id);
            }
        }
        self.listeners.clear();
    }
}

/// Starts the smoothing task unless one is already running. The task stops
/// itself once the offset has settled on its target.
fn ensure_magnetic_task(
    scheduler: &FrameScheduler,
    element: &Element,
    state: &Rc<RefCell<MagneticState>>,
    task: &Rc<Cell<Option<TaskId>>>,
) {
    if task.get().is_some() {
        return;
    }

    let element = element.clone();
    let state = state.clone();
    let slot = task.clone();
    let id = scheduler.register(move |_| {
        let mut state = state.borrow_mut();
        state.tick();

        if state.is_settled() {
            state.settle();
            set_style(&element, "transform", &state.transform());
            slot.set(None);
            FrameControl::Done
        } else {
            set_style(&element, "transform", &state.transform());
            FrameControl::Continue
        }
    });
    task.set(Some(id));
}
