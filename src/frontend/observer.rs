use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use serde_json::json;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::EffectError;
use crate::log::{log_event, LogLevel};
use crate::visibility::{TargetId, VisibilityPool, VisibilityReport};

struct PoolState {
    pool: VisibilityPool,
    targets: Vec<(TargetId, Element)>,
}

impl PoolState {
    fn id_of(&self, element: &Element) -> Option<TargetId> {
        self.targets
            .iter()
            .find(|(_, target)| target == element)
            .map(|(id, _)| *id)
    }

    fn take(&mut self, id: TargetId) -> Option<Element> {
        let index = self.targets.iter().position(|(target_id, _)| *target_id == id)?;
        Some(self.targets.swap_remove(index).1)
    }
}

/// One-shot visibility trigger backed by its own `IntersectionObserver`.
///
/// `on_visible` receives the element and its position within the batch of
/// targets that fired together.
pub struct ObserverPool {
    name: &'static str,
    observer: IntersectionObserver,
    state: Rc<RefCell<PoolState>>,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl ObserverPool {
    pub fn new(
        name: &'static str,
        threshold: f64,
        root_margin: Option<&str>,
        mut on_visible: impl FnMut(&Element, usize) + 'static,
    ) -> Result<Self, EffectError> {
        let state = Rc::new(RefCell::new(PoolState {
            pool: VisibilityPool::new(threshold),
            targets: Vec::new(),
        }));

        let callback = {
            let state = state.clone();
            Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
                move |entries: Array, observer: IntersectionObserver| {
                    let fired = {
                        let mut state = state.borrow_mut();
                        let reports: Vec<VisibilityReport> = entries
                            .iter()
                            .map(|entry| entry.unchecked_into::<IntersectionObserverEntry>())
                            .filter_map(|entry| {
                                Some(VisibilityReport {
                                    target: state.id_of(&entry.target())?,
                                    is_intersecting: entry.is_intersecting(),
                                    ratio: entry.intersection_ratio(),
                                })
                            })
                            .collect();

                        let fired_ids = state.pool.process(&reports);
                        fired_ids
                            .into_iter()
                            .filter_map(|id| state.take(id))
                            .collect::<Vec<Element>>()
                    };

                    for (index, element) in fired.iter().enumerate() {
                        observer.unobserve(element);
                        on_visible(element, index);
                    }

                    if !fired.is_empty() {
                        log_event(
                            LogLevel::Debug,
                            "visibility.fired",
                            json!({ "pool": name, "count": fired.len() }),
                        );
                    }
                },
            )
        };

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        if let Some(margin) = root_margin {
            init.set_root_margin(margin);
        }
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        Ok(Self {
            name,
            observer,
            state,
            _callback: callback,
        })
    }

    pub fn observe(&self, element: &Element) {
        {
            let mut state = self.state.borrow_mut();
            if state.id_of(element).is_some() {
                return;
            }
            let id = state.pool.register();
            state.targets.push((id, element.clone()));
        }
        self.observer.observe(element);
    }

    pub fn observe_all(&self, elements: &[Element]) {
        for element in elements {
            self.observe(element);
        }
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
        let mut state = self.state.borrow_mut();
        state.pool.clear();
        state.targets.clear();
        log_event(LogLevel::Debug, "visibility.disconnected", json!({ "pool": self.name }));
    }
}
