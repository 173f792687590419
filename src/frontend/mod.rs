mod contact;
mod counters;
mod dom;
mod frame_loop;
mod modal;
mod observer;
mod particles;
mod pointer;
mod reveal;
mod theme;

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use js_sys::{Function, Reflect};
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, Element};
use yew::AppHandle;

use crate::error::EffectError;
use crate::log::{log_event, set_min_level, LogLevel};
use crate::products::ProductCatalog;
use crate::settings::{parse_log_level, DEFAULT_LOG_LEVEL, LOG_LEVEL_ATTRIBUTE};

use self::frame_loop::FrameLoop;
use self::modal::{ModalBridge, ProductModal, ProductModalProps};
use self::observer::ObserverPool;
use self::particles::ParticleBackground;
use self::pointer::PointerEffects;
use self::theme::ThemeBinding;

const MODAL_ROOT_ID: &str = "product-modal-root";

thread_local! {
    static PAGE: RefCell<Option<PageContext>> = const { RefCell::new(None) };
}

/// Everything the page script owns: the shared frame loop, the observer pools,
/// listeners and the mounted modal. Built once by [`PageContext::init`] and torn
/// down by [`PageContext::dispose`].
pub struct PageContext {
    frame_loop: FrameLoop,
    theme: Option<ThemeBinding>,
    pointer: PointerEffects,
    particles: Option<ParticleBackground>,
    pools: Vec<ObserverPool>,
    listeners: Vec<EventListener>,
    modal: Option<AppHandle<ProductModal>>,
}

impl PageContext {
    pub fn init() -> Self {
        let frame_loop = FrameLoop::new();
        let scheduler = frame_loop.scheduler();

        let theme = ThemeBinding::init();
        let pointer = PointerEffects::attach(scheduler.clone());

        let particles = match ParticleBackground::start(scheduler.clone()) {
            Ok(background) => background,
            Err(error) => {
                log_event(LogLevel::Error, "particles.setup_failed", json!({ "error": error.to_string() }));
                None
            }
        };

        let mut pools = Vec::new();
        let pool_results = [
            ("scroll-reveal", reveal::scroll_reveal()),
            ("counters", counters::start(scheduler)),
            ("lazy-video", reveal::lazy_videos()),
            ("form-groups", reveal::form_groups()),
            ("vision", reveal::vision_statement()),
        ];
        for (name, result) in pool_results {
            match result {
                Ok(Some(pool)) => pools.push(pool),
                Ok(None) => {}
                Err(error) => log_event(
                    LogLevel::Warn,
                    "visibility.setup_failed",
                    json!({ "pool": name, "error": error.to_string() }),
                ),
            }
        }

        let mut listeners = Vec::new();
        let modal = match mount_modal() {
            Ok((handle, bridge)) => {
                listeners.extend(attach_feature_cards(&bridge));
                Some(handle)
            }
            Err(error) => {
                log_event(LogLevel::Warn, "modal.unavailable", json!({ "error": error.to_string() }));
                None
            }
        };
        listeners.extend(contact::attach());

        log_event(
            LogLevel::Info,
            "page.ready",
            json!({
                "theme": theme.as_ref().map(|binding| binding.store.get_preferred().as_str()),
                "pools": pools.len(),
                "particles": particles.is_some(),
                "frame_loop_running": frame_loop.is_running(),
            }),
        );

        Self {
            frame_loop,
            theme,
            pointer,
            particles,
            pools,
            listeners,
            modal,
        }
    }

    /// Cancels the frame loop and every task, disconnects observers and drops
    /// all listeners.
    pub fn dispose(mut self) {
        if let Some(particles) = self.particles.take() {
            particles.stop();
        }
        self.pointer.detach();
        self.frame_loop.dispose();
        for pool in &self.pools {
            pool.disconnect();
        }
        self.listeners.clear();
        self.theme.take();
        if let Some(modal) = self.modal.take() {
            modal.destroy();
        }
        log_event(LogLevel::Debug, "page.disposed", json!({}));
    }
}

fn mount_modal() -> Result<(AppHandle<ProductModal>, ModalBridge), EffectError> {
    let root = dom::document()
        .and_then(|d| d.get_element_by_id(MODAL_ROOT_ID))
        .ok_or(EffectError::MissingTarget("#product-modal-root"))?;
    let catalog = Rc::new(ProductCatalog::load()?);
    let bridge = ModalBridge::default();
    log_event(LogLevel::Debug, "modal.catalog_loaded", json!({ "products": catalog.len() }));

    let handle = yew::Renderer::<ProductModal>::with_root_and_props(
        root,
        ProductModalProps {
            catalog,
            bridge: bridge.clone(),
        },
    )
    .render();

    Ok((handle, bridge))
}

fn attach_feature_cards(bridge: &ModalBridge) -> Vec<EventListener> {
    dom::query_all(".feature-card")
        .into_iter()
        .map(|card| {
            let bridge = bridge.clone();
            let title_source: Element = card.clone();
            EventListener::new(&card, "click", move |_| {
                let title = title_source
                    .query_selector("h3")
                    .ok()
                    .flatten()
                    .and_then(|heading| heading.text_content());
                if let Some(title) = title {
                    bridge.open(&title);
                }
            })
        })
        .collect()
}

/// Calls the optional global `Splitting()` text splitter when the page loaded it.
fn init_text_splitting() {
    let Some(win) = window() else {
        return;
    };
    let Ok(splitting) = Reflect::get(&win, &JsValue::from_str("Splitting")) else {
        return;
    };
    let Some(splitting) = splitting.dyn_ref::<Function>() else {
        return;
    };

    if let Err(error) = splitting.call0(&JsValue::NULL) {
        log_event(
            LogLevel::Warn,
            "text_splitting.failed",
            json!({ "error": EffectError::from(error).to_string() }),
        );
    }
}

pub fn run() {
    set_min_level(parse_log_level(
        dom::root_attribute(LOG_LEVEL_ATTRIBUTE).as_deref(),
        DEFAULT_LOG_LEVEL,
    ));
    init_text_splitting();

    let page = PageContext::init();
    PAGE.with(|slot| *slot.borrow_mut() = Some(page));

    if let Some(win) = window() {
        EventListener::once(&win, "beforeunload", |_| {
            let page = PAGE.with(|slot| slot.borrow_mut().take());
            if let Some(page) = page {
                page.dispose();
            }
        })
        .forget();
    }
}
