use gloo::events::EventListener;
use js_sys::{Function, Reflect};
use serde_json::json;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Element, MediaQueryList, MediaQueryListEvent, Storage};

use super::dom::document;
use crate::log::{log_event, LogLevel};
use crate::settings::{THEME_ATTRIBUTE, THEME_KEY};
use crate::theme::{resolve_theme, theme_for_system_change, Theme};

const TOGGLE_ID: &str = "theme-toggle";
const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

fn read_stored_theme() -> Option<Theme> {
    let value = local_storage()?.get_item(THEME_KEY).ok().flatten()?;
    Theme::from_str(&value)
}

fn persist_theme(theme: Theme) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(THEME_KEY, theme.as_str());
    }
}

#[cfg(test)]
fn clear_stored_theme() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(THEME_KEY);
    }
}

fn dark_query() -> Option<MediaQueryList> {
    window()?.match_media(DARK_QUERY).ok().flatten()
}

fn system_prefers_dark() -> bool {
    dark_query().map(|mq| mq.matches()).unwrap_or(false)
}

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn current_theme() -> Option<Theme> {
    let root = document()?.document_element()?;
    Theme::from_str(&root.get_attribute(THEME_ATTRIBUTE)?)
}

fn render_theme(theme: Theme, toggle: &Element) {
    if let Some(root) = document().and_then(|d| d.document_element()) {
        let _ = root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
    }
    let _ = toggle.set_attribute("aria-pressed", &theme.pressed().to_string());
    let _ = toggle.set_attribute("aria-label", &theme.toggle_label());
}

fn render_with_transition(theme: Theme, toggle: &Element) {
    if prefers_reduced_motion() {
        render_theme(theme, toggle);
        return;
    }

    let Some(document) = document() else {
        render_theme(theme, toggle);
        return;
    };

    let document_js: JsValue = document.into();
    let Ok(start_view_transition) =
        Reflect::get(&document_js, &JsValue::from_str("startViewTransition"))
    else {
        render_theme(theme, toggle);
        return;
    };

    let Some(start_view_transition) = start_view_transition.dyn_ref::<Function>() else {
        render_theme(theme, toggle);
        return;
    };

    let callback = {
        let toggle = toggle.clone();
        Closure::once_into_js(move || render_theme(theme, &toggle))
    };

    if start_view_transition.call1(&document_js, &callback).is_err() {
        render_theme(theme, toggle);
    }
}

/// Theme state for the page's toggle control.
///
/// An explicit choice is persisted and from then on the OS signal is ignored
/// until the choice is cleared. Themes derived from the OS are shown but never
/// stored.
#[derive(Clone)]
pub struct ThemeStore {
    toggle: Element,
    animate: bool,
}

impl ThemeStore {
    pub fn get_preferred(&self) -> Theme {
        resolve_theme(read_stored_theme(), system_prefers_dark())
    }

    fn render(&self, theme: Theme) {
        if self.animate {
            render_with_transition(theme, &self.toggle);
        } else {
            render_theme(theme, &self.toggle);
        }
    }

    /// Records an explicit user choice.
    pub fn apply(&self, theme: Theme) {
        persist_theme(theme);
        self.render(theme);
        log_event(LogLevel::Info, "theme.applied", json!({ "theme": theme.as_str() }));
    }

    pub fn toggle(&self) {
        let current = current_theme().unwrap_or_else(|| self.get_preferred());
        self.apply(current.toggled());
    }

    /// Forgets the explicit choice and follows the OS signal again.
    #[cfg(test)]
    pub fn clear_preference(&self) {
        clear_stored_theme();
        render_theme(self.get_preferred(), &self.toggle);
    }

    fn follow_system(&self, prefers_dark: bool) {
        if let Some(theme) = theme_for_system_change(read_stored_theme(), prefers_dark) {
            self.render(theme);
            log_event(LogLevel::Info, "theme.system_changed", json!({ "theme": theme.as_str() }));
        }
    }
}

/// The store plus its click and OS-preference listeners. Dropping it detaches
/// both.
pub struct ThemeBinding {
    pub store: ThemeStore,
    _listeners: Vec<EventListener>,
}

impl ThemeBinding {
    /// Returns `None` when the page has no toggle control.
    pub fn init() -> Option<Self> {
        let toggle = document()?.get_element_by_id(TOGGLE_ID)?;
        let store = ThemeStore {
            toggle,
            animate: true,
        };

        let initial = store.get_preferred();
        render_theme(initial, &store.toggle);
        log_event(LogLevel::Debug, "theme.initial", json!({ "theme": initial.as_str() }));

        let click = {
            let store = store.clone();
            EventListener::new(&store.toggle.clone(), "click", move |_| store.toggle())
        };

        let mut listeners = vec![click];
        if let Some(query) = dark_query() {
            let store = store.clone();
            listeners.push(EventListener::new(&query, "change", move |event| {
                let prefers_dark = event
                    .dyn_ref::<MediaQueryListEvent>()
                    .map(|event| event.matches())
                    .unwrap_or_else(system_prefers_dark);
                store.follow_system(prefers_dark);
            }));
        }

        Some(Self {
            store,
            _listeners: listeners,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_toggle() -> Element {
        let document = document().expect("document");
        if let Some(existing) = document.get_element_by_id(TOGGLE_ID) {
            return existing;
        }
        let button = document.create_element("button").expect("button");
        button.set_id(TOGGLE_ID);
        document.body().expect("body").append_child(&button).expect("append");
        button
    }

    fn root_theme() -> Option<String> {
        document()?.document_element()?.get_attribute(THEME_ATTRIBUTE)
    }

    #[wasm_bindgen_test]
    fn stored_choice_ignores_system_changes() {
        let store = ThemeStore {
            toggle: mount_toggle(),
            animate: false,
        };
        store.apply(Theme::Light);

        store.follow_system(true);
        assert_eq!(root_theme().as_deref(), Some("light"));
        assert_eq!(read_stored_theme(), Some(Theme::Light));

        store.clear_preference();
        store.follow_system(true);
        assert_eq!(root_theme().as_deref(), Some("dark"));
        assert_eq!(read_stored_theme(), None);
    }

    #[wasm_bindgen_test]
    fn toggle_persists_and_updates_pressed_state() {
        let toggle = mount_toggle();
        let store = ThemeStore {
            toggle: toggle.clone(),
            animate: false,
        };
        store.apply(Theme::Light);

        store.toggle();
        assert_eq!(read_stored_theme(), Some(Theme::Dark));
        assert_eq!(toggle.get_attribute("aria-pressed").as_deref(), Some("true"));

        clear_stored_theme();
    }
}
