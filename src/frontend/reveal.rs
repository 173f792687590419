use gloo::timers::future::TimeoutFuture;
use serde_json::json;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use super::dom::{query_all, query_one, set_style};
use super::observer::ObserverPool;
use crate::error::EffectError;
use crate::letters::letter_spans;
use crate::log::{log_event, LogLevel};
use crate::settings::{
    FORM_GROUP_STAGGER_MS, FORM_GROUP_THRESHOLD, SCROLL_REVEAL_ROOT_MARGIN,
    SCROLL_REVEAL_THRESHOLD, VIDEO_THRESHOLD, VISION_THRESHOLD,
};

const VISIBLE_CLASS: &str = "is-visible";

fn pool_for(
    selector: &str,
    start: impl FnOnce(&[Element]) -> Result<ObserverPool, EffectError>,
) -> Result<Option<ObserverPool>, EffectError> {
    let targets = query_all(selector);
    if targets.is_empty() {
        return Ok(None);
    }

    let pool = start(&targets)?;
    pool.observe_all(&targets);
    Ok(Some(pool))
}

/// Adds `is-visible` to every `[data-scroll]` element once it scrolls in.
pub fn scroll_reveal() -> Result<Option<ObserverPool>, EffectError> {
    pool_for("[data-scroll]", |_| {
        ObserverPool::new(
            "scroll-reveal",
            SCROLL_REVEAL_THRESHOLD,
            Some(SCROLL_REVEAL_ROOT_MARGIN),
            |element, _| {
                let _ = element.class_list().add_1(VISIBLE_CLASS);
            },
        )
    })
}

/// Copies `data-src` to `src` on the container's iframe the first time it
/// comes into view.
pub fn lazy_videos() -> Result<Option<ObserverPool>, EffectError> {
    pool_for(".video-container", |_| {
        ObserverPool::new("lazy-video", VIDEO_THRESHOLD, None, |container, _| {
            let Some(iframe) = container.query_selector("iframe").ok().flatten() else {
                return;
            };
            if let Some(source) = iframe.get_attribute("data-src") {
                let _ = iframe.set_attribute("src", &source);
                log_event(LogLevel::Debug, "video.loaded", json!({ "src": source }));
            }
        })
    })
}

pub fn form_groups() -> Result<Option<ObserverPool>, EffectError> {
    pool_for(".form-group", |groups| {
        for group in groups {
            set_style(group, "opacity", "0");
            set_style(group, "transform", "translateY(20px)");
            set_style(group, "transition", "all 0.5s ease");
        }

        ObserverPool::new("form-groups", FORM_GROUP_THRESHOLD, None, |group, index| {
            let group = group.clone();
            let delay = FORM_GROUP_STAGGER_MS.saturating_mul(index as u32);
            spawn_local(async move {
                TimeoutFuture::new(delay).await;
                set_style(&group, "opacity", "1");
                set_style(&group, "transform", "translateY(0)");
            });
        })
    })
}

/// Splits `.vision-text` into letter spans; CSS staggers them once the
/// statement gets `is-visible`.
pub fn vision_statement() -> Result<Option<ObserverPool>, EffectError> {
    let Some(text) = query_one(".vision-text") else {
        return Ok(None);
    };
    let letters = letter_spans(&text.text_content().unwrap_or_default());
    text.set_inner_html(&letters);

    pool_for(".vision-statement", |_| {
        ObserverPool::new("vision", VISION_THRESHOLD, None, |statement, _| {
            let _ = statement.class_list().add_1(VISIBLE_CLASS);
        })
    })
}
