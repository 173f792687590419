use serde_json::json;
use web_sys::{window, Element};

use super::dom::query_all;
use super::observer::ObserverPool;
use crate::counter::{format_grouped, parse_count, CounterAnimation, CounterFrame};
use crate::error::EffectError;
use crate::log::{log_event, LogLevel};
use crate::scheduler::{FrameControl, FrameScheduler};
use crate::settings::COUNTER_THRESHOLD;

const COUNTER_SELECTOR: &str = ".stat-value[data-count]";

/// Counts each stat up from zero the first time half of it is on screen.
pub fn start(scheduler: FrameScheduler) -> Result<Option<ObserverPool>, EffectError> {
    let stats = query_all(COUNTER_SELECTOR);
    if stats.is_empty() {
        return Ok(None);
    }

    let pool = ObserverPool::new("counters", COUNTER_THRESHOLD, None, move |element, _| {
        animate(&scheduler, element);
    })?;
    pool.observe_all(&stats);
    Ok(Some(pool))
}

fn animate(scheduler: &FrameScheduler, element: &Element) {
    let Some(target) = parse_count(element.get_attribute("data-count").as_deref()) else {
        log_event(
            LogLevel::Warn,
            "counter.invalid_target",
            json!({ "value": element.get_attribute("data-count") }),
        );
        return;
    };

    let element = element.clone();
    let triggered_at = window()
        .and_then(|win| win.performance())
        .map(|performance| performance.now());
    let mut animation = match triggered_at {
        Some(now) => CounterAnimation::new(target).triggered_at(now),
        None => CounterAnimation::new(target),
    };
    scheduler.register(move |timestamp| {
        let (value, control) = match animation.frame(timestamp) {
            CounterFrame::Running(value) => (value, FrameControl::Continue),
            CounterFrame::Finished(value) => (value, FrameControl::Done),
        };
        element.set_text_content(Some(&format_grouped(value)));
        control
    });
}
