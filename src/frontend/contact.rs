use gloo::events::{EventListener, EventListenerOptions};
use serde_json::json;
use wasm_bindgen::JsCast;
use web_sys::{HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

use super::dom::document;
use crate::contact::{ContactSubmission, ACKNOWLEDGEMENT};
use crate::log::{log_event, LogLevel};

const FORM_ID: &str = "contactForm";

fn field_value(id: &str) -> String {
    let Some(element) = document().and_then(|d| d.get_element_by_id(id)) else {
        return String::new();
    };

    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
        textarea.value()
    } else {
        element.text_content().unwrap_or_default()
    }
}

/// Intercepts the contact form. Nothing is sent anywhere: the submission is
/// logged, acknowledged with an alert and the form is reset.
pub fn attach() -> Option<EventListener> {
    let form = document()?
        .get_element_by_id(FORM_ID)?
        .dyn_into::<HtmlFormElement>()
        .ok()?;

    let target = form.clone();
    Some(EventListener::new_with_options(
        &target,
        "submit",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();

            match ContactSubmission::from_fields(
                &field_value("name"),
                &field_value("email"),
                &field_value("message"),
            ) {
                Ok(submission) => {
                    log_event(LogLevel::Info, "contact.submitted", json!({ "submission": submission }));
                    gloo::dialogs::alert(ACKNOWLEDGEMENT);
                    form.reset();
                }
                Err(missing) => log_event(
                    LogLevel::Warn,
                    "contact.incomplete",
                    json!({ "field": missing.as_str() }),
                ),
            }
        },
    ))
}
