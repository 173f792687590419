use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use gloo::events::EventListener;
use js_sys::{Math, Reflect};
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};

use super::dom::{document, query_one};
use crate::error::EffectError;
use crate::log::{log_event, LogLevel};
use crate::particles::ParticleField;
use crate::scheduler::{FrameControl, FrameScheduler, TaskId};
use crate::settings::primary_hue;

const CANVAS_SELECTOR: &str = ".particle-network-animation";

struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    field: ParticleField,
}

/// Animated particle network behind the hero section.
pub struct ParticleBackground {
    scheduler: FrameScheduler,
    task: TaskId,
    _resize: EventListener,
}

impl ParticleBackground {
    /// Returns `Ok(None)` when the page has no particle canvas. Any setup
    /// failure hides the canvas; the caller only logs it.
    pub fn start(scheduler: FrameScheduler) -> Result<Option<Self>, EffectError> {
        let Some(element) = query_one(CANVAS_SELECTOR) else {
            return Ok(None);
        };
        let canvas = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| EffectError::CanvasContext("target is not a canvas".to_string()))?;

        match Self::start_on(&canvas, scheduler) {
            Ok(background) => Ok(Some(background)),
            Err(error) => {
                let _ = canvas.style().set_property("display", "none");
                Err(error)
            }
        }
    }

    fn start_on(canvas: &HtmlCanvasElement, scheduler: FrameScheduler) -> Result<Self, EffectError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| EffectError::CanvasContext("no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EffectError::CanvasContext("not a 2d context".to_string()))?;

        let (width, height) = css_size(canvas);
        let field = ParticleField::new(width, height, read_primary_hue(), &mut random);
        resize_backing(canvas, &ctx, width, height)?;

        log_event(
            LogLevel::Info,
            "particles.started",
            json!({ "width": width, "height": height, "population": field.particles().len() }),
        );

        let surface = Rc::new(RefCell::new(Surface {
            canvas: canvas.clone(),
            ctx,
            field,
        }));

        let resize = {
            let surface = surface.clone();
            let win = window().ok_or(EffectError::MissingTarget("window"))?;
            EventListener::new(&win, "resize", move |_| {
                let mut surface = surface.borrow_mut();
                let (width, height) = css_size(&surface.canvas);
                surface.field.resize(width, height, &mut random);
                if let Err(error) = resize_backing(&surface.canvas, &surface.ctx, width, height) {
                    log_event(
                        LogLevel::Warn,
                        "particles.resize_failed",
                        json!({ "error": error.to_string() }),
                    );
                }
            })
        };

        let task = scheduler.register(move |_| {
            draw_frame(&mut surface.borrow_mut());
            FrameControl::Continue
        });

        Ok(Self {
            scheduler,
            task,
            _resize: resize,
        })
    }

    pub fn stop(&self) {
        self.scheduler.cancel(self.task);
    }
}

fn random() -> f64 {
    Math::random()
}

fn css_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
    (f64::from(canvas.offset_width()), f64::from(canvas.offset_height()))
}

fn read_primary_hue() -> f64 {
    let raw = window()
        .zip(document().and_then(|d| d.document_element()))
        .and_then(|(win, root)| win.get_computed_style(&root).ok().flatten())
        .and_then(|style| style.get_property_value("--primary-hue").ok());

    primary_hue(raw.as_deref())
}

/// Sizes the backing store in device pixels and resets the transform so
/// drawing stays in CSS pixels.
fn resize_backing(
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
) -> Result<(), EffectError> {
    let dpr = window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    canvas.set_width((width * dpr) as u32);
    canvas.set_height((height * dpr) as u32);
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    Ok(())
}

fn draw_frame(surface: &mut Surface) {
    let Surface { ctx, field, .. } = surface;
    ctx.clear_rect(0.0, 0.0, field.width(), field.height());
    field.step();

    for particle in field.particles() {
        ctx_set_fill_style(ctx, &particle.fill_style());
        ctx.begin_path();
        let _ = ctx.arc(particle.position.x, particle.position.y, particle.size, 0.0, PI * 2.0);
        ctx.fill();
    }

    ctx.set_line_width(0.5);
    for connection in field.connections() {
        ctx_set_stroke_style(ctx, &field.stroke_style(connection.alpha));
        ctx.begin_path();
        ctx.move_to(connection.from.x, connection.from.y);
        ctx.line_to(connection.to.x, connection.to.y);
        ctx.stroke();
    }
}

fn ctx_set_fill_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = Reflect::set(ctx.as_ref(), &JsValue::from_str("fillStyle"), &JsValue::from_str(value));
}

fn ctx_set_stroke_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = Reflect::set(ctx.as_ref(), &JsValue::from_str("strokeStyle"), &JsValue::from_str(value));
}
