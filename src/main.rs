// Only the wasm build reaches most of the effect code; host builds compile it
// for unit tests.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod contact;
mod counter;
mod error;
mod geometry;
mod letters;
mod log;
mod magnetic;
mod particles;
mod products;
mod scheduler;
mod settings;
mod theme;
mod tilt;
mod visibility;

#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This project is frontend-only. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
