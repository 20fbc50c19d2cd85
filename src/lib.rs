#![cfg_attr(debug_assertions, allow(dead_code, unused_variables,))]

pub const SETTINGS_KEY: &str = "wunderwheel_settings";

pub trait RequestPaint: Send + Sync {
    fn request_repaint(&self) {}
}

impl RequestPaint for egui::Context {
    fn request_repaint(&self) {
        Self::request_repaint(self)
    }
}

pub struct NoopRepaint;
impl RequestPaint for NoopRepaint {}

mod error;
pub use error::ConfigurationError;

pub mod arc;
pub mod color;
pub mod segment;

pub mod animation;
pub mod gesture;
pub mod spin;

pub mod presentation;

pub mod config;
pub mod logger;

pub mod widgets;

pub mod app;
pub use app::App;
