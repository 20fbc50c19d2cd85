use egui::{vec2, CursorIcon, Id, Rect, Sense};

use crate::{presentation::WHEEL_TEST_ID, spin::SpinResult};

mod paint;
use paint::WheelPainter;

mod rotation;
pub use rotation::WheelRotation;

mod state;
pub use state::{OnSpinEnd, WheelOptions, WheelState};

pub struct WheelResponse {
    pub response: egui::Response,
    pub settled: Option<SpinResult>,
}

/// Shows a [`WheelState`] and lets the user flick it.
pub struct Wheel<'a> {
    state: &'a mut WheelState,
    size: Option<f32>,
}

impl<'a> Wheel<'a> {
    const KNOB_SIZE: f32 = 30.0;
    const MIN_SIZE: f32 = 64.0;
    const AVAILABLE_FRACTION: f32 = 0.8;

    pub fn new(state: &'a mut WheelState) -> Self {
        Self { state, size: None }
    }

    /// Diameter of the wheel. Defaults to 80% of the available space.
    pub fn size(self, size: f32) -> Self {
        Self {
            size: Some(size),
            ..self
        }
    }

    pub fn id() -> Id {
        Id::new(WHEEL_TEST_ID)
    }

    pub fn display(self, ui: &mut egui::Ui) -> WheelResponse {
        let time = ui.input().time;
        let settled = self.state.tick(time, ui.ctx());

        let size = self
            .size
            .unwrap_or_else(|| {
                let available = ui.available_size();
                (available.x.min(available.y - Self::KNOB_SIZE)) * Self::AVAILABLE_FRACTION
            })
            .max(Self::MIN_SIZE);

        let (rect, _) =
            ui.allocate_exact_size(vec2(size, size + Self::KNOB_SIZE), Sense::hover());

        let sense = if self.state.is_enabled() {
            Sense::drag()
        } else {
            Sense::hover()
        };
        let response = ui.interact(rect, Self::id(), sense);

        if let Some(event) = self.state.gesture_mut().update(&response, time) {
            if self.state.handle_gesture(&event, time) {
                ui.ctx().request_repaint();
            }
        }

        let frame = self.state.frame();
        if frame.interactive && response.hovered() {
            ui.output().cursor_icon = if response.dragged() {
                CursorIcon::Grabbing
            } else {
                CursorIcon::Grab
            };
        }

        let wheel = Rect::from_min_size(
            rect.min + vec2(0.0, Self::KNOB_SIZE),
            vec2(size, size),
        );
        WheelPainter::new(&ui.painter_at(rect), wheel, Self::KNOB_SIZE).paint(&frame);

        WheelResponse { response, settled }
    }
}
