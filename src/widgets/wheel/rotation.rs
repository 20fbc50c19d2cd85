use crate::{
    animation::{AnimatedValue, Completion, Listener},
    spin::SpinStart,
    RequestPaint,
};

/// The wheel's angle, and the snapshot of it the wheel reads through its listener.

pub struct WheelRotation {
    angle: AnimatedValue,
    listener: Listener,
    snapshot: f32,
}

impl Default for WheelRotation {
    fn default() -> Self {
        Self::new()
    }
}

impl WheelRotation {
    pub fn new() -> Self {
        let mut angle = AnimatedValue::new(0.0);
        let listener = angle.add_listener();
        Self {
            angle,
            listener,
            snapshot: 0.0,
        }
    }

    /// Degrees, as of the last tick.
    pub const fn snapshot(&self) -> f32 {
        self.snapshot
    }

    pub const fn is_spinning(&self) -> bool {
        self.angle.is_running()
    }

    pub fn listener_count(&self) -> usize {
        self.angle.listener_count()
    }

    pub fn start(&mut self, start: SpinStart, now: f64) -> bool {
        if self.angle.is_running() {
            return false;
        }

        self.angle.set_value(start.from);
        self.sync();
        self.angle.start(start.curve, now)
    }

    pub fn tick(&mut self, now: f64, repaint: &impl RequestPaint) -> Option<Completion> {
        let done = self.angle.tick(now);
        self.sync();

        if self.angle.is_running() || done.is_some() {
            repaint.request_repaint();
        }
        done
    }

    pub fn stop(&mut self) -> Option<Completion> {
        let done = self.angle.stop();
        self.sync();
        done
    }

    fn sync(&mut self) {
        if let Some(value) = self.listener.latest() {
            self.snapshot = value;
        }
    }
}

// The angle and its listener are owned together and go away together. A listener
// dropped on its own is pruned by the angle on its next update.
impl Drop for WheelRotation {
    fn drop(&mut self) {
        if self.angle.is_running() {
            log::debug!("wheel went away mid-spin at {:.1}", self.snapshot);
        }
    }
}
