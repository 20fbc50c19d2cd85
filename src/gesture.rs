use std::collections::VecDeque;

use egui::{Pos2, Vec2};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Undetermined,
    Began,
    Active,
    End,
    Cancelled,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureEvent {
    pub state: GestureState,
    pub translation: Vec2,
    /// points per second
    pub velocity: Vec2,
}

/// Raw pointer input, in the order the host sees it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerInput {
    Press { pos: Pos2, time: f64 },
    Move { pos: Pos2, time: f64 },
    Release { time: f64 },
    Lost,
}

#[derive(Copy, Clone, Debug)]
struct Sample {
    time: f64,
    pos: Pos2,
}

/// Release velocity from the pointer samples of the last few frames.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: VecDeque<Sample>,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(Self::HISTORY),
        }
    }
}

impl VelocityTracker {
    const HISTORY: usize = 20;
    const HORIZON: f64 = 0.100;
    const ASSUME_STOPPED: f64 = 0.040;

    pub fn add(&mut self, time: f64, pos: Pos2) {
        while self.samples.len() >= Self::HISTORY {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { time, pos })
    }

    pub fn clear(&mut self) {
        self.samples.clear()
    }

    pub fn last_pos(&self) -> Option<Pos2> {
        self.samples.back().map(|s| s.pos)
    }

    /// Velocity as of `now`, zero if the pointer sat still for a while.
    pub fn velocity(&self, now: f64) -> Vec2 {
        let last = match self.samples.back() {
            Some(last) if now - last.time <= Self::ASSUME_STOPPED => last,
            _ => return Vec2::ZERO,
        };

        let first = self
            .samples
            .iter()
            .find(|s| last.time - s.time <= Self::HORIZON)
            .unwrap_or(last);

        let dt = (last.time - first.time) as f32;
        if dt <= f32::EPSILON {
            return Vec2::ZERO;
        }
        (last.pos - first.pos) / dt
    }
}

/// Turns pointer input into pan gesture transitions.
///
/// While disabled every input is dropped, so nothing downstream sees a gesture.
#[derive(Clone, Debug)]
pub struct PanGesture {
    enabled: bool,
    state: GestureState,
    origin: Option<Pos2>,
    tracker: VelocityTracker,
}

impl Default for PanGesture {
    fn default() -> Self {
        Self {
            enabled: true,
            state: GestureState::Undetermined,
            origin: None,
            tracker: VelocityTracker::default(),
        }
    }
}

impl PanGesture {
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn state(&self) -> GestureState {
        self.state
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        self.reset();
    }

    fn reset(&mut self) {
        self.state = GestureState::Undetermined;
        self.origin.take();
        self.tracker.clear();
    }

    fn event(&self, state: GestureState, velocity: Vec2) -> GestureEvent {
        let translation = match (self.origin, self.tracker.last_pos()) {
            (Some(origin), Some(last)) => last - origin,
            _ => Vec2::ZERO,
        };
        GestureEvent {
            state,
            translation,
            velocity,
        }
    }

    pub fn handle(&mut self, input: PointerInput) -> Option<GestureEvent> {
        use GestureState::*;

        if !self.enabled {
            return None;
        }

        match input {
            PointerInput::Press { pos, time } => {
                self.reset();
                self.origin.replace(pos);
                self.tracker.add(time, pos);
                self.state = Began;
                Some(self.event(Began, Vec2::ZERO))
            }

            PointerInput::Move { pos, time } if matches!(self.state, Began | Active) => {
                self.tracker.add(time, pos);
                self.state = Active;
                Some(self.event(Active, self.tracker.velocity(time)))
            }

            PointerInput::Release { time } if matches!(self.state, Began | Active) => {
                let event = self.event(End, self.tracker.velocity(time));
                self.reset();
                Some(event)
            }

            PointerInput::Lost if matches!(self.state, Began | Active) => {
                let event = self.event(Cancelled, Vec2::ZERO);
                self.reset();
                Some(event)
            }

            _ => None,
        }
    }

    /// Feeds this frame's drag state of `response` through [`Self::handle`].
    ///
    /// Returns the last transition produced this frame.
    pub fn update(&mut self, response: &egui::Response, time: f64) -> Option<GestureEvent> {
        let pos = response.interact_pointer_pos();
        let mut last = None;

        if response.drag_started() {
            if let Some(pos) = pos {
                last = self.handle(PointerInput::Press { pos, time }).or(last);
            }
        } else if response.dragged() {
            if let Some(pos) = pos {
                last = self.handle(PointerInput::Move { pos, time }).or(last);
            }
        }

        if response.drag_released() {
            last = self.handle(PointerInput::Release { time }).or(last);
        }

        last
    }
}
