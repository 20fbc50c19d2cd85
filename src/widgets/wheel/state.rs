use crate::{
    animation::Completion,
    gesture::{GestureEvent, PanGesture, PointerInput},
    presentation::{present, Frame, WheelStyle},
    segment::{make_wheel, Geometry, Segment, WheelItems},
    spin::{Phase, SpinController, SpinPolicy, SpinResult, SpinSession},
    ConfigurationError, RequestPaint,
};

use super::WheelRotation;

pub type OnSpinEnd = Box<dyn FnMut(&str, usize)>;

/// Everything a wheel is built from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WheelOptions {
    pub items: WheelItems,
    pub geometry: Geometry,
    pub style: WheelStyle,
    pub policy: SpinPolicy,
    pub seed: Option<u64>,
}

pub struct WheelState {
    items: WheelItems,
    geometry: Geometry,
    segments: Vec<Segment>,
    style: WheelStyle,
    controller: SpinController,
    gesture: PanGesture,
    rotation: WheelRotation,
    on_spin_end: Option<OnSpinEnd>,
    spins_started: usize,
    spins_completed: usize,
}

impl WheelState {
    pub fn new(options: WheelOptions) -> Result<Self, ConfigurationError> {
        let WheelOptions {
            items,
            geometry,
            style,
            policy,
            seed,
        } = options;

        let segments = make_wheel(&items, geometry)?;
        let rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        let controller = SpinController::new(policy, rng)?;

        log::debug!("built a wheel with {} segments", segments.len());

        Ok(Self {
            items,
            geometry,
            segments,
            style,
            controller,
            gesture: PanGesture::default(),
            rotation: WheelRotation::new(),
            on_spin_end: None,
            spins_started: 0,
            spins_completed: 0,
        })
    }

    pub fn on_spin_end(mut self, on_spin_end: impl FnMut(&str, usize) + 'static) -> Self {
        self.on_spin_end.replace(Box::new(on_spin_end));
        self
    }

    pub fn set_on_spin_end(&mut self, on_spin_end: impl FnMut(&str, usize) + 'static) {
        self.on_spin_end.replace(Box::new(on_spin_end));
    }

    /// Swaps in a new item table. A spin in flight is abandoned without a winner.
    pub fn set_items(&mut self, items: WheelItems) -> Result<(), ConfigurationError> {
        let segments = make_wheel(&items, self.geometry)?;
        self.interrupt();
        self.controller.reset();
        self.items = items;
        self.segments = segments;
        Ok(())
    }

    pub fn set_style(&mut self, style: WheelStyle) {
        self.style = style;
    }

    pub const fn items(&self) -> &WheelItems {
        &self.items
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub const fn style(&self) -> &WheelStyle {
        &self.style
    }

    pub const fn session(&self) -> &SpinSession {
        self.controller.session()
    }

    pub const fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub const fn is_enabled(&self) -> bool {
        self.controller.is_enabled()
    }

    pub const fn angle(&self) -> f32 {
        self.rotation.snapshot()
    }

    pub const fn is_spinning(&self) -> bool {
        self.rotation.is_spinning()
    }

    pub const fn spins_started(&self) -> usize {
        self.spins_started
    }

    pub const fn spins_completed(&self) -> usize {
        self.spins_completed
    }

    pub fn gesture_mut(&mut self) -> &mut PanGesture {
        &mut self.gesture
    }

    /// Feeds raw pointer input through the pan recognizer.
    pub fn handle_input(&mut self, input: PointerInput, now: f64) -> bool {
        match self.gesture.handle(input) {
            Some(event) => self.handle_gesture(&event, now),
            None => false,
        }
    }

    /// Returns whether this event started a spin.
    pub fn handle_gesture(&mut self, event: &GestureEvent, now: f64) -> bool {
        let start = match self
            .controller
            .on_gesture(event, self.rotation.snapshot(), self.segments.len())
        {
            Some(start) => start,
            None => return false,
        };

        if !self.rotation.start(start, now) {
            log::warn!("an animation is already running, not starting another");
            self.controller.reset();
            return false;
        }

        self.spins_started += 1;
        self.gesture.set_enabled(false);
        true
    }

    /// Advances the spin. Yields the result on the frame the wheel settles.
    pub fn tick(&mut self, now: f64, repaint: &impl RequestPaint) -> Option<SpinResult> {
        let completion = self.rotation.tick(now, repaint)?;
        self.finish(completion)
    }

    /// Abandons a spin in flight. No winner is reported for it.
    pub fn interrupt(&mut self) {
        if let Some(completion) = self.rotation.stop() {
            self.finish(completion);
        }
    }

    fn finish(&mut self, completion: Completion) -> Option<SpinResult> {
        let result =
            self.controller
                .on_complete(completion, self.rotation.snapshot(), &self.segments);
        self.gesture.set_enabled(self.controller.is_enabled());

        let result = result?;
        self.spins_completed += 1;
        if let Some(on_spin_end) = &mut self.on_spin_end {
            on_spin_end(&result.value, result.index);
        }
        Some(result)
    }

    pub fn frame(&self) -> Frame {
        present(
            &self.segments,
            self.session().winning_index,
            self.is_enabled(),
            self.rotation.snapshot(),
            &self.style,
        )
    }
}
