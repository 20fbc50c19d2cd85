use crate::{
    animation::{Completion, Curve, Decay, Spring},
    gesture::{GestureEvent, GestureState},
    segment::{segment_angle, Segment, ONE_TURN},
    ConfigurationError,
};

/// Which segment sits under the pointer once the wheel stopped at `final_angle` degrees.
///
/// Segment centers are offset by half a segment, and the wheel turns clockwise while
/// the pointer stays put, hence the subtraction from the count.
pub fn winning_index(final_angle: f32, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }

    let final_angle = if final_angle.is_finite() {
        final_angle
    } else {
        0.0
    };

    let segment = segment_angle(count);
    let normalized = (final_angle.rem_euclid(ONE_TURN) + segment / 2.0).rem_euclid(ONE_TURN);
    let steps = ((normalized / segment).floor() as usize).min(count);
    Some((count - steps) % count)
}

/// How a released gesture becomes a spin. A wheel sticks with one.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpinPolicy {
    /// Coast on the release velocity, losing speed at a random rate in the given range.
    Decay {
        #[serde(default = "defaults::min_deceleration")]
        min_deceleration: f32,
        #[serde(default = "defaults::max_deceleration")]
        max_deceleration: f32,
        #[serde(default = "defaults::velocity_multiplier")]
        velocity_multiplier: f32,
    },
    /// Spring to a precomputed angle a number of turns away.
    TargetAngle {
        #[serde(default = "defaults::minimum_spins")]
        minimum_spins: f32,
        #[serde(default = "defaults::scale_factor")]
        scale_factor: f32,
        #[serde(default = "defaults::stiffness")]
        stiffness: f32,
        #[serde(default = "defaults::damping")]
        damping: f32,
        #[serde(default = "defaults::mass")]
        mass: f32,
    },
}

mod defaults {
    use super::SpinPolicy;

    pub const fn min_deceleration() -> f32 {
        SpinPolicy::DEFAULT_MIN_DECELERATION
    }
    pub const fn max_deceleration() -> f32 {
        SpinPolicy::DEFAULT_MAX_DECELERATION
    }
    pub const fn velocity_multiplier() -> f32 {
        SpinPolicy::DEFAULT_VELOCITY_MULTIPLIER
    }
    pub const fn minimum_spins() -> f32 {
        SpinPolicy::DEFAULT_MINIMUM_SPINS
    }
    pub const fn scale_factor() -> f32 {
        SpinPolicy::DEFAULT_SCALE_FACTOR
    }
    pub const fn stiffness() -> f32 {
        SpinPolicy::DEFAULT_STIFFNESS
    }
    pub const fn damping() -> f32 {
        SpinPolicy::DEFAULT_DAMPING
    }
    pub const fn mass() -> f32 {
        SpinPolicy::DEFAULT_MASS
    }
}

impl Default for SpinPolicy {
    fn default() -> Self {
        Self::decay(
            Self::DEFAULT_MIN_DECELERATION,
            Self::DEFAULT_MAX_DECELERATION,
        )
    }
}

impl SpinPolicy {
    pub const DEFAULT_MIN_DECELERATION: f32 = 0.98;
    pub const DEFAULT_MAX_DECELERATION: f32 = 0.99;
    pub const DEFAULT_VELOCITY_MULTIPLIER: f32 = 10.0;

    pub const DEFAULT_MINIMUM_SPINS: f32 = 3.0;
    pub const DEFAULT_SCALE_FACTOR: f32 = 500.0;
    pub const DEFAULT_STIFFNESS: f32 = 40.0;
    pub const DEFAULT_DAMPING: f32 = 14.0;
    pub const DEFAULT_MASS: f32 = 1.0;

    pub const fn decay(min_deceleration: f32, max_deceleration: f32) -> Self {
        Self::Decay {
            min_deceleration,
            max_deceleration,
            velocity_multiplier: Self::DEFAULT_VELOCITY_MULTIPLIER,
        }
    }

    pub const fn target_angle() -> Self {
        Self::TargetAngle {
            minimum_spins: Self::DEFAULT_MINIMUM_SPINS,
            scale_factor: Self::DEFAULT_SCALE_FACTOR,
            stiffness: Self::DEFAULT_STIFFNESS,
            damping: Self::DEFAULT_DAMPING,
            mass: Self::DEFAULT_MASS,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        fn check(
            name: &'static str,
            value: f32,
            valid: impl Fn(f32) -> bool,
        ) -> Result<(), ConfigurationError> {
            if value.is_finite() && valid(value) {
                return Ok(());
            }
            Err(ConfigurationError::InvalidSpinParameter { name, value })
        }

        match *self {
            Self::Decay {
                min_deceleration: min,
                max_deceleration: max,
                velocity_multiplier,
            } => {
                if !(0.0 < min && min <= max && max < 1.0) {
                    return Err(ConfigurationError::InvalidDeceleration { min, max });
                }
                check("velocity_multiplier", velocity_multiplier, |v| v >= 0.0)
            }

            Self::TargetAngle {
                minimum_spins,
                scale_factor,
                stiffness,
                damping,
                mass,
            } => {
                check("minimum_spins", minimum_spins, |v| v >= 0.0)?;
                check("scale_factor", scale_factor, |v| v > 0.0)?;
                check("stiffness", stiffness, |v| v > 0.0)?;
                // an undamped spring never comes to rest
                check("damping", damping, |v| v > 0.0)?;
                check("mass", mass, |v| v > 0.0)
            }
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Spinning,
    Settled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpinSession {
    pub enabled: bool,
    pub is_finished: bool,
    pub winning_index: Option<usize>,
    pub winner_value: Option<String>,
}

impl Default for SpinSession {
    fn default() -> Self {
        Self {
            enabled: true,
            is_finished: false,
            winning_index: None,
            winner_value: None,
        }
    }
}

/// Where to start the rotation from and how to drive it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpinStart {
    pub from: f32,
    pub curve: Curve,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpinResult {
    pub index: usize,
    pub value: String,
    pub final_angle: f32,
}

pub struct SpinController {
    policy: SpinPolicy,
    phase: Phase,
    session: SpinSession,
    rng: fastrand::Rng,
}

impl SpinController {
    pub fn new(policy: SpinPolicy, rng: fastrand::Rng) -> Result<Self, ConfigurationError> {
        policy.validate()?;
        Ok(Self {
            policy,
            phase: Phase::Idle,
            session: SpinSession::default(),
            rng,
        })
    }

    pub const fn policy(&self) -> &SpinPolicy {
        &self.policy
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn session(&self) -> &SpinSession {
        &self.session
    }

    pub const fn is_enabled(&self) -> bool {
        self.session.enabled
    }

    /// Reacts to a gesture transition. Only a release while idle starts a spin.
    pub fn on_gesture(
        &mut self,
        event: &GestureEvent,
        current_angle: f32,
        segments: usize,
    ) -> Option<SpinStart> {
        if event.state != GestureState::End {
            return None;
        }

        if !self.session.enabled || self.phase == Phase::Spinning {
            log::warn!("ignoring a release while the wheel is still spinning");
            return None;
        }

        if segments == 0 {
            log::debug!("nothing to spin, the wheel has no segments");
            return None;
        }

        self.session = SpinSession {
            enabled: false,
            ..SpinSession::default()
        };
        self.phase = Phase::Spinning;

        let from = if current_angle.is_finite() {
            current_angle.rem_euclid(ONE_TURN)
        } else {
            0.0
        };

        let velocity = event.velocity.y;
        let curve = self.make_curve(from, velocity);
        log::debug!("spinning from {from:.1} with velocity {velocity:.1}: {curve:?}");

        Some(SpinStart { from, curve })
    }

    fn make_curve(&mut self, from: f32, velocity: f32) -> Curve {
        match self.policy {
            SpinPolicy::Decay {
                min_deceleration,
                max_deceleration,
                velocity_multiplier,
            } => {
                let deceleration = self.draw_between(min_deceleration, max_deceleration);
                Curve::Decay(Decay {
                    velocity: velocity * velocity_multiplier,
                    deceleration,
                })
            }

            SpinPolicy::TargetAngle {
                minimum_spins,
                scale_factor,
                stiffness,
                damping,
                mass,
            } => {
                let turns = (velocity.abs() / scale_factor.max(f32::EPSILON)).max(minimum_spins);
                let direction = if velocity < 0.0 { -1.0 } else { 1.0 };
                Curve::Spring(Spring {
                    to: from + direction * turns * ONE_TURN,
                    stiffness,
                    damping,
                    mass,
                    velocity: 0.0,
                })
            }
        }
    }

    fn draw_between(&mut self, min: f32, max: f32) -> f32 {
        min + self.rng.f32() * (max - min)
    }

    /// Reacts to the animation stopping at `final_angle`.
    ///
    /// Yields the winner only for a finished spin. An interrupted one just goes back to idle.
    pub fn on_complete(
        &mut self,
        completion: Completion,
        final_angle: f32,
        segments: &[Segment],
    ) -> Option<SpinResult> {
        if self.phase != Phase::Spinning {
            return None;
        }

        if !completion.finished {
            log::warn!("spin was interrupted at {final_angle:.1}");
            self.reset();
            return None;
        }

        self.session.is_finished = true;
        self.phase = Phase::Settled;

        let result = winning_index(final_angle, segments.len()).and_then(|index| {
            let value = segments.get(index)?.value().to_string();
            Some(SpinResult {
                index,
                value,
                final_angle,
            })
        });

        match &result {
            Some(SpinResult { index, value, .. }) => {
                log::info!("wheel settled at {final_angle:.1} on #{index} ({value})");
                self.session = SpinSession {
                    enabled: true,
                    is_finished: false,
                    winning_index: Some(*index),
                    winner_value: Some(value.clone()),
                };
            }
            None => self.session = SpinSession::default(),
        }

        self.phase = Phase::Idle;
        result
    }

    pub fn reset(&mut self) {
        self.session = SpinSession::default();
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use egui::vec2;

    use super::*;
    use crate::segment::{make_wheel, Geometry, WheelItems};

    fn release(velocity: f32) -> GestureEvent {
        GestureEvent {
            state: GestureState::End,
            translation: vec2(0.0, 100.0),
            velocity: vec2(0.0, velocity),
        }
    }

    fn wheel(count: usize) -> Vec<Segment> {
        make_wheel(&WheelItems::fixed(count), Geometry::pie(100.0)).unwrap()
    }

    fn controller(policy: SpinPolicy) -> SpinController {
        SpinController::new(policy, fastrand::Rng::with_seed(7)).unwrap()
    }

    #[test]
    fn winner_examples() {
        assert_eq!(winning_index(370.0, 10), Some(0));
        assert_eq!(winning_index(225.0, 4), Some(1));
        assert_eq!(winning_index(0.0, 4), Some(0));
        // a quarter turn clockwise brings the last segment to the top
        assert_eq!(winning_index(90.0, 4), Some(3));
        assert_eq!(winning_index(-90.0, 4), Some(1));
        assert_eq!(winning_index(12.0, 0), None);
        assert_eq!(winning_index(f32::NAN, 3), Some(0));
    }

    #[test]
    fn winner_is_always_in_range() {
        for count in 1..=40 {
            let mut angle = -7200.0;
            while angle < 7200.0 {
                let index = winning_index(angle, count).unwrap();
                assert!(index < count, "{angle} {count} -> {index}");
                angle += 3.7;
            }
            for edge in [359.9999, -0.0001, 1e9, -1e9, f32::MAX, f32::INFINITY] {
                assert!(winning_index(edge, count).unwrap() < count);
            }
        }
    }

    #[test]
    fn only_a_release_starts_a_spin() {
        let mut spin = controller(SpinPolicy::default());
        for state in [GestureState::Began, GestureState::Active, GestureState::Cancelled] {
            let event = GestureEvent {
                state,
                ..release(100.0)
            };
            assert_eq!(spin.on_gesture(&event, 0.0, 4), None);
        }
        assert_eq!(spin.phase(), Phase::Idle);
        assert!(spin.on_gesture(&release(100.0), 0.0, 4).is_some());
        assert_eq!(spin.phase(), Phase::Spinning);
        assert!(!spin.is_enabled());
    }

    #[test]
    fn no_second_spin_while_spinning() {
        let mut spin = controller(SpinPolicy::default());
        assert!(spin.on_gesture(&release(100.0), 0.0, 4).is_some());
        assert!(spin.on_gesture(&release(300.0), 0.0, 4).is_none());
        assert!(spin.on_gesture(&release(300.0), 0.0, 4).is_none());
    }

    #[test]
    fn empty_wheel_does_not_spin() {
        let mut spin = controller(SpinPolicy::default());
        assert!(spin.on_gesture(&release(100.0), 0.0, 0).is_none());
        assert!(spin.is_enabled());
        assert_eq!(
            spin.on_complete(Completion { finished: true }, 10.0, &[]),
            None
        );
    }

    #[test]
    fn decay_draws_inside_the_callers_range() {
        let mut spin = controller(SpinPolicy::decay(0.90, 0.95));
        for _ in 0..200 {
            let start = spin.on_gesture(&release(100.0), 0.0, 4).unwrap();
            match start.curve {
                Curve::Decay(Decay {
                    velocity,
                    deceleration,
                }) => {
                    assert!((0.90..=0.95).contains(&deceleration), "{deceleration}");
                    assert_eq!(velocity, 1000.0);
                }
                curve => panic!("unexpected curve: {curve:?}"),
            }
            spin.reset();
        }
    }

    #[test]
    fn same_seed_same_spin() {
        let draw = || {
            let mut spin = controller(SpinPolicy::default());
            spin.on_gesture(&release(42.0), 0.0, 4).unwrap()
        };
        assert_eq!(draw(), draw());
    }

    #[test]
    fn bad_deceleration_range_is_rejected() {
        for (min, max) in [(0.99, 0.98), (0.0, 0.5), (0.5, 1.0)] {
            assert!(matches!(
                SpinController::new(SpinPolicy::decay(min, max), fastrand::Rng::new()),
                Err(ConfigurationError::InvalidDeceleration { .. })
            ));
        }
    }

    #[test]
    fn bad_spin_parameters_are_rejected() {
        let target = |f: fn(&mut [f32; 5])| {
            let mut params = [3.0, 500.0, 40.0, 14.0, 1.0];
            f(&mut params);
            let [minimum_spins, scale_factor, stiffness, damping, mass] = params;
            SpinPolicy::TargetAngle {
                minimum_spins,
                scale_factor,
                stiffness,
                damping,
                mass,
            }
        };

        for (policy, name) in [
            (target(|p| p[0] = -1.0), "minimum_spins"),
            (target(|p| p[1] = 0.0), "scale_factor"),
            (target(|p| p[2] = 0.0), "stiffness"),
            (target(|p| p[2] = -40.0), "stiffness"),
            (target(|p| p[3] = -1.0), "damping"),
            (target(|p| p[3] = 0.0), "damping"),
            (target(|p| p[4] = 0.0), "mass"),
            (target(|p| p[2] = f32::NAN), "stiffness"),
            (target(|p| p[4] = f32::INFINITY), "mass"),
            (
                SpinPolicy::Decay {
                    min_deceleration: 0.98,
                    max_deceleration: 0.99,
                    velocity_multiplier: f32::NAN,
                },
                "velocity_multiplier",
            ),
        ] {
            match SpinController::new(policy, fastrand::Rng::with_seed(1)) {
                Err(ConfigurationError::InvalidSpinParameter { name: got, .. }) => {
                    assert_eq!(got, name, "{policy:?}")
                }
                _ => panic!("{policy:?} should be rejected"),
            }
        }

        assert!(matches!(
            SpinPolicy::decay(f32::NAN, 0.99).validate(),
            Err(ConfigurationError::InvalidDeceleration { .. })
        ));
        assert!(SpinPolicy::target_angle().validate().is_ok());
        assert!(SpinPolicy::default().validate().is_ok());
    }

    #[test]
    fn target_angle_turns() {
        let mut spin = controller(SpinPolicy::target_angle());

        // slow flick still gets the minimum number of turns
        let start = spin.on_gesture(&release(10.0), 30.0, 4).unwrap();
        assert_eq!(start.from, 30.0);
        assert!(matches!(start.curve, Curve::Spring(Spring { to, .. }) if to == 30.0 + 3.0 * 360.0));
        spin.reset();

        let start = spin.on_gesture(&release(-2500.0), 720.0, 4).unwrap();
        assert_eq!(start.from, 0.0);
        assert!(matches!(start.curve, Curve::Spring(Spring { to, .. }) if to == -5.0 * 360.0));
    }

    #[test]
    fn finished_spin_reports_the_winner() {
        let segments = wheel(4);
        let mut spin = controller(SpinPolicy::default());
        spin.on_gesture(&release(100.0), 0.0, segments.len()).unwrap();

        let result = spin
            .on_complete(Completion { finished: true }, 225.0, &segments)
            .unwrap();
        assert_eq!(result.index, 1);
        assert_eq!(result.value, "2");

        assert_eq!(spin.phase(), Phase::Idle);
        assert_eq!(
            spin.session(),
            &SpinSession {
                enabled: true,
                is_finished: false,
                winning_index: Some(1),
                winner_value: Some("2".into()),
            }
        );

        // a second completion for the same spin is ignored
        assert_eq!(
            spin.on_complete(Completion { finished: true }, 225.0, &segments),
            None
        );
    }

    #[test]
    fn interrupted_spin_goes_back_to_idle() {
        let segments = wheel(4);
        let mut spin = controller(SpinPolicy::default());
        spin.on_gesture(&release(100.0), 0.0, 4).unwrap();

        assert_eq!(
            spin.on_complete(Completion { finished: false }, 100.0, &segments),
            None
        );
        assert_eq!(spin.phase(), Phase::Idle);
        assert!(spin.is_enabled());
        assert_eq!(spin.session().winning_index, None);
    }

    #[test]
    fn new_spin_clears_the_previous_winner() {
        let segments = wheel(4);
        let mut spin = controller(SpinPolicy::default());
        spin.on_gesture(&release(100.0), 0.0, 4).unwrap();
        spin.on_complete(Completion { finished: true }, 0.0, &segments);
        assert_eq!(spin.session().winning_index, Some(0));

        spin.on_gesture(&release(100.0), 0.0, 4).unwrap();
        assert_eq!(spin.session().winning_index, None);
        assert_eq!(spin.session().winner_value, None);
    }
}
