use flume::{Receiver, Sender};

/// Reported once when a curve stops. `finished` is false when it was interrupted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub finished: bool,
}

/// Exponential velocity decay. `velocity` is in units per millisecond.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Decay {
    pub velocity: f32,
    pub deceleration: f32,
}

impl Decay {
    // stop once a frame moves the value less than this
    const REST_DELTA: f32 = 0.1;

    fn value_at(&self, from: f32, elapsed_ms: f64) -> f32 {
        let k = (1.0 - self.deceleration as f64).max(1e-6);
        let travel = self.velocity as f64 / k * (1.0 - (-k * elapsed_ms).exp());
        (from as f64 + travel) as f32
    }

    /// Where the value ends up once the curve has fully decayed.
    pub fn resting_point(&self, from: f32) -> f32 {
        let k = (1.0 - self.deceleration).max(1e-6);
        from + self.velocity / k
    }
}

/// A damped spring pulling the value to `to`. `velocity` is in units per second.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spring {
    pub to: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    pub velocity: f32,
}

impl Spring {
    const REST_SPEED: f64 = 0.001;
    const REST_DISPLACEMENT: f64 = 0.001;

    const STEP: f64 = 0.001;
    const MAX_STEPS_PER_TICK: usize = 1000;

    pub fn to(to: f32) -> Self {
        Self {
            to,
            stiffness: 40.0,
            damping: 14.0,
            mass: 1.0,
            velocity: 0.0,
        }
    }

    // f64 state: at a few thousand degrees a 1 ms step is below f32 resolution
    fn step(&self, position: &mut f64, velocity: &mut f64) {
        let (to, stiffness, damping) = (self.to as f64, self.stiffness as f64, self.damping as f64);
        let force = -stiffness * (*position - to) - damping * *velocity;
        *velocity += force / (self.mass as f64).max(f64::EPSILON) * Self::STEP;
        *position += *velocity * Self::STEP;
    }

    fn at_rest(&self, position: f64, velocity: f64) -> bool {
        velocity.abs() <= Self::REST_SPEED
            && (self.to as f64 - position).abs() <= Self::REST_DISPLACEMENT
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Curve {
    Decay(Decay),
    Spring(Spring),
}

impl From<Decay> for Curve {
    fn from(decay: Decay) -> Self {
        Self::Decay(decay)
    }
}

impl From<Spring> for Curve {
    fn from(spring: Spring) -> Self {
        Self::Spring(spring)
    }
}

struct Running {
    curve: Curve,
    from: f32,
    started: f64,
    last_time: f64,
    position: f64,
    velocity: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(usize);

/// A subscription to an [`AnimatedValue`]: every new value is sent down the channel.
pub struct Listener {
    id: ListenerId,
    receiver: Receiver<f32>,
}

impl Listener {
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    /// The most recent value sent since the last call, if any.
    pub fn latest(&self) -> Option<f32> {
        self.receiver.try_iter().last()
    }
}

/// A single scalar driven over time by at most one [`Curve`].
#[derive(Default)]
pub struct AnimatedValue {
    value: f32,
    running: Option<Running>,
    listeners: Vec<(ListenerId, Sender<f32>)>,
    next_id: usize,
}

impl AnimatedValue {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub const fn value(&self) -> f32 {
        self.value
    }

    pub const fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn add_listener(&mut self) -> Listener {
        let (tx, rx) = flume::unbounded();
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, tx));
        Listener { id, receiver: rx }
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        before != self.listeners.len()
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        self.notify();
    }

    /// Starts `curve` from the current value. Refuses if a curve is already running.
    pub fn start(&mut self, curve: impl Into<Curve>, now: f64) -> bool {
        if self.running.is_some() {
            return false;
        }

        let curve = curve.into();
        let velocity = match curve {
            Curve::Spring(spring) => spring.velocity as f64,
            Curve::Decay(_) => 0.0,
        };

        self.running = Some(Running {
            curve,
            from: self.value,
            started: now,
            last_time: now,
            position: self.value as f64,
            velocity,
        });
        true
    }

    /// Interrupts the running curve, leaving the value where it is.
    pub fn stop(&mut self) -> Option<Completion> {
        self.running.take().map(|_| Completion { finished: false })
    }

    /// Advances the running curve to `now` (seconds).
    pub fn tick(&mut self, now: f64) -> Option<Completion> {
        let running = self.running.as_mut()?;
        if now <= running.last_time {
            return None;
        }

        let done = match running.curve {
            Curve::Decay(decay) => {
                let value = decay.value_at(running.from, (now - running.started) * 1000.0);
                let done = (value - self.value).abs() < Decay::REST_DELTA;
                self.value = value;
                done
            }

            Curve::Spring(spring) => {
                let steps = (((now - running.last_time) / Spring::STEP).round() as usize)
                    .clamp(1, Spring::MAX_STEPS_PER_TICK);

                let mut done = false;
                for _ in 0..steps {
                    spring.step(&mut running.position, &mut running.velocity);
                    if spring.at_rest(running.position, running.velocity) {
                        running.position = spring.to as f64;
                        done = true;
                        break;
                    }
                }
                self.value = running.position as f32;
                done
            }
        };
        running.last_time = now;

        self.notify();

        if done {
            self.running.take();
            return Some(Completion { finished: true });
        }
        None
    }

    fn notify(&mut self) {
        let value = self.value;
        self.listeners.retain(|(_, tx)| tx.send(value).is_ok());
    }
}
