//! Spring physics animation
//!
//! RK4-integrated springs used by numeric counters and the active-section
//! indicator. Springs are stepped by the host's frame delta, so they carry no
//! clock of their own.

/// Most integration slices one [`Spring::advance`] call will run
pub const MAX_SUBSTEPS: u32 = 240;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Create a new spring configuration
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// A gentle, slow spring
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// A stiff, snappy spring
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// Spring for the active-section underline
    pub fn indicator() -> Self {
        Self::new(380.0, 30.0, 1.0)
    }

    /// Softer, cheaper-looking indicator spring for simplified effects
    pub fn indicator_simplified() -> Self {
        Self::new(200.0, 20.0, 1.0)
    }

    /// A critically damped spring that settles in roughly `secs`.
    ///
    /// A critically damped spring reaches 1% of its initial displacement at
    /// `ω·t ≈ 6.64`, so `ω` is chosen from the requested duration.
    pub fn for_duration(secs: f32) -> Self {
        let secs = if secs.is_finite() && secs > 0.0 {
            secs
        } else {
            0.001
        };
        let omega = 6.64 / secs;
        Self::new(omega * omega, 2.0 * omega, 1.0)
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Check if the spring is critically damped (no oscillation, fastest settling)
    pub fn is_critically_damped(&self) -> bool {
        (self.damping - self.critical_damping()).abs() < 0.01
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::stiff()
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Swap the physics without disturbing value or velocity
    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
    }

    /// Step in slices of at most `max_step`, so a long frame gap cannot
    /// destabilize a stiff spring.
    ///
    /// Stepping stops once the spring settles. A gap longer than
    /// [`MAX_SUBSTEPS`] slices (a tab resumed from the background, say)
    /// jumps straight to the target.
    pub fn advance(&mut self, dt: f32, max_step: f32) {
        if !dt.is_finite() || dt <= 0.0 || max_step <= 0.0 {
            return;
        }
        let mut remaining = dt;
        let mut steps = 0;
        while remaining > 0.0 {
            if steps == MAX_SUBSTEPS || self.is_settled() {
                self.set_immediate(self.target);
                return;
            }
            let step = remaining.min(max_step);
            self.step(step);
            remaining -= step;
            steps += 1;
        }
    }

    /// Jump to `value` with no motion
    pub fn set_immediate(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Check if the spring has settled (within epsilon of target with minimal velocity)
    pub fn is_settled(&self) -> bool {
        // Half a unit and 5 units/s are below what a rounded counter or a
        // pixel-snapped underline can show
        const EPSILON: f32 = 0.5;
        const VELOCITY_EPSILON: f32 = 5.0;

        (self.value - self.target).abs() < EPSILON && self.velocity.abs() < VELOCITY_EPSILON
    }

    /// Step the spring simulation using RK4 integration
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}
