//! Point-mass body and its per-step integration.
//!
//! Bodies never reject input: non-finite forces, impulses and velocities are
//! zeroed so the simulation can always advance.

use glam::DVec3;

use wayfarer_core::config::CharacterConfig;
use wayfarer_core::constants::MAX_FORCES_PER_STEP;

/// Fixed-capacity force scratch list, reset every fixed step.
/// Forces beyond capacity fold into the last slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceBuffer {
    forces: [DVec3; MAX_FORCES_PER_STEP],
    len: usize,
}

impl ForceBuffer {
    pub fn push(&mut self, force: DVec3) {
        let force = finite_or_zero(force);
        if self.len < MAX_FORCES_PER_STEP {
            self.forces[self.len] = force;
            self.len += 1;
        } else {
            self.forces[MAX_FORCES_PER_STEP - 1] += force;
        }
    }

    pub fn sum(&self) -> DVec3 {
        self.forces[..self.len]
            .iter()
            .fold(DVec3::ZERO, |acc, f| acc + *f)
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A simulated point mass with a collision sphere.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub position: DVec3,
    pub velocity: DVec3,
    /// Acceleration applied in the last step (read-only diagnostics).
    pub acceleration: DVec3,
    mass: f64,
    /// Horizontal velocity retention per step, [0, 1].
    friction: f64,
    pub gravity_scale: f64,
    pub use_gravity: bool,
    max_velocity: f64,
    /// Collision sphere radius. 0 disables collisions.
    pub radius: f64,
    /// Clamp to y = 0 and report grounding.
    pub ground_clamp: bool,
    pub is_grounded: bool,
    forces: ForceBuffer,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            acceleration: DVec3::ZERO,
            mass: 1.0,
            friction: 1.0,
            gravity_scale: 1.0,
            use_gravity: true,
            max_velocity: 50.0,
            radius: 0.5,
            ground_clamp: true,
            is_grounded: false,
            forces: ForceBuffer::default(),
        }
    }
}

impl PhysicsBody {
    pub fn new(position: DVec3) -> Self {
        Self {
            position: finite_or_zero(position),
            ..Default::default()
        }
    }

    /// Body tuned for a controlled character.
    pub fn for_character(config: &CharacterConfig, position: DVec3) -> Self {
        Self::new(position)
            .with_mass(config.mass)
            .with_friction(config.friction)
            .with_max_velocity(config.max_velocity)
            .with_radius(config.radius)
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.set_mass(mass);
        self
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.set_friction(friction);
        self
    }

    pub fn with_max_velocity(mut self, max_velocity: f64) -> Self {
        self.set_max_velocity(max_velocity);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        self
    }

    pub fn with_gravity(mut self, enabled: bool) -> Self {
        self.use_gravity = enabled;
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    /// Mass stays strictly positive.
    pub fn set_mass(&mut self, mass: f64) {
        if mass.is_finite() && mass > 0.0 {
            self.mass = mass;
        }
    }

    pub fn set_friction(&mut self, friction: f64) {
        if friction.is_finite() {
            self.friction = friction.clamp(0.0, 1.0);
        }
    }

    pub fn set_max_velocity(&mut self, max_velocity: f64) {
        if max_velocity.is_finite() && max_velocity > 0.0 {
            self.max_velocity = max_velocity;
        }
    }

    /// Accumulate a force for the next step only.
    pub fn add_force(&mut self, force: DVec3) {
        self.forces.push(force);
    }

    /// Instantaneous velocity change: `velocity += impulse / mass`.
    pub fn apply_impulse(&mut self, impulse: DVec3) {
        self.velocity += finite_or_zero(impulse) / self.mass;
    }

    /// Forces queued for the next step.
    pub fn pending_forces(&self) -> usize {
        self.forces.len()
    }

    /// Advance one fixed step.
    ///
    /// `gravity` is a magnitude applied along -Y. `min_y` is an absolute floor
    /// that holds even when the ground clamp is off.
    pub fn integrate(&mut self, dt: f64, gravity: f64, min_y: f64) {
        let mut acceleration = self.forces.sum() / self.mass;
        self.forces.clear();
        if self.use_gravity {
            acceleration.y -= self.gravity_scale * gravity;
        }
        self.acceleration = finite_or_zero(acceleration);

        self.velocity = finite_or_zero(self.velocity + self.acceleration * dt);
        self.velocity.x *= self.friction;
        self.velocity.z *= self.friction;

        let speed = self.velocity.length();
        if speed > self.max_velocity {
            self.velocity *= self.max_velocity / speed;
        }

        self.position += self.velocity * dt;

        if self.ground_clamp
            && (self.position.y < 0.0 || (self.position.y == 0.0 && self.velocity.y <= 0.0))
        {
            self.position.y = 0.0;
            self.velocity.y = 0.0;
            self.is_grounded = true;
        } else {
            self.is_grounded = false;
        }

        if self.position.y < min_y {
            self.position.y = min_y;
            self.velocity.y = self.velocity.y.max(0.0);
        }
    }

    /// Horizontal speed (ignoring vertical component).
    pub fn horizontal_speed(&self) -> f64 {
        (self.velocity.x * self.velocity.x + self.velocity.z * self.velocity.z).sqrt()
    }
}

fn finite_or_zero(v: DVec3) -> DVec3 {
    if v.is_finite() {
        v
    } else {
        DVec3::ZERO
    }
}
