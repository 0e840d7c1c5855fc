//! Character controller: turns directional input into body velocity.
//!
//! Input is four booleans folded into a unit 2D vector (diagonals are not
//! faster), rotated into the world by the view heading and written straight
//! into the body's horizontal velocity. Vertical velocity is left alone so
//! jumping and walking compose. The facing heading follows the movement
//! direction through a critically damped spring rather than snapping.
//!
//! Configured speeds are ground speeds in m/s. The controller converts them
//! with the current world scale, and reports speed back in m/s.

use glam::{DVec2, DVec3};

use wayfarer_core::commands::InputState;
use wayfarer_core::config::CharacterConfig;
use wayfarer_core::constants::MOVING_SPEED_THRESHOLD;
use wayfarer_core::types::{
    direction_to_heading, heading_to_direction, shortest_angle_delta, wrap_angle, CharacterState,
};

use crate::body::PhysicsBody;
use crate::world::{BodyHandle, PhysicsWorld};

pub struct CharacterController {
    body: BodyHandle,
    input: InputState,
    /// Unit-length (or zero) input: x = right, y = forward.
    move_input: DVec2,
    /// Reference frame for input (camera/compass yaw, radians).
    view_heading: f64,
    heading: f64,
    heading_velocity: f64,
    target_heading: Option<f64>,
    /// Ground speed reported by the last location anchor (m/s).
    anchor_speed: f64,
    walk_speed: f64,
    sprint_speed: f64,
    max_velocity: f64,
    /// World units per ground meter.
    world_scale: f64,
    jump_impulse: f64,
    turn_smooth_time: f64,
    state: CharacterState,
}

impl CharacterController {
    /// Spawn a character body at `position` and take control of it.
    pub fn new(world: &mut PhysicsWorld, config: &CharacterConfig, position: DVec3) -> Self {
        let body = world.add_body(PhysicsBody::for_character(config, position));
        let mut controller = Self {
            body,
            input: InputState::default(),
            move_input: DVec2::ZERO,
            view_heading: 0.0,
            heading: 0.0,
            heading_velocity: 0.0,
            target_heading: None,
            anchor_speed: 0.0,
            walk_speed: config.walk_speed,
            sprint_speed: config.sprint_speed,
            max_velocity: config.max_velocity,
            world_scale: 1.0,
            jump_impulse: config.jump_impulse,
            turn_smooth_time: config.turn_smooth_time,
            state: CharacterState::default(),
        };
        controller.refresh_state(world);
        controller
    }

    /// Follow a zoom change: ground speeds map to `scale` world units per meter.
    pub fn set_world_scale(&mut self, world: &mut PhysicsWorld, scale: f64) {
        if !(scale.is_finite() && scale > 0.0) {
            return;
        }
        self.world_scale = scale;
        if let Some(body) = world.body_mut(self.body) {
            body.set_max_velocity(self.max_velocity * scale);
        }
        self.refresh_state(world);
    }

    pub fn world_scale(&self) -> f64 {
        self.world_scale
    }

    /// Remove the controlled body from the world.
    pub fn despawn(self, world: &mut PhysicsWorld) -> bool {
        world.remove_body(self.body)
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn set_input(&mut self, input: InputState) {
        self.input = input;
        let raw = DVec2::new(
            axis(input.right, input.left),
            axis(input.forward, input.backward),
        );
        self.move_input = raw.normalize_or_zero();
    }

    pub fn input(&self) -> InputState {
        self.input
    }

    /// Normalized input vector (x = right, y = forward).
    pub fn move_input(&self) -> DVec2 {
        self.move_input
    }

    pub fn set_view_heading(&mut self, heading: f64) {
        if heading.is_finite() {
            self.view_heading = wrap_angle(heading);
        }
    }

    /// Vertical impulse if grounded. No double jump.
    pub fn jump(&mut self, world: &mut PhysicsWorld) -> bool {
        match world.body_mut(self.body) {
            Some(body) if body.is_grounded => {
                body.apply_impulse(DVec3::new(0.0, self.jump_impulse, 0.0));
                body.is_grounded = false;
                true
            }
            _ => false,
        }
    }

    /// Pin the body's horizontal position to a location fix.
    /// `heading` is a compass bearing in degrees.
    pub fn anchor_to(
        &mut self,
        world: &mut PhysicsWorld,
        position: DVec3,
        heading: Option<f64>,
        speed: Option<f64>,
    ) {
        if let Some(body) = world.body_mut(self.body) {
            if position.is_finite() {
                body.position.x = position.x;
                body.position.z = position.z;
            }
        }
        self.anchor_speed = speed.filter(|s| s.is_finite()).unwrap_or(0.0).max(0.0);
        if let Some(heading) = heading.filter(|h| h.is_finite()) {
            if self.anchor_speed > MOVING_SPEED_THRESHOLD {
                self.target_heading = Some(wrap_angle(heading.to_radians()));
            }
        }
        self.refresh_state(world);
    }

    /// Write input into the body and advance the heading spring by `dt`.
    pub fn update(&mut self, world: &mut PhysicsWorld, dt: f64) {
        let forward = heading_to_direction(self.view_heading);
        let right = DVec3::new(self.view_heading.cos(), 0.0, self.view_heading.sin());
        let direction = forward * self.move_input.y + right * self.move_input.x;
        let ground_speed = if self.input.sprint {
            self.sprint_speed
        } else {
            self.walk_speed
        };
        let speed = ground_speed * self.world_scale;

        if let Some(body) = world.body_mut(self.body) {
            body.velocity.x = direction.x * speed;
            body.velocity.z = direction.z * speed;
        }

        if self.move_input != DVec2::ZERO {
            self.target_heading = Some(direction_to_heading(direction));
        }

        if dt > 0.0 && dt.is_finite() {
            let target = self.target_heading.unwrap_or(self.heading);
            let goal = self.heading + shortest_angle_delta(self.heading, target);
            let next = smooth_damp(
                self.heading,
                goal,
                &mut self.heading_velocity,
                self.turn_smooth_time,
                dt,
            );
            self.heading = wrap_angle(next);
        }

        self.refresh_state(world);
    }

    /// Re-read the body after physics stepped.
    pub fn refresh_state(&mut self, world: &PhysicsWorld) {
        let Some(body) = world.body(self.body) else {
            return;
        };
        let speed = (body.horizontal_speed() / self.world_scale).max(self.anchor_speed);
        self.state = CharacterState {
            position: body.position.into(),
            heading: self.heading,
            is_moving: self.move_input != DVec2::ZERO || speed > MOVING_SPEED_THRESHOLD,
            is_grounded: body.is_grounded,
            speed,
        };
    }

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }
}

fn axis(positive: bool, negative: bool) -> f64 {
    (positive as i8 - negative as i8) as f64
}

/// Critically damped spring toward `target` (no overshoot).
pub fn smooth_damp(current: f64, target: f64, velocity: &mut f64, smooth_time: f64, dt: f64) -> f64 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}
