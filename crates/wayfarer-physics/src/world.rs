//! Physics world: body storage and the fixed-timestep accumulator loop.
//!
//! Simulation rate is decoupled from the caller's frame rate: real elapsed
//! time is accumulated and consumed in fixed steps, at most `max_substeps`
//! per call. Time beyond the cap is discarded.
//!
//! Collision resolution is a coarse O(n²) sphere push-apart with no velocity
//! response. It is intended for a handful of bodies, not as a rigid-body solver.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use wayfarer_core::config::PhysicsConfig;
use wayfarer_core::constants::ACCUMULATOR_EPSILON;

use crate::body::PhysicsBody;

/// Handle to a body in the world.
pub type BodyHandle = Entity;

pub struct PhysicsWorld {
    world: World,
    fixed_step: f64,
    gravity: f64,
    max_substeps: u32,
    min_y: f64,
    accumulator: f64,
    total_steps: u64,
    /// Reused per-step collision buffer.
    scratch: Vec<(Entity, DVec3, f64, bool)>,
}

impl PhysicsWorld {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            world: World::new(),
            fixed_step: config.fixed_step,
            gravity: config.gravity,
            max_substeps: config.max_substeps.max(1),
            min_y: config.min_y,
            accumulator: 0.0,
            total_steps: 0,
            scratch: Vec::new(),
        }
    }

    pub fn add_body(&mut self, body: PhysicsBody) -> BodyHandle {
        self.world.spawn((body,))
    }

    /// Remove a body. Returns false if the handle was already gone.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.world.despawn(handle).is_ok()
    }

    /// Copy of a body's current state.
    pub fn body(&self, handle: BodyHandle) -> Option<PhysicsBody> {
        self.world.get::<&PhysicsBody>(handle).ok().map(|b| *b)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody> {
        self.world.query_one_mut::<&mut PhysicsBody>(handle).ok()
    }

    pub fn body_count(&self) -> u32 {
        self.world.len()
    }

    /// Accumulate `elapsed` seconds and run as many fixed steps as fit.
    /// Returns the number of steps executed.
    pub fn step(&mut self, elapsed: f64) -> u32 {
        let steps = self.accumulate(elapsed);
        for _ in 0..steps {
            self.fixed_update();
        }
        steps
    }

    /// Add `elapsed` to the accumulator and consume the fixed steps it now
    /// covers, without running them. Callers that need per-step work (the
    /// character controller) run `fixed_update` themselves that many times.
    pub fn accumulate(&mut self, elapsed: f64) -> u32 {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }

        let mut steps = 0;
        while self.accumulator + ACCUMULATOR_EPSILON >= self.fixed_step {
            if steps >= self.max_substeps {
                debug!(
                    discarded_secs = self.accumulator,
                    max_substeps = self.max_substeps,
                    "physics catch-up capped"
                );
                self.accumulator = 0.0;
                break;
            }
            self.accumulator -= self.fixed_step;
            steps += 1;
        }
        if self.accumulator < 0.0 {
            self.accumulator = 0.0;
        }
        steps
    }

    /// One fixed step: integrate every body, then separate overlaps.
    pub fn fixed_update(&mut self) {
        let (dt, gravity, min_y) = (self.fixed_step, self.gravity, self.min_y);
        for (_entity, body) in self.world.query_mut::<&mut PhysicsBody>() {
            body.integrate(dt, gravity, min_y);
        }
        self.resolve_collisions();
        self.total_steps += 1;
    }

    /// Symmetric positional push-apart for every overlapping sphere pair.
    pub fn resolve_collisions(&mut self) {
        self.scratch.clear();
        self.scratch.extend(
            self.world
                .query_mut::<&PhysicsBody>()
                .into_iter()
                .filter(|(_, body)| body.radius > 0.0)
                .map(|(entity, body)| (entity, body.position, body.radius, body.ground_clamp)),
        );
        if self.scratch.len() < 2 {
            return;
        }

        for i in 0..self.scratch.len() {
            for j in (i + 1)..self.scratch.len() {
                let (_, pos_a, radius_a, _) = self.scratch[i];
                let (_, pos_b, radius_b, _) = self.scratch[j];
                let delta = pos_b - pos_a;
                let distance = delta.length();
                let min_distance = radius_a + radius_b;
                if distance >= min_distance {
                    continue;
                }
                let normal = if distance > 1e-12 {
                    delta / distance
                } else {
                    DVec3::X
                };
                let correction = normal * ((min_distance - distance) * 0.5);
                self.scratch[i].1 -= correction;
                self.scratch[j].1 += correction;
            }
        }

        for &(entity, position, _, ground_clamp) in &self.scratch {
            if let Ok(body) = self.world.query_one_mut::<&mut PhysicsBody>(entity) {
                body.position = position;
                if ground_clamp && body.position.y < 0.0 {
                    body.position.y = 0.0;
                }
            }
        }
    }

    /// Shift every body horizontally by `-offset` (floating-origin recenter).
    pub fn shift_origin(&mut self, offset: DVec3) {
        for (_entity, body) in self.world.query_mut::<&mut PhysicsBody>() {
            body.position.x -= offset.x;
            body.position.z -= offset.z;
        }
    }

    /// Scale every body's horizontal position about the origin (zoom change).
    pub fn rescale(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        for (_entity, body) in self.world.query_mut::<&mut PhysicsBody>() {
            body.position.x *= factor;
            body.position.z *= factor;
        }
    }

    pub fn fixed_step(&self) -> f64 {
        self.fixed_step
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Unconsumed time carried to the next call (seconds).
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}
