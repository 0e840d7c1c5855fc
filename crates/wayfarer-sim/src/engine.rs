//! Movement engine: the per-frame orchestrator.
//!
//! `MovementEngine` owns every component, applies queued commands at the
//! frame boundary, pulls the newest location fix and finished route fetches
//! from their handoffs, runs the components in a fixed order, and returns a
//! `FrameSnapshot`. It never blocks and nothing here is fatal: component
//! errors become `Warning` events and the frame carries on.

use std::collections::VecDeque;

use glam::DVec3;
use tracing::debug;

use wayfarer_core::commands::EngineCommand;
use wayfarer_core::config::EngineConfig;
use wayfarer_core::error::EngineError;
use wayfarer_core::events::{CoordinateEvent, EngineEvent};
use wayfarer_core::state::{CameraView, FrameSnapshot};
use wayfarer_core::types::{GeoCoordinate, SimTime};
use wayfarer_geo::CoordinateSystem;
use wayfarer_nav::directions::RouteProvider;
use wayfarer_nav::NavigationEngine;
use wayfarer_physics::{CharacterController, PhysicsWorld};

use crate::camera::NavigationCamera;
use crate::fetcher::{RouteFetcher, RouteResponse};
use crate::location::{LocationFilter, LocationSlot, LocationWriter};

/// Where route requests go.
enum RouteBackend {
    /// Answered synchronously while applying the command.
    Inline(Box<dyn RouteProvider>),
    /// Answered by a worker thread, collected on later frames.
    Threaded(RouteFetcher),
}

pub struct MovementEngine {
    time: SimTime,
    coordinates: CoordinateSystem,
    physics: PhysicsWorld,
    character: CharacterController,
    navigation: NavigationEngine,
    camera: NavigationCamera,
    location: LocationSlot,
    location_filter: LocationFilter,
    route_backend: Option<RouteBackend>,
    route_responses: Vec<RouteResponse>,
    command_queue: VecDeque<EngineCommand>,
    events: Vec<EngineEvent>,
    /// World units per meter the physics world is currently laid out in.
    world_scale: f64,
    /// Set once the character has been placed by a location fix.
    anchored: bool,
    snap_camera: bool,
}

impl MovementEngine {
    /// Build every component from `config`. Fails only on invalid config.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let coordinates = CoordinateSystem::new(config.coordinates.clone());
        let mut physics = PhysicsWorld::new(&config.physics);
        let mut character =
            CharacterController::new(&mut physics, &config.character, DVec3::ZERO);
        character.set_world_scale(&mut physics, coordinates.scale().scale);
        let camera =
            NavigationCamera::new(config.camera.preset).with_smoothing(config.camera.smoothing_speed);

        Ok(Self {
            time: SimTime::default(),
            world_scale: coordinates.scale().scale,
            coordinates,
            physics,
            character,
            navigation: NavigationEngine::new(&config.navigation),
            camera,
            location: LocationSlot::new(),
            location_filter: LocationFilter::new(&config.location),
            route_backend: None,
            route_responses: Vec::new(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            anchored: false,
            snap_camera: false,
        })
    }

    /// Answer route requests synchronously through `provider`.
    pub fn with_route_provider(mut self, provider: Box<dyn RouteProvider>) -> Self {
        self.route_backend = Some(RouteBackend::Inline(provider));
        self
    }

    /// Answer route requests on `fetcher`'s worker thread.
    pub fn with_route_fetcher(mut self, fetcher: RouteFetcher) -> Self {
        self.route_backend = Some(RouteBackend::Threaded(fetcher));
        self
    }

    /// Handle for location producers. Any number may be cloned out.
    pub fn location_writer(&self) -> LocationWriter {
        self.location.writer()
    }

    /// Queue a command for the next frame boundary.
    pub fn queue_command(&mut self, command: EngineCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = EngineCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance by `elapsed` real seconds and return the resulting snapshot.
    pub fn frame(&mut self, elapsed: f64) -> FrameSnapshot {
        let elapsed = if elapsed.is_finite() && elapsed > 0.0 {
            elapsed
        } else {
            0.0
        };

        // 1. Commands
        self.process_commands();
        // 2. Route responses
        self.apply_route_responses();
        // 3. Newest location fix
        if let Some(raw) = self.location.take() {
            self.apply_fix(raw);
        }
        // 4. Coordinate events (recenter, rescale, anchor)
        self.sync_coordinate_events();
        // 5. Character + 6. physics, once per fixed step
        let steps = self.physics.accumulate(elapsed);
        let dt = self.physics.fixed_step();
        for _ in 0..steps {
            self.character.update(&mut self.physics, dt);
            self.physics.fixed_update();
        }
        self.character.refresh_state(&self.physics);
        self.time.advance(elapsed);

        // 7. Navigation against the character's geographic position
        let character = self.character.state();
        let geo = self.coordinates.world_to_gps(&character.position);
        self.navigation.update(&geo, self.time.elapsed_secs);
        self.events.extend(
            self.navigation
                .drain_events()
                .into_iter()
                .map(EngineEvent::Navigation),
        );

        // 8. Camera, looking toward the next waypoint if any
        let look_target = self
            .navigation
            .next_waypoint()
            .map(|wp| self.coordinates.gps_to_world(wp, character.position.y));
        self.camera.update(&character, look_target);
        if std::mem::take(&mut self.snap_camera) {
            self.camera.snap();
        }
        self.events
            .extend(self.camera.drain_events().into_iter().map(EngineEvent::Camera));

        // 9. Snapshot
        FrameSnapshot {
            time: self.time,
            character,
            navigation: self.navigation.summary(),
            camera: CameraView {
                pose: self.camera.pose(),
                preset: self.camera.preset().kind,
            },
            geo: self.coordinates.current(),
            zoom: self.coordinates.scale(),
            physics_steps: steps,
            events: std::mem::take(&mut self.events),
        }
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::SetInput { input } => self.character.set_input(input),
            EngineCommand::Jump => {
                self.character.jump(&mut self.physics);
            }
            EngineCommand::SetViewHeading { heading } => self.character.set_view_heading(heading),
            EngineCommand::SetZoom { zoom } => {
                if !zoom.is_finite() {
                    self.warn(format!("ignoring zoom {zoom}"));
                } else {
                    self.coordinates.set_zoom(zoom);
                }
            }
            EngineCommand::SetCenter { lng, lat } => {
                if let Err(err) = self.coordinates.set_center(GeoCoordinate::new(lng, lat)) {
                    self.warn(err.to_string());
                }
            }
            EngineCommand::RequestRoute {
                start,
                end,
                options,
            } => match &self.route_backend {
                None => self.warn("no route provider configured"),
                Some(RouteBackend::Inline(provider)) => {
                    let request = self.navigation.begin_request(start, end, options);
                    let result = provider.fetch(&request);
                    self.route_responses.push((request.id, result));
                }
                Some(RouteBackend::Threaded(fetcher)) => {
                    let request = self.navigation.begin_request(start, end, options);
                    let id = request.id;
                    if !fetcher.submit(request) {
                        self.route_responses
                            .push((id, Err("route fetch thread unavailable".into())));
                    }
                }
            },
            EngineCommand::SelectRoute { index } => {
                if !self.navigation.select_route(index) {
                    self.warn(format!("route {index} cannot be selected"));
                }
            }
            EngineCommand::StartNavigation => {
                if let Err(err) = self.navigation.start_navigation() {
                    self.warn(err.to_string());
                }
            }
            EngineCommand::StopNavigation => {
                self.navigation.stop_navigation();
            }
            EngineCommand::SetCameraPreset { preset } => {
                self.camera.set_preset(preset);
            }
            EngineCommand::SnapCamera => self.snap_camera = true,
        }
    }

    fn apply_route_responses(&mut self) {
        let mut responses = std::mem::take(&mut self.route_responses);
        if let Some(RouteBackend::Threaded(fetcher)) = &self.route_backend {
            responses.extend(fetcher.poll());
        }
        for (request_id, result) in responses {
            if let Err(err) = self.navigation.complete_request(request_id, result) {
                self.warn(err.to_string());
            }
        }
    }

    fn apply_fix(&mut self, raw: GeoCoordinate) {
        // Rejected before the filter so it never becomes a speed baseline.
        if let Err(err) = raw.validate() {
            self.warn(err.to_string());
            return;
        }
        let Some(fix) = self.location_filter.accept(raw) else {
            return;
        };
        if let Err(err) = self.coordinates.update_gps_fix(fix) {
            self.warn(err.to_string());
        }
    }

    /// Keep the physics world and camera in the coordinate system's frame.
    fn sync_coordinate_events(&mut self) {
        for event in self.coordinates.drain_events() {
            match &event {
                CoordinateEvent::Recentered { offset, .. } => {
                    let offset = offset.to_vec3();
                    self.physics.shift_origin(offset);
                    self.camera.shift_origin(offset);
                }
                CoordinateEvent::ZoomChanged { scale, .. } => {
                    let factor = scale / self.world_scale;
                    self.world_scale = *scale;
                    self.physics.rescale(factor);
                    self.character.set_world_scale(&mut self.physics, *scale);
                    self.camera.rescale(factor);
                }
                CoordinateEvent::PositionUpdated {
                    geo,
                    world,
                    changed,
                } => {
                    if *changed {
                        // The first fix teleports the character; don't pan across the gap.
                        if !self.anchored {
                            self.anchored = true;
                            self.snap_camera = true;
                        }
                        self.character.anchor_to(
                            &mut self.physics,
                            world.to_vec3(),
                            geo.heading,
                            geo.speed,
                        );
                    }
                }
            }
            self.events.push(EngineEvent::Coordinate(event));
        }
    }

    fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, frame = self.time.frame, "engine warning");
        self.events.push(EngineEvent::Warning {
            message,
            frame: self.time.frame,
        });
    }

    // --- Accessors ---

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn coordinates(&self) -> &CoordinateSystem {
        &self.coordinates
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn character(&self) -> &CharacterController {
        &self.character
    }

    pub fn navigation(&self) -> &NavigationEngine {
        &self.navigation
    }

    pub fn camera(&self) -> &NavigationCamera {
        &self.camera
    }

    pub fn pending_commands(&self) -> usize {
        self.command_queue.len()
    }
}
