//! NavigationEngine: route lifecycle and waypoint tracking.
//!
//! Phases run `Idle -> RouteLoaded -> Navigating -> {Completed | Cancelled}`.
//! Route requests are split into `begin_request` / `complete_request` so the
//! network call can happen anywhere; only the most recent request id is
//! accepted on completion.

use tracing::{debug, info, warn};

use wayfarer_core::commands::RouteOptions;
use wayfarer_core::config::NavigationConfig;
use wayfarer_core::enums::NavigationPhase;
use wayfarer_core::error::EngineError;
use wayfarer_core::events::NavigationEvent;
use wayfarer_core::state::NavigationView;
use wayfarer_core::types::{GeoCoordinate, NavigationState};
use wayfarer_geo::distance::haversine_m;

use crate::directions::{RouteProvider, RouteRequest};
use crate::progress::{self, WaypointStep};
use crate::route::Route;

pub struct NavigationEngine {
    waypoint_threshold_m: f64,
    check_interval_secs: f64,
    phase: NavigationPhase,
    routes: Vec<Route>,
    selected: Option<usize>,
    state: NavigationState,
    next_request_id: u64,
    pending_request: Option<u64>,
    last_check: Option<f64>,
    events: Vec<NavigationEvent>,
}

impl NavigationEngine {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            waypoint_threshold_m: config.waypoint_threshold_m,
            check_interval_secs: config.check_interval_ms as f64 / 1000.0,
            phase: NavigationPhase::Idle,
            routes: Vec::new(),
            selected: None,
            state: NavigationState::default(),
            next_request_id: 1,
            pending_request: None,
            last_check: None,
            events: Vec::new(),
        }
    }

    // --- Route requests ---

    /// Allocate a request id and mark it as the only acceptable response.
    /// Any older in-flight request becomes stale.
    pub fn begin_request(
        &mut self,
        start: GeoCoordinate,
        end: GeoCoordinate,
        options: RouteOptions,
    ) -> RouteRequest {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.pending_request = Some(id);
        RouteRequest {
            id,
            start,
            end,
            options,
        }
    }

    /// Deliver the collaborator's answer for `request_id`.
    ///
    /// Stale responses and failures leave state untouched. On success the
    /// candidates replace any existing route, the first is selected, and the
    /// phase becomes `RouteLoaded`. Active navigation is cancelled first, so
    /// `Cancelled` precedes `RouteLoaded`.
    pub fn complete_request(
        &mut self,
        request_id: u64,
        result: Result<Vec<Route>, String>,
    ) -> Result<(), EngineError> {
        if self.pending_request != Some(request_id) {
            warn!(
                request_id,
                expected = ?self.pending_request,
                "discarding stale route response"
            );
            return Err(EngineError::StaleRouteResponse {
                request_id,
                expected: self.pending_request,
            });
        }
        self.pending_request = None;

        let routes = match result {
            Ok(routes) if routes.is_empty() => Err("no routes returned".to_string()),
            other => other,
        };

        match routes {
            Ok(routes) => {
                if self.phase == NavigationPhase::Navigating {
                    self.finish(NavigationPhase::Cancelled);
                }
                let first = &routes[0];
                info!(
                    request_id,
                    routes = routes.len(),
                    distance_m = first.distance_m(),
                    waypoints = first.len(),
                    "route loaded"
                );
                self.events.push(NavigationEvent::RouteLoaded {
                    request_id,
                    route_count: routes.len(),
                    distance_m: first.distance_m(),
                    duration_s: first.duration_s(),
                    waypoints: first.len(),
                });
                self.routes = routes;
                self.selected = Some(0);
                self.state = NavigationState::default();
                self.last_check = None;
                self.phase = NavigationPhase::RouteLoaded;
                Ok(())
            }
            Err(reason) => {
                warn!(request_id, %reason, "route request failed");
                self.events.push(NavigationEvent::RouteFailed {
                    request_id,
                    reason: reason.clone(),
                });
                Err(EngineError::RouteRequestFailed { request_id, reason })
            }
        }
    }

    /// Blocking request through `provider`. No retry.
    pub fn request_route(
        &mut self,
        provider: &dyn RouteProvider,
        start: GeoCoordinate,
        end: GeoCoordinate,
        options: RouteOptions,
    ) -> Result<(), EngineError> {
        let request = self.begin_request(start, end, options);
        let result = provider.fetch(&request);
        self.complete_request(request.id, result)
    }

    /// Switch among fetched candidates. Refused while navigating.
    pub fn select_route(&mut self, index: usize) -> bool {
        if self.phase != NavigationPhase::RouteLoaded || index >= self.routes.len() {
            return false;
        }
        if self.selected != Some(index) {
            self.selected = Some(index);
            self.events.push(NavigationEvent::RouteSelected { index });
        }
        true
    }

    // --- Navigation ---

    /// Begin tracking the selected route from waypoint 0.
    pub fn start_navigation(&mut self) -> Result<(), EngineError> {
        let Some(route) = self.current_route() else {
            return Err(EngineError::NoRouteSelected);
        };
        let total_waypoints = route.len();
        self.state = progress::initial_state(total_waypoints);
        self.last_check = None;
        self.phase = NavigationPhase::Navigating;
        info!(total_waypoints, "navigation started");
        self.events.push(NavigationEvent::Started { total_waypoints });
        Ok(())
    }

    /// Proximity check against the next waypoint, at most once per check
    /// interval of `now_secs`. The first check after starting always runs.
    pub fn update(&mut self, geo: &GeoCoordinate, now_secs: f64) -> WaypointStep {
        if self.phase != NavigationPhase::Navigating {
            return WaypointStep::Skipped;
        }
        if let Some(last) = self.last_check {
            if now_secs - last < self.check_interval_secs {
                return WaypointStep::Skipped;
            }
        }
        self.last_check = Some(now_secs);

        let Some(route) = self.selected.and_then(|i| self.routes.get(i)) else {
            return WaypointStep::Skipped;
        };
        let last_index = route.last_index();
        let Some(target) = route.waypoint(self.state.next_waypoint_index) else {
            return WaypointStep::Skipped;
        };
        let distance = haversine_m(geo, target);

        let step = progress::evaluate(
            &mut self.state,
            distance,
            self.waypoint_threshold_m,
            last_index,
        );
        match step {
            WaypointStep::Advanced { index, progress } => {
                debug!(index, progress, distance_m = distance, "waypoint reached");
                self.events
                    .push(NavigationEvent::WaypointReached { index, progress });
            }
            WaypointStep::Completed => {
                let index = self.state.current_waypoint_index;
                debug!(index, distance_m = distance, "final waypoint reached");
                self.events.push(NavigationEvent::WaypointReached {
                    index,
                    progress: self.state.progress,
                });
                self.finish(NavigationPhase::Completed);
            }
            WaypointStep::Hold | WaypointStep::Skipped => {}
        }
        step
    }

    /// Cancel active navigation. No-op outside `Navigating`.
    pub fn stop_navigation(&mut self) -> bool {
        if self.phase != NavigationPhase::Navigating {
            return false;
        }
        self.finish(NavigationPhase::Cancelled);
        true
    }

    /// Enter a terminal phase and release the route.
    fn finish(&mut self, phase: NavigationPhase) {
        self.state.is_navigating = false;
        self.phase = phase;
        let summary = self.summary();
        match phase {
            NavigationPhase::Completed => {
                info!(waypoints = summary.total_waypoints, "navigation completed");
                self.events.push(NavigationEvent::Completed);
            }
            _ => {
                info!(
                    progress = summary.progress,
                    distance_remaining_m = summary.distance_remaining_m,
                    "navigation cancelled"
                );
                self.events.push(NavigationEvent::Cancelled);
            }
        }
        self.routes.clear();
        self.selected = None;
    }

    // --- Queries ---

    pub fn phase(&self) -> NavigationPhase {
        self.phase
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.selected.and_then(|i| self.routes.get(i))
    }

    pub fn pending_request(&self) -> Option<u64> {
        self.pending_request
    }

    /// Waypoint the user is heading to, while navigating.
    pub fn next_waypoint(&self) -> Option<&GeoCoordinate> {
        if self.phase != NavigationPhase::Navigating {
            return None;
        }
        self.current_route()?
            .waypoint(self.state.next_waypoint_index)
    }

    /// Display view. Remaining distance and duration are `total * (1 - progress)`.
    pub fn summary(&self) -> NavigationView {
        let remaining = 1.0 - self.state.progress;
        let (distance, duration, total_waypoints) = self
            .current_route()
            .map(|r| (r.distance_m(), r.duration_s(), r.len()))
            .unwrap_or((0.0, 0.0, 0));
        NavigationView {
            phase: self.phase,
            progress: self.state.progress,
            distance_remaining_m: distance * remaining,
            duration_remaining_s: duration * remaining,
            current_waypoint: self.state.current_waypoint_index,
            next_waypoint: self.state.next_waypoint_index,
            total_waypoints,
            route_count: self.routes.len(),
            selected_route: self.selected,
        }
    }

    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        std::mem::take(&mut self.events)
    }
}
