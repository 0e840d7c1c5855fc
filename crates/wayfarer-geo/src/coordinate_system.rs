//! GPS <-> world coordinate system with jitter smoothing.
//!
//! World coordinates are always relative to the current map center, scaled by
//! the current zoom. x = East, y = Up, z = South (Mercator y grows north, so
//! world z is its negation). One world unit is one ground meter at the
//! reference zoom and halves/doubles per zoom level.
//!
//! Only the canonical position stream (`update_gps_fix`) is smoothed;
//! `gps_to_world` / `world_to_gps` are exact projections.

use tracing::{info, warn};

use wayfarer_core::config::CoordinateConfig;
use wayfarer_core::error::EngineError;
use wayfarer_core::events::CoordinateEvent;
use wayfarer_core::types::{GeoCoordinate, MercatorPoint, WorldPosition, ZoomScale};

use crate::mercator::{
    ground_meters_per_mercator_meter, lng_lat_to_mercator, mercator_to_lng_lat, wrap_mercator_dx,
    zoom_scale,
};

/// Bidirectional GPS/world transform anchored at a movable map center.
#[derive(Debug, Clone)]
pub struct CoordinateSystem {
    config: CoordinateConfig,
    center: GeoCoordinate,
    center_mercator: MercatorPoint,
    /// World units per Mercator meter (ground stretch at center * zoom scale).
    units_per_mercator: f64,
    zoom: ZoomScale,
    /// Latest smoothed fix.
    current: Option<GeoCoordinate>,
    /// Last fix reported downstream as changed.
    last_reported: Option<GeoCoordinate>,
    events: Vec<CoordinateEvent>,
}

impl CoordinateSystem {
    pub fn new(config: CoordinateConfig) -> Self {
        let center = config.initial_center;
        let zoom = zoom_scale(config.initial_zoom, config.reference_zoom);
        let mut system = Self {
            config,
            center,
            center_mercator: MercatorPoint::default(),
            units_per_mercator: 1.0,
            zoom,
            current: None,
            last_reported: None,
            events: Vec::new(),
        };
        system.rebuild_frame();
        system
    }

    /// Feed one raw fix into the canonical position stream.
    ///
    /// Returns whether the smoothed position moved past the change threshold.
    /// Invalid fixes are dropped with a warning and leave all state untouched.
    pub fn update_gps_fix(&mut self, raw: GeoCoordinate) -> Result<bool, EngineError> {
        if let Err(err) = raw.validate() {
            warn!(lng = raw.lng, lat = raw.lat, "dropping invalid GPS fix");
            return Err(err);
        }

        let smoothed = match (self.config.smoothing_enabled, self.current) {
            (true, Some(previous)) => {
                let alpha = self.config.smoothing_alpha;
                GeoCoordinate {
                    lng: alpha * raw.lng + (1.0 - alpha) * previous.lng,
                    lat: alpha * raw.lat + (1.0 - alpha) * previous.lat,
                    ..raw
                }
            }
            _ => raw,
        };

        let first_fix = self.current.is_none();
        self.current = Some(smoothed);

        let changed = match self.last_reported {
            Some(last) => {
                let threshold = self.config.change_threshold_deg;
                (smoothed.lng - last.lng).abs() > threshold
                    || (smoothed.lat - last.lat).abs() > threshold
            }
            None => true,
        };

        if changed {
            self.last_reported = Some(smoothed);
            if first_fix || self.needs_recenter() {
                self.recenter_on(smoothed);
            }
        }

        let world = self.gps_to_world(&smoothed, 0.0);
        self.events.push(CoordinateEvent::PositionUpdated {
            geo: smoothed,
            world,
            changed,
        });
        Ok(changed)
    }

    /// Exact projection of an arbitrary coordinate into the world frame.
    pub fn gps_to_world(&self, geo: &GeoCoordinate, y_offset: f64) -> WorldPosition {
        let m = lng_lat_to_mercator(geo.lng, geo.lat);
        let dx = wrap_mercator_dx(m.x - self.center_mercator.x);
        let dy = m.y - self.center_mercator.y;
        WorldPosition::new(
            dx * self.units_per_mercator,
            y_offset,
            -dy * self.units_per_mercator,
        )
    }

    /// Inverse of `gps_to_world`. Altitude is world height in ground meters.
    pub fn world_to_gps(&self, world: &WorldPosition) -> GeoCoordinate {
        let m = MercatorPoint {
            x: self.center_mercator.x + world.x / self.units_per_mercator,
            y: self.center_mercator.y - world.z / self.units_per_mercator,
        };
        let (lng, lat) = mercator_to_lng_lat(m);
        GeoCoordinate {
            altitude: world.y / self.zoom.scale,
            ..GeoCoordinate::new(lng, lat)
        }
    }

    /// Change the zoom level. Returns false if the zoom is non-finite or unchanged.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let next = zoom_scale(zoom, self.config.reference_zoom);
        if (next.zoom - self.zoom.zoom).abs() < 1e-9 {
            return false;
        }
        self.zoom = next;
        self.rebuild_frame();
        self.events.push(CoordinateEvent::ZoomChanged {
            zoom: next.zoom,
            scale: next.scale,
        });
        true
    }

    /// Move the map center. Returns the old-frame position of the new center,
    /// i.e. the offset every world-frame body must be shifted back by.
    pub fn set_center(&mut self, center: GeoCoordinate) -> Result<WorldPosition, EngineError> {
        center.validate()?;
        Ok(self.recenter_on(center))
    }

    /// True if the tracked position has drifted past the recenter distance.
    pub fn needs_recenter(&self) -> bool {
        let limit = self.config.recenter_distance_m;
        if limit <= 0.0 {
            return false;
        }
        let Some(current) = self.current else {
            return false;
        };
        let world = self.gps_to_world(&current, 0.0);
        let ground_m = (world.x * world.x + world.z * world.z).sqrt() / self.zoom.scale;
        ground_m > limit
    }

    /// Move the center onto the tracked position. Returns the offset, or
    /// `None` before the first fix.
    pub fn recenter(&mut self) -> Option<WorldPosition> {
        let current = self.current?;
        Some(self.recenter_on(current))
    }

    fn recenter_on(&mut self, center: GeoCoordinate) -> WorldPosition {
        let offset = self.gps_to_world(&center, 0.0);
        self.center = GeoCoordinate::new(center.lng, center.lat);
        self.rebuild_frame();
        info!(lng = center.lng, lat = center.lat, "map recentered");
        self.events.push(CoordinateEvent::Recentered {
            center: self.center,
            offset,
        });
        offset
    }

    fn rebuild_frame(&mut self) {
        self.center_mercator = lng_lat_to_mercator(self.center.lng, self.center.lat);
        self.units_per_mercator =
            ground_meters_per_mercator_meter(self.center.lat) * self.zoom.scale;
    }

    /// Current world scale.
    pub fn scale(&self) -> ZoomScale {
        self.zoom
    }

    pub fn zoom(&self) -> f64 {
        self.zoom.zoom
    }

    pub fn center(&self) -> GeoCoordinate {
        self.center
    }

    /// Latest smoothed fix, if any was accepted.
    pub fn current(&self) -> Option<GeoCoordinate> {
        self.current
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<CoordinateEvent> {
        std::mem::take(&mut self.events)
    }
}
