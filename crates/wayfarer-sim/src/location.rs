//! Location plumbing: single-slot handoff, accuracy filter, simulated provider.
//!
//! Producers (a device GPS watch or the simulated provider's thread) only
//! ever overwrite the slot; the frame loop takes whatever is newest. Fixes
//! that arrive between frames replace each other and never block.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use wayfarer_core::config::LocationConfig;
use wayfarer_core::types::GeoCoordinate;
use wayfarer_geo::distance::{bearing_deg, haversine_m};

/// Meters per degree of latitude (mean).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Below this displacement a derived bearing is noise.
const MIN_BEARING_DISTANCE_M: f64 = 0.5;

// ---------------------------------------------------------------------------
// Single-slot handoff
// ---------------------------------------------------------------------------

/// Reader side of the latest-fix slot, owned by the frame loop.
#[derive(Debug, Default)]
pub struct LocationSlot {
    latest: Arc<Mutex<Option<GeoCoordinate>>>,
}

/// Writer side, cloned into every producer.
#[derive(Debug, Clone)]
pub struct LocationWriter {
    latest: Arc<Mutex<Option<GeoCoordinate>>>,
}

impl LocationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writer(&self) -> LocationWriter {
        LocationWriter {
            latest: Arc::clone(&self.latest),
        }
    }

    /// Take the newest fix, leaving the slot empty.
    pub fn take(&self) -> Option<GeoCoordinate> {
        match self.latest.lock() {
            Ok(mut lock) => lock.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl LocationWriter {
    /// Overwrite the slot with `fix`.
    pub fn publish(&self, fix: GeoCoordinate) {
        match self.latest.lock() {
            Ok(mut lock) => *lock = Some(fix),
            Err(poisoned) => *poisoned.into_inner() = Some(fix),
        }
    }
}

// ---------------------------------------------------------------------------
// Accuracy filter
// ---------------------------------------------------------------------------

/// Drops inaccurate fixes and fills in heading/speed from consecutive fixes.
#[derive(Debug, Clone)]
pub struct LocationFilter {
    min_accuracy_m: f64,
    last_accepted: Option<GeoCoordinate>,
}

impl LocationFilter {
    pub fn new(config: &LocationConfig) -> Self {
        Self {
            min_accuracy_m: config.min_accuracy_m,
            last_accepted: None,
        }
    }

    /// Pass `raw` through, or `None` if it is out of range, older than the
    /// last accepted fix, or less accurate than the limit. An accuracy of 0
    /// means unknown and is accepted, as is a timestamp of 0.
    ///
    /// Only fixes that pass become the baseline for derived speed and heading.
    pub fn accept(&mut self, raw: GeoCoordinate) -> Option<GeoCoordinate> {
        if !raw.is_valid() {
            warn!(lng = raw.lng, lat = raw.lat, "discarding out-of-range GPS fix");
            return None;
        }
        if !raw.accuracy.is_finite() || raw.accuracy > self.min_accuracy_m {
            warn!(
                accuracy_m = raw.accuracy,
                limit_m = self.min_accuracy_m,
                "discarding inaccurate GPS fix"
            );
            return None;
        }

        let mut fix = raw;
        if let Some(previous) = self.last_accepted {
            if fix.timestamp_ms == 0 && previous.timestamp_ms != 0 {
                return Some(fix);
            }
            if fix.timestamp_ms < previous.timestamp_ms {
                debug!(
                    timestamp_ms = fix.timestamp_ms,
                    last_ms = previous.timestamp_ms,
                    "discarding stale GPS fix"
                );
                return None;
            }
            if fix.timestamp_ms > previous.timestamp_ms {
                let dt = (fix.timestamp_ms - previous.timestamp_ms) as f64 / 1000.0;
                let distance = haversine_m(&previous, &fix);
                if fix.speed.is_none() {
                    fix.speed = Some(distance / dt);
                }
                if fix.heading.is_none() && distance > MIN_BEARING_DISTANCE_M {
                    fix.heading = Some(bearing_deg(&previous, &fix));
                }
            }
        }
        self.last_accepted = Some(fix);
        Some(fix)
    }
}

// ---------------------------------------------------------------------------
// Simulated provider
// ---------------------------------------------------------------------------

/// Walks a polyline at constant speed, emitting jittered fixes.
#[derive(Debug, Clone)]
pub struct SimulatedLocation {
    path: Vec<GeoCoordinate>,
    /// Cumulative distance at each path vertex.
    cumulative_m: Vec<f64>,
    speed_mps: f64,
    jitter_m: f64,
    travelled_m: f64,
    elapsed_ms: u64,
    rng: ChaCha8Rng,
}

impl SimulatedLocation {
    pub fn new(path: Vec<GeoCoordinate>, speed_mps: f64, seed: u64) -> Result<Self, String> {
        if path.is_empty() {
            return Err("simulated path has no points".into());
        }
        if !speed_mps.is_finite() || speed_mps < 0.0 {
            return Err(format!("invalid simulated speed {speed_mps}"));
        }
        let mut cumulative_m = Vec::with_capacity(path.len());
        let mut total = 0.0;
        cumulative_m.push(0.0);
        for pair in path.windows(2) {
            total += haversine_m(&pair[0], &pair[1]);
            cumulative_m.push(total);
        }
        Ok(Self {
            path,
            cumulative_m,
            speed_mps,
            jitter_m: 0.0,
            travelled_m: 0.0,
            elapsed_ms: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Uniform horizontal noise of up to `jitter_m` meters per axis.
    pub fn with_jitter(mut self, jitter_m: f64) -> Self {
        self.jitter_m = if jitter_m.is_finite() {
            jitter_m.max(0.0)
        } else {
            0.0
        };
        self
    }

    pub fn total_length_m(&self) -> f64 {
        self.cumulative_m.last().copied().unwrap_or(0.0)
    }

    pub fn is_finished(&self) -> bool {
        self.travelled_m >= self.total_length_m()
    }

    /// Advance `dt` seconds along the path and produce the next fix.
    pub fn next_fix(&mut self, dt: f64) -> GeoCoordinate {
        if dt.is_finite() && dt > 0.0 {
            self.travelled_m = (self.travelled_m + self.speed_mps * dt).min(self.total_length_m());
            self.elapsed_ms += (dt * 1000.0).round() as u64;
        }

        let (mut fix, heading) = self.point_at(self.travelled_m);
        if self.jitter_m > 0.0 {
            let east = self.rng.gen_range(-self.jitter_m..=self.jitter_m);
            let north = self.rng.gen_range(-self.jitter_m..=self.jitter_m);
            let cos_lat = fix.lat.to_radians().cos().max(1e-6);
            fix.lng += east / (METERS_PER_DEGREE * cos_lat);
            fix.lat += north / METERS_PER_DEGREE;
        }

        let speed = if self.is_finished() {
            0.0
        } else {
            self.speed_mps
        };
        fix.with_accuracy(self.jitter_m.max(5.0))
            .with_timestamp(self.elapsed_ms)
            .with_motion(heading, Some(speed))
    }

    /// Interpolated position and segment bearing at `distance` along the path.
    fn point_at(&self, distance: f64) -> (GeoCoordinate, Option<f64>) {
        let segment = self
            .cumulative_m
            .windows(2)
            .position(|w| distance < w[1])
            .unwrap_or(self.path.len().saturating_sub(2));
        let Some(start) = self.path.get(segment) else {
            return (self.path[0], None);
        };
        let Some(end) = self.path.get(segment + 1) else {
            return (*start, None);
        };

        let length = self.cumulative_m[segment + 1] - self.cumulative_m[segment];
        let t = if length > 0.0 {
            ((distance - self.cumulative_m[segment]) / length).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let point = GeoCoordinate::new(
            start.lng + (end.lng - start.lng) * t,
            start.lat + (end.lat - start.lat) * t,
        );
        (point, Some(bearing_deg(start, end)))
    }

    /// Run on a dedicated thread, publishing one fix per `interval` until
    /// stopped. Once the path is finished the final position keeps being
    /// reported, like a device standing still.
    pub fn spawn(
        mut self,
        writer: LocationWriter,
        interval: Duration,
    ) -> std::io::Result<SimulationHandle> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let thread = std::thread::Builder::new()
            .name("wayfarer-sim-location".into())
            .spawn(move || {
                let dt = interval.as_secs_f64();
                let mut reported_finish = false;
                while !stop_flag.load(Ordering::Relaxed) {
                    writer.publish(self.next_fix(dt));
                    if self.is_finished() && !reported_finish {
                        reported_finish = true;
                        debug!(length_m = self.total_length_m(), "simulated path finished");
                    }
                    std::thread::sleep(interval);
                }
            })?;
        Ok(SimulationHandle {
            stop,
            thread: Some(thread),
        })
    }
}

/// Owner of a running simulated provider. Stops the thread on drop.
#[derive(Debug)]
pub struct SimulationHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SimulationHandle {
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
