use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use wayfarer_app::config::{finalize, load_engine_config, ConfigOverrides};
use wayfarer_app::game_loop::{GameLoop, DEFAULT_FRAME_RATE};
use wayfarer_app::http_routing::{HttpRouteProvider, DEFAULT_TIMEOUT};
use wayfarer_app::location_feed::spawn_feed;
use wayfarer_app::logging::{init_logging, LoggingOptions};
use wayfarer_app::route_source::{parse_lng_lat, RouteSource};
use wayfarer_core::commands::{EngineCommand, RouteOptions};
use wayfarer_core::enums::{CameraPresetKind, LocationSource, NavigationPhase, RoutingProfile};
use wayfarer_core::state::FrameSnapshot;
use wayfarer_core::types::GeoCoordinate;
use wayfarer_geo::polyline::DEFAULT_PRECISION;
use wayfarer_nav::directions::FixedRouteProvider;
use wayfarer_sim::{MovementEngine, RouteFetcher, SimulatedLocation};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a route through the Wayfarer movement engine")]
struct Cli {
    /// Engine configuration (JSON). Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter directive; `WAYFARER_LOG` takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON on stderr.
    #[arg(long)]
    json_logs: bool,

    /// Route as an encoded polyline.
    #[arg(long, conflicts_with = "directions_url")]
    polyline: Option<String>,

    /// Polyline precision: 5 (polyline) or 6 (polyline6).
    #[arg(long, default_value_t = DEFAULT_PRECISION, value_parser = clap::value_parser!(u32).range(5..=6))]
    precision: u32,

    /// OSRM-compatible directions endpoint, e.g. https://router.project-osrm.org
    #[arg(long, requires_all = ["from", "to"])]
    directions_url: Option<String>,

    /// Route start as "lng,lat".
    #[arg(long, value_parser = parse_lng_lat, allow_hyphen_values = true)]
    from: Option<GeoCoordinate>,

    /// Route end as "lng,lat".
    #[arg(long, value_parser = parse_lng_lat, allow_hyphen_values = true)]
    to: Option<GeoCoordinate>,

    /// Routing profile: walking, cycling or driving.
    #[arg(long, default_value = "walking", value_parser = parse_profile)]
    profile: RoutingProfile,

    /// Where fixes come from: simulated (walk the route) or device (JSON lines on stdin).
    #[arg(long, default_value = "simulated", value_parser = parse_source)]
    source: LocationSource,

    /// Simulated walking speed (m/s).
    #[arg(long, default_value_t = 1.4)]
    speed: f64,

    /// Simulated GPS noise (meters).
    #[arg(long, default_value_t = 0.0)]
    jitter: f64,

    /// Seed for simulated GPS noise.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Frame loop rate (Hz).
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
    fps: u32,

    /// Stop after this many seconds even if navigation has not finished.
    #[arg(long, default_value_t = 600.0)]
    duration: f64,

    /// Print every Nth snapshot.
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Camera preset: first_person, third_person, cinematic or mobile.
    #[arg(long, value_parser = parse_preset)]
    preset: Option<CameraPresetKind>,

    /// Initial map zoom.
    #[arg(long)]
    zoom: Option<f64>,

    /// Feed raw fixes to the coordinate system without jitter smoothing.
    #[arg(long)]
    no_smoothing: bool,
}

fn parse_preset(value: &str) -> Result<CameraPresetKind, String> {
    CameraPresetKind::parse(value).ok_or_else(|| format!("unknown camera preset {value:?}"))
}

fn parse_source(value: &str) -> Result<LocationSource, String> {
    LocationSource::parse(value).ok_or_else(|| format!("unknown location source {value:?}"))
}

fn parse_profile(value: &str) -> Result<RoutingProfile, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "walking" | "foot" => Ok(RoutingProfile::Walking),
        "cycling" | "bike" => Ok(RoutingProfile::Cycling),
        "driving" | "car" => Ok(RoutingProfile::Driving),
        _ => Err(format!("unknown routing profile {value:?}")),
    }
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            preset: self.preset,
            zoom: self.zoom,
            disable_smoothing: self.no_smoothing,
            update_interval_ms: None,
        }
    }

    fn route_options(&self) -> RouteOptions {
        RouteOptions {
            profile: self.profile,
            ..Default::default()
        }
    }

    fn route_source(&self) -> Result<RouteSource> {
        if let Some(encoded) = &self.polyline {
            return Ok(RouteSource::Polyline {
                encoded: encoded.clone(),
                precision: self.precision,
            });
        }
        let (Some(url), Some(start), Some(end)) = (&self.directions_url, self.from, self.to) else {
            bail!("a route is required: pass --polyline, or --directions-url with --from and --to");
        };
        Ok(RouteSource::Directions {
            provider: HttpRouteProvider::new(url.clone(), self.precision, DEFAULT_TIMEOUT)?,
            start,
            end,
            options: self.route_options(),
        })
    }
}

/// Writes snapshots to stdout as JSON lines.
fn snapshot_printer(every: u64) -> impl FnMut(&FrameSnapshot) + Send + 'static {
    let every = every.max(1);
    let mut broken_pipe = false;
    move |snapshot: &FrameSnapshot| {
        if broken_pipe || snapshot.time.frame % every != 0 {
            return;
        }
        let Ok(line) = serde_json::to_string(snapshot) else {
            return;
        };
        let mut stdout = std::io::stdout().lock();
        if writeln!(stdout, "{line}").is_err() {
            warn!("stdout closed; no more snapshots will be printed");
            broken_pipe = true;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingOptions {
        level: cli.log_level.clone(),
        json: cli.json_logs,
    })?;

    let config = finalize(load_engine_config(cli.config.as_deref())?, &cli.overrides())?;
    let routes = cli.route_source()?.resolve()?;
    let path = routes
        .first()
        .map(|route| route.waypoints().to_vec())
        .context("no route to replay")?;
    let (Some(&start), Some(&end)) = (path.first(), path.last()) else {
        bail!("route has no waypoints");
    };

    let fetcher = RouteFetcher::spawn(Box::new(FixedRouteProvider::new(routes)))
        .context("failed to start route fetch thread")?;
    let engine = MovementEngine::new(config.clone())
        .context("failed to build movement engine")?
        .with_route_fetcher(fetcher);
    let location_writer = engine.location_writer();

    let mut game_loop = GameLoop::spawn(engine, cli.fps, snapshot_printer(cli.every))
        .context("failed to start frame loop")?;
    game_loop.send(EngineCommand::RequestRoute {
        start,
        end,
        options: cli.route_options(),
    });

    let interval = Duration::from_millis(config.location.update_interval_ms.max(1));
    let mut simulation = None;
    let mut _device_feed = None;
    let deadline = Instant::now() + Duration::from_secs_f64(cli.duration.max(0.0));
    let mut started = false;
    let mut outcome = NavigationPhase::Idle;

    info!(source = cli.source.as_str(), waypoints = path.len(), "replay starting");
    while Instant::now() < deadline && game_loop.is_running() {
        std::thread::sleep(Duration::from_millis(20));
        let Some(snapshot) = game_loop.latest_snapshot() else {
            continue;
        };
        outcome = snapshot.navigation.phase;
        match outcome {
            NavigationPhase::RouteLoaded if !started => {
                started = true;
                game_loop.send(EngineCommand::StartNavigation);
                match cli.source {
                    LocationSource::Simulated => {
                        let walker = SimulatedLocation::new(path.clone(), cli.speed, cli.seed)
                            .map_err(anyhow::Error::msg)?
                            .with_jitter(cli.jitter);
                        simulation = Some(
                            walker
                                .spawn(location_writer.clone(), interval)
                                .context("failed to start simulated location")?,
                        );
                    }
                    LocationSource::Device => {
                        let stdin = std::io::BufReader::new(std::io::stdin());
                        _device_feed = Some(
                            spawn_feed(stdin, location_writer.clone())
                                .context("failed to start location feed")?,
                        );
                    }
                }
            }
            NavigationPhase::Completed | NavigationPhase::Cancelled => break,
            _ => {}
        }
    }

    if let Some(mut simulation) = simulation {
        simulation.stop();
    }
    let frames = game_loop.shutdown();
    match outcome {
        NavigationPhase::Completed => info!(frames, "route completed"),
        phase => warn!(frames, ?phase, "replay ended before the route was completed"),
    }
    Ok(())
}
