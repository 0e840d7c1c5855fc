//! Where the replayed route comes from.

use anyhow::{anyhow, Context, Result};
use tracing::info;

use wayfarer_core::commands::RouteOptions;
use wayfarer_core::types::GeoCoordinate;
use wayfarer_geo::polyline;
use wayfarer_nav::directions::{RouteProvider, RouteRequest};
use wayfarer_nav::route::Route;

use crate::http_routing::HttpRouteProvider;

pub enum RouteSource {
    /// Encoded polyline given on the command line.
    Polyline { encoded: String, precision: u32 },
    /// Fetched once from a directions service.
    Directions {
        provider: HttpRouteProvider,
        start: GeoCoordinate,
        end: GeoCoordinate,
        options: RouteOptions,
    },
}

impl RouteSource {
    /// Resolve to at least one route.
    pub fn resolve(&self) -> Result<Vec<Route>> {
        let routes = match self {
            RouteSource::Polyline { encoded, precision } => {
                let points = polyline::decode(encoded, *precision)
                    .map_err(|e| anyhow!(e))
                    .context("invalid --polyline")?;
                let route = Route::new(points, 0.0, 0.0)
                    .map_err(|e| anyhow!(e))
                    .context("invalid --polyline")?;
                vec![route]
            }
            RouteSource::Directions {
                provider,
                start,
                end,
                options,
            } => {
                let request = RouteRequest {
                    id: 0,
                    start: *start,
                    end: *end,
                    options: *options,
                };
                provider.fetch(&request).map_err(|e| anyhow!(e))?
            }
        };
        if let Some(first) = routes.first() {
            info!(
                routes = routes.len(),
                waypoints = first.len(),
                distance_m = first.distance_m(),
                "route resolved"
            );
        }
        Ok(routes)
    }
}

/// Parse `"lng,lat"`.
pub fn parse_lng_lat(value: &str) -> Result<GeoCoordinate, String> {
    let (lng, lat) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lng,lat\", got {value:?}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude {lng:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude {lat:?}"))?;
    let coordinate = GeoCoordinate::new(lng, lat);
    coordinate.validate().map_err(|e| e.to_string())?;
    Ok(coordinate)
}
