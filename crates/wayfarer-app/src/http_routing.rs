//! Directions over HTTP.
//!
//! Talks to an OSRM-compatible endpoint:
//! `{base}/route/v1/{profile}/{lng},{lat};{lng},{lat}?overview=full&...`.
//! One attempt per request, no retry; failures go back to the navigation
//! engine as a reason string.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

use wayfarer_nav::directions::{parse_directions_response, RouteProvider, RouteRequest};
use wayfarer_nav::route::Route;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpRouteProvider {
    client: Client,
    base_url: String,
    precision: u32,
}

impl HttpRouteProvider {
    /// `precision` selects `polyline` (5) or `polyline6` (6) geometries.
    pub fn new(base_url: impl Into<String>, precision: u32, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build directions HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            precision,
        })
    }

    pub fn route_url(&self, request: &RouteRequest) -> String {
        let geometries = if self.precision == 6 {
            "polyline6"
        } else {
            "polyline"
        };
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries={}&alternatives={}",
            self.base_url,
            request.options.profile.as_str(),
            request.start.lng,
            request.start.lat,
            request.end.lng,
            request.end.lat,
            geometries,
            request.options.alternatives,
        )
    }

    fn fetch_inner(&self, request: &RouteRequest) -> Result<Vec<Route>> {
        let url = self.route_url(request);
        debug!(request_id = request.id, %url, "requesting directions");
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("directions request {} failed", request.id))?;
        let status = response.status();
        let body = response
            .text()
            .context("failed to read directions response body")?;
        if !status.is_success() && !body.trim_start().starts_with('{') {
            bail!("directions endpoint returned HTTP {}", status.as_u16());
        }
        parse_directions_response(&body, self.precision).map_err(anyhow::Error::msg)
    }
}

impl RouteProvider for HttpRouteProvider {
    fn fetch(&self, request: &RouteRequest) -> std::result::Result<Vec<Route>, String> {
        self.fetch_inner(request).map_err(|err| format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_core::commands::RouteOptions;
    use wayfarer_core::enums::RoutingProfile;
    use wayfarer_core::types::GeoCoordinate;

    fn request() -> RouteRequest {
        RouteRequest {
            id: 3,
            start: GeoCoordinate::new(13.388, 52.517),
            end: GeoCoordinate::new(13.397, 52.529),
            options: RouteOptions {
                profile: RoutingProfile::Cycling,
                alternatives: false,
            },
        }
    }

    #[test]
    fn test_route_url_layout() {
        let provider =
            HttpRouteProvider::new("https://router.example.org/", 5, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            provider.route_url(&request()),
            "https://router.example.org/route/v1/cycling/13.388,52.517;13.397,52.529\
             ?overview=full&geometries=polyline&alternatives=false"
        );
    }

    #[test]
    fn test_precision_six_requests_polyline6() {
        let provider = HttpRouteProvider::new("http://localhost:5000", 6, DEFAULT_TIMEOUT).unwrap();
        assert!(provider.route_url(&request()).contains("geometries=polyline6"));
    }

    #[test]
    fn test_unreachable_endpoint_is_a_failure_reason() {
        // Port 9 (discard) on localhost: refused or timed out, never a route.
        let provider =
            HttpRouteProvider::new("http://127.0.0.1:9", 5, Duration::from_millis(500)).unwrap();
        let reason = provider.fetch(&request()).unwrap_err();
        assert!(reason.contains("directions request 3 failed"), "{reason}");
    }
}
