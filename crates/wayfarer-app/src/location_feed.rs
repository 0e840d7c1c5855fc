//! Device location feed: newline-delimited JSON fixes from a reader.
//!
//! Each line is a `GeoCoordinate` object, e.g.
//! `{"lng": 13.4, "lat": 52.5, "accuracy": 6.0, "timestamp_ms": 1700000000000}`.
//! Typically stdin, piped from a GPS daemon.

use std::io::BufRead;
use std::thread::JoinHandle;

use tracing::{debug, warn};

use wayfarer_core::types::GeoCoordinate;
use wayfarer_sim::LocationWriter;

/// Publish every parseable line into `writer`. Returns the number published.
pub fn pump_fixes(reader: impl BufRead, writer: &LocationWriter) -> usize {
    let mut published = 0;
    for (number, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "location feed read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<GeoCoordinate>(&line) {
            Ok(fix) => {
                writer.publish(fix);
                published += 1;
            }
            Err(err) => warn!(line = number + 1, %err, "skipping malformed fix"),
        }
    }
    debug!(published, "location feed ended");
    published
}

/// Run `pump_fixes` on its own thread.
pub fn spawn_feed<R>(reader: R, writer: LocationWriter) -> std::io::Result<JoinHandle<usize>>
where
    R: BufRead + Send + 'static,
{
    std::thread::Builder::new()
        .name("wayfarer-location-feed".into())
        .spawn(move || pump_fixes(reader, &writer))
}
