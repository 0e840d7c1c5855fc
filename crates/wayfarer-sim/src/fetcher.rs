//! Route fetch thread.
//!
//! Requests go out over one channel, results come back over another. The
//! frame loop polls without blocking and hands each result to the
//! navigation engine, which drops anything that is no longer current.

use std::sync::mpsc;
use std::time::Duration;

use tracing::{debug, warn};

use wayfarer_nav::directions::{RouteProvider, RouteRequest};
use wayfarer_nav::route::Route;

/// A finished fetch: the request id and the provider's answer.
pub type RouteResponse = (u64, Result<Vec<Route>, String>);

pub struct RouteFetcher {
    request_tx: mpsc::Sender<RouteRequest>,
    response_rx: mpsc::Receiver<RouteResponse>,
}

impl RouteFetcher {
    /// Move `provider` onto a worker thread. The thread exits once the
    /// fetcher is dropped and any in-flight request returns.
    pub fn spawn(provider: Box<dyn RouteProvider>) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<RouteRequest>();
        let (response_tx, response_rx) = mpsc::channel::<RouteResponse>();

        std::thread::Builder::new()
            .name("wayfarer-route-fetch".into())
            .spawn(move || {
                while let Ok(request) = request_rx.recv() {
                    debug!(request_id = request.id, "fetching route");
                    let result = provider.fetch(&request);
                    if response_tx.send((request.id, result)).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            request_tx,
            response_rx,
        })
    }

    /// Queue a request. Returns false if the worker has gone away.
    pub fn submit(&self, request: RouteRequest) -> bool {
        let id = request.id;
        if self.request_tx.send(request).is_err() {
            warn!(request_id = id, "route fetch thread is gone");
            return false;
        }
        true
    }

    /// Collect every finished fetch without blocking.
    pub fn poll(&self) -> Vec<RouteResponse> {
        self.response_rx.try_iter().collect()
    }

    /// Wait up to `timeout` for the next finished fetch.
    pub fn wait(&self, timeout: Duration) -> Option<RouteResponse> {
        self.response_rx.recv_timeout(timeout).ok()
    }
}
