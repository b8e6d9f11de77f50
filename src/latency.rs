use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tokio::time::sleep;

/// Artificial delay applied to every request before routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Latency {
    delay: Duration,
}

impl Latency {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleep for the configured delay. Runs to completion once started.
    pub async fn apply(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

/// Axum middleware that holds the request back by the configured latency.
pub async fn latency_middleware(
    State(latency): State<Latency>,
    request: Request,
    next: Next,
) -> Response {
    latency.apply().await;
    next.run(request).await
}
