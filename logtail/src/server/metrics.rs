//! Prometheus metrics for the log tail server.

use axum::http::Method;
use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;

/// Labels for HTTP request metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HttpLabelsWithStatus {
    pub method: HttpMethod,
    pub endpoint: String,
    pub status: u16,
}

/// HTTP method label value.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum HttpMethod {
    Get,
    Head,
    Other,
}

impl From<&Method> for HttpMethod {
    fn from(method: &Method) -> Self {
        match *method {
            Method::GET => HttpMethod::Get,
            Method::HEAD => HttpMethod::Head,
            _ => HttpMethod::Other,
        }
    }
}

/// Labels for the time-to-response histogram.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HttpLabels {
    pub method: HttpMethod,
    pub endpoint: String,
}

/// Container for all Prometheus metrics.
pub struct Metrics {
    registry: Registry,

    /// Number of live stream subscribers.
    pub subscribers_active: Gauge,

    /// Counter of subscribers ever connected; also numbers them for logs.
    pub subscribers: Counter,

    /// Counter of lines pushed to subscribers.
    pub lines_streamed: Counter,

    /// Counter of streams terminated by a read error.
    pub stream_errors: Counter,

    /// Counter of lines returned by tail requests.
    pub tail_lines_served: Counter,

    /// Counter of HTTP requests.
    pub http_requests: Family<HttpLabelsWithStatus, Counter>,

    /// Time until response headers are produced, in seconds.
    ///
    /// For streaming responses this covers opening the follower, not the
    /// lifetime of the stream.
    pub http_response_seconds: Family<HttpLabels, Histogram>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics registry with all metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let subscribers_active = Gauge::default();
        registry.register(
            "logtail_subscribers_active",
            "Number of clients currently following the log stream",
            subscribers_active.clone(),
        );

        let subscribers = Counter::default();
        registry.register(
            "logtail_subscribers",
            "Total number of clients that have followed the log stream",
            subscribers.clone(),
        );

        let lines_streamed = Counter::default();
        registry.register(
            "logtail_lines_streamed",
            "Total number of lines pushed to stream subscribers",
            lines_streamed.clone(),
        );

        let stream_errors = Counter::default();
        registry.register(
            "logtail_stream_errors",
            "Total number of streams ended by a read error",
            stream_errors.clone(),
        );

        let tail_lines_served = Counter::default();
        registry.register(
            "logtail_tail_lines_served",
            "Total number of lines returned by tail requests",
            tail_lines_served.clone(),
        );

        let http_requests = Family::<HttpLabelsWithStatus, Counter>::default();
        registry.register(
            "http_requests",
            "Total number of HTTP requests",
            http_requests.clone(),
        );

        // Buckets from 1ms to ~8s
        let http_response_seconds = Family::<HttpLabels, Histogram>::new_with_constructor(|| {
            Histogram::new(exponential_buckets(0.001, 2.0, 14))
        });
        registry.register(
            "http_response_seconds",
            "Time until HTTP response headers are ready, in seconds",
            http_response_seconds.clone(),
        );

        Self {
            registry,
            subscribers_active,
            subscribers,
            lines_streamed,
            stream_errors,
            tail_lines_served,
            http_requests,
            http_response_seconds,
        }
    }

    /// Returns a mutable reference to the underlying Prometheus registry.
    ///
    /// Use this to register additional metrics (e.g. the writer's counters)
    /// before wrapping `Metrics` in an `Arc`.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Encode all metrics to Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        if let Err(err) = prometheus_client::encoding::text::encode(&mut buffer, &self.registry) {
            tracing::error!(error = %err, "failed to encode metrics");
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_create_default_metrics() {
        // given/when
        let metrics = Metrics::new();

        // then
        let encoded = metrics.encode();
        assert!(encoded.contains("# HELP logtail_subscribers_active"));
        assert!(encoded.contains("# HELP logtail_subscribers Total"));
        assert!(encoded.contains("# HELP logtail_lines_streamed"));
        assert!(encoded.contains("# HELP logtail_stream_errors"));
        assert!(encoded.contains("# HELP logtail_tail_lines_served"));
        assert!(encoded.contains("# HELP http_requests"));
        assert!(encoded.contains("# HELP http_response_seconds"));
    }

    #[test]
    fn should_convert_http_method_to_label() {
        // given
        let method = Method::GET;

        // when
        let label = HttpMethod::from(&method);

        // then
        assert!(matches!(label, HttpMethod::Get));
    }
}
