//! Pushes a follower's lines onto a streaming HTTP body.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use super::metrics::Metrics;
use crate::Follower;

/// Builds the long-lived response for one subscriber.
///
/// Each line becomes its own body frame, which hyper writes to the socket as
/// soon as it is produced. When the client goes away hyper drops the body,
/// dropping the follower and its file handle with it; when `cancel` fires
/// the body ends cleanly. A read error aborts only this response.
pub(crate) fn stream_response(
    follower: Follower,
    cancel: CancellationToken,
    metrics: Arc<Metrics>,
) -> Response {
    let subscriber = Subscriber::connect(follower.path(), follower.position(), metrics);

    let body = follower.into_stream(cancel).map(move |item| match item {
        Ok(line) => {
            subscriber.metrics.lines_streamed.inc();
            Ok(frame(line))
        }
        Err(err) => {
            subscriber.metrics.stream_errors.inc();
            tracing::warn!(subscriber = subscriber.id, error = %err, "log stream terminated");
            Err(err)
        }
    });

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(body),
    )
        .into_response()
}

fn frame(line: String) -> Bytes {
    let mut bytes = line.into_bytes();
    bytes.push(b'\n');
    Bytes::from(bytes)
}

/// Live subscriber registration, released when the body is dropped.
struct Subscriber {
    id: u64,
    metrics: Arc<Metrics>,
}

impl Subscriber {
    fn connect(path: &Path, position: u64, metrics: Arc<Metrics>) -> Self {
        let id = metrics.subscribers.inc() + 1;
        metrics.subscribers_active.inc();
        tracing::info!(subscriber = id, path = %path.display(), position, "subscriber connected");
        Self { id, metrics }
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.metrics.subscribers_active.dec();
        tracing::info!(subscriber = self.id, "subscriber disconnected");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn should_stream_each_line_as_its_own_frame() {
        // given
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let follower = Follower::open(file.path(), Duration::from_millis(10))
            .await
            .unwrap();
        let metrics = Arc::new(Metrics::new());
        let response = stream_response(follower, CancellationToken::new(), metrics.clone());
        let mut body = response.into_body().into_data_stream();

        // when
        file.write_all(b"first\nsecond\n").unwrap();
        file.flush().unwrap();

        // then
        let first = timeout(Duration::from_secs(5), body.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let second = timeout(Duration::from_secs(5), body.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(first, Bytes::from("first\n"));
        assert_eq!(second, Bytes::from("second\n"));
        assert_eq!(metrics.lines_streamed.get(), 2);
        assert_eq!(metrics.subscribers_active.get(), 1);
    }

    #[tokio::test]
    async fn should_set_streaming_headers() {
        // given
        let file = tempfile::NamedTempFile::new().unwrap();
        let follower = Follower::open(file.path(), Duration::from_millis(10))
            .await
            .unwrap();

        // when
        let response = stream_response(
            follower,
            CancellationToken::new(),
            Arc::new(Metrics::new()),
        );

        // then
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::CONNECTION], "keep-alive");
    }

    #[tokio::test]
    async fn should_release_subscriber_when_body_is_dropped() {
        // given
        let file = tempfile::NamedTempFile::new().unwrap();
        let follower = Follower::open(file.path(), Duration::from_millis(10))
            .await
            .unwrap();
        let metrics = Arc::new(Metrics::new());
        let response = stream_response(follower, CancellationToken::new(), metrics.clone());
        assert_eq!(metrics.subscribers_active.get(), 1);

        // when
        drop(response);

        // then
        assert_eq!(metrics.subscribers_active.get(), 0);
    }

    #[tokio::test]
    async fn should_end_only_failing_body_on_read_error() {
        // given
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"some history\n").unwrap();
        file.flush().unwrap();
        let metrics = Arc::new(Metrics::new());
        let path = file.path().to_path_buf();
        let open = |metrics: Arc<Metrics>| {
            let path = path.clone();
            async move {
                let follower = Follower::open(path, Duration::from_millis(10))
                    .await
                    .unwrap();
                stream_response(follower, CancellationToken::new(), metrics)
                    .into_body()
                    .into_data_stream()
            }
        };
        let mut failing = open(metrics.clone()).await;

        // when
        file.as_file().set_len(0).unwrap();

        // then
        let first = timeout(Duration::from_secs(5), failing.next())
            .await
            .unwrap();
        assert!(matches!(first, Some(Err(_))));
        let end = timeout(Duration::from_secs(5), failing.next())
            .await
            .unwrap();
        assert!(end.is_none());
        assert_eq!(metrics.stream_errors.get(), 1);
        drop(failing);
        assert_eq!(metrics.subscribers_active.get(), 0);

        // a subscriber opened afterwards streams normally
        let mut healthy = open(metrics.clone()).await;
        file.write_all(b"fresh\n").unwrap();
        file.flush().unwrap();
        let chunk = timeout(Duration::from_secs(5), healthy.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(chunk, Bytes::from("fresh\n"));
        assert_eq!(metrics.subscribers.get(), 2);
    }

    #[tokio::test]
    async fn should_end_body_when_cancelled() {
        // given
        let file = tempfile::NamedTempFile::new().unwrap();
        let follower = Follower::open(file.path(), Duration::from_secs(60))
            .await
            .unwrap();
        let cancel = CancellationToken::new();
        let metrics = Arc::new(Metrics::new());
        let mut body = stream_response(follower, cancel.clone(), metrics.clone())
            .into_body()
            .into_data_stream();

        // when
        cancel.cancel();

        // then
        let end = timeout(Duration::from_secs(5), body.next()).await.unwrap();
        assert!(end.is_none());
        drop(body);
        assert_eq!(metrics.subscribers_active.get(), 0);
    }
}
