use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures::{stream, StreamExt};

const CHUNK_SIZE: usize = 64 * 1024;

/// Receives upload progress as a percentage in `[0, 100]`.
pub trait ProgressSink: Send + Sync {
    fn report(&self, percent: u8);
}

/// Sink that ignores progress. Useful when no display exists.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _percent: u8) {}
}

/// Wrapper enforcing that reported progress never decreases within one
/// upload. Values above 100 are clamped; stale lower values are dropped.
pub struct MonotonicProgress {
    inner: Arc<dyn ProgressSink>,
    last: AtomicU8,
}

impl MonotonicProgress {
    pub fn new(inner: Arc<dyn ProgressSink>) -> Self {
        Self {
            inner,
            last: AtomicU8::new(0),
        }
    }
}

impl ProgressSink for MonotonicProgress {
    fn report(&self, percent: u8) {
        let percent = percent.min(100);
        let last = self.last.load(Ordering::SeqCst);
        if percent >= last {
            self.last.store(percent, Ordering::SeqCst);
            self.inner.report(percent);
        }
    }
}

/// Wraps file bytes into a chunked streaming request body, reporting
/// percent complete as chunks are handed to the transport. With an
/// unknown total (zero) nothing is reported until the operation itself
/// finishes.
pub(crate) fn progress_body(
    data: Bytes,
    total: u64,
    progress: Arc<MonotonicProgress>,
) -> reqwest::Body {
    let mut remaining = data;
    let chunks = std::iter::from_fn(move || {
        if remaining.is_empty() {
            None
        } else {
            let n = remaining.len().min(CHUNK_SIZE);
            Some(remaining.split_to(n))
        }
    });

    let mut sent = 0u64;
    let body_stream = stream::iter(chunks).map(move |chunk: Bytes| {
        sent += chunk.len() as u64;
        if total > 0 {
            let percent = (sent.saturating_mul(100) / total).min(100);
            #[allow(clippy::cast_possible_truncation)]
            progress.report(percent as u8);
        }
        Ok::<Bytes, std::io::Error>(chunk)
    });

    reqwest::Body::wrap_stream(body_stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<u8>>,
    }

    impl ProgressSink for Recorder {
        fn report(&self, percent: u8) {
            self.seen.lock().unwrap().push(percent);
        }
    }

    #[test]
    fn monotonic_drops_regressions_and_clamps() {
        // Arrange
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let progress = MonotonicProgress::new(recorder.clone());

        // Act
        progress.report(0);
        progress.report(40);
        progress.report(30);
        progress.report(40);
        progress.report(110);

        // Assert
        assert_eq!(*recorder.seen.lock().unwrap(), vec![0, 40, 40, 100]);
    }

    #[tokio::test]
    async fn body_reports_up_to_one_hundred() {
        // Arrange
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let progress = Arc::new(MonotonicProgress::new(recorder.clone()));
        let data = Bytes::from(vec![0u8; 200 * 1024]);
        let total = data.len() as u64;

        // Act
        let body = progress_body(data, total, progress);
        drain(body).await;

        // Assert
        let seen = recorder.seen.lock().unwrap();
        assert_eq!(*seen.last().unwrap(), 100);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn unknown_total_stays_silent() {
        // Arrange
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let progress = Arc::new(MonotonicProgress::new(recorder.clone()));
        let data = Bytes::from_static(b"tiny");

        // Act
        let body = progress_body(data, 0, progress);
        drain(body).await;

        // Assert
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    async fn drain(mut body: reqwest::Body) {
        use http_body_util::BodyExt;
        while body.frame().await.is_some() {}
    }
}
