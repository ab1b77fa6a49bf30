use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use kernel::SearchHit;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::TransportError;
use crate::normalize::normalize;
use crate::notify::{Notify, NotifyKind};
use crate::progress::{MonotonicProgress, ProgressSink};
use crate::transport::{select_transport, Transport, TransportMode, UploadRequest};

const OCTET_STREAM: &str = "application/octet-stream";

/// The image currently staged for upload.
///
/// Lives in the session's file slot between selection and upload; a new
/// selection replaces it, nothing ever clears it, and a failed upload
/// leaves it in place so the same file can be retried.
pub struct PendingFile {
    pub bytes: Bytes,
    pub name: String,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
}

impl PendingFile {
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: Option<String>, bytes: Bytes) -> Self {
        let size_bytes = bytes.len() as u64;
        Self {
            bytes,
            name: name.into(),
            mime_type,
            size_bytes,
        }
    }

    /// MIME type sent with the upload, with the generic fallback.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.mime_type.as_deref().unwrap_or(OCTET_STREAM)
    }
}

/// What an upload call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// No file staged, no request made
    NoFile,
    /// Backend acknowledged the upload with a 2xx
    Completed,
}

/// What a search call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank term, no request made
    Empty,
    /// A newer search was started while this one was in flight; the
    /// caller must discard this completion instead of rendering it
    Superseded,
    /// Normalized hits; may be empty, which is a "no results" state
    /// distinct from any error
    Hits(Vec<SearchHit>),
}

/// Per-process client state: configuration, the transport chosen at
/// startup, the staged file and the search sequence counter.
pub struct Session {
    config: Config,
    transport: Arc<dyn Transport>,
    mode: TransportMode,
    notifier: Arc<dyn Notify>,
    current_file: Option<PendingFile>,
    search_seq: AtomicU64,
}

impl Session {
    /// Creates a session, selecting the transport exactly once.
    #[must_use]
    pub fn new(config: Config, notifier: Arc<dyn Notify>) -> Self {
        let (transport, mode) = select_transport(&config);
        debug!("session transport: {mode}");
        Self::with_transport(config, transport, mode, notifier)
    }

    /// Creates a session around an already-selected transport.
    #[must_use]
    pub fn with_transport(
        config: Config,
        transport: Arc<dyn Transport>,
        mode: TransportMode,
        notifier: Arc<dyn Notify>,
    ) -> Self {
        Self {
            config,
            transport,
            mode,
            notifier,
            current_file: None,
            search_seq: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stages a file for upload, replacing any previous selection.
    pub fn select_file(&mut self, file: PendingFile) {
        debug!("staged {} ({} bytes)", file.name, file.size_bytes);
        self.current_file = Some(file);
    }

    #[must_use]
    pub fn current_file(&self) -> Option<&PendingFile> {
        self.current_file.as_ref()
    }

    /// Uploads the staged file.
    ///
    /// A blank-after-trim label is equivalent to no label. Progress is
    /// reset to zero at the start of each attempt and reported
    /// monotonically; over the generated client it jumps straight to 100
    /// on completion. Success and failure are both reported through the
    /// notification sink. One attempt per call, no retry.
    pub async fn upload(
        &self,
        label: Option<&str>,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<UploadOutcome, TransportError> {
        let Some(file) = self.current_file.as_ref() else {
            debug!("upload requested with no file staged");
            return Ok(UploadOutcome::NoFile);
        };

        let progress = Arc::new(MonotonicProgress::new(progress));
        progress.report(0);

        let label = label.map(str::trim).filter(|l| !l.is_empty());
        let request = UploadRequest { file, label };

        info!("uploading {} ({} bytes)", file.name, file.size_bytes);
        match self.transport.upload(request, progress).await {
            Ok(()) => {
                self.notifier.notify("Upload complete", NotifyKind::Ok);
                Ok(UploadOutcome::Completed)
            }
            Err(e) => {
                error!("upload of {} failed: {e}", file.name);
                self.notifier.notify(&format!("Upload failed: {e}"), NotifyKind::Err);
                Err(e)
            }
        }
    }

    /// Searches uploaded images by keyword.
    ///
    /// Blank terms short-circuit without a request. Each search is
    /// sequence-stamped; a completion that is no longer the latest comes
    /// back as [`SearchOutcome::Superseded`] so stale responses cannot
    /// overwrite newer ones. Failures of the latest search are reported
    /// through the notification sink, same as upload failures.
    pub async fn search(&self, term: &str) -> Result<SearchOutcome, TransportError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(SearchOutcome::Empty);
        }

        let seq = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("search #{seq} for {term:?}");
        let result = self.transport.search(term).await;
        if self.search_seq.load(Ordering::SeqCst) != seq {
            debug!("search #{seq} superseded");
            return Ok(SearchOutcome::Superseded);
        }

        match result {
            Ok(body) => Ok(SearchOutcome::Hits(normalize(&body, &self.config))),
            Err(e) => {
                error!("search for {term:?} failed: {e}");
                self.notifier.notify(&format!("Search failed: {e}"), NotifyKind::Err);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NullNotify;
    use crate::progress::NullProgress;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    struct StubTransport {
        calls: AtomicUsize,
        labels: Mutex<Vec<Option<String>>>,
        fail_upload: bool,
        fail_search: bool,
    }

    impl StubTransport {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                labels: Mutex::new(Vec::new()),
                fail_upload: false,
                fail_search: false,
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn upload(
            &self,
            request: UploadRequest<'_>,
            progress: Arc<MonotonicProgress>,
        ) -> Result<(), TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.labels
                .lock()
                .unwrap()
                .push(request.label.map(str::to_string));
            if self.fail_upload {
                return Err(TransportError::Status(500));
            }
            progress.report(100);
            Ok(())
        }

        async fn search(&self, term: &str) -> Result<Value, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_search {
                return Err(TransportError::Status(500));
            }
            if term == "slow" {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(json!({"results": [{"objectKey": format!("{term}.jpg"), "bucket": "b1"}]}))
        }
    }

    struct RecordingNotify {
        messages: Mutex<Vec<(String, NotifyKind)>>,
    }

    impl Notify for RecordingNotify {
        fn notify(&self, message: &str, kind: NotifyKind) {
            self.messages.lock().unwrap().push((message.to_string(), kind));
        }
    }

    fn session_with(stub: Arc<StubTransport>, notifier: Arc<dyn Notify>) -> Session {
        Session::with_transport(
            Config {
                region: Some("us-east-1".to_string()),
                ..Config::default()
            },
            stub,
            TransportMode::RawHttp,
            notifier,
        )
    }

    fn staged_file() -> PendingFile {
        PendingFile::new(
            "cat.jpg",
            Some("image/jpeg".to_string()),
            Bytes::from_static(b"not really a jpeg"),
        )
    }

    #[tokio::test]
    async fn upload_without_file_is_a_no_op() {
        // Arrange
        let stub = Arc::new(StubTransport::new());
        let session = session_with(stub.clone(), Arc::new(NullNotify));

        // Act
        let outcome = session.upload(None, Arc::new(NullProgress)).await.unwrap();

        // Assert
        assert_eq!(outcome, UploadOutcome::NoFile);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn whitespace_label_is_no_label() {
        // Arrange
        let stub = Arc::new(StubTransport::new());
        let mut session = session_with(stub.clone(), Arc::new(NullNotify));
        session.select_file(staged_file());

        // Act
        session
            .upload(Some("   "), Arc::new(NullProgress))
            .await
            .unwrap();
        session
            .upload(Some("  mountain, beach  "), Arc::new(NullProgress))
            .await
            .unwrap();

        // Assert
        let labels = stub.labels.lock().unwrap();
        assert_eq!(labels[0], None);
        assert_eq!(labels[1], Some("mountain, beach".to_string()));
    }

    #[tokio::test]
    async fn upload_failure_notifies_and_keeps_file() {
        // Arrange
        let stub = Arc::new(StubTransport {
            fail_upload: true,
            ..StubTransport::new()
        });
        let notifier = Arc::new(RecordingNotify {
            messages: Mutex::new(Vec::new()),
        });
        let mut session = session_with(stub, notifier.clone());
        session.select_file(staged_file());

        // Act
        let result = session.upload(None, Arc::new(NullProgress)).await;

        // Assert
        assert!(matches!(result, Err(TransportError::Status(500))));
        assert!(session.current_file().is_some());
        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].0.contains("500"));
        assert_eq!(messages[0].1, NotifyKind::Err);
    }

    #[tokio::test]
    async fn upload_success_notifies_ok() {
        // Arrange
        let stub = Arc::new(StubTransport::new());
        let notifier = Arc::new(RecordingNotify {
            messages: Mutex::new(Vec::new()),
        });
        let mut session = session_with(stub, notifier.clone());
        session.select_file(staged_file());

        // Act
        let outcome = session.upload(None, Arc::new(NullProgress)).await.unwrap();

        // Assert
        assert_eq!(outcome, UploadOutcome::Completed);
        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages[0].1, NotifyKind::Ok);
    }

    #[tokio::test]
    async fn blank_search_term_makes_no_request() {
        // Arrange
        let stub = Arc::new(StubTransport::new());
        let session = session_with(stub.clone(), Arc::new(NullNotify));

        // Act
        let outcome = session.search("   ").await.unwrap();

        // Assert
        assert_eq!(outcome, SearchOutcome::Empty);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn search_failure_notifies_sink() {
        // Arrange
        let stub = Arc::new(StubTransport {
            fail_search: true,
            ..StubTransport::new()
        });
        let notifier = Arc::new(RecordingNotify {
            messages: Mutex::new(Vec::new()),
        });
        let session = session_with(stub, notifier.clone());

        // Act
        let result = session.search("dog").await;

        // Assert
        assert!(matches!(result, Err(TransportError::Status(500))));
        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].0.contains("500"));
    }

    #[tokio::test]
    async fn stale_search_completion_is_superseded() {
        // Arrange
        let stub = Arc::new(StubTransport::new());
        let session = session_with(stub, Arc::new(NullNotify));

        // Act
        let (slow, fast) = tokio::join!(session.search("slow"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            session.search("fast").await
        });

        // Assert
        assert_eq!(slow.unwrap(), SearchOutcome::Superseded);
        match fast.unwrap() {
            SearchOutcome::Hits(hits) => assert_eq!(hits[0].object_key, "fast.jpg"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn sequential_searches_are_both_fresh() {
        // Arrange
        let stub = Arc::new(StubTransport::new());
        let session = session_with(stub, Arc::new(NullNotify));

        // Act
        let first = session.search("cat").await.unwrap();
        let second = session.search("dog").await.unwrap();

        // Assert
        assert!(matches!(first, SearchOutcome::Hits(_)));
        assert!(matches!(second, SearchOutcome::Hits(_)));
    }
}
