//! Dual-transport client for the photo upload & search backend.
//!
//! One logical upload and one logical search operation, satisfied by
//! either an SDK-style generated client or raw HTTP — chosen once at
//! startup and hidden behind the [`transport::Transport`] trait. The
//! [`session::Session`] carries the per-process state and is the entry
//! point for embedders.

pub mod config;
pub mod error;
pub mod normalize;
pub mod notify;
pub mod progress;
pub mod resource;
pub mod session;
pub mod transport;

pub use config::Config;
pub use error::TransportError;
pub use notify::{Notify, NotifyKind, NullNotify};
pub use progress::{NullProgress, ProgressSink};
pub use session::{PendingFile, SearchOutcome, Session, UploadOutcome};
pub use transport::TransportMode;
