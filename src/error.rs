// src/error.rs

use thiserror::Error;

/// Terminal outcomes of a tracking session. Per-frame tracking loss is
/// deliberately not represented here: the session recovers it locally and
/// keeps going, so only conditions that end the run appear as variants.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The frame source could not be opened, or its metadata reports a
    /// non-positive frame rate. Nothing has been processed.
    #[error("video source unreadable: {0}")]
    SourceUnreadable(String),

    /// The tracker rejected the initial bounding box. Fatal and not
    /// retried; the caller gets no partial result.
    #[error("tracker initialization failed: {0}")]
    TrackerInitFailed(#[source] anyhow::Error),

    /// A frame failed to decode mid-stream.
    #[error("frame decode failed at index {index}: {source}")]
    Decode {
        index: u64,
        #[source]
        source: anyhow::Error,
    },

    /// Cooperative cancellation was observed between frame iterations.
    /// The source handle has already been released.
    #[error("session cancelled after {sampled_frames} sampled frames")]
    Cancelled { sampled_frames: u64 },
}
