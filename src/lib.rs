// src/lib.rs

pub mod config;
pub mod error;
pub mod sampler;
pub mod session;
pub mod store;
pub mod tracker;
pub mod types;
pub mod video_source;

pub use error::SessionError;
pub use session::{run_session, run_session_with, CancelToken, SessionRequest};
pub use store::ResultStore;
pub use tracker::{create_tracker, Tracker, TrackerKind};
pub use types::{BoundingBox, Config, Frame, FrameObservation, SessionResult};
pub use video_source::{find_video_files, FrameSource, VideoFileSource};
