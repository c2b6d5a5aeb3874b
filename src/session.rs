// src/session.rs
//
// One full tracking pass over one video: pull frames, sample them,
// seed the tracker on the first sampled frame, update it on the rest,
// and assemble the result. Single-threaded by design — each update
// depends on the previous frame's model state, so there is nothing to
// parallelize inside a session. Independent sessions on different
// videos can run on separate threads; nothing here is shared.

use crate::error::SessionError;
use crate::sampler;
use crate::tracker::{self, Tracker, TrackerKind};
use crate::types::{BoundingBox, FrameObservation, SessionResult};
use crate::video_source::FrameSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Cooperative cancellation flag, checked once per frame iteration.
/// Clones share the flag, so the token can be handed to another thread
/// while the session loop keeps its own copy.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// What the caller wants from one run.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub target_fps: u32,
    pub tracker: TrackerKind,
    pub initial_box: Option<BoundingBox>,
}

impl SessionRequest {
    pub fn new(target_fps: u32, tracker_type: &str, initial_box: Option<BoundingBox>) -> Self {
        Self {
            target_fps,
            tracker: TrackerKind::parse(tracker_type),
            initial_box,
        }
    }
}

enum TrackerState {
    /// No initial box was supplied: every sampled frame is reported
    /// with empty boxes and no tracker exists.
    SamplingOnly,
    /// A tracker is waiting for the first sampled frame.
    AwaitingInit {
        tracker: Box<dyn Tracker>,
        initial_box: BoundingBox,
    },
    /// The tracker has been seeded and is being updated per sampled frame.
    Tracking { tracker: Box<dyn Tracker> },
}

/// Run one tracking session, resolving the tracker through the factory
/// when an initial box is present.
pub fn run_session<S: FrameSource>(
    source: &mut S,
    source_id: &str,
    request: &SessionRequest,
    cancel: &CancelToken,
) -> Result<SessionResult, SessionError> {
    let tracker = match request.initial_box {
        Some(_) => Some(
            tracker::create_tracker(request.tracker).map_err(SessionError::TrackerInitFailed)?,
        ),
        None => None,
    };
    run_session_with(source, source_id, request, tracker, cancel)
}

/// Like [`run_session`] but with a caller-supplied tracker instance.
/// The tracker is only consulted when `request.initial_box` is set.
pub fn run_session_with<S: FrameSource>(
    source: &mut S,
    source_id: &str,
    request: &SessionRequest,
    tracker: Option<Box<dyn Tracker>>,
    cancel: &CancelToken,
) -> Result<SessionResult, SessionError> {
    let result = run_loop(source, source_id, request, tracker, cancel);

    // The handle is released on every exit path: completion, decode
    // error, init failure, and cancellation.
    if let Err(release_err) = source.release() {
        warn!("Failed to release video source: {:#}", release_err);
    }

    result
}

fn run_loop<S: FrameSource>(
    source: &mut S,
    source_id: &str,
    request: &SessionRequest,
    tracker: Option<Box<dyn Tracker>>,
    cancel: &CancelToken,
) -> Result<SessionResult, SessionError> {
    if !source.is_open() {
        return Err(SessionError::SourceUnreadable(
            "frame source is not open".to_string(),
        ));
    }

    let source_fps = source.frame_rate();
    if source_fps <= 0.0 {
        return Err(SessionError::SourceUnreadable(format!(
            "frame source reports non-positive frame rate {}",
            source_fps
        )));
    }

    let total_frame_count = source.frame_count();
    let interval = sampler::sample_interval(source_fps, request.target_fps);

    debug!(
        "Session {}: {:.1} fps source, target {} fps, sampling every {} frames",
        source_id, source_fps, request.target_fps, interval
    );

    let mut state = match (tracker, request.initial_box.clone()) {
        (Some(tracker), Some(initial_box)) => TrackerState::AwaitingInit {
            tracker,
            initial_box,
        },
        _ => TrackerState::SamplingOnly,
    };

    let mut observations: Vec<FrameObservation> = Vec::new();
    let mut frame_index: u64 = 0;
    let mut sampled_frames: u64 = 0;
    let mut lost_frames: u64 = 0;
    let started = Instant::now();

    loop {
        if cancel.is_cancelled() {
            info!(
                "Session {} cancelled after {} sampled frames",
                source_id, sampled_frames
            );
            return Err(SessionError::Cancelled { sampled_frames });
        }

        let frame = match source.read_next() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                return Err(SessionError::Decode {
                    index: frame_index,
                    source: e,
                })
            }
        };

        if sampler::is_sampled(frame_index, interval) {
            let timestamp_seconds = frame_index as f64 / source_fps;

            state = match state {
                TrackerState::SamplingOnly => {
                    observations.push(FrameObservation {
                        frame_index,
                        timestamp_seconds,
                        boxes: Vec::new(),
                    });
                    TrackerState::SamplingOnly
                }
                TrackerState::AwaitingInit {
                    mut tracker,
                    initial_box,
                } => {
                    tracker
                        .init(&frame, &initial_box)
                        .map_err(SessionError::TrackerInitFailed)?;
                    // The first observation echoes the caller's box
                    // verbatim; the tracker has not produced anything yet.
                    observations.push(FrameObservation {
                        frame_index,
                        timestamp_seconds,
                        boxes: vec![initial_box],
                    });
                    TrackerState::Tracking { tracker }
                }
                TrackerState::Tracking { mut tracker } => {
                    match tracker.update(&frame) {
                        Ok(Some(bbox)) => {
                            observations.push(FrameObservation {
                                frame_index,
                                timestamp_seconds,
                                boxes: vec![bbox],
                            });
                        }
                        Ok(None) => {
                            // Tracking loss is per-frame and non-fatal:
                            // the frame contributes no observation and
                            // the run continues.
                            lost_frames += 1;
                            debug!(
                                "Session {}: tracking lost at frame {}",
                                source_id, frame_index
                            );
                        }
                        Err(e) => {
                            lost_frames += 1;
                            warn!(
                                "Session {}: tracker error at frame {}, treating as loss: {:#}",
                                source_id, frame_index, e
                            );
                        }
                    }
                    TrackerState::Tracking { tracker }
                }
            };

            sampled_frames += 1;
        }

        frame_index += 1;
    }

    let elapsed = started.elapsed().as_secs_f64();
    let achieved_sample_rate = if elapsed > 0.0 {
        sampled_frames as f64 / elapsed
    } else {
        0.0
    };

    if lost_frames > 0 {
        info!(
            "Session {}: tracking lost on {} of {} sampled frames",
            source_id, lost_frames, sampled_frames
        );
    }

    info!(
        "Session {} complete: {} observations from {} sampled frames ({:.1}/s)",
        source_id,
        observations.len(),
        sampled_frames,
        achieved_sample_rate
    );

    Ok(SessionResult {
        source_id: source_id.to_string(),
        observations,
        total_frame_count,
        source_duration_seconds: total_frame_count as f64 / source_fps,
        achieved_sample_rate,
    })
}
