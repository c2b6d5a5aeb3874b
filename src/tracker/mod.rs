// src/tracker/mod.rs

mod opencv;

pub use opencv::OpenCvTracker;

use crate::types::{BoundingBox, Frame};
use anyhow::Result;

/// Capability contract for one single-object visual tracking algorithm.
///
/// `init` seeds the internal model exactly once per session; `update`
/// advances it to a new frame. `Ok(None)` from `update` means the tracker
/// lost the object on that frame — non-fatal, the session simply skips
/// the frame. All model state is owned by the implementation; callers
/// never see it.
pub trait Tracker {
    fn init(&mut self, frame: &Frame, initial_box: &BoundingBox) -> Result<()>;
    fn update(&mut self, frame: &Frame) -> Result<Option<BoundingBox>>;
}

/// The supported tracking algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    Csrt,
    Kcf,
    Boosting,
    Mil,
    Tld,
    MedianFlow,
    Mosse,
}

impl TrackerKind {
    /// Case-insensitive resolution of a tracker-type identifier.
    ///
    /// Unknown identifiers fall back to CSRT instead of failing the
    /// request, matching the lenient behavior callers already rely on.
    pub fn parse(name: &str) -> TrackerKind {
        match name.to_ascii_lowercase().as_str() {
            "csrt" => TrackerKind::Csrt,
            "kcf" => TrackerKind::Kcf,
            "boosting" => TrackerKind::Boosting,
            "mil" => TrackerKind::Mil,
            "tld" => TrackerKind::Tld,
            "medianflow" => TrackerKind::MedianFlow,
            "mosse" => TrackerKind::Mosse,
            _ => TrackerKind::Csrt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerKind::Csrt => "csrt",
            TrackerKind::Kcf => "kcf",
            TrackerKind::Boosting => "boosting",
            TrackerKind::Mil => "mil",
            TrackerKind::Tld => "tld",
            TrackerKind::MedianFlow => "medianflow",
            TrackerKind::Mosse => "mosse",
        }
    }
}

/// Construct the OpenCV-backed adapter for the requested algorithm.
pub fn create_tracker(kind: TrackerKind) -> Result<Box<dyn Tracker>> {
    Ok(Box::new(OpenCvTracker::create(kind)?))
}
