// src/tracker/opencv.rs
//
// OpenCV-backed tracker adapters. CSRT/KCF/MIL go through the modern
// cv::Tracker API; Boosting/TLD/MedianFlow/MOSSE only exist in the
// contrib legacy API, which uses Rect2d and a bool-returning init.

use super::{Tracker, TrackerKind};
use crate::types::{BoundingBox, Frame};
use anyhow::{anyhow, Result};
use opencv::{
    core::{Mat, Ptr, Rect, Rect2d},
    prelude::*,
    tracking, video,
};

pub struct OpenCvTracker {
    backend: Backend,
}

enum Backend {
    Csrt(Ptr<tracking::TrackerCSRT>),
    Kcf(Ptr<tracking::TrackerKCF>),
    Mil(Ptr<video::TrackerMIL>),
    Boosting(Ptr<tracking::Legacy_TrackerBoosting>),
    Tld(Ptr<tracking::Legacy_TrackerTLD>),
    MedianFlow(Ptr<tracking::Legacy_TrackerMedianFlow>),
    Mosse(Ptr<tracking::Legacy_TrackerMOSSE>),
}

impl OpenCvTracker {
    pub fn create(kind: TrackerKind) -> Result<Self> {
        let backend = match kind {
            TrackerKind::Csrt => Backend::Csrt(tracking::TrackerCSRT::create(
                &tracking::TrackerCSRT_Params::default()?,
            )?),
            TrackerKind::Kcf => Backend::Kcf(tracking::TrackerKCF::create(
                tracking::TrackerKCF_Params::default()?,
            )?),
            TrackerKind::Mil => Backend::Mil(video::TrackerMIL::create(
                video::TrackerMIL_Params::default()?,
            )?),
            TrackerKind::Boosting => {
                Backend::Boosting(tracking::Legacy_TrackerBoosting::create_1()?)
            }
            TrackerKind::Tld => Backend::Tld(tracking::Legacy_TrackerTLD::create_1()?),
            TrackerKind::MedianFlow => {
                Backend::MedianFlow(tracking::Legacy_TrackerMedianFlow::create_1()?)
            }
            TrackerKind::Mosse => Backend::Mosse(tracking::Legacy_TrackerMOSSE::create()?),
        };
        Ok(Self { backend })
    }
}

impl Tracker for OpenCvTracker {
    fn init(&mut self, frame: &Frame, initial_box: &BoundingBox) -> Result<()> {
        validate_box(frame, initial_box)?;
        let mat = frame_to_mat(frame)?;
        match &mut self.backend {
            Backend::Csrt(t) => t.init(&mat, to_rect(initial_box))?,
            Backend::Kcf(t) => t.init(&mat, to_rect(initial_box))?,
            Backend::Mil(t) => t.init(&mat, to_rect(initial_box))?,
            // The legacy API signals a rejected box through its return
            // flag rather than an exception.
            Backend::Boosting(t) => {
                check_legacy_init(t.init(&mat, to_rect2d(initial_box))?)?;
            }
            Backend::Tld(t) => {
                check_legacy_init(t.init(&mat, to_rect2d(initial_box))?)?;
            }
            Backend::MedianFlow(t) => {
                check_legacy_init(t.init(&mat, to_rect2d(initial_box))?)?;
            }
            Backend::Mosse(t) => {
                check_legacy_init(t.init(&mat, to_rect2d(initial_box))?)?;
            }
        }
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Result<Option<BoundingBox>> {
        let mat = frame_to_mat(frame)?;
        match &mut self.backend {
            Backend::Csrt(t) => update_modern(t, &mat),
            Backend::Kcf(t) => update_modern(t, &mat),
            Backend::Mil(t) => update_modern(t, &mat),
            Backend::Boosting(t) => update_legacy(t, &mat),
            Backend::Tld(t) => update_legacy(t, &mat),
            Backend::MedianFlow(t) => update_legacy(t, &mat),
            Backend::Mosse(t) => update_legacy(t, &mat),
        }
    }
}

fn update_modern(tracker: &mut impl video::TrackerTrait, mat: &Mat) -> Result<Option<BoundingBox>> {
    let mut rect = Rect::default();
    if tracker.update(mat, &mut rect)? {
        Ok(Some(BoundingBox::new(rect.x, rect.y, rect.width, rect.height)))
    } else {
        Ok(None)
    }
}

fn update_legacy(
    tracker: &mut impl tracking::Legacy_TrackerTrait,
    mat: &Mat,
) -> Result<Option<BoundingBox>> {
    let mut rect = Rect2d::default();
    if tracker.update(mat, &mut rect)? {
        Ok(Some(BoundingBox::new(
            rect.x as i32,
            rect.y as i32,
            rect.width as i32,
            rect.height as i32,
        )))
    } else {
        Ok(None)
    }
}

fn check_legacy_init(accepted: bool) -> Result<()> {
    if accepted {
        Ok(())
    } else {
        Err(anyhow!("tracker rejected the initial box"))
    }
}

fn to_rect(bbox: &BoundingBox) -> Rect {
    Rect::new(bbox.x, bbox.y, bbox.width, bbox.height)
}

fn to_rect2d(bbox: &BoundingBox) -> Rect2d {
    Rect2d::new(
        bbox.x as f64,
        bbox.y as f64,
        bbox.width as f64,
        bbox.height as f64,
    )
}

fn validate_box(frame: &Frame, bbox: &BoundingBox) -> Result<()> {
    if bbox.width <= 0 || bbox.height <= 0 {
        return Err(anyhow!(
            "initial box has non-positive size {}x{}",
            bbox.width,
            bbox.height
        ));
    }
    let (right, bottom) = (bbox.x + bbox.width, bbox.y + bbox.height);
    if bbox.x < 0 || bbox.y < 0 || right > frame.width as i32 || bottom > frame.height as i32 {
        return Err(anyhow!(
            "initial box ({},{}) {}x{} lies outside the {}x{} frame",
            bbox.x,
            bbox.y,
            bbox.width,
            bbox.height,
            frame.width,
            frame.height
        ));
    }
    Ok(())
}

fn frame_to_mat(frame: &Frame) -> Result<Mat> {
    let mat = Mat::from_slice(&frame.data)?;
    let mat = mat.reshape(3, frame.height as i32)?;
    Ok(mat.try_clone()?)
}
