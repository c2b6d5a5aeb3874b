// src/video_source.rs

use crate::types::Frame;
use anyhow::Result;
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureTrait, VideoCaptureTraitConst},
};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// Sequential supplier of decoded frames plus the source metadata the
/// session needs up front. The session borrows the handle for the run
/// and releases it on every exit path.
pub trait FrameSource {
    fn is_open(&self) -> bool;
    /// `Ok(None)` signals end-of-stream.
    fn read_next(&mut self) -> Result<Option<Frame>>;
    fn frame_count(&self) -> u64;
    fn frame_rate(&self) -> f64;
    fn release(&mut self) -> Result<()>;
}

/// A video file decoded through OpenCV's VideoCapture.
pub struct VideoFileSource {
    cap: VideoCapture,
    fps: f64,
    total_frames: u64,
    width: usize,
    height: usize,
    open: bool,
}

impl VideoFileSource {
    pub fn open(path: &Path) -> Result<Self> {
        info!("Opening video: {}", path.display());

        let cap = VideoCapture::from_file(
            path.to_str().unwrap_or_default(),
            videoio::CAP_ANY,
        )?;

        if !cap.is_opened()? {
            anyhow::bail!("failed to open video file {}", path.display());
        }

        let fps = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FPS)?;
        let total_frames =
            VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_COUNT)?.max(0.0) as u64;
        let width = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_WIDTH)? as usize;
        let height = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_HEIGHT)? as usize;

        info!(
            "Video properties: {}x{} @ {:.1} FPS, {} frames",
            width, height, fps, total_frames
        );

        Ok(Self {
            cap,
            fps,
            total_frames,
            width,
            height,
            open: true,
        })
    }
}

impl FrameSource for VideoFileSource {
    fn is_open(&self) -> bool {
        self.open
    }

    fn read_next(&mut self) -> Result<Option<Frame>> {
        let mut mat = Mat::default();

        if !VideoCaptureTrait::read(&mut self.cap, &mut mat)? || mat.empty() {
            return Ok(None);
        }

        let data = mat.data_bytes()?.to_vec();

        Ok(Some(Frame {
            data,
            width: self.width,
            height: self.height,
        }))
    }

    fn frame_count(&self) -> u64 {
        self.total_frames
    }

    fn frame_rate(&self) -> f64 {
        self.fps
    }

    fn release(&mut self) -> Result<()> {
        if self.open {
            VideoCaptureTrait::release(&mut self.cap)?;
            self.open = false;
        }
        Ok(())
    }
}

/// Recursively collect video files under `input_dir`.
pub fn find_video_files(input_dir: &str) -> Result<Vec<PathBuf>> {
    let video_extensions = ["mp4", "avi", "mov", "mkv"];

    let mut videos = Vec::new();
    for entry in WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if video_extensions.contains(&ext.to_ascii_lowercase().as_str()) {
                videos.push(path.to_path_buf());
            }
        }
    }
    videos.sort();

    info!("Found {} video files", videos.len());
    Ok(videos)
}
