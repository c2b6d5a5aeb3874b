// src/main.rs

use anyhow::{Context, Result};
use object_tracker::{
    find_video_files, run_session, CancelToken, Config, ResultStore, SessionError, SessionRequest,
    SessionResult, VideoFileSource,
};
use std::path::Path;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let config = Config::load("config.yaml")?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("object_tracker={}", config.logging.level))
        .init();

    info!("🎯 Object Tracking System Starting");
    info!(
        "Tracker: {} | Target rate: {} fps",
        config.tracker.tracker_type, config.video.target_fps
    );

    let video_files = find_video_files(&config.video.input_dir)?;
    if video_files.is_empty() {
        error!("No video files found in {}", config.video.input_dir);
        return Ok(());
    }

    std::fs::create_dir_all(&config.video.output_dir)?;

    let store = ResultStore::new();
    let request = SessionRequest::new(
        config.video.target_fps,
        &config.tracker.tracker_type,
        config.tracker.initial_box.clone(),
    );
    let cancel = CancelToken::new();

    for (idx, video_path) in video_files.iter().enumerate() {
        info!(
            "Processing video {}/{}: {}",
            idx + 1,
            video_files.len(),
            video_path.display()
        );

        match process_video(video_path, &request, &cancel) {
            Ok(result) => {
                info!(
                    "✓ {}: {} observations over {:.1}s of video ({:.1} sampled frames/s)",
                    result.source_id,
                    result.observations.len(),
                    result.source_duration_seconds,
                    result.achieved_sample_rate
                );

                if let Err(e) = write_result(&config.video.output_dir, &result) {
                    warn!("Failed to write result for {}: {:#}", result.source_id, e);
                }
                store.insert(result);
            }
            Err(SessionError::Cancelled { sampled_frames }) => {
                warn!("Cancelled after {} sampled frames, stopping", sampled_frames);
                break;
            }
            Err(e) => {
                error!("Failed to process {}: {:#}", video_path.display(), e);
            }
        }
    }

    info!("Done: {} result(s) cached", store.len());
    Ok(())
}

fn process_video(
    path: &Path,
    request: &SessionRequest,
    cancel: &CancelToken,
) -> Result<SessionResult, SessionError> {
    let mut source = VideoFileSource::open(path)
        .map_err(|e| SessionError::SourceUnreadable(format!("{:#}", e)))?;
    let source_id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video")
        .to_string();

    run_session(&mut source, &source_id, request, cancel)
}

fn write_result(output_dir: &str, result: &SessionResult) -> Result<()> {
    let path = Path::new(output_dir).join(format!("{}.json", result.source_id));
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("Result written to {}", path.display());
    Ok(())
}
