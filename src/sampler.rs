// src/sampler.rs
//
// Frame sampling arithmetic. Given a source frame rate and a caller's
// target rate, every `sample_interval`-th decoded frame is fed to the
// tracker; the rest are decoded and dropped.

/// Number of decoded frames between consecutive sampled frames.
///
/// `max(1, floor(source_fps / target_fps))` — a target at or above the
/// source rate degrades to sampling every frame. Callers must ensure
/// `source_fps > 0` before asking; the session treats a non-positive
/// rate as an unreadable source.
pub fn sample_interval(source_fps: f64, target_fps: u32) -> u64 {
    let interval = (source_fps / target_fps as f64).floor() as u64;
    interval.max(1)
}

/// Whether the zero-based frame index is selected by the interval rule.
/// Index 0 is always sampled.
pub fn is_sampled(frame_index: u64, interval: u64) -> bool {
    frame_index % interval == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_30fps_target_2() {
        assert_eq!(sample_interval(30.0, 2), 15);
    }

    #[test]
    fn test_interval_floors_fractional_ratio() {
        // 29.97 / 2 = 14.985 -> 14
        assert_eq!(sample_interval(29.97, 2), 14);
    }

    #[test]
    fn test_interval_never_below_one() {
        assert_eq!(sample_interval(10.0, 10), 1);
        assert_eq!(sample_interval(10.0, 60), 1);
        assert_eq!(sample_interval(0.5, 1), 1);
    }

    #[test]
    fn test_frame_zero_always_sampled() {
        for interval in [1, 7, 15, 1000] {
            assert!(is_sampled(0, interval));
        }
    }

    #[test]
    fn test_sampled_indices_30fps_target_2() {
        let interval = sample_interval(30.0, 2);
        let sampled: Vec<u64> = (0..60).filter(|&i| is_sampled(i, interval)).collect();
        assert_eq!(sampled, vec![0, 15, 30, 45]);
    }
}
