use scrollreel_core::FrameIndex;

/// Quantise scroll progress in [0, 1] to a frame index.
///
/// Out-of-range progress is clamped and a non-finite value is treated as 0.
/// Returns `None` for an empty sequence.
pub fn progress_to_frame(progress: f64, frame_count: usize) -> Option<FrameIndex> {
    if frame_count == 0 {
        return None;
    }
    let progress = if progress.is_finite() { progress } else { 0.0 };
    let last = (frame_count - 1) as f64;
    let target = (progress * last).round();
    FrameIndex::clamp_signed(target as i64, frame_count)
}

/// Normalise a host-supplied progress value into [0, 1].
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
