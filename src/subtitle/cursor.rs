use super::caption::Word;

/// Index of the last word whose start is at or before `time`.
///
/// `words` must be ordered by start time, which every parsed chunk is.
/// Returns `None` for an empty range or a time before the first word.
pub fn active_word(words: &[Word], time: f32) -> Option<usize> {
    let idx = words.partition_point(|w| w.start <= time);
    idx.checked_sub(1)
}

/// First sample frame of the analysis window for playback `time`.
pub fn sample_offset(time: f32, sample_rate: u32) -> usize {
    if !time.is_finite() || time <= 0.0 {
        return 0;
    }
    (time as f64 * sample_rate as f64) as usize
}

/// Horizontal pixel of the playhead for a track of `duration` seconds.
pub fn cursor_x(time: f32, duration: f32, width: u32) -> u32 {
    if duration <= 0.0 || width == 0 {
        return 0;
    }
    let ratio = (time / duration).clamp(0.0, 1.0);
    ((width as f32 * ratio) as u32).min(width - 1)
}

/// Playback time a click at pixel `x` seeks to.
pub fn seek_time(x: u32, width: u32, duration: f32) -> f32 {
    if width == 0 || duration <= 0.0 {
        return 0.0;
    }
    let ratio = (x as f32 / width as f32).clamp(0.0, 1.0);
    ratio * duration
}
