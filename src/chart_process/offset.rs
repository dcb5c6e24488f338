//! Resolution of a position in a track into the time from the track start.

use super::{
    duration::{lead_in_duration, segment_duration, total_stop_offset, track_duration},
    track::TrackRecord,
};

/// Returns the milliseconds from the start of the track to `position`, a fraction in `[0, 1]`.
///
/// Segments are half-open: an object exactly at a tempo change is timed by the segment the change
/// starts. Stops strictly before `position` are added.
#[must_use]
pub fn note_offset(start_bpm: f64, position: f64, track: &TrackRecord) -> f64 {
    let scale = track.measure_scale;
    if track.is_degenerate() {
        return track_duration(start_bpm, scale) * position;
    }
    let changes = &track.tempo_changes;
    let played = match changes.first() {
        None => track_duration(start_bpm, scale) * position,
        Some(first) if position < first.position => track_duration(start_bpm, scale) * position,
        Some(_) => {
            let mut played = lead_in_duration(start_bpm, track);
            for (i, change) in changes.iter().enumerate() {
                let end = changes.get(i + 1).map_or(1.0, |next| next.position);
                if end <= position {
                    played += segment_duration(i, track);
                } else {
                    played += track_duration(change.bpm, scale) * (position - change.position);
                    break;
                }
            }
            played
        }
    };
    played + total_stop_offset(start_bpm, position, track)
}
