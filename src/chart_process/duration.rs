//! Durations of beats, tracks and stops in milliseconds.
//!
//! A BPM passed to these functions may be negative; only its magnitude affects durations. A BPM of
//! `0` has no duration at all instead of an infinite one.

use super::track::{TempoChange, TrackRecord};

/// Returns the length of a quarter note in milliseconds, or `0` if `bpm` is `0`.
#[must_use]
pub fn beat_duration(bpm: f64) -> f64 {
    if bpm == 0.0 { 0.0 } else { 60_000.0 / bpm.abs() }
}

/// Returns the length of a 4/4 measure scaled by `scale`.
#[must_use]
pub fn track_duration(bpm: f64, scale: f64) -> f64 {
    beat_duration(bpm) * 4.0 * scale
}

/// Returns the length of a stop of `units` 1/192 whole notes at `bpm`. Measure scale does not
/// apply to stops.
#[must_use]
pub fn stop_duration(bpm: f64, units: f64) -> f64 {
    track_duration(bpm, 1.0) * units / 192.0
}

/// Finds the tempo change whose segment contains `position`.
///
/// A segment spans from its change up to the next one, so at a boundary the later change is used,
/// and among changes at the same position the last one. Returns `None` before the first change.
#[must_use]
pub fn segment_at(changes: &[TempoChange], position: f64) -> Option<usize> {
    (0..changes.len()).find(|&i| {
        changes[i].position <= position
            && changes.get(i + 1).is_none_or(|next| next.position > position)
    })
}

/// Returns the BPM magnitude in effect at `position`, `initial_bpm` before the first change.
#[must_use]
pub fn bpm_at(initial_bpm: f64, position: f64, changes: &[TempoChange]) -> f64 {
    segment_at(changes, position).map_or(initial_bpm.abs(), |i| changes[i].bpm)
}

/// Returns the total length of the stops strictly before `position`, each at the BPM of its
/// segment.
#[must_use]
pub fn total_stop_offset(initial_bpm: f64, position: f64, track: &TrackRecord) -> f64 {
    track
        .stops
        .iter()
        .filter(|stop| stop.position < position)
        .map(|stop| {
            let bpm = bpm_at(initial_bpm, stop.position, &track.tempo_changes);
            stop_duration(bpm, stop.units)
        })
        .sum()
}

/// Returns the length of the segment started by the `index`-th tempo change, which ends at the
/// next change or the end of the track.
#[must_use]
pub fn segment_duration(index: usize, track: &TrackRecord) -> f64 {
    let changes = &track.tempo_changes;
    let change = &changes[index];
    let end = changes.get(index + 1).map_or(1.0, |next| next.position);
    track_duration(change.bpm, track.measure_scale) * (end - change.position)
}

/// Returns the length of the part before the first tempo change, played at `initial_bpm`.
#[must_use]
pub fn lead_in_duration(initial_bpm: f64, track: &TrackRecord) -> f64 {
    track.tempo_changes.first().map_or(0.0, |first| {
        track_duration(initial_bpm, track.measure_scale) * first.position
    })
}

/// Returns the length of the whole track, including its tempo segments and stops.
#[must_use]
pub fn total_track_duration(initial_bpm: f64, track: &TrackRecord) -> f64 {
    if track.is_degenerate() {
        return track_duration(initial_bpm, track.measure_scale);
    }
    let played = if track.tempo_changes.is_empty() {
        track_duration(initial_bpm, track.measure_scale)
    } else {
        lead_in_duration(initial_bpm, track)
            + (0..track.tempo_changes.len())
                .map(|i| segment_duration(i, track))
                .sum::<f64>()
    };
    played + total_stop_offset(initial_bpm, 1.0, track)
}
