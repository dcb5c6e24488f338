//! Synthesis of the timing points of a track.

use super::{
    duration::{
        lead_in_duration, segment_at, segment_duration, stop_duration, total_stop_offset,
        track_duration,
    },
    track::TrackRecord,
    types::TimingPoint,
};

/// Returns the timing points of a track starting at `start_time` with `start_bpm`.
///
/// Every tempo change gives a point with its signed BPM. Every stop gives a point of BPM `0` at
/// its start and a point resuming the BPM of its segment at its end. The points are in emission
/// order, tempo changes first, so inserting them in order lets a stop overwrite a tempo change at
/// the same time. A track with neither tempo changes nor stops gives no points.
#[must_use]
pub fn synthesize(start_time: f64, start_bpm: f64, track: &TrackRecord) -> Vec<TimingPoint> {
    let changes = &track.tempo_changes;
    let mut points = Vec::with_capacity(changes.len() + track.stops.len() * 2);

    // Elapsed time at the start of each segment, without stops.
    let mut segment_starts = Vec::with_capacity(changes.len());
    let mut elapsed = lead_in_duration(start_bpm, track);
    for (i, change) in changes.iter().enumerate() {
        segment_starts.push(elapsed);
        points.push(TimingPoint {
            time: start_time + elapsed + total_stop_offset(start_bpm, change.position, track),
            bpm: change.signed_bpm(),
        });
        elapsed += segment_duration(i, track);
    }

    for stop in &track.stops {
        let (segment_start, segment_position, bpm, signed_bpm) =
            match segment_at(changes, stop.position) {
                Some(i) => (
                    segment_starts[i],
                    changes[i].position,
                    changes[i].bpm,
                    changes[i].signed_bpm(),
                ),
                None => (0.0, 0.0, start_bpm.abs(), start_bpm),
            };
        let stop_start = start_time
            + segment_start
            + total_stop_offset(start_bpm, stop.position, track)
            + track_duration(bpm, track.measure_scale) * (stop.position - segment_position);
        points.push(TimingPoint {
            time: stop_start,
            bpm: 0.0,
        });
        points.push(TimingPoint {
            time: stop_start + stop_duration(bpm, stop.units),
            bpm: signed_bpm,
        });
    }

    points
}
