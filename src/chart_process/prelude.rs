//! Chart Process module prelude
//!
//! This module provides re-exports of commonly used types from the `chart_process` module,
//! allowing users to import all needed items in one go.

pub use super::{
    ChartConverter, ConvertError, ConvertOutput, ConvertWarning,
    duration::{
        beat_duration, bpm_at, stop_duration, total_stop_offset, total_track_duration,
        track_duration,
    },
    long_note::{LongNoteStep, LongNoteTracker, OpenLongNote},
    offset::note_offset,
    options::{ConvertOptions, DEFAULT_MIN_LONG_NOTE_MS},
    timing_points::synthesize,
    track::{StopEvent, TempoChange, TrackRecord},
    types::{
        BgaFrame, BgaLayer, HitObject, KeySound, LANE_COUNT, Lane, LaneObjects, SoundEffect,
        TimingPoint, TimingPoints,
    },
};
