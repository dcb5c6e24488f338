//! The timing engine of a chart.
//!
//! A chart is converted track by track. For each track, [`track::TrackRecord`] collects its
//! measure scale, tempo changes and stops. [`duration`] computes how long the track lasts,
//! [`timing_points`] emits the tempo the player scrolls with, and [`offset`] places each object of
//! the track in time. [`long_note`] pairs long note heads with their tails across tracks, and
//! [`ChartConverter`] threads the time and the tempo from one track into the next.
//!
//! Every time is in milliseconds from the start of the chart.

mod converter;
pub mod duration;
pub mod long_note;
pub mod offset;
pub mod options;
pub mod prelude;
pub mod timing_points;
pub mod track;
pub mod types;

use thiserror::Error;

use crate::bms::command::{
    ObjId,
    channel::{Channel, Key},
    time::Track,
};

pub use self::{
    converter::{ChartConverter, ConvertOutput},
    options::ConvertOptions,
    types::{
        BgaFrame, BgaLayer, HitObject, KeySound, LANE_COUNT, Lane, LaneObjects, SoundEffect,
        TimingPoint, TimingPoints,
    },
};

/// A fatal problem of the chart found when converting. No timeline is produced.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConvertError {
    /// Channel `02` whose value is not a positive number.
    #[error("{track}: measure scale `{value}` is not a positive number")]
    InvalidMeasureScale {
        /// The track of the channel.
        track: Track,
        /// The given value.
        value: String,
    },
    /// Channel `03` whose object is not a hexadecimal number.
    #[error("{track}: tempo `{value}` is not a hexadecimal number")]
    InvalidTempo {
        /// The track of the channel.
        track: Track,
        /// The given object.
        value: String,
    },
    /// A note on a key which has no lane.
    #[error("{track}: key {key} needs more lanes than 7 keys and a scratch")]
    TooManyLanes {
        /// The track of the note.
        track: Track,
        /// The key of the note.
        key: Key,
    },
    /// A playable note on the player 2 side.
    #[error("{track}: {channel} is on the player 2 side, which is not supported")]
    PlayerTwoChannel {
        /// The track of the note.
        track: Track,
        /// The channel of the note.
        channel: Channel,
    },
    /// The track lasts too long to be represented.
    #[error("{track}: duration is not finite")]
    NonFiniteDuration {
        /// The track.
        track: Track,
    },
}

/// An object skipped when converting. The conversion continues without it.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConvertWarning {
    /// A stop object whose `#STOPxx` is not defined.
    #[error("{track}: #STOP{id} is not defined")]
    UnknownStop {
        /// The track of the object.
        track: Track,
        /// The object id.
        id: ObjId,
    },
    /// A pair of a channel message which is not a base-36 object.
    #[error("{track}: `{value}` on {channel} is not an object")]
    InvalidObject {
        /// The track of the channel.
        track: Track,
        /// The channel of the message.
        channel: Channel,
        /// The given pair.
        value: String,
    },
    /// A BGM object without a key sound.
    #[error("{track}: #WAV{id} is not defined for BGM")]
    MissingKeySound {
        /// The track of the object.
        track: Track,
        /// The object id.
        id: ObjId,
    },
    /// A BGA object whose `#BMPxx` is not defined.
    #[error("{track}: #BMP{id} is not defined")]
    UnknownBga {
        /// The track of the object.
        track: Track,
        /// The object id.
        id: ObjId,
    },
    /// A long note whose tail is not after its head.
    #[error("{lane}: long note tail at {end_time}ms is not after its head at {start_time}ms")]
    LongNoteTailBeforeHead {
        /// The lane of the long note.
        lane: Lane,
        /// The time of the head.
        start_time: f64,
        /// The time of the tail.
        end_time: f64,
    },
    /// A long note shorter than the minimum length.
    #[error("{lane}: long note from {start_time}ms to {end_time}ms is too short")]
    LongNoteTooShort {
        /// The lane of the long note.
        lane: Lane,
        /// The time of the head.
        start_time: f64,
        /// The time of the tail.
        end_time: f64,
    },
    /// An LN terminator in a lane without any object.
    #[error("{lane}: LN terminator at {time}ms has no note to close")]
    UnmatchedTerminator {
        /// The lane of the terminator.
        lane: Lane,
        /// The time of the terminator.
        time: f64,
    },
    /// An LN terminator not after the note it would close.
    #[error("{lane}: LN terminator at {time}ms is not after the note at {start_time}ms")]
    OutOfOrderTerminator {
        /// The lane of the terminator.
        lane: Lane,
        /// The time of the terminator.
        time: f64,
        /// The time of the note.
        start_time: f64,
    },
    /// An LN terminator after a note which is already a long note.
    #[error("{lane}: LN terminator at {time}ms follows a long note")]
    TerminatorAfterLongNote {
        /// The lane of the terminator.
        lane: Lane,
        /// The time of the terminator.
        time: f64,
    },
    /// A long note head never closed until the end of the chart.
    #[error("{lane}: long note from {start_time}ms is never closed")]
    UnclosedLongNote {
        /// The lane of the long note.
        lane: Lane,
        /// The time of the head.
        start_time: f64,
    },
}
