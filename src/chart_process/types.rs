//! Type definition module

use std::{collections::BTreeMap, path::PathBuf};

use strict_num_extended::NonNegativeF64;

/// The count of playable lanes, including the scratch lane.
pub const LANE_COUNT: usize = 9;

/// A playable column of the chart, `0` to `8`. The lane `8` is the scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane(u8);

impl Lane {
    /// The scratch lane.
    pub const SCRATCH: Self = Self(8);

    /// Creates a lane, or returns `None` if `index` is out of the playable lanes.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < LANE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Returns the index of the lane.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lane {}", self.0)
    }
}

/// A key sound played with an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySound {
    /// The 1-based index of the sample in the `#WAVxx` definition order.
    pub sample: usize,
    /// The volume, from 0 to 100.
    pub volume: u8,
}

/// A playable object of the chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitObject {
    /// The lane of the object.
    pub lane: Lane,
    /// The time to hit, in milliseconds from the chart start.
    pub start_time: f64,
    /// The time to release if the object is a long note.
    pub end_time: Option<f64>,
    /// The key sound played when hit.
    pub key_sound: Option<KeySound>,
}

impl HitObject {
    /// Creates a normal note.
    #[must_use]
    pub const fn note(lane: Lane, start_time: f64, key_sound: Option<KeySound>) -> Self {
        Self {
            lane,
            start_time,
            end_time: None,
            key_sound,
        }
    }

    /// Creates a long note.
    #[must_use]
    pub const fn long_note(
        lane: Lane,
        start_time: f64,
        end_time: f64,
        key_sound: Option<KeySound>,
    ) -> Self {
        Self {
            lane,
            start_time,
            end_time: Some(end_time),
            key_sound,
        }
    }

    /// Returns whether the object is a long note.
    #[must_use]
    pub const fn is_long_note(&self) -> bool {
        self.end_time.is_some()
    }
}

/// A sound played at a time regardless of the player's input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundEffect {
    /// The time to play, in milliseconds from the chart start.
    pub time: f64,
    /// The 1-based index of the sample in the `#WAVxx` definition order.
    pub sample: usize,
    /// The volume, from 0 to 100.
    pub volume: u8,
}

/// A layer of the background animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BgaLayer {
    /// The base layer, channel `04`.
    Back,
    /// The overlay layer, channel `07`.
    Front,
}

/// An image of the background animation shown from a time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgaFrame {
    /// The time to show, in milliseconds from the chart start.
    pub time: f64,
    /// The image file from `#BMPxx`.
    pub file: PathBuf,
    /// The layer to show on.
    pub layer: BgaLayer,
}

/// A tempo in effect from an absolute time.
///
/// The BPM is signed: negative means reverse scroll and `0` means the scroll is stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingPoint {
    /// The time in milliseconds from the chart start.
    pub time: f64,
    /// The signed BPM.
    pub bpm: f64,
}

/// Timing points keyed by time. A later insertion at the same time overwrites.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingPoints(BTreeMap<NonNegativeF64, f64>);

impl TimingPoints {
    /// Inserts a point, overwriting a point at the same time.
    ///
    /// # Panics
    ///
    /// Panics if the time is negative or not finite. Times produced by the conversion are
    /// checked before insertion.
    pub fn insert(&mut self, point: TimingPoint) {
        let time = time_key(point.time).expect("time should be finite and non-negative");
        self.0.insert(time, point.bpm);
    }

    /// Returns the BPM of the point exactly at `time`.
    #[must_use]
    pub fn get(&self, time: f64) -> Option<f64> {
        self.0.get(&time_key(time)?).copied()
    }

    /// Returns the BPM in effect at `time`, which is the value of the last point at or before it.
    #[must_use]
    pub fn bpm_at(&self, time: f64) -> Option<f64> {
        self.0.range(..=time_key(time)?).next_back().map(|(_, bpm)| *bpm)
    }

    /// Returns the points in time order.
    pub fn iter(&self) -> impl Iterator<Item = TimingPoint> + '_ {
        self.0.iter().map(|(time, bpm)| TimingPoint {
            time: time.as_f64(),
            bpm: *bpm,
        })
    }

    /// Returns the count of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn time_key(time: f64) -> Option<NonNegativeF64> {
    (time.is_finite() && time >= 0.0).then(|| {
        // `abs` turns -0.0 into 0.0.
        NonNegativeF64::new(time.abs()).expect("time should be finite and non-negative")
    })
}

/// Hit objects of every lane, each lane in the order of the chart.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneObjects([Vec<HitObject>; LANE_COUNT]);

impl LaneObjects {
    /// Returns the objects of the lane.
    #[must_use]
    pub fn lane(&self, lane: Lane) -> &[HitObject] {
        &self.0[lane.index()]
    }

    pub(crate) fn lane_mut(&mut self, lane: Lane) -> &mut Vec<HitObject> {
        &mut self.0[lane.index()]
    }

    /// Appends an object to the end of its lane.
    pub fn push(&mut self, object: HitObject) {
        self.lane_mut(object.lane).push(object);
    }

    /// Returns all the objects, lane by lane.
    pub fn iter(&self) -> impl Iterator<Item = &HitObject> {
        self.0.iter().flatten()
    }

    /// Returns the count of all the objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    /// Returns whether there are no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Vec::is_empty)
    }
}
