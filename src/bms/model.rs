//! The BMS chart model produced by the parser.
//!
//! [`Bms`] holds the header commands, the read-only definition tables looked up by object id, and
//! the message lines of every track. The chart conversion only borrows it.

use std::{collections::BTreeMap, collections::HashMap, path::PathBuf};

use crate::bms::command::{ObjId, PlayerMode, channel::Channel, time::Track};

/// The starting BPM of a chart which has no `#BPM` command.
pub const DEFAULT_STARTING_BPM: f64 = 130.0;

/// A parsed BMS chart.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bms {
    /// The header commands.
    pub header: Header,
    /// The definition tables.
    pub defs: Definitions,
    /// The message lines of each track, in the order of the source.
    pub tracks: BTreeMap<Track, Vec<ChannelLine>>,
}

impl Bms {
    /// Returns the BPM the first track starts with.
    #[must_use]
    pub fn starting_bpm(&self) -> f64 {
        self.header.bpm.unwrap_or(DEFAULT_STARTING_BPM)
    }

    /// Returns the last track having any message, or `None` if the chart has no messages.
    #[must_use]
    pub fn last_track(&self) -> Option<Track> {
        self.tracks.keys().next_back().copied()
    }

    /// Returns the message lines of the track. A track without lines is an empty slice.
    #[must_use]
    pub fn lines(&self, track: Track) -> &[ChannelLine] {
        self.tracks.get(&track).map_or(&[], Vec::as_slice)
    }
}

/// The header commands of the chart.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    /// The descriptive metadata.
    pub metadata: Metadata,
    /// The starting BPM by `#BPM`.
    pub bpm: Option<f64>,
    /// The LN terminator object by `#LNOBJ`.
    pub ln_obj: Option<ObjId>,
    /// The play style by `#PLAYER`.
    pub player: Option<PlayerMode>,
}

/// The descriptive metadata of the chart. These take no part in the timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// `#TITLE`
    pub title: Option<String>,
    /// `#SUBTITLE`
    pub subtitle: Option<String>,
    /// `#ARTIST`
    pub artist: Option<String>,
    /// Every `#SUBARTIST`, in the order of the source.
    pub sub_artists: Vec<String>,
    /// `#GENRE`
    pub genre: Option<String>,
    /// `#MAKER`
    pub maker: Option<String>,
    /// `#PLAYLEVEL`
    pub play_level: Option<String>,
    /// `#STAGEFILE`
    pub stage_file: Option<PathBuf>,
    /// `#BANNER`
    pub banner: Option<PathBuf>,
}

/// The definition tables keyed by object id.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Definitions {
    /// `#BPMxx`, the tempo used by channel `08`. May be negative for reverse scroll.
    pub bpm: HashMap<ObjId, f64>,
    /// `#STOPxx`, the pause used by channel `09` in 1/192 whole-note units.
    pub stop: HashMap<ObjId, f64>,
    /// `#BMPxx`, the image used by channels `04` and `07`.
    pub bmp: HashMap<ObjId, PathBuf>,
    /// `#WAVxx`, in the order of definition. The sample index of a key sound is its position in
    /// this list plus one.
    pub wav: Vec<(ObjId, PathBuf)>,
}

impl Definitions {
    /// Returns the sample index of the key sound of `id`. The first definition wins.
    #[must_use]
    pub fn sample_of(&self, id: ObjId) -> Option<usize> {
        self.wav
            .iter()
            .position(|(wav_id, _)| *wav_id == id)
            .map(|index| index + 1)
    }
}

/// A message line `#XXXYY:ZZ...` of a track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelLine {
    /// The channel of the line.
    pub channel: Channel,
    /// The lowercase message.
    pub message: String,
}
