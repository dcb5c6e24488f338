//! The timing data of one track: measure scale, tempo changes and stops.

use itertools::Itertools;

use crate::bms::{
    command::{
        ObjId, message_pair_count, message_pairs,
        channel::Channel,
        time::{ObjTime, Track},
    },
    model::{ChannelLine, Definitions},
};

use super::{ConvertError, ConvertWarning};

/// A tempo change in a track.
///
/// The sign of the tempo is kept apart from its magnitude, so durations use the magnitude while
/// timing points restore the sign for reverse scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoChange {
    /// The offset in the track, in `[0, 1)`.
    pub position: f64,
    /// The magnitude of the BPM.
    pub bpm: f64,
    /// Whether the BPM was negative.
    pub is_negative: bool,
}

impl TempoChange {
    /// Creates a tempo change from a signed BPM.
    #[must_use]
    pub fn new(position: f64, signed_bpm: f64) -> Self {
        Self {
            position,
            bpm: signed_bpm.abs(),
            is_negative: signed_bpm < 0.0,
        }
    }

    /// Returns the BPM with its sign restored.
    #[must_use]
    pub fn signed_bpm(&self) -> f64 {
        if self.is_negative { -self.bpm } else { self.bpm }
    }
}

/// A pause of the scroll in a track.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopEvent {
    /// The offset in the track, in `[0, 1)`.
    pub position: f64,
    /// The length in 1/192 whole-note units.
    pub units: f64,
}

/// The timing data of one track. Both sequences are sorted by position. Tempo changes keep the
/// source order of ties, and stops at the same position are merged into one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackRecord {
    /// The length of the track relative to a 4/4 measure.
    pub measure_scale: f64,
    /// The tempo changes.
    pub tempo_changes: Vec<TempoChange>,
    /// The stops.
    pub stops: Vec<StopEvent>,
}

impl Default for TrackRecord {
    fn default() -> Self {
        Self {
            measure_scale: 1.0,
            tempo_changes: vec![],
            stops: vec![],
        }
    }
}

impl TrackRecord {
    /// Returns whether the track has neither tempo changes nor stops.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.tempo_changes.is_empty() && self.stops.is_empty()
    }

    /// Builds the record from the message lines of `track`.
    ///
    /// Unknown `#STOPxx` keys and channel `08`/`09` pairs which are not base 36 are skipped and
    /// reported to `warnings`. A missing `#BPMxx` key is the tempo `0`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the measure scale is not a positive number, or a channel `03`
    /// pair is not hexadecimal.
    pub fn build(
        track: Track,
        lines: &[ChannelLine],
        defs: &Definitions,
        warnings: &mut Vec<ConvertWarning>,
    ) -> Result<Self, ConvertError> {
        let mut record = Self::default();
        for line in lines {
            let message = line.message.as_str();
            match line.channel {
                Channel::SectionLen => {
                    record.measure_scale = message
                        .parse::<f64>()
                        .ok()
                        .filter(|scale| scale.is_finite() && *scale > 0.0)
                        .ok_or_else(|| ConvertError::InvalidMeasureScale {
                            track,
                            value: message.to_owned(),
                        })?;
                }
                Channel::BpmChangeU8 => {
                    let count = message_pair_count(message);
                    for (index, id) in message_pairs(message) {
                        let bpm = match id {
                            Ok(id) => id.as_hex_u8().ok_or_else(|| id.to_string()),
                            Err(chars) => Err(chars.iter().collect()),
                        }
                        .map_err(|value| ConvertError::InvalidTempo { track, value })?;
                        if bpm == 0 {
                            continue;
                        }
                        record.tempo_changes.push(TempoChange::new(
                            index as f64 / count as f64,
                            f64::from(bpm),
                        ));
                    }
                }
                Channel::BpmChange => {
                    for (time, id) in objects(track, line, warnings) {
                        let bpm = defs.bpm.get(&id).copied().unwrap_or(0.0);
                        record
                            .tempo_changes
                            .push(TempoChange::new(time.fraction(), bpm));
                    }
                }
                Channel::Stop => {
                    for (time, id) in objects(track, line, warnings) {
                        let Some(&units) = defs.stop.get(&id) else {
                            log::debug!("{track}: #STOP{id} is not defined, skipped");
                            warnings.push(ConvertWarning::UnknownStop { track, id });
                            continue;
                        };
                        record.stops.push(StopEvent {
                            position: time.fraction(),
                            units,
                        });
                    }
                }
                _ => {}
            }
        }
        record
            .tempo_changes
            .sort_by(|a, b| a.position.total_cmp(&b.position));
        record
            .stops
            .sort_by(|a, b| a.position.total_cmp(&b.position));
        record.stops = record
            .stops
            .into_iter()
            .coalesce(|a, b| {
                if a.position.total_cmp(&b.position).is_eq() {
                    Ok(StopEvent {
                        position: a.position,
                        units: a.units + b.units,
                    })
                } else {
                    Err((a, b))
                }
            })
            .collect();
        Ok(record)
    }
}

/// Returns the non-null objects of a line with their times. Pairs which are not base 36 are
/// skipped and reported to `warnings`.
pub(crate) fn objects(
    track: Track,
    line: &ChannelLine,
    warnings: &mut Vec<ConvertWarning>,
) -> Vec<(ObjTime, ObjId)> {
    let message = line.message.as_str();
    let count = message_pair_count(message) as u64;
    let mut objects = vec![];
    for (index, id) in message_pairs(message) {
        let id = match id {
            Ok(id) if id.is_null() => continue,
            Ok(id) => id,
            Err(chars) => {
                let value: String = chars.iter().collect();
                log::debug!("{track}: `{value}` on {} is not an object, skipped", line.channel);
                warnings.push(ConvertWarning::InvalidObject {
                    track,
                    channel: line.channel,
                    value,
                });
                continue;
            }
        };
        if let Some(time) = ObjTime::new(track.0, index as u64, count) {
            objects.push((time, id));
        }
    }
    objects
}
