//! The chart accumulator, which threads time and tempo across the tracks of a chart.

use crate::bms::{
    command::{
        ObjId,
        channel::{Channel, Key, NoteKind, PlayerSide},
        time::{ObjTime, Track},
    },
    model::Bms,
};

use super::{
    ConvertError, ConvertWarning,
    duration::total_track_duration,
    long_note::{LongNoteStep, LongNoteTracker},
    offset::note_offset,
    options::ConvertOptions,
    timing_points::synthesize,
    track::{TrackRecord, objects},
    types::{
        BgaFrame, BgaLayer, HitObject, KeySound, Lane, LaneObjects, SoundEffect, TimingPoint,
        TimingPoints,
    },
};

/// The timeline of a converted chart.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvertOutput {
    /// The tempo in effect from each time.
    pub timing_points: TimingPoints,
    /// The playable objects of each lane.
    pub hit_objects: LaneObjects,
    /// The sounds played regardless of input, in chart order.
    pub sound_effects: Vec<SoundEffect>,
    /// The background animation, sorted by time.
    pub bga_frames: Vec<BgaFrame>,
    /// Objects skipped when converting.
    pub warnings: Vec<ConvertWarning>,
}

/// Converts a [`Bms`] into its timeline.
///
/// One converter exists per conversion, so charts can be converted in parallel as long as each
/// has its own converter.
#[derive(Debug)]
pub struct ChartConverter<'a> {
    bms: &'a Bms,
    options: &'a ConvertOptions,
    /// The time the current track starts at.
    current_time: f64,
    /// The signed BPM the current track starts with.
    current_bpm: f64,
    long_notes: LongNoteTracker,
    output: ConvertOutput,
}

impl<'a> ChartConverter<'a> {
    /// Creates a converter at the start of the chart.
    #[must_use]
    pub fn new(bms: &'a Bms, options: &'a ConvertOptions) -> Self {
        Self {
            bms,
            options,
            current_time: 0.0,
            current_bpm: bms.starting_bpm(),
            long_notes: LongNoteTracker::new(options.min_long_note_ms),
            output: ConvertOutput::default(),
        }
    }

    /// Converts the whole chart.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if any track is malformed or the chart is not a single play chart
    /// of up to 7 keys and a scratch. No partial timeline is returned.
    pub fn convert(bms: &'a Bms, options: &'a ConvertOptions) -> Result<ConvertOutput, ConvertError> {
        let mut converter = Self::new(bms, options);
        converter.output.timing_points.insert(TimingPoint {
            time: 0.0,
            bpm: converter.current_bpm,
        });
        if let Some(last) = bms.last_track() {
            for track in 0..=last.0 {
                converter.convert_track(Track(track))?;
            }
        }
        Ok(converter.finish())
    }

    fn finish(mut self) -> ConvertOutput {
        for warning in self.long_notes.finish() {
            log::debug!("{warning}");
            self.output.warnings.push(warning);
        }
        self.output
            .bga_frames
            .sort_by(|a, b| a.time.total_cmp(&b.time));
        self.output
    }

    fn warn(&mut self, warning: ConvertWarning) {
        log::debug!("{warning}");
        self.output.warnings.push(warning);
    }

    fn convert_track(&mut self, track: Track) -> Result<(), ConvertError> {
        let bms = self.bms;
        let lines = bms.lines(track);
        let record = TrackRecord::build(track, lines, &bms.defs, &mut self.output.warnings)?;
        let start_bpm = self.current_bpm;
        let duration = total_track_duration(start_bpm, &record);
        let end_time = self.current_time + duration;
        if !end_time.is_finite() {
            return Err(ConvertError::NonFiniteDuration { track });
        }

        let mut events: Vec<(ObjTime, Channel, ObjId)> = vec![];
        for line in lines
            .iter()
            .filter(|line| line.message.chars().count() % 2 == 0 && is_placed(line.channel))
        {
            for (time, id) in objects(track, line, &mut self.output.warnings) {
                events.push((time, line.channel, id));
            }
        }
        events.sort_by_key(|(time, _, _)| *time);
        for (time, channel, id) in events {
            let at = self.current_time + note_offset(start_bpm, time.fraction(), &record);
            self.place(track, at, channel, id)?;
        }

        if !self.options.no_timing_points {
            for point in synthesize(self.current_time, start_bpm, &record) {
                self.output.timing_points.insert(point);
            }
        }
        if let Some(last) = record.tempo_changes.last() {
            self.current_bpm = last.signed_bpm();
        }
        self.current_time = end_time;
        if !self.options.no_timing_points && !self.options.no_measure_lines {
            self.output.timing_points.insert(TimingPoint {
                time: self.current_time,
                bpm: self.current_bpm,
            });
        }
        Ok(())
    }

    fn key_sound(&self, id: ObjId) -> Option<KeySound> {
        self.bms.defs.sample_of(id).map(|sample| KeySound {
            sample,
            volume: self.options.clamped_volume(),
        })
    }

    fn place(&mut self, track: Track, at: f64, channel: Channel, id: ObjId) -> Result<(), ConvertError> {
        match channel {
            Channel::Bgm => match self.key_sound(id) {
                Some(sound) => self.output.sound_effects.push(SoundEffect {
                    time: at,
                    sample: sound.sample,
                    volume: sound.volume,
                }),
                None => self.warn(ConvertWarning::MissingKeySound { track, id }),
            },
            Channel::BgaBase | Channel::BgaLayer if !self.options.no_storyboard => {
                let layer = if channel == Channel::BgaBase {
                    BgaLayer::Back
                } else {
                    BgaLayer::Front
                };
                let bms = self.bms;
                match bms.defs.bmp.get(&id) {
                    Some(file) => self.output.bga_frames.push(BgaFrame {
                        time: at,
                        file: file.clone(),
                        layer,
                    }),
                    None => self.warn(ConvertWarning::UnknownBga { track, id }),
                }
            }
            Channel::Note { kind, side, key } if kind.is_playable() => {
                if side == PlayerSide::Player2 {
                    return Err(ConvertError::PlayerTwoChannel { track, channel });
                }
                self.place_note(track, at, kind, key, id)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn place_note(
        &mut self,
        track: Track,
        at: f64,
        kind: NoteKind,
        key: Key,
        id: ObjId,
    ) -> Result<(), ConvertError> {
        let is_terminator = !kind.is_long() && self.bms.header.ln_obj == Some(id);
        let key_sound = self.key_sound(id);
        let Some(lane) = self.lane_of(track, key)? else {
            if let (false, Some(sound)) = (is_terminator, key_sound) {
                self.output.sound_effects.push(SoundEffect {
                    time: at,
                    sample: sound.sample,
                    volume: sound.volume,
                });
            }
            return Ok(());
        };

        if is_terminator {
            if let Err(warning) = self
                .long_notes
                .terminate(&mut self.output.hit_objects, lane, at)
            {
                self.warn(warning);
            }
            return Ok(());
        }
        if !kind.is_long() {
            self.output
                .hit_objects
                .push(HitObject::note(lane, at, key_sound));
            return Ok(());
        }
        match self.long_notes.toggle(lane, at, key_sound) {
            LongNoteStep::Opened => {}
            LongNoteStep::Closed(object) => self.output.hit_objects.push(object),
            LongNoteStep::Discarded(warning) => self.warn(warning),
        }
        Ok(())
    }

    /// Maps a key of BEAT 7K layout to its lane. `None` means the key is played as a sound
    /// effect.
    fn lane_of(&self, track: Track, key: Key) -> Result<Option<Lane>, ConvertError> {
        match key {
            Key::SCRATCH if self.options.no_scratch_lane => Ok(None),
            Key::SCRATCH => Ok(Some(Lane::SCRATCH)),
            Key::FREE_ZONE => Ok(None),
            _ => match key.digit() {
                digit @ 0..=5 => Ok(Lane::new(digit)),
                digit @ (8 | 9) => Ok(Lane::new(digit - 2)),
                _ => Err(ConvertError::TooManyLanes { track, key }),
            },
        }
    }
}

const fn is_placed(channel: Channel) -> bool {
    matches!(
        channel,
        Channel::Bgm | Channel::BgaBase | Channel::BgaLayer | Channel::Note { .. }
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::bms::model::ChannelLine;

    fn id(s: &str) -> ObjId {
        ObjId::try_from(s).unwrap()
    }

    fn note(key: u8, kind: NoteKind) -> Channel {
        Channel::Note {
            kind,
            side: PlayerSide::Player1,
            key: Key::new(key).unwrap(),
        }
    }

    fn chart(bpm: f64, lines: &[(u64, Channel, &str)]) -> Bms {
        let mut bms = Bms::default();
        bms.header.bpm = Some(bpm);
        bms.defs.wav.push((id("01"), "kick.wav".into()));
        for &(track, channel, message) in lines {
            bms.tracks.entry(Track(track)).or_default().push(ChannelLine {
                channel,
                message: message.to_owned(),
            });
        }
        bms
    }

    fn times(objects: &[HitObject]) -> Vec<f64> {
        objects.iter().map(|object| object.start_time).collect()
    }

    #[test]
    fn empty_chart_has_only_starting_point() {
        let output = ChartConverter::convert(&Bms::default(), &ConvertOptions::default()).unwrap();
        assert_eq!(
            output.timing_points.iter().collect::<Vec<_>>(),
            vec![TimingPoint {
                time: 0.0,
                bpm: 130.0
            }]
        );
        assert!(output.hit_objects.is_empty());
    }

    #[test]
    fn lane_mapping() {
        let bms = chart(
            120.0,
            &[
                (0, note(1, NoteKind::Visible), "01"),
                (0, note(6, NoteKind::Visible), "01"),
                (0, note(7, NoteKind::Visible), "01"),
                (0, note(8, NoteKind::Visible), "01"),
                (0, note(9, NoteKind::Visible), "01"),
                (0, note(0, NoteKind::Visible), "01"),
            ],
        );
        let output = ChartConverter::convert(&bms, &ConvertOptions::default()).unwrap();
        for lane in [1, 8, 6, 7, 0] {
            assert_eq!(output.hit_objects.lane(Lane::new(lane).unwrap()).len(), 1);
        }
        assert_eq!(output.hit_objects.len(), 5);
        assert_eq!(output.sound_effects.len(), 1);

        let output = ChartConverter::convert(
            &bms,
            &ConvertOptions::default().with_no_scratch_lane(true),
        )
        .unwrap();
        assert!(output.hit_objects.lane(Lane::SCRATCH).is_empty());
        assert_eq!(output.sound_effects.len(), 2);
    }

    #[test]
    fn unsupported_layouts_are_fatal() {
        let bms = chart(120.0, &[(0, note(10, NoteKind::Visible), "01")]);
        assert_eq!(
            ChartConverter::convert(&bms, &ConvertOptions::default()),
            Err(ConvertError::TooManyLanes {
                track: Track(0),
                key: Key::new(10).unwrap()
            })
        );

        let p2 = Channel::Note {
            kind: NoteKind::Visible,
            side: PlayerSide::Player2,
            key: Key::new(1).unwrap(),
        };
        let bms = chart(120.0, &[(1, p2, "01")]);
        assert_eq!(
            ChartConverter::convert(&bms, &ConvertOptions::default()),
            Err(ConvertError::PlayerTwoChannel {
                track: Track(1),
                channel: p2
            })
        );
    }

    #[test]
    fn time_carries_across_empty_tracks() {
        let bms = chart(
            120.0,
            &[
                (0, note(1, NoteKind::Visible), "0001"),
                (2, note(1, NoteKind::Visible), "01"),
                (2, Channel::BpmChangeU8, "00f0"),
            ],
        );
        let output = ChartConverter::convert(&bms, &ConvertOptions::default()).unwrap();
        assert_eq!(
            times(output.hit_objects.lane(Lane::new(1).unwrap())),
            vec![1000.0, 4000.0]
        );
        let points: Vec<_> = output.timing_points.iter().collect();
        assert_eq!(
            points,
            vec![
                TimingPoint { time: 0.0, bpm: 120.0 },
                TimingPoint { time: 2000.0, bpm: 120.0 },
                TimingPoint { time: 4000.0, bpm: 120.0 },
                TimingPoint { time: 5000.0, bpm: 240.0 },
                TimingPoint { time: 5500.0, bpm: 240.0 },
            ]
        );
    }

    #[test]
    fn objects_in_a_track_are_ordered_by_position() {
        let mut bms = chart(
            120.0,
            &[
                (0, note(1, NoteKind::Visible), "00000001"),
                (0, note(1, NoteKind::Visible), "01"),
            ],
        );
        bms.header.ln_obj = Some(id("zz"));
        bms.tracks
            .entry(Track(0))
            .or_default()
            .push(ChannelLine {
                channel: note(1, NoteKind::Visible),
                message: "00zz".to_owned(),
            });
        let output = ChartConverter::convert(&bms, &ConvertOptions::default()).unwrap();
        assert_eq!(
            output.hit_objects.lane(Lane::new(1).unwrap()),
            &[
                HitObject::long_note(
                    Lane::new(1).unwrap(),
                    0.0,
                    1000.0,
                    Some(KeySound {
                        sample: 1,
                        volume: 100
                    })
                ),
                HitObject::note(
                    Lane::new(1).unwrap(),
                    1500.0,
                    Some(KeySound {
                        sample: 1,
                        volume: 100
                    })
                ),
            ]
        );
    }

    #[test]
    fn skips_and_options() {
        let mut bms = chart(
            120.0,
            &[
                (0, Channel::Bgm, "0102"),
                (0, Channel::BgaLayer, "0a00"),
                (0, Channel::BgaBase, "000b"),
                (0, Channel::BgaBase, "0c0"),
            ],
        );
        bms.defs.bmp.insert(id("0a"), "a.png".into());
        bms.defs.bmp.insert(id("0b"), "b.png".into());
        bms.defs.bmp.insert(id("0c"), "c.png".into());

        let output = ChartConverter::convert(&bms, &ConvertOptions::default().with_volume(60))
            .unwrap();
        assert_eq!(
            output.sound_effects,
            vec![SoundEffect {
                time: 0.0,
                sample: 1,
                volume: 60
            }]
        );
        assert_eq!(
            output.warnings,
            vec![ConvertWarning::MissingKeySound {
                track: Track(0),
                id: id("02")
            }]
        );
        assert_eq!(
            output.bga_frames,
            vec![
                BgaFrame {
                    time: 0.0,
                    file: "a.png".into(),
                    layer: BgaLayer::Front
                },
                BgaFrame {
                    time: 1000.0,
                    file: "b.png".into(),
                    layer: BgaLayer::Back
                },
            ]
        );

        let output = ChartConverter::convert(
            &bms,
            &ConvertOptions::default()
                .with_no_storyboard(true)
                .with_no_timing_points(true),
        )
        .unwrap();
        assert!(output.bga_frames.is_empty());
        assert_eq!(output.timing_points.len(), 1);

        let output = ChartConverter::convert(
            &bms,
            &ConvertOptions::default().with_no_measure_lines(true),
        )
        .unwrap();
        assert_eq!(output.timing_points.len(), 1);
    }
}
