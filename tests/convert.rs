use bms_timeline::{bms::prelude::*, chart_process::prelude::*};
use pretty_assertions::assert_eq;

fn convert(source: &str) -> ConvertedBms {
    convert_bms(source, &ConvertOptions::default()).unwrap()
}

fn lane(index: u8) -> Lane {
    Lane::new(index).unwrap()
}

fn start_times(output: &ConvertedBms, index: u8) -> Vec<f64> {
    output
        .chart
        .hit_objects
        .lane(lane(index))
        .iter()
        .map(|object| object.start_time)
        .collect()
}

fn points(output: &ConvertedBms) -> Vec<(f64, f64)> {
    output
        .chart
        .timing_points
        .iter()
        .map(|point| (point.time, point.bpm))
        .collect()
}

#[test]
fn stop_pauses_the_scroll_and_shifts_later_notes() {
    let output = convert(
        "
#BPM 150
#STOP01 96
#00003:96
#00009:0001
#00011:01010101
",
    );
    assert_eq!(output.warnings, vec![]);
    assert_eq!(
        points(&output),
        vec![(0.0, 150.0), (800.0, 0.0), (1600.0, 150.0), (2400.0, 150.0)]
    );
    // The note on the stop is placed at its start, the note after it is delayed by the stop.
    assert_eq!(start_times(&output, 1), vec![0.0, 400.0, 800.0, 2000.0]);
}

#[test]
fn negative_tempo_keeps_its_sign_across_tracks() {
    let output = convert(
        "
#BPM 120
#BPM01 -60
#00008:0001
#00211:01
",
    );
    assert_eq!(
        points(&output),
        vec![
            (0.0, 120.0),
            (1000.0, -60.0),
            (3000.0, -60.0),
            (7000.0, -60.0),
            (11000.0, -60.0),
        ]
    );
    assert_eq!(start_times(&output, 1), vec![7000.0]);
}

#[test]
fn missing_tempo_definition_stops_time() {
    let output = convert("#BPM 120\n#00008:02\n#00011:0101\n#00111:01\n");
    assert_eq!(start_times(&output, 1), vec![0.0, 0.0, 0.0]);
    assert_eq!(output.chart.timing_points.get(0.0), Some(0.0));
}

#[test]
fn hexadecimal_tempo_skips_zero_pairs() {
    let output = convert("#BPM 120\n#00003:00f0\n#00111:01\n");
    assert_eq!(points(&output), vec![(0.0, 120.0), (1000.0, 240.0), (1500.0, 240.0), (2500.0, 240.0)]);
    assert_eq!(start_times(&output, 1), vec![1500.0]);
}

#[test]
fn measure_scale_shortens_the_track() {
    let output = convert("#BPM 120\n#00002:0.5\n#00011:0101\n#00111:01\n");
    assert_eq!(start_times(&output, 1), vec![0.0, 500.0, 1000.0]);
}

#[test]
fn malformed_tracks_are_fatal() {
    let options = ConvertOptions::default();
    for (source, expected) in [
        (
            "#00002:0\n",
            ConvertError::InvalidMeasureScale {
                track: Track(0),
                value: "0".into(),
            },
        ),
        (
            "#00102:abc\n",
            ConvertError::InvalidMeasureScale {
                track: Track(1),
                value: "abc".into(),
            },
        ),
        (
            "#00003:0g\n",
            ConvertError::InvalidTempo {
                track: Track(0),
                value: "0g".into(),
            },
        ),
    ] {
        assert_eq!(
            convert_bms(source, &options).unwrap_err(),
            BmsError::Convert(expected),
            "{source}"
        );
    }
}

#[test]
fn chart_too_long_to_represent_is_fatal() {
    let options = ConvertOptions::default();
    // One track alone overflows.
    assert_eq!(
        convert_bms("#BPM 1\n#00002:1e305\n", &options).unwrap_err(),
        BmsError::Convert(ConvertError::NonFiniteDuration { track: Track(0) })
    );
    // Each track is finite, but their sum is not.
    assert_eq!(
        convert_bms("#BPM 1\n#00002:7e302\n#00102:7e302\n", &options).unwrap_err(),
        BmsError::Convert(ConvertError::NonFiniteDuration { track: Track(1) })
    );
    assert!(convert_bms("#BPM 1\n#00002:7e302\n", &options).is_ok());
}

#[test]
fn pairs_which_are_not_objects_are_skipped() {
    let output = convert("#BPM 120\n#STOP01 48\n#00011:0!01\n#00008:!!\n#00009:0?01\n");
    assert_eq!(
        output.warnings,
        vec![
            BmsWarning::Convert(ConvertWarning::InvalidObject {
                track: Track(0),
                channel: Channel::BpmChange,
                value: "!!".into(),
            }),
            BmsWarning::Convert(ConvertWarning::InvalidObject {
                track: Track(0),
                channel: Channel::Stop,
                value: "0?".into(),
            }),
            BmsWarning::Convert(ConvertWarning::InvalidObject {
                track: Track(0),
                channel: read_channel("11").unwrap(),
                value: "0!".into(),
            }),
        ]
    );
    assert_eq!(start_times(&output, 1), vec![1000.0]);
    // The stop at the middle of the track is kept.
    assert_eq!(
        points(&output),
        vec![(0.0, 120.0), (1000.0, 0.0), (1500.0, 120.0), (2500.0, 120.0)]
    );
}

#[test]
fn unknown_stop_is_skipped() {
    let output = convert("#BPM 120\n#00009:01\n#00111:01\n");
    assert_eq!(
        output.warnings,
        vec![BmsWarning::Convert(ConvertWarning::UnknownStop {
            track: Track(0),
            id: ObjId::try_from("01").unwrap(),
        })]
    );
    assert_eq!(start_times(&output, 1), vec![2000.0]);
}

#[test]
fn background_sounds_and_animation() {
    let output = convert(
        "
#BPM 120
#WAV01 a.wav
#WAV02 b.wav
#BMP01 back.png
#BMP02 front.png
#00001:0102
#00001:0003
#00007:0002
#00004:01
#00004:0009
",
    );
    assert_eq!(
        output.chart.sound_effects,
        vec![
            SoundEffect {
                time: 0.0,
                sample: 1,
                volume: 100
            },
            SoundEffect {
                time: 1000.0,
                sample: 2,
                volume: 100
            },
        ]
    );
    assert_eq!(
        output.chart.bga_frames,
        vec![
            BgaFrame {
                time: 0.0,
                file: "back.png".into(),
                layer: BgaLayer::Back,
            },
            BgaFrame {
                time: 1000.0,
                file: "front.png".into(),
                layer: BgaLayer::Front,
            },
        ]
    );
    assert_eq!(
        output.warnings,
        vec![
            BmsWarning::Convert(ConvertWarning::MissingKeySound {
                track: Track(0),
                id: ObjId::try_from("03").unwrap(),
            }),
            BmsWarning::Convert(ConvertWarning::UnknownBga {
                track: Track(0),
                id: ObjId::try_from("09").unwrap(),
            }),
        ]
    );
}

#[test]
fn options_change_the_output() {
    const SRC: &str = "
#BPM 120
#WAV01 a.wav
#BMP01 back.png
#00003:78
#00004:01
#00011:01
#00016:01
#00111:01
";
    let options = ConvertOptions::default()
        .with_volume(50)
        .with_no_scratch_lane(true)
        .with_no_storyboard(true)
        .with_no_measure_lines(true);
    let output = convert_bms(SRC, &options).unwrap();
    assert_eq!(
        output.chart.hit_objects.lane(lane(1)),
        &[
            HitObject::note(
                lane(1),
                0.0,
                Some(KeySound {
                    sample: 1,
                    volume: 50
                })
            ),
            HitObject::note(
                lane(1),
                2000.0,
                Some(KeySound {
                    sample: 1,
                    volume: 50
                })
            ),
        ]
    );
    assert!(output.chart.hit_objects.lane(Lane::SCRATCH).is_empty());
    assert_eq!(output.chart.sound_effects.len(), 1);
    assert_eq!(output.chart.bga_frames, vec![]);
    assert_eq!(points(&output), vec![(0.0, 120.0)]);

    let output = convert_bms(SRC, &ConvertOptions::default().with_no_timing_points(true)).unwrap();
    assert_eq!(points(&output), vec![(0.0, 120.0)]);
    assert_eq!(output.chart.hit_objects.lane(Lane::SCRATCH).len(), 1);
}

#[test]
fn only_player_one_playable_notes_make_objects() {
    let output = convert(
        "
#WAV01 a.wav
#00017:01
#00031:01
#000D1:01
#00041:01
",
    );
    assert!(output.chart.hit_objects.is_empty());
    assert_eq!(output.chart.sound_effects.len(), 1);

    for (source, channel) in [("#00021:01\n", "21"), ("#00061:01\n", "61")] {
        assert_eq!(
            convert_bms(source, &ConvertOptions::default()).unwrap_err(),
            BmsError::Convert(ConvertError::PlayerTwoChannel {
                track: Track(0),
                channel: read_channel(channel).unwrap(),
            })
        );
    }
    assert_eq!(
        convert_bms("#0001A:01\n", &ConvertOptions::default()).unwrap_err(),
        BmsError::Convert(ConvertError::TooManyLanes {
            track: Track(0),
            key: Key::new(10).unwrap(),
        })
    );
}

#[test]
fn random_takes_the_first_branch() {
    let output = convert(
        "
#BPM 120
#RANDOM 2
#IF 1
#00011:01
#ENDIF
#IF 2
#00011:0101
#BPM 60
#ENDIF
#ENDRANDOM
",
    );
    assert_eq!(start_times(&output, 1), vec![0.0]);
    assert_eq!(output.bms.starting_bpm(), 120.0);
}
