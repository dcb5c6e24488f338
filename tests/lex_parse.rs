use std::path::PathBuf;

use bms_timeline::bms::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn metadata_and_line_endings() {
    let source = "#TITLE Song\r\n#SUBTITLE [Another]\r\n#artist Composer\r\n#SUBARTIST obj:someone\r\n#GENRE Trance\r\n#MAKER me\r\n#PLAYLEVEL 12\r\n#STAGEFILE stage.png\r\n#BANNER banner.png\r\n#BPM 174\r\n";
    let BmsOutput { bms, warnings } = parse_bms(source).unwrap();
    assert_eq!(warnings, vec![]);
    assert_eq!(
        bms.header.metadata,
        Metadata {
            title: Some("Song".into()),
            subtitle: Some("[Another]".into()),
            artist: Some("Composer".into()),
            sub_artists: vec!["obj:someone".into()],
            genre: Some("Trance".into()),
            maker: Some("me".into()),
            play_level: Some("12".into()),
            stage_file: Some(PathBuf::from("stage.png")),
            banner: Some(PathBuf::from("banner.png")),
        }
    );
    assert_eq!(bms.starting_bpm(), 174.0);
}

#[test]
fn default_tempo() {
    let BmsOutput { bms, .. } = parse_bms("#00011:01\n").unwrap();
    assert_eq!(bms.header.bpm, None);
    assert_eq!(bms.starting_bpm(), DEFAULT_STARTING_BPM);
    assert_eq!(bms.last_track(), Some(Track(0)));
}

#[test]
fn messages_are_grouped_by_track() {
    let BmsOutput { bms, warnings } =
        parse_bms("#00211:0A0b\n#00008:ZZ\n#00211:01\n#00101:01\n").unwrap();
    assert_eq!(warnings, vec![]);
    assert_eq!(bms.last_track(), Some(Track(2)));
    assert_eq!(
        bms.lines(Track(2)),
        &[
            ChannelLine {
                channel: read_channel("11").unwrap(),
                message: "0a0b".into(),
            },
            ChannelLine {
                channel: read_channel("11").unwrap(),
                message: "01".into(),
            },
        ]
    );
    assert_eq!(
        bms.lines(Track(0)),
        &[ChannelLine {
            channel: Channel::BpmChange,
            message: "zz".into(),
        }]
    );
    assert!(bms.lines(Track(5)).is_empty());
}

#[test]
fn malformed_lines_are_warned_and_dropped() {
    let source = "#0A011:01\n#000XY:01\n#RANDOM\n#00011:01\n";
    let BmsOutput { bms, warnings } = parse_bms(source).unwrap();
    let contents: Vec<_> = warnings
        .iter()
        .map(|warning| match warning {
            BmsWarning::Lex(warning) => warning.content().clone(),
            other => panic!("unexpected warning {other:?}"),
        })
        .collect();
    assert_eq!(
        contents,
        vec![
            LexWarning::InvalidTrack {
                track: "0A0".into()
            },
            LexWarning::UnknownChannel {
                channel: "XY".into()
            },
            LexWarning::ExpectedToken {
                message: "random max integer".into()
            },
        ]
    );
    assert_eq!(bms.lines(Track(0)).len(), 1);
}

#[test]
fn nested_if_scopes() {
    let source = "
#RANDOM 3
#IF 1
#TITLE taken
#RANDOM 2
#IF 2
#TITLE nested skipped
#ENDIF
#IF 1
#SUBTITLE nested taken
#ENDIF
#ENDRANDOM
#ENDIF
#IF 3
#IF 1
#ARTIST inside skipped
#ENDIF
#GENRE skipped
#ENDIF
#ENDRANDOM
#ENDIF
";
    let BmsOutput { bms, warnings } = parse_bms(source).unwrap();
    let metadata = &bms.header.metadata;
    assert_eq!(metadata.title.as_deref(), Some("taken"));
    assert_eq!(metadata.subtitle.as_deref(), Some("nested taken"));
    assert_eq!(metadata.artist, None);
    assert_eq!(metadata.genre, None);
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        &warnings[0],
        BmsWarning::Parse(warning) if warning.content() == &ParseWarning::UnmatchedEndIf
    ));
}

#[test]
fn definitions_with_bad_values() {
    let source = "#BPM01 fast\n#STOP01 -1\n#STOP02 long\n#WAVXYZ a.wav\n#LNOBJ 123\n";
    let BmsOutput { bms, warnings } = parse_bms(source).unwrap();
    let id = ObjId::try_from("01").unwrap();
    assert_eq!(bms.defs.bpm.get(&id), Some(&0.0));
    assert!(bms.defs.stop.is_empty());
    assert!(bms.defs.wav.is_empty());
    assert_eq!(bms.header.ln_obj, None);
    let contents: Vec<_> = warnings
        .iter()
        .filter_map(|warning| match warning {
            BmsWarning::Parse(warning) => Some(warning.content().clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        contents,
        vec![
            ParseWarning::InvalidBpmDef {
                id: "01".into(),
                value: "fast".into()
            },
            ParseWarning::NegativeStop {
                id: "01".into(),
                value: "-1".into()
            },
            ParseWarning::InvalidStopDef {
                id: "02".into(),
                value: "long".into()
            },
            ParseWarning::InvalidLnObj {
                args: "123".into()
            },
        ]
    );
}

#[test]
fn fatal_headers() {
    for (source, expected) in [
        (
            "#BPM fast\n",
            ParseError::InvalidBpm {
                args: "fast".into(),
            },
        ),
        (
            "#PLAYER 2\n",
            ParseError::UnsupportedPlayer { args: "2".into() },
        ),
    ] {
        let Err(BmsError::Parse(error)) = parse_bms(source) else {
            panic!("{source} must fail");
        };
        assert_eq!(error.content(), &expected);
        assert_eq!(error.range(), 0..source.trim_end().len());
    }
    assert!(parse_bms("#PLAYER 1\n").is_ok());
}
