//! Benchmark for parsing a BMS chart and converting it into its timeline.

use std::{fmt::Write, sync::LazyLock};

use bms_timeline::{
    bms::{convert_bms, model::Bms, parse_bms},
    chart_process::{ChartConverter, ConvertOptions},
};
use criterion::Criterion;

const TRACKS: u64 = 200;

/// A long chart with tempo changes, stops, long notes and BGM in every track.
fn generate_chart() -> String {
    let mut source = String::from(
        "#TITLE bench\n#BPM 150\n#BPM01 75\n#BPM02 -300\n#STOP01 48\n#LNOBJ ZZ\n#WAV01 a.wav\n#WAV02 b.wav\n#BMP01 a.png\n",
    );
    for track in 0..TRACKS {
        writeln!(source, "#{track:03}01:0102010201020102").expect("Failed to write chart");
        writeln!(source, "#{track:03}04:01").expect("Failed to write chart");
        match track % 4 {
            0 => {
                writeln!(source, "#{track:03}08:00010000").expect("Failed to write chart");
            }
            1 => {
                writeln!(source, "#{track:03}03:00b4").expect("Failed to write chart");
                writeln!(source, "#{track:03}09:00000100").expect("Failed to write chart");
            }
            2 => {
                writeln!(source, "#{track:03}02:0.75").expect("Failed to write chart");
            }
            _ => {
                writeln!(source, "#{track:03}08:0200").expect("Failed to write chart");
            }
        }
        for key in ["11", "12", "13", "14", "15", "18", "19"] {
            writeln!(source, "#{track:03}{key}:0101010101010101").expect("Failed to write chart");
        }
        writeln!(source, "#{track:03}16:01zz").expect("Failed to write chart");
        writeln!(source, "#{track:03}53:0100000001000000").expect("Failed to write chart");
    }
    source
}

static SOURCE: LazyLock<String> = LazyLock::new(generate_chart);
static PARSED: LazyLock<Bms> =
    LazyLock::new(|| parse_bms(&SOURCE).expect("Failed to parse BMS").bms);

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_bms");
    let options = ConvertOptions::default();

    group.bench_function("parse", |b| {
        b.iter(|| parse_bms(std::hint::black_box(&SOURCE)));
    });
    group.bench_function("convert", |b| {
        b.iter(|| ChartConverter::convert(std::hint::black_box(&PARSED), &options));
    });
    group.bench_function("parse_and_convert", |b| {
        b.iter(|| convert_bms(std::hint::black_box(&SOURCE), &options));
    });

    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_convert(&mut criterion);
}
