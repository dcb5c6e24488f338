//! The BMS timeline engine.
//!
//! This crate reads a BMS chart and computes, for every measure of it, where things happen in
//! absolute milliseconds: playable notes, long notes, background sounds, background animation
//! frames and the tempo changes a player needs to scroll the chart correctly.
//!
//! The work is split in two modules:
//!
//! - [`bms`] lexes and parses the chart text into a [`bms::model::Bms`] holding the definition
//!   tables (`#BPMxx`, `#STOPxx`, `#BMPxx`, `#WAVxx`) and the channel lines of each track.
//! - [`chart_process`] runs the timing engine over that model: track model building, the duration
//!   engine, timing point synthesis, note offset resolution and the long note state machine.
//!
//! # Example
//!
//! ```
//! use bms_timeline::{bms::convert_bms, chart_process::ConvertOptions};
//!
//! let source = "#BPM 120\n#WAV01 kick.wav\n#00011:01010101\n";
//! let output = convert_bms(source, &ConvertOptions::default()).expect("chart must convert");
//! let lane = output.chart.hit_objects.lane(bms_timeline::chart_process::Lane::new(1).unwrap());
//! assert_eq!(lane.len(), 4);
//! assert_eq!(lane[1].start_time, 500.0);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bms;
pub mod chart_process;
