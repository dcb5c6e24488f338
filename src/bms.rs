//! The parser module of BMS(.bms/.bme/.bml) file.
//!
//! This module consists of two phases: lexical analyzing and token parsing.
//!
//! `lex` module provides definitions of BMS tokens and a translator from string into them. Only
//! the commands the timeline needs are recognized, the others are kept as raw headers and ignored
//! by the parser.
//!
//! `parse` module builds the [`model::Bms`] from the tokens: the starting tempo, the definition
//! tables and the channel lines of each track.
//!
//! `command` module provides the vocabulary shared by both phases, such as [`command::ObjId`],
//! [`command::channel::Channel`] and [`command::time::ObjTime`].
//!
//! In detail, our policies are:
//!
//! - Support only UTF-8 (as required `String` to input).
//! - Do not support editing BMS source text.
//! - Take the first branch of every `#RANDOM`, so the result is deterministic.
//! - Support only single play charts of up to 7 keys and a scratch.

pub mod command;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod lex;
pub mod model;
pub mod parse;
pub mod prelude;

use thiserror::Error;

use crate::chart_process::{
    ChartConverter, ConvertError, ConvertOptions, ConvertOutput, ConvertWarning,
};

use self::{
    lex::{LexOutput, LexWarningWithRange, TokenStream},
    model::Bms,
    parse::{ParseErrorWithRange, ParseOutput, ParseWarningWithRange},
};

/// A recoverable problem found in any phase. The chart is still produced.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BmsWarning {
    /// A warning comes from lexical analyzer.
    #[error("Warn: lex: {0}")]
    Lex(#[from] LexWarningWithRange),
    /// A warning comes from syntax parser.
    #[error("Warn: parse: {0}")]
    Parse(#[from] ParseWarningWithRange),
    /// A warning comes from the timing engine.
    #[error("Warn: convert: {0}")]
    Convert(#[from] ConvertWarning),
}

/// A fatal problem of the chart. Nothing is produced.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BmsError {
    /// An error comes from syntax parser.
    #[error("Error: parse: {0}")]
    Parse(#[from] ParseErrorWithRange),
    /// An error comes from the timing engine.
    #[error("Error: convert: {0}")]
    Convert(#[from] ConvertError),
}

/// Output of parsing a BMS file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BmsOutput {
    /// The parsed BMS data.
    pub bms: Bms,
    /// Warnings that occurred during parsing, lex ones first.
    pub warnings: Vec<BmsWarning>,
}

/// Output of converting a BMS file into its timeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvertedBms {
    /// The parsed BMS data.
    pub bms: Bms,
    /// The timeline. Its own `warnings` are moved into [`Self::warnings`], so it is left empty.
    pub chart: ConvertOutput,
    /// Warnings of every phase, in the order of lex, parse and convert.
    pub warnings: Vec<BmsWarning>,
}

/// Parse a BMS file from source text.
///
/// # Example
///
/// ```
/// use bms_timeline::bms::{BmsOutput, parse_bms};
///
/// let source = "#TITLE Test Song\n#BPM 120\n#00111:0101";
/// let BmsOutput { bms, warnings } = parse_bms(source).expect("chart must parse");
/// assert_eq!(bms.header.metadata.title.as_deref(), Some("Test Song"));
/// assert_eq!(bms.starting_bpm(), 120.0);
/// assert!(warnings.is_empty());
/// ```
///
/// # Errors
///
/// Returns [`BmsError::Parse`] if a header makes the chart unusable.
pub fn parse_bms(source: &str) -> Result<BmsOutput, BmsError> {
    let LexOutput {
        tokens,
        lex_warnings,
    } = TokenStream::parse_lex(source);
    parse_bms_with_tokens(&tokens, lex_warnings)
}

/// Parse bms file with tokens.
///
/// A step of [`parse_bms`]. `lex_warnings` are placed before the parse warnings in the output.
///
/// # Errors
///
/// Returns [`BmsError::Parse`] if a header makes the chart unusable.
pub fn parse_bms_with_tokens(
    tokens: &TokenStream<'_>,
    lex_warnings: Vec<LexWarningWithRange>,
) -> Result<BmsOutput, BmsError> {
    let ParseOutput {
        bms,
        parse_warnings,
    } = Bms::from_token_stream(tokens)?;

    let mut warnings: Vec<BmsWarning> = lex_warnings.into_iter().map(BmsWarning::Lex).collect();
    warnings.extend(parse_warnings.into_iter().map(BmsWarning::Parse));

    Ok(BmsOutput { bms, warnings })
}

/// Parse a BMS file and convert it into its timeline in one step.
///
/// # Errors
///
/// Returns [`BmsError`] if the chart cannot be parsed or converted.
pub fn convert_bms(source: &str, options: &ConvertOptions) -> Result<ConvertedBms, BmsError> {
    let BmsOutput { bms, mut warnings } = parse_bms(source)?;
    let mut chart = ChartConverter::convert(&bms, options)?;
    warnings.extend(
        std::mem::take(&mut chart.warnings)
            .into_iter()
            .map(BmsWarning::Convert),
    );
    Ok(ConvertedBms {
        bms,
        chart,
        warnings,
    })
}
