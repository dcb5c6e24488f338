//! Lexical analyzer of BMS format.
//!
//! Raw [`str`] == [`TokenStream::parse_lex`] ==> [`TokenStream`] (in [`LexOutput`]) ==
//! [`crate::bms::model::Bms::from_token_stream`] ==> [`crate::bms::model::Bms`]
//!
//! The analysis is line based. Lines which do not start with `#` are comments and skipped, a line
//! like `#XXXYY:ZZ...` is a [`Token::Message`], and every other `#` line is a [`Token::Header`] or
//! a control flow token.

mod cursor;
pub mod token;

use std::borrow::Cow;

use thiserror::Error;

use crate::bms::command::{
    channel::read_channel,
    mixin::{SourceRangeMixin, SourceRangeMixinExt},
    time::Track,
};

use self::{
    cursor::Cursor,
    token::{Token, TokenWithRange},
};

/// A warning occurred when lexical analysis. The line which caused it is dropped.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LexWarning {
    /// The token was expected but not found.
    #[error("expected {message}, but not found")]
    ExpectedToken {
        /// What the expected is.
        message: String,
    },
    /// The track number of a message was not a decimal number.
    #[error("track `{track}` is not a number in [000-999]")]
    InvalidTrack {
        /// The track text that was not recognized.
        track: String,
    },
    /// The channel was not recognized.
    #[error("channel `{channel}` not recognized")]
    UnknownChannel {
        /// The channel that was not recognized.
        channel: String,
    },
}

/// A [`LexWarning`] with the range of the line which caused it.
pub type LexWarningWithRange = SourceRangeMixin<LexWarning>;

/// type alias of core::result::Result<T, LexWarningWithRange>
pub(crate) type Result<T> = core::result::Result<T, LexWarningWithRange>;

/// A sequence of the tokens of BMS format, in the order of the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TokenStream<'a> {
    /// The tokens.
    pub tokens: Vec<TokenWithRange<'a>>,
}

/// Lex Parsing Results, includes tokens and warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[must_use]
pub struct LexOutput<'a> {
    /// tokens
    pub tokens: TokenStream<'a>,
    /// warnings
    pub lex_warnings: Vec<LexWarningWithRange>,
}

impl<'a> TokenStream<'a> {
    /// Analyzes and converts the BMS format text into [`TokenStream`].
    pub fn parse_lex(source: &'a str) -> LexOutput<'a> {
        let mut cursor = Cursor::new(source);
        let mut tokens = vec![];
        let mut lex_warnings = vec![];
        while !cursor.is_end() {
            let line_number = cursor.line();
            let Some((range, line)) = cursor.next_line() else {
                break;
            };
            match lex_line(range, line) {
                Ok(Some(token)) => tokens.push(token),
                Ok(None) => {}
                Err(warning) => {
                    log::debug!("line {line_number} dropped: {}", warning.content());
                    lex_warnings.push(warning);
                }
            }
        }
        LexOutput {
            tokens: Self { tokens },
            lex_warnings,
        }
    }

    /// Returns an iterator over the tokens.
    pub fn iter(&self) -> std::slice::Iter<'_, TokenWithRange<'a>> {
        self.tokens.iter()
    }
}

impl<'a> IntoIterator for TokenStream<'a> {
    type Item = TokenWithRange<'a>;
    type IntoIter = std::vec::IntoIter<TokenWithRange<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'t, 'a> IntoIterator for &'t TokenStream<'a> {
    type Item = &'t TokenWithRange<'a>;
    type IntoIter = std::slice::Iter<'t, TokenWithRange<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

fn lex_line(range: std::ops::Range<usize>, line: &str) -> Result<Option<TokenWithRange<'_>>> {
    let leading = line.len() - line.trim_start().len();
    let line = line.trim();
    let range = range.start + leading..range.start + leading + line.len();
    if !line.starts_with('#') {
        return Ok(None);
    }
    if line.as_bytes().get(6) == Some(&b':') {
        return lex_message(line, range.clone()).map(|token| Some(token.into_wrapper_range(range)));
    }

    let (command, args) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(command, args)| (command, args.trim()));
    let name = command.trim_start_matches('#');
    let expect_integer = |what: &str| -> Result<u64> {
        args.split_whitespace()
            .next()
            .and_then(|arg| arg.parse().ok())
            .ok_or_else(|| {
                LexWarning::ExpectedToken {
                    message: format!("{what} integer"),
                }
                .into_wrapper_range(range.clone())
            })
    };
    let token = match name.to_ascii_uppercase().as_str() {
        "RANDOM" => Token::Random(expect_integer("random max")?),
        "IF" => Token::If(expect_integer("random target")?),
        "ENDIF" | "END" => Token::EndIf,
        "ENDRANDOM" => Token::EndRandom,
        upper => Token::Header {
            name: if upper == name {
                Cow::Borrowed(name)
            } else {
                Cow::Owned(upper.to_owned())
            },
            args,
        },
    };
    Ok(Some(token.into_wrapper_range(range)))
}

fn lex_message(line: &str, range: std::ops::Range<usize>) -> Result<Token<'_>> {
    let track_str = line.get(1..4).unwrap_or_default();
    let track = track_str
        .parse::<u64>()
        .ok()
        .filter(|_| track_str.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| {
            LexWarning::InvalidTrack {
                track: track_str.to_owned(),
            }
            .into_wrapper_range(range.clone())
        })?;
    let channel_str = line.get(4..6).unwrap_or_default();
    let channel = read_channel(channel_str).ok_or_else(|| {
        LexWarning::UnknownChannel {
            channel: channel_str.to_owned(),
        }
        .into_wrapper_range(range.clone())
    })?;
    let message = line.get(7..).unwrap_or_default().trim();
    let message = if message.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(message.to_ascii_lowercase())
    } else {
        Cow::Borrowed(message)
    };
    Ok(Token::Message {
        track: Track(track),
        channel,
        message,
    })
}
