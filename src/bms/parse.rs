//! Parser of the tokens into the [`Bms`] model.
//!
//! Header commands fill the [`crate::bms::model::Header`] and the definition tables, and message
//! tokens are grouped by their track. Commands inside an `#IF` scope whose target is not `1` are
//! skipped with the whole scope, so a chart with `#RANDOM` always takes its first branch.

use std::path::PathBuf;

use thiserror::Error;

use crate::bms::{
    command::{
        ObjId, PlayerMode,
        mixin::{SourceRangeMixin, SourceRangeMixinExt},
    },
    lex::{
        TokenStream,
        token::{Token, TokenWithRange},
    },
    model::{Bms, ChannelLine},
};

/// A recoverable problem found when parsing. The command which caused it is skipped, or a
/// substitute value is used as described on each variant.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseWarning {
    /// `#BPMxx` with a value which is not a number. The tempo `0` is defined instead.
    #[error("#BPM{id} value `{value}` is not a number, 0 is used instead")]
    InvalidBpmDef {
        /// The object id being defined.
        id: String,
        /// The given value.
        value: String,
    },
    /// `#STOPxx` with a value which is not a number. The definition is dropped.
    #[error("#STOP{id} value `{value}` is not a number")]
    InvalidStopDef {
        /// The object id being defined.
        id: String,
        /// The given value.
        value: String,
    },
    /// `#STOPxx` with a negative value. The definition is dropped.
    #[error("#STOP{id} value `{value}` is negative")]
    NegativeStop {
        /// The object id being defined.
        id: String,
        /// The given value.
        value: String,
    },
    /// A definition command whose object id is not 2 base-36 characters.
    #[error("object id of `#{command}` is not 2 base-36 characters")]
    InvalidObjId {
        /// The command name.
        command: String,
    },
    /// `#LNOBJ` whose argument is not an object id.
    #[error("#LNOBJ argument `{args}` is not an object id")]
    InvalidLnObj {
        /// The given argument.
        args: String,
    },
    /// `#ENDIF` without an open `#IF`.
    #[error("#ENDIF without #IF")]
    UnmatchedEndIf,
}

/// A [`ParseWarning`] with the range of the line which caused it.
pub type ParseWarningWithRange = SourceRangeMixin<ParseWarning>;

/// A fatal problem of the chart. No chart is produced.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseError {
    /// `#BPM` whose value is not a finite number.
    #[error("#BPM value `{args}` is not a finite number")]
    InvalidBpm {
        /// The given argument.
        args: String,
    },
    /// `#PLAYER` other than `1`. Only single play charts are supported.
    #[error("#PLAYER `{args}` is not supported, only single play is")]
    UnsupportedPlayer {
        /// The given argument.
        args: String,
    },
}

/// A [`ParseError`] with the range of the line which caused it.
pub type ParseErrorWithRange = SourceRangeMixin<ParseError>;

/// Output of parsing tokens.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct ParseOutput {
    /// The parsed chart.
    pub bms: Bms,
    /// Warnings occurred when parsing.
    pub parse_warnings: Vec<ParseWarningWithRange>,
}

/// Tracks nested `#IF` scopes, skipping every scope whose target is not `1`.
#[derive(Debug, Default)]
struct IfScopes {
    /// The count of open scopes being read.
    taken: usize,
    /// The count of open scopes being skipped, including nested ones.
    skipped: usize,
}

impl IfScopes {
    const fn is_skipping(&self) -> bool {
        self.skipped > 0
    }

    fn open(&mut self, target: u64) {
        if self.is_skipping() || target != 1 {
            self.skipped += 1;
        } else {
            self.taken += 1;
        }
    }

    /// Closes the innermost scope. Returns `false` if no scope was open.
    fn close(&mut self) -> bool {
        if self.skipped > 0 {
            self.skipped -= 1;
        } else if self.taken > 0 {
            self.taken -= 1;
        } else {
            return false;
        }
        true
    }
}

impl Bms {
    /// Parses the tokens into a chart.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if a header makes the chart unusable.
    pub fn from_token_stream(tokens: &TokenStream<'_>) -> Result<ParseOutput, ParseErrorWithRange> {
        let mut bms = Self::default();
        let mut parse_warnings = vec![];
        let mut scopes = IfScopes::default();

        for token in tokens {
            match token.content() {
                Token::If(target) => scopes.open(*target),
                Token::EndIf => {
                    if !scopes.close() {
                        parse_warnings.push(ParseWarning::UnmatchedEndIf.into_wrapper(token));
                    }
                }
                _ if scopes.is_skipping() => {}
                Token::Random(_) | Token::EndRandom => {}
                Token::Message {
                    track,
                    channel,
                    message,
                } => bms.tracks.entry(*track).or_default().push(ChannelLine {
                    channel: *channel,
                    message: message.clone().into_owned(),
                }),
                Token::Header { name, args } => {
                    if let Some(warning) = bms.parse_header(name, args, token)? {
                        parse_warnings.push(warning.into_wrapper(token));
                    }
                }
            }
        }

        Ok(ParseOutput {
            bms,
            parse_warnings,
        })
    }

    fn parse_header(
        &mut self,
        name: &str,
        args: &str,
        token: &TokenWithRange<'_>,
    ) -> Result<Option<ParseWarning>, ParseErrorWithRange> {
        let metadata = &mut self.header.metadata;
        match name {
            "BPM" => {
                let bpm = args
                    .parse::<f64>()
                    .ok()
                    .filter(|bpm| bpm.is_finite())
                    .ok_or_else(|| {
                        ParseError::InvalidBpm {
                            args: args.to_owned(),
                        }
                        .into_wrapper(token)
                    })?;
                self.header.bpm = Some(bpm);
            }
            "PLAYER" => match PlayerMode::try_from(args) {
                Ok(PlayerMode::Single) => self.header.player = Some(PlayerMode::Single),
                _ => {
                    return Err(ParseError::UnsupportedPlayer {
                        args: args.to_owned(),
                    }
                    .into_wrapper(token));
                }
            },
            "LNOBJ" => match ObjId::try_from(args) {
                Ok(id) => self.header.ln_obj = Some(id),
                Err(_) => {
                    return Ok(Some(ParseWarning::InvalidLnObj {
                        args: args.to_owned(),
                    }));
                }
            },
            "TITLE" => metadata.title = Some(args.to_owned()),
            "SUBTITLE" => metadata.subtitle = Some(args.to_owned()),
            "ARTIST" => metadata.artist = Some(args.to_owned()),
            "SUBARTIST" => metadata.sub_artists.push(args.to_owned()),
            "GENRE" => metadata.genre = Some(args.to_owned()),
            "MAKER" => metadata.maker = Some(args.to_owned()),
            "PLAYLEVEL" => metadata.play_level = Some(args.to_owned()),
            "STAGEFILE" => metadata.stage_file = Some(PathBuf::from(args)),
            "BANNER" => metadata.banner = Some(PathBuf::from(args)),
            _ => return Ok(self.parse_definition(name, args)),
        }
        Ok(None)
    }

    fn parse_definition(&mut self, name: &str, args: &str) -> Option<ParseWarning> {
        const DEFINITIONS: [&str; 4] = ["BPM", "STOP", "BMP", "WAV"];
        let command = DEFINITIONS
            .into_iter()
            .find(|command| name.len() == command.len() + 2 && name.starts_with(command))?;
        let id_str = &name[command.len()..];
        let Ok(id) = ObjId::try_from(id_str) else {
            return Some(ParseWarning::InvalidObjId {
                command: name.to_owned(),
            });
        };
        match command {
            "BPM" => {
                let bpm = args.parse::<f64>().ok().filter(|bpm| bpm.is_finite());
                self.defs.bpm.insert(id, bpm.unwrap_or(0.0));
                if bpm.is_none() {
                    return Some(ParseWarning::InvalidBpmDef {
                        id: id.to_string(),
                        value: args.to_owned(),
                    });
                }
            }
            "STOP" => match args.parse::<f64>() {
                Ok(units) if units.is_finite() && units >= 0.0 => {
                    self.defs.stop.insert(id, units);
                }
                Ok(units) if units < 0.0 => {
                    return Some(ParseWarning::NegativeStop {
                        id: id.to_string(),
                        value: args.to_owned(),
                    });
                }
                _ => {
                    return Some(ParseWarning::InvalidStopDef {
                        id: id.to_string(),
                        value: args.to_owned(),
                    });
                }
            },
            "BMP" => {
                self.defs.bmp.insert(id, PathBuf::from(args));
            }
            _ => self.defs.wav.push((id, PathBuf::from(args))),
        }
        None
    }
}
