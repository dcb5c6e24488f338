//! Prelude module for the BMS crate.
//!
//! This module re-exports all public types from the BMS module for convenient access.
//! You can use `use bms_timeline::bms::prelude::*;` to import all BMS types at once.

#[cfg(feature = "diagnostics")]
pub use super::diagnostics::{SimpleSource, ToAriadne, emit_bms_error, emit_bms_warnings};

pub use super::{
    BmsError, BmsOutput, BmsWarning, ConvertedBms,
    command::{
        ObjId, PlayerMode,
        channel::{Channel, Key, NoteKind, PlayerSide, read_channel},
        mixin::{SourceRangeMixin, SourceRangeMixinExt},
        time::{ObjTime, Track},
    },
    convert_bms,
    lex::{
        LexOutput, LexWarning, LexWarningWithRange, TokenStream,
        token::{Token, TokenWithRange},
    },
    model::{Bms, ChannelLine, DEFAULT_STARTING_BPM, Definitions, Header, Metadata},
    parse::{ParseError, ParseErrorWithRange, ParseOutput, ParseWarning, ParseWarningWithRange},
    parse_bms, parse_bms_with_tokens,
};
