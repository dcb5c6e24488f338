//! Definitions of the token in BMS format.

use std::borrow::Cow;

use crate::bms::command::{channel::Channel, mixin::SourceRangeMixin, time::Track};

/// A token content of BMS format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub enum Token<'a> {
    /// `#ENDIF` or `#END`. Closes the if scope. See [`Token::If`].
    EndIf,
    /// `#ENDRANDOM`. Closes the random scope. See [`Token::Random`].
    EndRandom,
    /// `#[name] [args]` Other command line starts from `#`.
    Header {
        /// String after `#` and until the first whitespace. It is always uppercase.
        name: Cow<'a, str>,
        /// String after `#name` and whitespaces, trimmed.
        args: &'a str,
    },
    /// `#IF [u64]`. Starts an if scope. Only the scope of `#IF 1` is taken, so every random
    /// scope resolves to its first branch.
    If(u64),
    /// `#XXXYY:ZZ...`. Defines the message which places the object onto the score. `XXX` is the
    /// track, `YY` is the channel, and `ZZ...` is the object id sequence.
    Message {
        /// The track, or measure, where the message is placed.
        track: Track,
        /// The channel which gives the meaning of the message.
        channel: Channel,
        /// The message to the channel, trimmed and lowercased.
        message: Cow<'a, str>,
    },
    /// `#RANDOM [u64]`. Starts a random scope. It has no effect other than being accepted.
    Random(u64),
}

/// A token with position information.
pub type TokenWithRange<'a> = SourceRangeMixin<Token<'a>>;

impl Token<'static> {
    /// Creates a [`Token::Header`] token with string literals.
    #[must_use]
    pub const fn header(name: &'static str, args: &'static str) -> Self {
        Self::Header {
            name: Cow::Borrowed(name),
            args,
        }
    }
}

impl Token<'_> {
    /// Checks if a token is a control flow token.
    #[must_use]
    pub const fn is_control_flow_token(&self) -> bool {
        matches!(
            self,
            Token::If(_) | Token::EndIf | Token::Random(_) | Token::EndRandom
        )
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::EndIf => write!(f, "#ENDIF"),
            Token::EndRandom => write!(f, "#ENDRANDOM"),
            Token::Header { name, args } => {
                if args.is_empty() {
                    write!(f, "#{name}")
                } else {
                    write!(f, "#{name} {args}")
                }
            }
            Token::If(value) => write!(f, "#IF {value}"),
            Token::Message {
                track,
                channel,
                message,
            } => write!(f, "{track} {channel}: {message}"),
            Token::Random(value) => write!(f, "#RANDOM {value}"),
        }
    }
}
