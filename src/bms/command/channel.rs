//! Definitions of channel command argument data.
//!
//! For documents of channels, please see [BMS command memo](https://hitkey.bms.ms/cmds.htm#CHANNEL-NUMBER).

use super::char_to_base36;

/// The channel, or lane, where the object will be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Channel {
    /// For the note which will be auto-played. `01`
    Bgm,
    /// For the section length change object. `02`
    SectionLen,
    /// For the bpm change by an [`u8`] hexadecimal integer. `03`
    BpmChangeU8,
    /// The BGA channel. `04`
    BgaBase,
    /// The BGA channel but overlay to [`Channel::BgaBase`] channel. `07`
    BgaLayer,
    /// For the bpm change object, looked up in `#BPMxx`. `08`
    BpmChange,
    /// For the stop object, looked up in `#STOPxx`. `09`
    Stop,
    /// For the note which the user can interact.
    Note {
        /// The kind of the note.
        kind: NoteKind,
        /// The side of the player.
        side: PlayerSide,
        /// The key which corresponds to the note.
        key: Key,
    },
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Channel: ")?;
        match self {
            Self::Bgm => write!(f, "BGM"),
            Self::SectionLen => write!(f, "SECTION_LEN"),
            Self::BpmChangeU8 => write!(f, "BPM_CHANGE_U8"),
            Self::BgaBase => write!(f, "BGA"),
            Self::BgaLayer => write!(f, "BGA_LAYER"),
            Self::BpmChange => write!(f, "BPM_CHANGE"),
            Self::Stop => write!(f, "STOP"),
            Self::Note { kind, side, key } => write!(f, "NOTE {kind:?} {side:?} {key}"),
        }
    }
}

/// A kind of the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteKind {
    /// A normal note can be seen by the user. `1x`/`2x`
    Visible,
    /// A invisible note cannot be played by the user. `3x`/`4x`
    Invisible,
    /// A long-press note (LN), requires the user to hold pressing the key. `5x`/`6x`
    Long,
    /// A landmine note that treated as POOR judgement when pressed. `Dx`/`Ex`
    Landmine,
}

impl NoteKind {
    /// Returns whether the note is a playable.
    #[must_use]
    pub const fn is_playable(self) -> bool {
        matches!(self, Self::Visible | Self::Long)
    }

    /// Returns whether the note is a long-press note.
    #[must_use]
    pub const fn is_long(self) -> bool {
        matches!(self, Self::Long)
    }
}

/// A side of the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerSide {
    /// The player 1 side.
    #[default]
    Player1,
    /// The player 2 side.
    Player2,
}

/// A key of the controller, the second digit of a note channel read as base 36.
///
/// For the BEAT 7K layout `1`-`5` are keys 1-5, `6` is the scratch, `7` is the free zone and
/// `8`/`9` are keys 6 and 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key(u8);

impl Key {
    /// The scratch key, channel `16`.
    pub const SCRATCH: Self = Self(6);
    /// The free zone (foot pedal) key, channel `17`.
    pub const FREE_ZONE: Self = Self(7);

    /// Creates a key from its base-36 digit.
    #[must_use]
    pub const fn new(digit: u8) -> Option<Self> {
        if digit < 36 { Some(Self(digit)) } else { None }
    }

    /// Returns the base-36 digit of the key.
    #[must_use]
    pub const fn digit(self) -> u8 {
        self.0
    }

    fn from_char(ch: char) -> Option<Self> {
        let byte = char_to_base36(ch)?;
        Self::new(super::base36_to_byte(byte))
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ch = char::from_digit(self.0 as u32, 36).unwrap_or('?');
        write!(f, "{ch}")
    }
}

/// Reads a channel from a two-character channel id, case insensitively.
///
/// Returns `None` for channels this crate does not handle.
#[must_use]
pub fn read_channel(channel: &str) -> Option<Channel> {
    let mut chars = channel.chars();
    let [Some(kind), Some(key), None] = [chars.next(), chars.next(), chars.next()] else {
        return None;
    };
    let kind = kind.to_ascii_lowercase();
    let key_char = key.to_ascii_lowercase();
    let note = |kind, side| {
        Key::from_char(key_char).map(|key| Channel::Note { kind, side, key })
    };
    match (kind, key_char) {
        ('0', '1') => Some(Channel::Bgm),
        ('0', '2') => Some(Channel::SectionLen),
        ('0', '3') => Some(Channel::BpmChangeU8),
        ('0', '4') => Some(Channel::BgaBase),
        ('0', '7') => Some(Channel::BgaLayer),
        ('0', '8') => Some(Channel::BpmChange),
        ('0', '9') => Some(Channel::Stop),
        ('1', _) => note(NoteKind::Visible, PlayerSide::Player1),
        ('2', _) => note(NoteKind::Visible, PlayerSide::Player2),
        ('3', _) => note(NoteKind::Invisible, PlayerSide::Player1),
        ('4', _) => note(NoteKind::Invisible, PlayerSide::Player2),
        ('5', _) => note(NoteKind::Long, PlayerSide::Player1),
        ('6', _) => note(NoteKind::Long, PlayerSide::Player2),
        ('d', _) => note(NoteKind::Landmine, PlayerSide::Player1),
        ('e', _) => note(NoteKind::Landmine, PlayerSide::Player2),
        _ => None,
    }
}
