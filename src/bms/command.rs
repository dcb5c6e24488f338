//! Definitions of command argument data.
//!
//! Structures in this module can be used in [Lex](crate::bms::lex) part, [Parse](crate::bms::parse)
//! part, and the output models.

pub mod channel;
pub mod mixin;
pub mod time;

/// A play style of the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerMode {
    /// For single play, a player uses 5 or 7 keys.
    Single,
    /// For couple play, two players use each 5 or 7 keys.
    Two,
    /// For double play, a player uses 10 or 14 keys.
    Double,
}

impl<'a> TryFrom<&'a str> for PlayerMode {
    type Error = &'a str;
    fn try_from(value: &'a str) -> core::result::Result<Self, Self::Error> {
        Ok(match value.trim() {
            "1" => Self::Single,
            "2" => Self::Two,
            "3" => Self::Double,
            _ => return Err(value),
        })
    }
}

impl std::fmt::Display for PlayerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "1"),
            Self::Two => write!(f, "2"),
            Self::Double => write!(f, "3"),
        }
    }
}

pub(crate) const fn char_to_base36(ch: char) -> Option<u8> {
    match ch {
        '0'..='9' | 'a'..='z' => Some(ch as u32 as u8),
        'A'..='Z' => Some(ch.to_ascii_lowercase() as u32 as u8),
        _ => None,
    }
}

pub(crate) const fn base36_to_byte(base36: u8) -> u8 {
    match base36 {
        b'0'..=b'9' => base36 - b'0',
        b'a'..=b'z' => base36 - b'a' + 10,
        _ => 0,
    }
}

/// An object id. Its meaning is determined by the channel belonged to.
///
/// The representation is 2 digits of base-36 ASCII characters. Ids are case insensitive, so they
/// are stored in lowercase.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjId([u8; 2]);

impl std::fmt::Debug for ObjId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ObjId")
            .field(&format!("{}{}", self.0[0] as char, self.0[1] as char))
            .finish()
    }
}

impl std::fmt::Display for ObjId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
    }
}

impl TryFrom<[char; 2]> for ObjId {
    type Error = [char; 2];
    fn try_from(value: [char; 2]) -> core::result::Result<Self, Self::Error> {
        Ok(Self([
            char_to_base36(value[0]).ok_or(value)?,
            char_to_base36(value[1]).ok_or(value)?,
        ]))
    }
}

impl TryFrom<(char, char)> for ObjId {
    type Error = [char; 2];
    fn try_from((ch1, ch2): (char, char)) -> core::result::Result<Self, Self::Error> {
        Self::try_from([ch1, ch2])
    }
}

impl<'a> TryFrom<&'a str> for ObjId {
    type Error = &'a str;
    fn try_from(value: &'a str) -> core::result::Result<Self, Self::Error> {
        let mut chars = value.chars();
        let [Some(ch1), Some(ch2), None] = [chars.next(), chars.next(), chars.next()] else {
            return Err(value);
        };
        Self::try_from([ch1, ch2]).map_err(|_| value)
    }
}

impl From<ObjId> for u16 {
    fn from(value: ObjId) -> Self {
        base36_to_byte(value.0[0]) as u16 * 36 + base36_to_byte(value.0[1]) as u16
    }
}

impl ObjId {
    /// Instances a special null id, which means the rest object.
    #[must_use]
    pub const fn null() -> Self {
        Self([b'0', b'0'])
    }

    /// Returns whether the id is the null id `00`.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0[0] == b'0' && self.0[1] == b'0'
    }

    /// Converts the object id into an `u16` value, reading it as base 36.
    #[must_use]
    pub fn as_u16(self) -> u16 {
        self.into()
    }

    /// Reads the object id as a hexadecimal byte, as channel `03` requires.
    ///
    /// Returns `None` if either digit is out of `0-9a-f`.
    #[must_use]
    pub const fn as_hex_u8(self) -> Option<u8> {
        const fn hex_digit(digit: u8) -> Option<u8> {
            match digit {
                b'0'..=b'9' => Some(digit - b'0'),
                b'a'..=b'f' => Some(digit - b'a' + 10),
                _ => None,
            }
        }
        match (hex_digit(self.0[0]), hex_digit(self.0[1])) {
            (Some(high), Some(low)) => Some(high * 16 + low),
            _ => None,
        }
    }
}

/// Splits a channel message into its hex pairs, one pair per position in the track.
///
/// A trailing odd character is ignored. Each pair comes with its index, and pairs which are not
/// base 36 are returned as `Err` with the raw characters.
pub fn message_pairs(
    message: &str,
) -> impl Iterator<Item = (usize, core::result::Result<ObjId, [char; 2]>)> + '_ {
    use itertools::Itertools;
    message
        .chars()
        .tuples::<(char, char)>()
        .map(ObjId::try_from)
        .enumerate()
}

/// Returns the number of hex pairs in the message, which is the denominator of positions in the
/// track.
#[must_use]
pub fn message_pair_count(message: &str) -> usize {
    message.chars().count() / 2
}
