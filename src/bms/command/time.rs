//! Definitions of time in BMS.

use num::rational::Ratio;

/// A track, or measure, or bar, in the score. Scores start at the track `000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track(pub u64);

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:03}", self.0)
    }
}

/// A time of the object on the score, as an exact fraction of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjTime {
    /// The track, or measure, where the object is in.
    pub track: Track,
    /// The offset in the track, in `[0, 1)`.
    position: Ratio<u64>,
}

impl ObjTime {
    /// Create a new time from the `numerator`-th slot of `denominator` slots in the track.
    ///
    /// Returns `None` if `denominator` is 0 or `numerator` is greater than or equal to
    /// `denominator`.
    #[must_use]
    pub fn new(track: u64, numerator: u64, denominator: u64) -> Option<Self> {
        if denominator == 0 || numerator >= denominator {
            return None;
        }
        Some(Self {
            track: Track(track),
            position: Ratio::new(numerator, denominator),
        })
    }

    /// Returns the reduced numerator of the offset in the track.
    #[must_use]
    pub fn numerator(&self) -> u64 {
        *self.position.numer()
    }

    /// Returns the reduced denominator of the offset in the track.
    #[must_use]
    pub fn denominator(&self) -> u64 {
        *self.position.denom()
    }

    /// Returns the offset in the track as a fraction in `[0, 1)`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.numerator() as f64 / self.denominator() as f64
    }
}
