//! Switches of the chart conversion.

/// The default minimum length of a long note in milliseconds.
pub const DEFAULT_MIN_LONG_NOTE_MS: f64 = 2.0;

/// Options of [`super::ChartConverter`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvertOptions {
    /// The volume of every key sound and sound effect, from 0 to 100.
    pub volume: u8,
    /// Whether scratch notes are played as sound effects instead of lane 8.
    pub no_scratch_lane: bool,
    /// Whether to skip all the timing points except the starting one.
    pub no_timing_points: bool,
    /// Whether to skip the timing point at the end of every track.
    pub no_measure_lines: bool,
    /// Whether to skip the background animation.
    pub no_storyboard: bool,
    /// Long notes shorter than this are dropped.
    pub min_long_note_ms: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            volume: 100,
            no_scratch_lane: false,
            no_timing_points: false,
            no_measure_lines: false,
            no_storyboard: false,
            min_long_note_ms: DEFAULT_MIN_LONG_NOTE_MS,
        }
    }
}

impl ConvertOptions {
    /// Sets the volume, clamped to 100.
    #[must_use]
    pub fn with_volume(mut self, volume: u8) -> Self {
        self.volume = volume.min(100);
        self
    }

    /// Sets whether scratch notes become sound effects.
    #[must_use]
    pub const fn with_no_scratch_lane(mut self, no_scratch_lane: bool) -> Self {
        self.no_scratch_lane = no_scratch_lane;
        self
    }

    /// Sets whether to skip the timing points.
    #[must_use]
    pub const fn with_no_timing_points(mut self, no_timing_points: bool) -> Self {
        self.no_timing_points = no_timing_points;
        self
    }

    /// Sets whether to skip the timing point at the end of every track.
    #[must_use]
    pub const fn with_no_measure_lines(mut self, no_measure_lines: bool) -> Self {
        self.no_measure_lines = no_measure_lines;
        self
    }

    /// Sets whether to skip the background animation.
    #[must_use]
    pub const fn with_no_storyboard(mut self, no_storyboard: bool) -> Self {
        self.no_storyboard = no_storyboard;
        self
    }

    /// Sets the minimum length of a long note. Negative values are treated as `0`.
    #[must_use]
    pub fn with_min_long_note_ms(mut self, min_long_note_ms: f64) -> Self {
        self.min_long_note_ms = min_long_note_ms.max(0.0);
        self
    }

    pub(crate) fn clamped_volume(&self) -> u8 {
        self.volume.min(100)
    }
}
