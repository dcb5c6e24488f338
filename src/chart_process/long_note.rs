//! The long note state machine.
//!
//! Long notes come in two styles. LN channels (`5x`) pair their objects: the first object of a
//! lane opens a long note and the next one closes it. Charts with `#LNOBJ` instead place a
//! terminator object after a normal note, which turns that note into a long note ending at the
//! terminator. Both run over the whole chart in chart order, so a long note may span tracks.

use super::{
    ConvertWarning,
    types::{HitObject, KeySound, LANE_COUNT, Lane, LaneObjects},
};

/// The head of a long note waiting for its tail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenLongNote {
    /// The time of the head.
    pub start_time: f64,
    /// The key sound of the head.
    pub key_sound: Option<KeySound>,
}

/// The result of feeding an LN channel object to [`LongNoteTracker::toggle`].
#[derive(Debug, Clone, PartialEq)]
pub enum LongNoteStep {
    /// The lane was idle, and the object opened a long note.
    Opened,
    /// The object closed the open long note.
    Closed(HitObject),
    /// The object closed the open long note, but the long note was invalid and dropped.
    Discarded(ConvertWarning),
}

/// Per lane state of long notes for one chart.
#[derive(Debug, Clone)]
pub struct LongNoteTracker {
    open: [Option<OpenLongNote>; LANE_COUNT],
    min_duration: f64,
}

impl LongNoteTracker {
    /// Creates a tracker with every lane idle. Long notes shorter than `min_duration`
    /// milliseconds are dropped.
    #[must_use]
    pub const fn new(min_duration: f64) -> Self {
        Self {
            open: [None; LANE_COUNT],
            min_duration,
        }
    }

    /// Returns the open long note of the lane.
    #[must_use]
    pub const fn open_in(&self, lane: Lane) -> Option<&OpenLongNote> {
        self.open[lane.index()].as_ref()
    }

    /// Feeds an LN channel object at `time` in `lane`.
    pub fn toggle(&mut self, lane: Lane, time: f64, key_sound: Option<KeySound>) -> LongNoteStep {
        let Some(head) = self.open[lane.index()].take() else {
            self.open[lane.index()] = Some(OpenLongNote {
                start_time: time,
                key_sound,
            });
            return LongNoteStep::Opened;
        };
        match self.check(lane, head.start_time, time) {
            Some(warning) => LongNoteStep::Discarded(warning),
            None => LongNoteStep::Closed(HitObject::long_note(
                lane,
                head.start_time,
                time,
                head.key_sound,
            )),
        }
    }

    /// Closes the last object of the lane with a terminator at `time`, turning it into a long note
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns the reason to drop the terminator if the lane has no object, the object is not
    /// strictly before the terminator, the object is already a long note, or the long note would
    /// be too short. The lane is left unchanged then.
    pub fn terminate(
        &self,
        objects: &mut LaneObjects,
        lane: Lane,
        time: f64,
    ) -> Result<(), ConvertWarning> {
        let notes = objects.lane_mut(lane);
        let Some(last) = notes.len().checked_sub(1) else {
            return Err(ConvertWarning::UnmatchedTerminator { lane, time });
        };
        let note = &mut notes[last];
        if note.start_time >= time {
            return Err(ConvertWarning::OutOfOrderTerminator {
                lane,
                time,
                start_time: note.start_time,
            });
        }
        if note.is_long_note() {
            return Err(ConvertWarning::TerminatorAfterLongNote { lane, time });
        }
        if let Some(warning) = self.check(lane, note.start_time, time) {
            return Err(warning);
        }
        note.end_time = Some(time);
        Ok(())
    }

    /// Ends the chart. Every long note still open is dropped and reported.
    #[must_use]
    pub fn finish(self) -> Vec<ConvertWarning> {
        self.open
            .iter()
            .enumerate()
            .filter_map(|(index, open)| {
                let head = open.as_ref()?;
                let lane = Lane::new(u8::try_from(index).ok()?)?;
                Some(ConvertWarning::UnclosedLongNote {
                    lane,
                    start_time: head.start_time,
                })
            })
            .collect()
    }

    fn check(&self, lane: Lane, start_time: f64, end_time: f64) -> Option<ConvertWarning> {
        if end_time <= start_time {
            Some(ConvertWarning::LongNoteTailBeforeHead {
                lane,
                start_time,
                end_time,
            })
        } else if end_time - start_time < self.min_duration {
            Some(ConvertWarning::LongNoteTooShort {
                lane,
                start_time,
                end_time,
            })
        } else {
            None
        }
    }
}
