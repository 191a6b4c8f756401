use std::time::Duration;

use crate::error::{Error, Result};

use super::state::PointerState;
use super::types::InputCommandKind;

/// One recorded input event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InputCommandRecord {
    pub frame_index: u64,
    /// Time since recording started.
    pub timestamp: Duration,
    pub kind: InputCommandKind,
}

/// Captures input for deterministic replay.
///
/// Records are appended in frame order; the log is never reordered.
#[derive(Debug, Default, Clone)]
pub struct InputRecorder {
    records: Vec<InputCommandRecord>,
}

impl InputRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends an event. A frame index lower than the last recorded one is a
    /// `Usage` error and leaves the log unchanged.
    pub fn record(&mut self, frame_index: u64, timestamp: Duration, kind: InputCommandKind) -> Result<()> {
        if let Some(last) = self.records.last() {
            if frame_index < last.frame_index {
                return Err(Error::usage(format!(
                    "input for frame {frame_index} recorded after frame {}",
                    last.frame_index
                )));
            }
        }
        self.records.push(InputCommandRecord { frame_index, timestamp, kind });
        Ok(())
    }

    pub fn finish(self) -> InputPlayback {
        log::debug!("input recording finished with {} commands", self.records.len());
        InputPlayback { records: self.records }
    }
}

/// Read side of a recording.
#[derive(Debug, Default, Clone)]
pub struct InputPlayback {
    records: Vec<InputCommandRecord>,
}

impl InputPlayback {
    #[inline]
    pub fn records(&self) -> &[InputCommandRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Frame index of the last recorded event.
    pub fn last_frame(&self) -> Option<u64> {
        self.records.last().map(|r| r.frame_index)
    }

    /// Every command recorded for `frame`, in recording order.
    pub fn commands_for_frame(&self, frame: u64) -> &[InputCommandRecord] {
        let start = self.records.partition_point(|r| r.frame_index < frame);
        let end = start + self.records[start..].partition_point(|r| r.frame_index == frame);
        &self.records[start..end]
    }

    /// Starts `state`'s frame and applies the commands of `frame` to it.
    /// Returns the number of commands applied.
    pub fn apply_frame(&self, frame: u64, state: &mut PointerState) -> usize {
        state.begin_frame();
        let commands = self.commands_for_frame(frame);
        for c in commands {
            state.apply(&c.kind);
        }
        commands.len()
    }
}

impl From<Vec<InputCommandRecord>> for InputPlayback {
    /// Takes an existing log. Records must already be in frame order.
    fn from(mut records: Vec<InputCommandRecord>) -> Self {
        if !records.is_sorted_by_key(|r| r.frame_index) {
            log::warn!("input log out of frame order; sorting");
            records.sort_by_key(|r| r.frame_index);
        }
        Self { records }
    }
}
