//! The play log recorder.
//!
//! [`PlayLog`] appends [`PlayEvent`]s with monotonic sequence numbers and a
//! "before" situation captured from the state store at call time. Events are
//! never removed; the only edit allowed is [`PlayLog::correct`], which
//! rewrites the display label and RBI of an at-bat result.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::event::{EventKind, PlayEvent, Situation};
use crate::state::GameState;

/// Ordered, append-only record of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayLog {
    events: Vec<PlayEvent>,
    next_seq: u64,
}

impl PlayLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_seq: 1,
        }
    }

    /// Appends an event and returns its sequence number.
    pub fn record(
        &mut self,
        state: &GameState,
        batter_slot: Option<usize>,
        kind: EventKind,
    ) -> u64 {
        let seq = self.next_seq.max(1);
        self.next_seq = seq + 1;
        self.events.push(PlayEvent {
            seq,
            inning: state.inning(),
            half: state.half(),
            batter_slot,
            before: Situation::capture(state),
            kind,
        });
        debug!(seq, inning = state.inning(), half = %state.half(), "event recorded");
        seq
    }

    /// All events in order.
    #[must_use]
    pub fn events(&self) -> &[PlayEvent] {
        &self.events
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The event with sequence number `seq`.
    #[must_use]
    pub fn get(&self, seq: u64) -> Option<&PlayEvent> {
        self.events.iter().find(|event| event.seq == seq)
    }

    /// The most recent event.
    #[must_use]
    pub fn last(&self) -> Option<&PlayEvent> {
        self.events.last()
    }

    /// Rewrites the label and RBI of a past at-bat result.
    ///
    /// # Errors
    ///
    /// Fails if no event has this sequence number or it is not an at-bat
    /// result.
    pub fn correct(
        &mut self,
        seq: u64,
        label: Option<String>,
        rbi: Option<u32>,
    ) -> Result<(), ValidationError> {
        let event = self
            .events
            .iter_mut()
            .find(|event| event.seq == seq)
            .ok_or(ValidationError::UnknownEvent(seq))?;
        let EventKind::AtBatResult(record) = &mut event.kind else {
            return Err(ValidationError::NotCorrectable(seq));
        };
        if label.is_some() {
            record.label_override = label;
        }
        if let Some(rbi) = rbi {
            record.rbi = rbi;
        }
        Ok(())
    }
}
