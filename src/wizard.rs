//! The interview wizard: a three-step state machine.
//!
//! ```text
//!            open                advance*           advance*          advance*
//! Closed ──────────▶ Contact ───────────▶ Schedule ──────────▶ Message ──────────▶ Submitting
//!   ▲                  │  ◀──────────────    │     ◀───────────                         │
//!   │      back        │       back          │        back              hand-off ok     │
//!   └──────────────────┘                                                                ▼
//!   └───────────────────────────── reset timer / close ────────────────────────────── Submitted
//!
//! * only when the current step validates; otherwise the state is unchanged.
//! ```
//!
//! The wizard is pure: it never touches a clock, a terminal or a mail client.
//! Dates arrive as `today`, time as `now`, and the hand-off is a [`Handoff`]
//! passed in by the caller.

use std::time::{Duration, Instant};

use jiff::civil::Date;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::mail::{Handoff, HandoffError};
use crate::model::{
    DateSelection, Draft, EmailRule, Field, InterviewRequest, InvalidDate, Step, TimeSlot,
    UnknownField, UnknownSlot,
};

/// How long the success view stays up before the wizard closes itself.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(3);

/// Where the wizard is, as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Closed,
    Editing(Step),
    Submitting,
    Submitted,
}

/// Errors from writing a value into the draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    #[error("the wizard is not accepting edits")]
    NotEditing,

    #[error(transparent)]
    UnknownField(#[from] UnknownField),

    #[error("'{0}' is not a text field")]
    NotText(Field),

    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),

    #[error("pick a single date, not a range")]
    DateRange,

    #[error("{date} is not selectable; the earliest date is {earliest}")]
    DateTooEarly { date: Date, earliest: Date },

    #[error(transparent)]
    UnknownSlot(#[from] UnknownSlot),
}

/// Result of asking the wizard to move forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Not editing: closed, submitting or already submitted.
    Ignored,

    /// The current step does not validate; nothing changed.
    Blocked(Step),

    /// Moved on to this step.
    Moved(Step),

    /// The last step validated. The wizard is now submitting and waits
    /// for [`Wizard::finish_submission`].
    Submit(Submission),
}

/// A complete request leaving the wizard for hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub session: Uuid,
    pub request: InterviewRequest,
}

/// Result of asking the wizard to move back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Back {
    Ignored,
    Moved(Step),

    /// Backed out of the first step: the draft is gone.
    Cancelled,
}

/// Result of [`Wizard::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Ignored,
    Blocked(Step),
    Moved(Step),
    Submitted(ResetTimer),
}

/// A one-shot reset armed on entering `Submitted`.
///
/// Only acts on the session that armed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTimer {
    session: Uuid,
    due: Instant,
}

impl ResetTimer {
    pub fn due(&self) -> Instant {
        self.due
    }

    /// Time left until the timer fires, zero once it is due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.due().saturating_duration_since(now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Editing(Step),
    Submitting,
    Submitted,
}

/// One open-to-close interaction.
#[derive(Debug)]
struct Session {
    id: Uuid,
    phase: Phase,
    draft: Draft,
    min_date: Date,
    reset: Option<ResetTimer>,
}

/// The interview request wizard.
#[derive(Debug)]
pub struct Wizard {
    email_rule: EmailRule,
    reset_delay: Duration,
    session: Option<Session>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(EmailRule::default(), DEFAULT_RESET_DELAY)
    }
}

impl Wizard {
    /// A closed wizard.
    pub fn new(email_rule: EmailRule, reset_delay: Duration) -> Self {
        Self {
            email_rule,
            reset_delay,
            session: None,
        }
    }

    // ── Reads ──

    pub fn state(&self) -> State {
        match &self.session {
            None => State::Closed,
            Some(s) => match s.phase {
                Phase::Editing(step) => State::Editing(step),
                Phase::Submitting => State::Submitting,
                Phase::Submitted => State::Submitted,
            },
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// The step being edited, if any.
    pub fn step(&self) -> Option<Step> {
        match self.state() {
            State::Editing(step) => Some(step),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.state() == State::Submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.state() == State::Submitted
    }

    /// The draft of the open session.
    pub fn draft(&self) -> Option<&Draft> {
        self.session.as_ref().map(|s| &s.draft)
    }

    /// The earliest date the open session accepts.
    pub fn min_date(&self) -> Option<Date> {
        self.session.as_ref().map(|s| s.min_date)
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Whether `advance` would move on from the current step.
    pub fn can_advance(&self) -> bool {
        match (&self.session, self.step()) {
            (Some(s), Some(step)) => s.draft.is_valid(step, self.email_rule),
            _ => false,
        }
    }

    /// Fields keeping the current step from validating.
    pub fn missing(&self) -> Vec<Field> {
        match (&self.session, self.step()) {
            (Some(s), Some(step)) => s.draft.missing(step, self.email_rule),
            _ => Vec::new(),
        }
    }

    /// The reset timer armed by the last successful submission, if still pending.
    pub fn pending_reset(&self) -> Option<ResetTimer> {
        self.session.as_ref().and_then(|s| s.reset)
    }

    // ── Lifecycle ──

    /// Start a fresh session on the first step.
    ///
    /// Whatever was open before is dropped, pending reset included.
    pub fn open(&mut self, today: Date) {
        let min_date = today.tomorrow().unwrap_or(today);
        let id = Uuid::new_v4();
        if let Some(old) = self.session.take() {
            debug!(session = %old.id, "dropping previous session on reopen");
        }
        self.session = Some(Session {
            id,
            phase: Phase::Editing(Step::Contact),
            draft: Draft::default(),
            min_date,
            reset: None,
        });
        info!(session = %id, %min_date, "wizard opened");
    }

    /// Close from any state, discarding the draft and any pending reset.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            info!(session = %session.id, phase = ?session.phase, "wizard closed");
        }
    }

    // ── Edits ──

    /// Write a raw value into a field, coercing it to the field's type.
    pub fn update(&mut self, field: Field, raw: &str) -> Result<(), UpdateError> {
        match field {
            Field::Date => self.set_date(raw.parse::<DateSelection>()?),
            Field::Time => self.select_time(raw.parse()?),
            _ => self.set_text(field, raw),
        }
    }

    /// Replace the text of a text field.
    pub fn set_text(&mut self, field: Field, value: impl Into<String>) -> Result<(), UpdateError> {
        let draft = self.editable_draft()?;
        let slot = draft.text_mut(field).ok_or(UpdateError::NotText(field))?;
        *slot = value.into();
        Ok(())
    }

    /// Pick the interview date. Ranges and dates before the minimum are refused.
    pub fn set_date(&mut self, selection: DateSelection) -> Result<(), UpdateError> {
        let session = self.editable_session()?;
        let date = match selection {
            DateSelection::Single(date) => date,
            DateSelection::Range(..) => return Err(UpdateError::DateRange),
        };
        if date < session.min_date {
            return Err(UpdateError::DateTooEarly {
                date,
                earliest: session.min_date,
            });
        }
        session.draft.date = Some(date);
        Ok(())
    }

    pub fn select_time(&mut self, slot: TimeSlot) -> Result<(), UpdateError> {
        self.editable_draft()?.time = Some(slot);
        Ok(())
    }

    // ── Transitions ──

    /// Move to the next step, or hand out the request from the last one.
    pub fn advance(&mut self) -> Advance {
        let email_rule = self.email_rule;
        let Some(session) = self.session.as_mut() else {
            return Advance::Ignored;
        };
        let Phase::Editing(step) = session.phase else {
            return Advance::Ignored;
        };

        if !session.draft.is_valid(step, email_rule) {
            debug!(session = %session.id, %step, "advance blocked");
            return Advance::Blocked(step);
        }

        if let Some(next) = step.next() {
            session.phase = Phase::Editing(next);
            debug!(session = %session.id, step = %next, "advanced");
            return Advance::Moved(next);
        }

        match session.draft.complete(email_rule) {
            Some(request) => {
                session.phase = Phase::Submitting;
                info!(session = %session.id, "submitting interview request");
                Advance::Submit(Submission {
                    session: session.id,
                    request,
                })
            }
            None => {
                // Last step valid but an earlier one no longer is; send the
                // user back to the first step that fails.
                let failing = Step::ALL
                    .into_iter()
                    .find(|s| !session.draft.is_valid(*s, email_rule))
                    .unwrap_or(Step::Contact);
                session.phase = Phase::Editing(failing);
                warn!(session = %session.id, step = %failing, "draft regressed before submit");
                Advance::Blocked(failing)
            }
        }
    }

    /// Move to the previous step, or cancel from the first one.
    pub fn back(&mut self) -> Back {
        let Some(session) = self.session.as_mut() else {
            return Back::Ignored;
        };
        let Phase::Editing(step) = session.phase else {
            return Back::Ignored;
        };

        match step.previous() {
            Some(previous) => {
                session.phase = Phase::Editing(previous);
                debug!(session = %session.id, step = %previous, "moved back");
                Back::Moved(previous)
            }
            None => {
                self.close();
                Back::Cancelled
            }
        }
    }

    /// Record the outcome of handing off `session`'s request.
    ///
    /// Success enters `Submitted` and arms the reset timer. Failure returns
    /// to the message step with the draft intact so the user can retry.
    /// Returns `Ok(None)` when the session is no longer the one submitting.
    pub fn finish_submission(
        &mut self,
        session_id: Uuid,
        outcome: Result<(), HandoffError>,
        now: Instant,
    ) -> Result<Option<ResetTimer>, HandoffError> {
        let reset_delay = self.reset_delay;
        let Some(session) = self.session.as_mut().filter(|s| s.id == session_id) else {
            debug!(session = %session_id, "hand-off finished for a session that is gone");
            return Ok(None);
        };

        if session.phase != Phase::Submitting {
            warn!(session = %session.id, phase = ?session.phase, "hand-off finished outside submission; resetting");
            self.close();
            return Ok(None);
        }

        match outcome {
            Ok(()) => {
                let timer = ResetTimer {
                    session: session.id,
                    due: now + reset_delay,
                };
                session.phase = Phase::Submitted;
                session.reset = Some(timer);
                info!(session = %session.id, delay = ?reset_delay, "interview request submitted");
                Ok(Some(timer))
            }
            Err(e) => {
                session.phase = Phase::Editing(Step::Message);
                warn!(session = %session.id, error = %e, "hand-off failed");
                Err(e)
            }
        }
    }

    /// Advance, performing the hand-off when the last step submits.
    pub fn submit(&mut self, handoff: &dyn Handoff, now: Instant) -> Result<Progress, HandoffError> {
        match self.advance() {
            Advance::Ignored => Ok(Progress::Ignored),
            Advance::Blocked(step) => Ok(Progress::Blocked(step)),
            Advance::Moved(step) => Ok(Progress::Moved(step)),
            Advance::Submit(submission) => {
                let outcome = handoff.hand_off(&submission.request);
                let timer = self.finish_submission(submission.session, outcome, now)?;
                Ok(timer.map_or(Progress::Ignored, Progress::Submitted))
            }
        }
    }

    /// Fire a reset timer. Closes the wizard and returns `true` only when the
    /// timer is due and belongs to the session still showing its success view.
    pub fn fire_reset(&mut self, timer: ResetTimer, now: Instant) -> bool {
        if now < timer.due {
            return false;
        }
        let current = self
            .session
            .as_ref()
            .is_some_and(|s| s.phase == Phase::Submitted && s.reset == Some(timer));
        if !current {
            debug!(session = %timer.session, "ignoring stale reset timer");
            return false;
        }
        info!(session = %timer.session, "auto-reset after submission");
        self.close();
        true
    }

    fn editable_session(&mut self) -> Result<&mut Session, UpdateError> {
        self.session
            .as_mut()
            .filter(|s| matches!(s.phase, Phase::Editing(_)))
            .ok_or(UpdateError::NotEditing)
    }

    fn editable_draft(&mut self) -> Result<&mut Draft, UpdateError> {
        self.editable_session().map(|s| &mut s.draft)
    }
}
