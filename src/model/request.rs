//! The interview request: the in-progress draft and the complete request.

use std::str::FromStr;

use jiff::civil::Date;
use serde::Serialize;
use validator::ValidateEmail;

use super::{Field, Step, TimeSlot};

/// A message must be longer than this many characters.
pub const MIN_MESSAGE_CHARS: usize = 10;

/// The request being filled in across the wizard steps.
///
/// Any combination of fields may be empty. A draft is never handed out
/// of the wizard; [`Draft::complete`] is the only way to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub email: String,
    pub company: String,
    pub position: String,
    pub date: Option<Date>,
    pub time: Option<TimeSlot>,
    pub message: String,
}

/// How much the contact step checks the email address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmailRule {
    /// Anything non-empty.
    #[default]
    Present,

    /// A syntactically valid address.
    WellFormed,
}

impl EmailRule {
    pub fn accepts(self, email: &str) -> bool {
        match self {
            Self::Present => !email.is_empty(),
            Self::WellFormed => !email.is_empty() && email.validate_email(),
        }
    }
}

impl Draft {
    /// Fields of `step` that keep it from validating.
    pub fn missing(&self, step: Step, email_rule: EmailRule) -> Vec<Field> {
        step.fields()
            .iter()
            .copied()
            .filter(|field| !self.satisfies(*field, email_rule))
            .collect()
    }

    /// Whether `step` validates. Pure; never changes the draft.
    pub fn is_valid(&self, step: Step, email_rule: EmailRule) -> bool {
        step.fields()
            .iter()
            .all(|field| self.satisfies(*field, email_rule))
    }

    /// Build the complete request, if every step validates.
    pub fn complete(&self, email_rule: EmailRule) -> Option<InterviewRequest> {
        if !Step::ALL.iter().all(|s| self.is_valid(*s, email_rule)) {
            return None;
        }
        Some(InterviewRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            company: self.company.clone(),
            position: self.position.clone(),
            date: self.date?,
            time: self.time?,
            message: self.message.clone(),
        })
    }

    /// The current text of a text field, or `None` for date and time.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Email => Some(&self.email),
            Field::Company => Some(&self.company),
            Field::Position => Some(&self.position),
            Field::Message => Some(&self.message),
            Field::Date | Field::Time => None,
        }
    }

    /// Mutable access to a text field, or `None` for date and time.
    pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.name),
            Field::Email => Some(&mut self.email),
            Field::Company => Some(&mut self.company),
            Field::Position => Some(&mut self.position),
            Field::Message => Some(&mut self.message),
            Field::Date | Field::Time => None,
        }
    }

    fn satisfies(&self, field: Field, email_rule: EmailRule) -> bool {
        match field {
            Field::Name => !self.name.is_empty(),
            Field::Email => email_rule.accepts(&self.email),
            Field::Company => !self.company.is_empty(),
            Field::Position => !self.position.is_empty(),
            Field::Date => self.date.is_some(),
            Field::Time => self.time.is_some(),
            Field::Message => self.message.chars().count() > MIN_MESSAGE_CHARS,
        }
    }
}

/// A complete, submittable interview request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewRequest {
    pub name: String,
    pub email: String,
    pub company: String,
    pub position: String,
    pub date: Date,
    pub time: TimeSlot,
    pub message: String,
}

impl InterviewRequest {
    /// The preferred date as `Saturday, October 17, 2026`.
    pub fn long_date(&self) -> String {
        long_date(self.date)
    }
}

/// Format a date as `Weekday, Month D, YYYY`.
pub fn long_date(date: Date) -> String {
    date.strftime("%A, %B %-d, %Y").to_string()
}

/// What a date picker produced.
///
/// Only single dates are ever accepted into a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    Single(Date),
    Range(Date, Date),
}

impl From<Date> for DateSelection {
    fn from(date: Date) -> Self {
        Self::Single(date)
    }
}

/// Error returned when text is not a date or a date range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date '{input}': {reason}")]
pub struct InvalidDate {
    pub input: String,
    pub reason: String,
}

impl FromStr for DateSelection {
    type Err = InvalidDate;

    /// `YYYY-MM-DD` for a single date, `YYYY-MM-DD..YYYY-MM-DD` for a range.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |text: &str| {
            text.trim().parse::<Date>().map_err(|e| InvalidDate {
                input: s.to_string(),
                reason: e.to_string(),
            })
        };

        match s.split_once("..") {
            Some((start, end)) => Ok(Self::Range(parse(start)?, parse(end)?)),
            None => Ok(Self::Single(parse(s)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    fn contact_draft() -> Draft {
        Draft {
            name: "Jane Doe".to_string(),
            email: "jane@co.com".to_string(),
            company: "Acme".to_string(),
            position: "CTO".to_string(),
            ..Draft::default()
        }
    }

    #[test]
    fn empty_draft_misses_every_contact_field() {
        let draft = Draft::default();
        assert_eq!(
            draft.missing(Step::Contact, EmailRule::Present),
            vec![Field::Name, Field::Email, Field::Company, Field::Position]
        );
        assert!(!draft.is_valid(Step::Contact, EmailRule::Present));
    }

    #[test]
    fn contact_step_needs_all_four_fields() {
        let full = contact_draft();
        assert!(full.is_valid(Step::Contact, EmailRule::Present));

        for field in Step::Contact.fields() {
            let mut draft = full.clone();
            draft.text_mut(*field).unwrap().clear();
            assert_eq!(draft.missing(Step::Contact, EmailRule::Present), vec![*field]);
        }
    }

    #[test]
    fn schedule_step_needs_date_and_time() {
        let mut draft = Draft::default();
        assert_eq!(
            draft.missing(Step::Schedule, EmailRule::Present),
            vec![Field::Date, Field::Time]
        );
        draft.date = Some(date(2026, 10, 20));
        assert_eq!(draft.missing(Step::Schedule, EmailRule::Present), vec![Field::Time]);
        draft.time = Some(TimeSlot::Ten);
        assert!(draft.is_valid(Step::Schedule, EmailRule::Present));
    }

    #[test]
    fn message_must_exceed_ten_characters() {
        let mut draft = Draft {
            message: "0123456789".to_string(),
            ..Draft::default()
        };
        assert!(!draft.is_valid(Step::Message, EmailRule::Present));

        draft.message.push('!');
        assert!(draft.is_valid(Step::Message, EmailRule::Present));
    }

    #[test]
    fn message_length_counts_characters_not_bytes() {
        // Ten characters, twenty bytes.
        let draft = Draft {
            message: "éééééééééé".to_string(),
            ..Draft::default()
        };
        assert!(!draft.is_valid(Step::Message, EmailRule::Present));
    }

    #[test]
    fn present_rule_accepts_any_text() {
        assert!(EmailRule::Present.accepts("jane@"));
        assert!(EmailRule::Present.accepts(" "));
        assert!(!EmailRule::Present.accepts(""));
    }

    #[test]
    fn well_formed_rule_checks_the_address() {
        assert!(EmailRule::WellFormed.accepts("jane@co.com"));
        assert!(!EmailRule::WellFormed.accepts("jane@"));
        assert!(!EmailRule::WellFormed.accepts("jane"));
        assert!(!EmailRule::WellFormed.accepts(""));
    }

    #[test]
    fn complete_requires_every_step() {
        let mut draft = contact_draft();
        draft.date = Some(date(2026, 10, 20));
        draft.time = Some(TimeSlot::Ten);
        assert!(draft.complete(EmailRule::Present).is_none());

        draft.message = "Let's discuss the backend architecture.".to_string();
        let request = draft.complete(EmailRule::Present).unwrap();
        assert_eq!(request.position, "CTO");
        assert_eq!(request.date, date(2026, 10, 20));
        assert_eq!(request.time, TimeSlot::Ten);
    }

    #[test]
    fn long_date_spells_out_weekday_and_month() {
        assert_eq!(long_date(date(2026, 10, 17)), "Saturday, October 17, 2026");
        assert_eq!(long_date(date(2027, 1, 4)), "Monday, January 4, 2027");
    }

    #[test]
    fn date_selection_parses_single_and_range() {
        assert_eq!(
            "2026-10-20".parse::<DateSelection>().unwrap(),
            DateSelection::Single(date(2026, 10, 20))
        );
        assert_eq!(
            "2026-10-20..2026-10-22".parse::<DateSelection>().unwrap(),
            DateSelection::Range(date(2026, 10, 20), date(2026, 10, 22))
        );
        assert!("next tuesday".parse::<DateSelection>().is_err());
    }

    #[test]
    fn request_serializes_date_and_slot_as_text() {
        let mut draft = contact_draft();
        draft.date = Some(date(2026, 10, 20));
        draft.time = Some(TimeSlot::TwoThirty);
        draft.message = "Systems design and Rust.".to_string();
        let request = draft.complete(EmailRule::Present).unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["date"], "2026-10-20");
        assert_eq!(json["time"], "02:30 PM");
    }
}
