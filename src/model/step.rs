//! Steps of the interview wizard.

use std::fmt;

use super::Field;

/// One of the three sequential screens of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// Who is asking: name, email, company, position.
    Contact,

    /// When: a date and a time slot.
    Schedule,

    /// What to talk about: a free-text message.
    Message,
}

impl Step {
    pub const ALL: [Self; 3] = [Self::Contact, Self::Schedule, Self::Message];

    /// 1-based position, as shown in the progress indicator.
    pub fn number(self) -> u8 {
        match self {
            Self::Contact => 1,
            Self::Schedule => 2,
            Self::Message => 3,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Contact => Some(Self::Schedule),
            Self::Schedule => Some(Self::Message),
            Self::Message => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Contact => None,
            Self::Schedule => Some(Self::Contact),
            Self::Message => Some(Self::Schedule),
        }
    }

    /// The draft fields this step owns. Disjoint across steps.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::Contact => &[Field::Name, Field::Email, Field::Company, Field::Position],
            Self::Schedule => &[Field::Date, Field::Time],
            Self::Message => &[Field::Message],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Contact => "Basic Information",
            Self::Schedule => "Date & Time",
            Self::Message => "Additional Message",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_and_previous_walk_the_order() {
        assert_eq!(Step::Contact.next(), Some(Step::Schedule));
        assert_eq!(Step::Schedule.next(), Some(Step::Message));
        assert_eq!(Step::Message.next(), None);
        assert_eq!(Step::Message.previous(), Some(Step::Schedule));
        assert_eq!(Step::Contact.previous(), None);
    }

    #[test]
    fn every_field_belongs_to_exactly_one_step() {
        for field in Field::ALL {
            let owners = Step::ALL
                .iter()
                .filter(|s| s.fields().contains(&field))
                .count();
            assert_eq!(owners, 1, "{field} owned by {owners} steps");
        }
    }
}
