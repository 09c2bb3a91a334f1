//! Names of the draft fields.

use std::fmt;
use std::str::FromStr;

/// A field of the interview request, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Company,
    Position,
    Date,
    Time,
    Message,
}

impl Field {
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Email,
        Self::Company,
        Self::Position,
        Self::Date,
        Self::Time,
        Self::Message,
    ];

    /// The lower-case name used on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::Position => "position",
            Self::Date => "date",
            Self::Time => "time",
            Self::Message => "message",
        }
    }

    /// The label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Email => "Email Address",
            Self::Company => "Company",
            Self::Position => "Position",
            Self::Date => "Select Date",
            Self::Time => "Select Time",
            Self::Message => "Additional Message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a name matches no field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
