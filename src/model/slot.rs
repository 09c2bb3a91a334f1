//! Time slots offered for an interview.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A half-hour slot in the morning or afternoon block.
///
/// Serialized and displayed as its 12-hour label (`"09:00 AM"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum TimeSlot {
    Nine,
    NineThirty,
    Ten,
    TenThirty,
    Eleven,
    ElevenThirty,
    Two,
    TwoThirty,
    Three,
    ThreeThirty,
    Four,
    FourThirty,
}

impl TimeSlot {
    /// Every slot, in the order they are offered.
    pub const ALL: [Self; 12] = [
        Self::Nine,
        Self::NineThirty,
        Self::Ten,
        Self::TenThirty,
        Self::Eleven,
        Self::ElevenThirty,
        Self::Two,
        Self::TwoThirty,
        Self::Three,
        Self::ThreeThirty,
        Self::Four,
        Self::FourThirty,
    ];

    /// The 12-hour label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Nine => "09:00 AM",
            Self::NineThirty => "09:30 AM",
            Self::Ten => "10:00 AM",
            Self::TenThirty => "10:30 AM",
            Self::Eleven => "11:00 AM",
            Self::ElevenThirty => "11:30 AM",
            Self::Two => "02:00 PM",
            Self::TwoThirty => "02:30 PM",
            Self::Three => "03:00 PM",
            Self::ThreeThirty => "03:30 PM",
            Self::Four => "04:00 PM",
            Self::FourThirty => "04:30 PM",
        }
    }

    /// The slot's start as 24-hour `(hour, minute)`.
    pub fn start(self) -> (u8, u8) {
        match self {
            Self::Nine => (9, 0),
            Self::NineThirty => (9, 30),
            Self::Ten => (10, 0),
            Self::TenThirty => (10, 30),
            Self::Eleven => (11, 0),
            Self::ElevenThirty => (11, 30),
            Self::Two => (14, 0),
            Self::TwoThirty => (14, 30),
            Self::Three => (15, 0),
            Self::ThreeThirty => (15, 30),
            Self::Four => (16, 0),
            Self::FourThirty => (16, 30),
        }
    }

    /// Position of this slot in [`TimeSlot::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when text names no offered slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time slot '{0}' (run `interview slots` for the list)")]
pub struct UnknownSlot(pub String);

impl FromStr for TimeSlot {
    type Err = UnknownSlot;

    /// Accepts the 12-hour label (case-insensitive, `9:00 am` works too)
    /// or a 24-hour `HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownSlot(s.to_string());
        let text = s.trim().to_ascii_uppercase();

        let (clock, meridiem) = match text.rsplit_once(' ') {
            Some((clock, m @ ("AM" | "PM"))) => (clock.trim(), Some(m)),
            _ => (text.as_str(), None),
        };

        let (hour, minute) = clock.split_once(':').ok_or_else(unknown)?;
        let hour: u8 = hour.parse().map_err(|_| unknown())?;
        let minute: u8 = minute.parse().map_err(|_| unknown())?;

        let hour = match meridiem {
            Some("AM") if hour == 12 => 0,
            Some("PM") if hour < 12 => hour + 12,
            Some(_) if hour > 12 => return Err(unknown()),
            _ => hour,
        };

        Self::ALL
            .into_iter()
            .find(|slot| slot.start() == (hour, minute))
            .ok_or_else(unknown)
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.label().to_string()
    }
}
