// Birthday parsing and the birthday -> generation parameters mapping.
//
// The mapping is fixed and must stay bit-for-bit stable, since the same
// birthday should always give the same start note and melody length:
//   start  = START_CANDIDATES[day mod 8]
//   length = 8 + (year mod 12)
// The month is validated but does not take part in the mapping.

use crate::error::MelodyError;
use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Start notes indexed by `day mod 8`.
pub const START_CANDIDATES: [&str; 8] = ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"];

/// Shortest melody a birthday can produce, in generated steps.
pub const BASE_LENGTH: usize = 8;

/// A validated calendar date. Only month and day ranges are checked; day 31
/// is accepted in every month.
///
/// Fields are private so every value has passed the range check, including
/// deserialized ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBirthday")]
pub struct Birthday {
    year: i32,
    month: u32,
    day: u32,
}

/// Unchecked wire form of `Birthday`.
#[derive(Deserialize)]
struct RawBirthday {
    year: i32,
    month: u32,
    day: u32,
}

impl TryFrom<RawBirthday> for Birthday {
    type Error = MelodyError;

    fn try_from(raw: RawBirthday) -> Result<Self, Self::Error> {
        Birthday::new(raw.year, raw.month, raw.day)
    }
}

impl Birthday {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, MelodyError> {
        Self::checked(year, month, day, &format!("{year}-{month}-{day}"))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Range-check, reporting errors against the caller's original text.
    fn checked(year: i32, month: u32, day: u32, shown: &str) -> Result<Self, MelodyError> {
        if !(1..=12).contains(&month) {
            return Err(MelodyError::birthday(shown, format!("month {month} is not in 1..=12")));
        }
        if !(1..=31).contains(&day) {
            return Err(MelodyError::birthday(shown, format!("day {day} is not in 1..=31")));
        }
        Ok(Birthday { year, month, day })
    }
}

/// Accepts `YYYY-MM-DD` and `YYYY/MM/DD`; `-` and `/` may be mixed and
/// components may carry surrounding whitespace.
impl FromStr for Birthday {
    type Err = MelodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split(['-', '/']).map(str::trim).collect();
        if parts.len() != 3 {
            return Err(MelodyError::birthday(
                trimmed,
                format!("expected year, month and day, found {} component(s)", parts.len()),
            ));
        }
        let year = parts[0]
            .parse::<i32>()
            .map_err(|_| MelodyError::birthday(trimmed, format!("year '{}' is not a number", parts[0])))?;
        let month = parts[1]
            .parse::<u32>()
            .map_err(|_| MelodyError::birthday(trimmed, format!("month '{}' is not a number", parts[1])))?;
        let day = parts[2]
            .parse::<u32>()
            .map_err(|_| MelodyError::birthday(trimmed, format!("day '{}' is not a number", parts[2])))?;
        Birthday::checked(year, month, day, trimmed)
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Where a melody starts and how many steps it walks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub start: Token,
    pub length: usize,
}

/// Map a birthday to its start token and melody length.
pub fn derive_parameters(birthday: &Birthday) -> Parameters {
    let start = START_CANDIDATES[birthday.day() as usize % START_CANDIDATES.len()];
    let length = BASE_LENGTH + birthday.year().rem_euclid(12) as usize;
    Parameters {
        start: Token::from(start),
        length,
    }
}
