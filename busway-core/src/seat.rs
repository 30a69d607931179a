use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Row labels of a coach, front to back.
pub const ROW_LABELS: [char; 10] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];

/// Seats per row.
pub const COLUMNS: u8 = 4;

/// A seat position such as `A1` or `J4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    row: char,
    column: u8,
}

impl SeatId {
    pub fn new(row: char, column: u8) -> Result<Self, SeatError> {
        let row = row.to_ascii_uppercase();
        if !ROW_LABELS.contains(&row) {
            return Err(SeatError::UnknownRow(row));
        }
        if column == 0 || column > COLUMNS {
            return Err(SeatError::ColumnOutOfRange(column));
        }
        Ok(Self { row, column })
    }

    pub fn row(&self) -> char {
        self.row
    }

    pub fn column(&self) -> u8 {
        self.column
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.column)
    }
}

impl FromStr for SeatId {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let malformed = || SeatError::Malformed(s.to_string());

        // Exactly a row letter and one digit.
        let row = chars.next().ok_or_else(malformed)?;
        let digit = chars.next().filter(char::is_ascii_digit).ok_or_else(malformed)?;
        if chars.next().is_some() {
            return Err(malformed());
        }
        SeatId::new(row, digit as u8 - b'0')
    }
}

impl TryFrom<String> for SeatId {
    type Error = SeatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(seat: SeatId) -> Self {
        seat.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatError {
    #[error("Malformed seat identifier: {0:?}")]
    Malformed(String),

    #[error("Unknown seat row: {0}")]
    UnknownRow(char),

    #[error("Seat column {0} is outside 1..=4")]
    ColumnOutOfRange(u8),
}

/// Fixed seat layout shared by every schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    rows: Vec<Vec<SeatId>>,
}

impl SeatMap {
    /// Build the 10 x 4 grid, row-major, `A1..A4` through `J1..J4`.
    pub fn build() -> Self {
        let rows = ROW_LABELS
            .iter()
            .map(|&row| (1..=COLUMNS).map(|column| SeatId { row, column }).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<SeatId>] {
        &self.rows
    }

    pub fn seats(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.rows.iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        self.seats().any(|s| s == *seat)
    }
}

impl Default for SeatMap {
    fn default() -> Self {
        Self::build()
    }
}
