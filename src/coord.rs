//! Two-letter record coordinates and the editor's coordinate-label styles.
//!
//! Each axis is one letter: `a..z` for 1..26 and `A..Z` for 27..52, so
//! `"cd"` is `(3, 4)`. Anything that is not exactly two letters decodes to
//! the pass point.

use std::fmt;
use std::str::FromStr;

use crate::board::Point;
use crate::constants::PASS_MOVE;

/// Convert a coordinate letter to its 1-based number.
pub fn letter_to_number(c: char) -> Option<usize> {
    match c {
        'a'..='z' => Some(c as usize - 'a' as usize + 1),
        'A'..='Z' => Some(c as usize - 'A' as usize + 27),
        _ => None,
    }
}

/// Convert a 1-based number in `1..=52` to its coordinate letter.
pub fn number_to_letter(n: usize) -> Option<char> {
    match n {
        1..=26 => Some((b'a' + (n - 1) as u8) as char),
        27..=52 => Some((b'A' + (n - 27) as u8) as char),
        _ => None,
    }
}

/// Decode a two-letter token into a point.
///
/// Returns [`PASS_MOVE`] for anything but exactly two ASCII letters.
pub fn decode(token: &str) -> Point {
    let mut chars = token.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) => match (letter_to_number(a), letter_to_number(b)) {
            (Some(x), Some(y)) => (x, y),
            _ => PASS_MOVE,
        },
        _ => PASS_MOVE,
    }
}

/// Encode a point as two letters. The pass point (and anything off the
/// letter range) encodes to an empty string.
pub fn encode((x, y): Point) -> String {
    match (number_to_letter(x), number_to_letter(y)) {
        (Some(a), Some(b)) => [a, b].iter().collect(),
        _ => String::new(),
    }
}

/// Coordinate-label scheme shown around the board.
///
/// Only the selection lives in the core; drawing the labels belongs to the
/// renderer, which looks the scheme up by [`CoordStyle::name`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CoordStyle {
    #[default]
    None,
    Numeric,
    Western,
    Eastern,
    Pierre,
    Corner,
    Eastcor,
}

impl CoordStyle {
    /// All styles in toggle order.
    pub const ALL: [CoordStyle; 7] = [
        CoordStyle::None,
        CoordStyle::Numeric,
        CoordStyle::Western,
        CoordStyle::Eastern,
        CoordStyle::Pierre,
        CoordStyle::Corner,
        CoordStyle::Eastcor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CoordStyle::None => "none",
            CoordStyle::Numeric => "numeric",
            CoordStyle::Western => "western",
            CoordStyle::Eastern => "eastern",
            CoordStyle::Pierre => "pierre",
            CoordStyle::Corner => "corner",
            CoordStyle::Eastcor => "eastcor",
        }
    }

    /// The style after this one, wrapping around.
    pub fn next(self) -> CoordStyle {
        let i = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for CoordStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown coordinate style: {0}")]
pub struct UnknownCoordStyle(pub String);

impl FromStr for CoordStyle {
    type Err = UnknownCoordStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| UnknownCoordStyle(s.to_string()))
    }
}
