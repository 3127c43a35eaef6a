//! Constants for board geometry, record properties and editor defaults.
//!
//! Board sizes are chosen at runtime, per record, so everything here is a
//! limit or a default rather than a fixed layout.

use crate::board::Point;

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size used when a record has no (or an unusable) `SZ` property.
pub const DEFAULT_SIZE: usize = 19;

/// Smallest board dimension.
pub const MIN_SIZE: usize = 1;

/// Largest board dimension. Two-letter coordinates cover `a..z` then `A..Z`.
pub const MAX_SIZE: usize = 52;

// =============================================================================
// Special Move Values
// =============================================================================

/// Pass move marker. Coordinates are 1-based, so `(0, 0)` is never on the board.
pub const PASS_MOVE: Point = (0, 0);

// =============================================================================
// Record Format
// =============================================================================

/// Game-info property ids collected from the root node.
///
/// Grouped as player info, game parameters, event info, general comments
/// and credits.
pub const GAME_INFO_IDS: &[&str] = &[
    "PB", "BR", "BT", "PW", "WR", "WT", // players
    "HA", "KM", "RU", "TM", "OT", // parameters
    "DT", "EV", "GN", "PC", "RO", // event
    "GC", "ON", "RE", // comments
    "AN", "CP", "SO", "US", // credits
];

/// The only game-info id whose value keeps its line breaks.
pub const MULTILINE_INFO_ID: &str = "GC";

/// Fixed properties written at the start of every composed root node.
pub const RECORD_HEADER: &str = "FF[4]GM[1]CA[UTF-8]";

/// Application tag written into the `AP` property.
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Application version written into the `AP` property.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Editor Defaults
// =============================================================================

/// Label applied by the label tool before anything else is chosen.
pub const DEFAULT_LABEL: &str = "1";

/// Label the label tool switches to when toggled away from numbers.
pub const LETTER_LABEL: &str = "A";

/// Highest variant style value (two bits).
pub const MAX_VARIANT_STYLE: u8 = 3;
