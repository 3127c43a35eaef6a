use std::fmt;

use crate::constants::{DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
use crate::tree::{GameTree, NodeId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Signed value of the color: Black is -1, White is +1.
    pub fn sign(self) -> i32 {
        match self {
            Color::Black => -1,
            Color::White => 1,
        }
    }
}

/// Signed value of a stone state; an empty point counts as 0.
pub fn stone_value(stone: Option<Color>) -> i32 {
    stone.map_or(0, Color::sign)
}

/// A 1-based `(x, y)` board coordinate. `(0, 0)` is the pass sentinel.
pub type Point = (usize, usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardSize {
    pub x: usize,
    pub y: usize,
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::square(DEFAULT_SIZE)
    }
}

impl BoardSize {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn square(size: usize) -> Self {
        Self { x: size, y: size }
    }

    pub fn is_valid(&self) -> bool {
        (MIN_SIZE..=MAX_SIZE).contains(&self.x) && (MIN_SIZE..=MAX_SIZE).contains(&self.y)
    }

    pub fn contains(&self, (x, y): Point) -> bool {
        x >= 1 && y >= 1 && x <= self.x && y <= self.y
    }

    /// Parses an `SZ` value: `"N"` or `"N:M"`, whitespace ignored.
    ///
    /// Anything malformed or outside `1..=52` on either axis falls back to
    /// the default 19x19 board.
    pub fn parse(input: &str) -> Self {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        let parse_axis = |s: &str| -> Option<usize> {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse().ok()
        };
        let size = match compact.split_once(':') {
            Some((x, y)) => parse_axis(x).zip(parse_axis(y)).map(|(x, y)| Self::new(x, y)),
            None => parse_axis(&compact).map(Self::square),
        };
        match size {
            Some(size) if size.is_valid() => size,
            _ => Self::default(),
        }
    }

    /// All on-board points, column by column (x outer, y inner).
    pub fn points(self) -> impl Iterator<Item = Point> {
        let (sx, sy) = (self.x, self.y);
        (1..=sx).flat_map(move |x| (1..=sy).map(move |y| (x, y)))
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.x == self.y {
            write!(f, "{}", self.x)
        } else {
            write!(f, "{}:{}", self.x, self.y)
        }
    }
}

/// The four orthogonal neighbours of a point. Neighbours may lie off the
/// board; callers check with [`BoardSize::contains`].
pub fn neighbors((x, y): Point) -> [Point; 4] {
    [
        (x.wrapping_sub(1), y),
        (x + 1, y),
        (x, y.wrapping_sub(1)),
        (x, y + 1),
    ]
}

/// Text rendering of the stones at one node of a game tree.
pub struct BoardView<'a> {
    tree: &'a GameTree,
    node: NodeId,
}

impl<'a> BoardView<'a> {
    pub fn new(tree: &'a GameTree, node: NodeId) -> Self {
        Self { tree, node }
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.tree.size();
        for y in 1..=size.y {
            for x in 1..=size.x {
                let ch = match self.tree.stone(self.node, (x, y)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                if x > 1 {
                    write!(f, " ")?;
                }
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
