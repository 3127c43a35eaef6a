//! Rules of play: moves with capture, ko and suicide checks, setup stones
//! and markup.
//!
//! Every operation checks everything before it writes, so a refused edit
//! leaves the tree exactly as it was.

use std::collections::{HashMap, HashSet};

use log::trace;
use thiserror::Error;

use crate::board::{Color, Point, neighbors, stone_value};
use crate::constants::PASS_MOVE;
use crate::tree::{EditKind, GameTree, Markup, Move, NodeId};

/// Why an edit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// The node already holds a move, or has children.
    #[error("node cannot take this edit")]
    Immutable,
    #[error("illegal move: point not empty")]
    Occupied,
    #[error("illegal move: retakes ko")]
    Ko,
    #[error("illegal move: suicide")]
    Suicide,
    #[error("point is off the board")]
    OutOfBounds,
    #[error("edit makes no change")]
    NoChange,
}

/// Speculative board: a scratch overlay on top of one node.
struct TrialBoard<'a> {
    tree: &'a GameTree,
    node: NodeId,
    overlay: HashMap<Point, Option<Color>>,
}

impl<'a> TrialBoard<'a> {
    fn new(tree: &'a GameTree, node: NodeId) -> Self {
        Self {
            tree,
            node,
            overlay: HashMap::new(),
        }
    }

    fn get(&self, point: Point) -> Option<Color> {
        match self.overlay.get(&point) {
            Some(&stone) => stone,
            None => self.tree.stone(self.node, point),
        }
    }

    fn set(&mut self, point: Point, stone: Option<Color>) {
        self.overlay.insert(point, stone);
    }
}

/// Capture the chain at `start` if it has no liberties.
///
/// The chain is every stone reachable from `start` that is neither empty
/// nor of color `blocker`. The fill stops as soon as it reaches an empty
/// point. A captured chain is emptied on the board and appended to
/// `captured`. Starting on an empty point, a `blocker` stone or off the
/// board captures nothing.
fn capture_stones(board: &mut TrialBoard<'_>, start: Point, blocker: Color, captured: &mut Vec<Point>) {
    let size = board.tree.size();
    let mut pending: Vec<Point> = Vec::new();
    let mut seen: HashSet<Point> = HashSet::new();
    let mut stack = vec![start];

    while let Some(pt) = stack.pop() {
        if !size.contains(pt) {
            continue;
        }
        match board.get(pt) {
            None => return, // Liberty found
            Some(c) if c == blocker => continue,
            Some(_) => {}
        }
        if !seen.insert(pt) {
            continue;
        }
        pending.push(pt);
        stack.extend(neighbors(pt));
    }

    for &pt in &pending {
        board.set(pt, None);
    }
    captured.extend(pending);
}

impl GameTree {
    /// Play a move of `color` at `point` on node `id`.
    ///
    /// With no color, the side to move is inferred from the node. A point
    /// off the board is recorded as a pass. `allow_illegal` permits
    /// playing on an occupied point, retaking a ko and suicide; record
    /// loading uses it to reproduce games exactly as written.
    ///
    /// # Errors
    /// - [`EditError::Immutable`] if the node cannot take a move
    /// - [`EditError::Occupied`] if the point is occupied
    /// - [`EditError::Ko`] if the move immediately retakes a single-stone ko
    /// - [`EditError::Suicide`] if the move would capture its own chain
    pub fn play_move(
        &mut self,
        id: NodeId,
        point: Point,
        color: Option<Color>,
        allow_illegal: bool,
    ) -> Result<(), EditError> {
        if !self.is_mutable(id, EditKind::Move) {
            return Err(EditError::Immutable);
        }
        let color = color.unwrap_or_else(|| self.next_color(id));

        if !self.size().contains(point) {
            let node = self.node_mut(id);
            node.mv = Some(Move {
                point: PASS_MOVE,
                color,
                captures: 0,
                overwrite: false,
            });
            node.last_move_color = Some(color);
            node.move_number += 1;
            return Ok(());
        }

        let overwrite = self.stone(id, point).is_some();
        if overwrite && !allow_illegal {
            return Err(EditError::Occupied);
        }

        let mut trial = TrialBoard::new(self, id);
        trial.set(point, Some(color));
        let mut removed = Vec::new();
        for n in neighbors(point) {
            capture_stones(&mut trial, n, color, &mut removed);
        }
        let mut captures = removed.len() as i32;

        let previous = self.parent(id).and_then(|p| self[p].get_move());
        if let Some(prev) = previous {
            let retakes_ko = prev.color == color.opponent()
                && !prev.overwrite
                && prev.captures == 1
                && captures == 1
                && trial.get(prev.point).is_none();
            if retakes_ko && !allow_illegal {
                trace!("refused ko retake at {point:?}");
                return Err(EditError::Ko);
            }
        }

        if captures == 0 {
            capture_stones(&mut trial, point, color.opponent(), &mut removed);
            captures = -(removed.len() as i32);
            if captures < 0 && !allow_illegal {
                trace!("refused suicide at {point:?}");
                return Err(EditError::Suicide);
            }
        }

        let node = self.node_mut(id);
        // Captures by Black and suicides by White go to Black's tally.
        if color.sign() * captures < 0 {
            node.black_captures += captures.unsigned_abs();
        } else {
            node.white_captures += captures.unsigned_abs();
        }
        node.board.insert(point, Some(color));
        for pt in removed {
            node.board.insert(pt, None);
        }
        node.mv = Some(Move {
            point,
            color,
            captures,
            overwrite,
        });
        node.last_move_color = Some(color);
        node.move_number += 1;
        Ok(())
    }

    /// Set the stone at `point` on node `id` as a setup edit.
    ///
    /// `None` empties the point. The change relative to the parent is
    /// remembered so the edit can be written back as `AB`, `AW` or `AE`.
    pub fn place_setup(&mut self, id: NodeId, point: Point, stone: Option<Color>) -> Result<(), EditError> {
        if !self.size().contains(point) {
            return Err(EditError::OutOfBounds);
        }
        if !self.is_mutable(id, EditKind::Setup) {
            return Err(EditError::Immutable);
        }
        if self.stone(id, point) == stone {
            return Err(EditError::NoChange);
        }

        let before = self.parent(id).and_then(|p| self.stone(p, point));
        let delta = stone_value(stone) - stone_value(before);
        let node = self.node_mut(id);
        node.board.insert(point, stone);
        if delta == 0 {
            node.setup.remove(&point);
        } else {
            node.setup.insert(point, delta);
        }
        Ok(())
    }

    /// Put `mark` at `point` on node `id`, replacing whatever was there.
    /// `None` clears the point.
    pub fn add_markup(&mut self, id: NodeId, point: Point, mark: Option<Markup>) -> Result<(), EditError> {
        if !self.size().contains(point) {
            return Err(EditError::OutOfBounds);
        }
        if self.markup(id, point) == mark.as_ref() {
            return Err(EditError::NoChange);
        }
        let markup = &mut self.node_mut(id).markup;
        match mark {
            Some(m) => markup.insert(point, m),
            None => markup.remove(&point),
        };
        Ok(())
    }
}
