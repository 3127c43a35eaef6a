//! Random games, used to produce demo records.
//!
//! A playout plays random legal moves on the main line until both sides
//! pass in a row or the move limit is reached. Points that are a
//! single-point eye of the side to move are never filled.

use fastrand::Rng;
use log::debug;

use crate::board::{BoardSize, Color, Point, neighbors};
use crate::constants::PASS_MOVE;
use crate::tree::{GameTree, NodeId};

/// Play a random game of at most `max_moves` moves, passes included.
pub fn random_game(size: BoardSize, max_moves: usize, rng: &mut Rng) -> GameTree {
    let mut tree = GameTree::new(size);
    let mut node = tree.root();
    let mut passes = 0;

    for _ in 0..max_moves {
        if passes >= 2 {
            break;
        }
        let color = tree.next_color(node);
        let child = match choose_random_move(&mut tree, node, color, rng) {
            Some(child) => {
                passes = 0;
                child
            }
            None => {
                let child = tree.make_child(node);
                if tree.play_move(child, PASS_MOVE, Some(color), false).is_err() {
                    tree.discard(child);
                    break;
                }
                passes += 1;
                child
            }
        };
        tree.add_child(child);
        node = child;
    }

    debug!("random game of {} moves", tree[node].move_number());
    tree
}

/// Whether `point` is empty and every neighbour on the board holds a `color` stone.
fn is_eye(tree: &GameTree, node: NodeId, point: Point, color: Color) -> bool {
    let size = tree.size();
    tree.stone(node, point).is_none()
        && neighbors(point)
            .into_iter()
            .filter(|&n| size.contains(n))
            .all(|n| tree.stone(node, n) == Some(color))
}

/// Try the candidate points in random order and return the first child
/// in which a move was legal. The child is made but not yet added.
fn choose_random_move(tree: &mut GameTree, node: NodeId, color: Color, rng: &mut Rng) -> Option<NodeId> {
    let mut candidates: Vec<Point> = tree
        .size()
        .points()
        .filter(|&p| tree.stone(node, p).is_none() && !is_eye(tree, node, p, color))
        .collect();

    let n = candidates.len();
    for i in 0..n {
        let j = rng.usize(i..n);
        candidates.swap(i, j);

        let child = tree.make_child(node);
        if tree.play_move(child, candidates[i], Some(color), false).is_ok() {
            return Some(child);
        }
        tree.discard(child);
    }
    None
}
