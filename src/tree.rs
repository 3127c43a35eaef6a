//! Game tree of positions with inherited board state.
//!
//! Nodes live in an arena owned by [`GameTree`] and are addressed by
//! [`NodeId`]. Each node stores only the points it changes relative to its
//! parent; reading a point walks up the parent chain until some node has
//! an entry, and a point with no entry anywhere is empty. Capture tallies,
//! the move number and the last move color are plain copies taken when the
//! child is made.
//!
//! Playing moves and placing setup stones or markup is done by the rules in
//! [`crate::rules`].

use std::collections::HashMap;
use std::ops::Index;

use crate::board::{BoardSize, BoardView, Color, Point, stone_value};

/// Handle to a node in a [`GameTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A move recorded on a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    /// Where the stone went; `(0, 0)` for a pass.
    pub point: Point,
    pub color: Color,
    /// Stones removed by this move. Negative for suicide (own stones removed).
    pub captures: i32,
    /// Whether the stone was placed on an occupied point.
    pub overwrite: bool,
}

/// Annotation attached to a point, independent of the stones.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Markup {
    Circle,
    Square,
    Triangle,
    Cross,
    /// Small filled square marking a selected point.
    Selected,
    Label(String),
}

impl Markup {
    /// Record property id this markup is written under.
    pub fn property_id(&self) -> &'static str {
        match self {
            Markup::Circle => "CR",
            Markup::Square => "SQ",
            Markup::Triangle => "TR",
            Markup::Cross => "MA",
            Markup::Selected => "SL",
            Markup::Label(_) => "LB",
        }
    }
}

/// What a node holds. A node never holds both a move and setup stones.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeType {
    Move,
    Setup,
    Empty,
}

/// Kind of edit asked of [`GameTree::is_mutable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditKind {
    Move,
    Setup,
}

/// Net effect of a setup edit at one point, named after its record property.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SetupKind {
    AddBlack,
    AddWhite,
    AddEmpty,
}

impl SetupKind {
    pub fn property_id(self) -> &'static str {
        match self {
            SetupKind::AddBlack => "AB",
            SetupKind::AddWhite => "AW",
            SetupKind::AddEmpty => "AE",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GameNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Points changed at this node; `None` marks a point emptied here.
    pub(crate) board: HashMap<Point, Option<Color>>,
    pub(crate) mv: Option<Move>,
    /// Signed stone change versus the parent for each setup edit.
    pub(crate) setup: HashMap<Point, i32>,
    pub(crate) markup: HashMap<Point, Markup>,
    pub(crate) comment: String,
    pub(crate) black_captures: u32,
    pub(crate) white_captures: u32,
    pub(crate) move_number: u32,
    pub(crate) last_move_color: Option<Color>,
}

impl GameNode {
    fn child_of(parent_id: NodeId, parent: &GameNode) -> Self {
        Self {
            parent: Some(parent_id),
            black_captures: parent.black_captures,
            white_captures: parent.white_captures,
            move_number: parent.move_number,
            last_move_color: parent.last_move_color,
            ..Self::default()
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn get_move(&self) -> Option<&Move> {
        self.mv.as_ref()
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn black_captures(&self) -> u32 {
        self.black_captures
    }

    pub fn white_captures(&self) -> u32 {
        self.white_captures
    }

    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn last_move_color(&self) -> Option<Color> {
        self.last_move_color
    }

    pub fn node_type(&self) -> NodeType {
        if self.mv.is_some() {
            NodeType::Move
        } else if self.setup.values().any(|&d| d != 0) {
            NodeType::Setup
        } else {
            NodeType::Empty
        }
    }

    /// Whether this node has a move at `point`.
    pub fn has_move_at(&self, point: Point) -> bool {
        self.mv.as_ref().is_some_and(|m| m.point == point)
    }
}

/// A game record: board size plus the tree of nodes.
///
/// The arena only grows. A subtree detached by [`GameTree::remove_child`]
/// keeps its slots (and is copied by `clone`) until the tree is dropped;
/// only a never-added child can be reclaimed, through
/// [`GameTree::discard`]. Editing sessions that cut often should reload
/// from composed text to start from a compact arena.
#[derive(Clone, Debug)]
pub struct GameTree {
    size: BoardSize,
    nodes: Vec<GameNode>,
}

impl Default for GameTree {
    fn default() -> Self {
        Self::new(BoardSize::default())
    }
}

impl Index<NodeId> for GameTree {
    type Output = GameNode;

    fn index(&self, id: NodeId) -> &GameNode {
        &self.nodes[id.0]
    }
}

impl GameTree {
    /// Create a tree with an empty root on a board of the given size.
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            nodes: vec![GameNode::default()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn node(&self, id: NodeId) -> &GameNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut GameNode {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    /// The children of this node's parent (including itself); empty at the root.
    pub fn siblings(&self, id: NodeId) -> &[NodeId] {
        match self[id].parent {
            Some(parent) => &self[parent].children,
            None => &[],
        }
    }

    /// Stone at `point` as seen from `id`.
    pub fn stone(&self, id: NodeId, point: Point) -> Option<Color> {
        let mut cursor = Some(id);
        while let Some(node_id) = cursor {
            let node = &self[node_id];
            if let Some(&stone) = node.board.get(&point) {
                return stone;
            }
            cursor = node.parent;
        }
        None
    }

    pub fn markup(&self, id: NodeId, point: Point) -> Option<&Markup> {
        self[id].markup.get(&point)
    }

    /// The setup edit made at `point` on this node, if any, classified by
    /// the stone that results from it.
    pub fn setup_at(&self, id: NodeId, point: Point) -> Option<SetupKind> {
        match self[id].setup.get(&point) {
            Some(&delta) if delta != 0 => Some(match self.stone(id, point) {
                Some(Color::Black) => SetupKind::AddBlack,
                Some(Color::White) => SetupKind::AddWhite,
                None => SetupKind::AddEmpty,
            }),
            _ => None,
        }
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self[id].node_type()
    }

    /// Whether `id` can take an edit of the given kind in place.
    ///
    /// A move needs an empty node without children; setup stones need a
    /// node without children that holds no move.
    pub fn is_mutable(&self, id: NodeId, kind: EditKind) -> bool {
        let node = &self[id];
        if !node.children.is_empty() {
            return false;
        }
        match kind {
            EditKind::Move => node.node_type() == NodeType::Empty,
            EditKind::Setup => node.node_type() != NodeType::Move,
        }
    }

    /// Color to play next from this node.
    ///
    /// Opposite of the last move if there was one; otherwise White when
    /// strictly more black stones than white are set, else Black.
    pub fn next_color(&self, id: NodeId) -> Color {
        if let Some(last) = self[id].last_move_color {
            return last.opponent();
        }
        let balance: i32 = self
            .size
            .points()
            .map(|p| stone_value(self.stone(id, p)))
            .sum();
        if balance < 0 { Color::White } else { Color::Black }
    }

    /// Make a child of `parent` that inherits its counters.
    ///
    /// The child is not part of the tree until passed to [`Self::add_child`].
    pub fn make_child(&mut self, parent: NodeId) -> NodeId {
        let child = GameNode::child_of(parent, &self[parent]);
        self.nodes.push(child);
        NodeId(self.nodes.len() - 1)
    }

    /// Append a child made by [`Self::make_child`] to its parent.
    pub fn add_child(&mut self, child: NodeId) -> bool {
        let Some(parent) = self[child].parent else {
            return false;
        };
        if self[parent].children.contains(&child) {
            return false;
        }
        self.node_mut(parent).children.push(child);
        true
    }

    /// Drop a child that was made but never added.
    ///
    /// Only the most recently made node can be dropped.
    pub fn discard(&mut self, child: NodeId) -> bool {
        let last = self.nodes.len() - 1;
        if child.0 != last || child.0 == 0 || self.is_attached(child) {
            return false;
        }
        self.nodes.pop();
        true
    }

    /// Detach `child` (with its whole subtree) from `parent`. The detached
    /// nodes keep their arena slots.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.node_mut(parent).children;
        match children.iter().position(|&c| c == child) {
            Some(i) => {
                children.remove(i);
                true
            }
            None => false,
        }
    }

    /// Move `child` one place earlier among its siblings.
    pub fn promote(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.node_mut(parent).children;
        match children.iter().position(|&c| c == child) {
            Some(i) if i > 0 => {
                children.swap(i, i - 1);
                true
            }
            _ => false,
        }
    }

    /// Move `child` one place later among its siblings.
    pub fn demote(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.node_mut(parent).children;
        match children.iter().position(|&c| c == child) {
            Some(i) if i + 1 < children.len() => {
                children.swap(i, i + 1);
                true
            }
            _ => false,
        }
    }

    /// Whether `id` is reachable from the root through child links.
    /// Detached nodes stay addressable but are no longer part of the game.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self[current].parent {
            if !self[parent].children.contains(&current) {
                return false;
            }
            current = parent;
        }
        current == self.root()
    }

    /// Replace a node's comment verbatim.
    pub fn set_comment(&mut self, id: NodeId, comment: impl Into<String>) {
        self.node_mut(id).comment = comment.into();
    }

    /// Nodes of the main line (always the first child), starting at the root.
    pub fn main_line(&self) -> Vec<NodeId> {
        let mut line = vec![self.root()];
        let mut current = self.root();
        while let Some(&first) = self[current].children.first() {
            line.push(first);
            current = first;
        }
        line
    }

    /// Pre-order walk of the subtree rooted at `start`.
    pub fn walk(&self, start: NodeId) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![start],
        }
    }

    /// Text view of the board at `id`.
    pub fn board(&self, id: NodeId) -> BoardView<'_> {
        BoardView::new(self, id)
    }
}

/// Iterator returned by [`GameTree::walk`].
pub struct Walk<'a> {
    tree: &'a GameTree,
    stack: Vec<NodeId>,
}

impl Iterator for Walk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree[id].children.iter().rev());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_is_empty() {
        let tree = GameTree::new(BoardSize::square(9));
        let root = tree.root();
        assert_eq!(tree.parent(root), None);
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.node_type(root), NodeType::Empty);
        assert_eq!(tree[root].move_number(), 0);
        assert_eq!(tree[root].black_captures(), 0);
        for p in tree.size().points() {
            assert_eq!(tree.stone(root, p), None);
        }
    }

    #[test]
    fn test_child_inherits_board_through_chain() {
        let mut tree = GameTree::new(BoardSize::square(9));
        let root = tree.root();
        tree.node_mut(root).board.insert((3, 3), Some(Color::Black));
        let a = tree.make_child(root);
        tree.add_child(a);
        let b = tree.make_child(a);
        tree.add_child(b);
        assert_eq!(tree.stone(b, (3, 3)), Some(Color::Black));

        tree.node_mut(a).board.insert((3, 3), None);
        assert_eq!(tree.stone(b, (3, 3)), None);
        assert_eq!(tree.stone(root, (3, 3)), Some(Color::Black));
        assert!(tree[b].board.is_empty());
    }

    #[test]
    fn test_make_child_copies_counters() {
        let mut tree = GameTree::default();
        let root = tree.root();
        {
            let node = tree.node_mut(root);
            node.black_captures = 2;
            node.white_captures = 5;
            node.move_number = 7;
            node.last_move_color = Some(Color::White);
        }
        let child = tree.make_child(root);
        assert_eq!(tree[child].black_captures(), 2);
        assert_eq!(tree[child].white_captures(), 5);
        assert_eq!(tree[child].move_number(), 7);
        assert_eq!(tree[child].last_move_color(), Some(Color::White));

        // Independent after creation.
        tree.node_mut(child).black_captures += 1;
        assert_eq!(tree[root].black_captures(), 2);
    }

    #[test]
    fn test_made_child_is_not_attached_until_added() {
        let mut tree = GameTree::default();
        let root = tree.root();
        let child = tree.make_child(root);
        assert!(tree.children(root).is_empty());
        assert!(!tree.is_attached(child));
        assert!(tree.add_child(child));
        assert!(!tree.add_child(child));
        assert_eq!(tree.children(root), &[child]);
        assert!(tree.is_attached(child));
    }

    #[test]
    fn test_discard_only_unattached_last() {
        let mut tree = GameTree::default();
        let root = tree.root();
        let a = tree.make_child(root);
        tree.add_child(a);
        assert!(!tree.discard(a));
        let b = tree.make_child(root);
        assert!(tree.discard(b));
        assert!(!tree.discard(root));
    }

    #[test]
    fn test_remove_promote_demote() {
        let mut tree = GameTree::default();
        let root = tree.root();
        let ids: Vec<NodeId> = (0..3)
            .map(|_| {
                let c = tree.make_child(root);
                tree.add_child(c);
                c
            })
            .collect();
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        assert!(!tree.promote(root, a));
        assert!(tree.promote(root, c));
        assert_eq!(tree.children(root), &[a, c, b]);
        assert!(!tree.demote(root, b));
        assert!(tree.demote(root, a));
        assert_eq!(tree.children(root), &[c, a, b]);

        let grandchild = tree.make_child(a);
        tree.add_child(grandchild);
        assert!(tree.remove_child(root, a));
        assert!(!tree.remove_child(root, a));
        assert_eq!(tree.children(root), &[c, b]);
        assert!(!tree.is_attached(grandchild));
    }

    #[test]
    fn test_detached_subtree_keeps_its_slots() {
        let mut tree = GameTree::default();
        let root = tree.root();
        let a = tree.make_child(root);
        tree.add_child(a);
        tree.set_comment(a, "cut me");
        let b = tree.make_child(a);
        tree.add_child(b);
        let before = tree.nodes.len();

        assert!(tree.remove_child(root, a));
        assert_eq!(tree.nodes.len(), before);
        assert!(!tree.is_attached(b));
        assert_eq!(tree[a].comment(), "cut me");
        assert_eq!(tree.walk(root).count(), 1);

        // A fresh child takes a new slot; the detached ones are not reused.
        let c = tree.make_child(root);
        assert_eq!(tree.nodes.len(), before + 1);
        assert!(!tree.discard(b));
        assert!(tree.discard(c));
    }

    #[test]
    fn test_siblings() {
        let mut tree = GameTree::default();
        let root = tree.root();
        assert!(tree.siblings(root).is_empty());
        let a = tree.make_child(root);
        tree.add_child(a);
        let b = tree.make_child(root);
        tree.add_child(b);
        assert_eq!(tree.siblings(b), &[a, b]);
    }

    #[test]
    fn test_node_type_and_mutability() {
        let mut tree = GameTree::default();
        let root = tree.root();
        assert!(tree.is_mutable(root, EditKind::Move));
        assert!(tree.is_mutable(root, EditKind::Setup));

        tree.node_mut(root).setup.insert((1, 1), -1);
        assert_eq!(tree.node_type(root), NodeType::Setup);
        assert!(!tree.is_mutable(root, EditKind::Move));
        assert!(tree.is_mutable(root, EditKind::Setup));

        let child = tree.make_child(root);
        tree.add_child(child);
        assert!(!tree.is_mutable(root, EditKind::Setup));

        tree.node_mut(child).mv = Some(Move {
            point: (2, 2),
            color: Color::Black,
            captures: 0,
            overwrite: false,
        });
        assert_eq!(tree.node_type(child), NodeType::Move);
        assert!(!tree.is_mutable(child, EditKind::Move));
        assert!(!tree.is_mutable(child, EditKind::Setup));
    }

    #[test]
    fn test_walk_is_preorder() {
        let mut tree = GameTree::default();
        let root = tree.root();
        let a = tree.make_child(root);
        tree.add_child(a);
        let a1 = tree.make_child(a);
        tree.add_child(a1);
        let b = tree.make_child(root);
        tree.add_child(b);
        let order: Vec<NodeId> = tree.walk(root).collect();
        assert_eq!(order, vec![root, a, a1, b]);
        assert_eq!(tree.main_line(), vec![root, a, a1]);
    }

    #[test]
    fn test_next_color_counts_setup_stones() {
        let mut tree = GameTree::new(BoardSize::square(5));
        let root = tree.root();
        assert_eq!(tree.next_color(root), Color::Black);
        tree.node_mut(root).board.insert((1, 1), Some(Color::Black));
        assert_eq!(tree.next_color(root), Color::White);
        tree.node_mut(root).board.insert((2, 2), Some(Color::White));
        assert_eq!(tree.next_color(root), Color::Black);
        tree.node_mut(root).last_move_color = Some(Color::Black);
        assert_eq!(tree.next_color(root), Color::White);
    }

    #[test]
    fn test_board_view() {
        let mut tree = GameTree::new(BoardSize::new(3, 2));
        let root = tree.root();
        tree.node_mut(root).board.insert((1, 1), Some(Color::Black));
        tree.node_mut(root).board.insert((3, 2), Some(Color::White));
        assert_eq!(tree.board(root).to_string(), "X . .\n. . O\n");
    }
}
