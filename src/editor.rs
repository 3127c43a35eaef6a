//! Interactive editor over a game tree.
//!
//! The editor owns the tree and a cursor into it. A user interface drives
//! it through [`Editor::click`] and the navigation and tree-edit commands,
//! and learns about changes through listeners registered with
//! [`Editor::add_listener`]. Every change is reported synchronously, in
//! registration order; refused commands report nothing.
//!
//! ## Tools
//!
//! - `navOnly` - clicks only navigate, tree edits are disabled
//! - `auto` - navigate to a matching child, else play the next color
//! - `playB`, `playW` - play a stone of that color
//! - `addB`, `addW`, `addE` - setup stones (ctrl plays a move instead)
//! - `clrMark` - remove markup
//! - `circle`, `square`, `triangle`, `cross`, `block` - shape markup
//! - `label` - text label, advancing to the next label after each use

use std::fmt;
use std::str::FromStr;

use log::trace;
use thiserror::Error;

use crate::board::{BoardSize, Color, Point};
use crate::compose::compose;
use crate::constants::{DEFAULT_LABEL, LETTER_LABEL, MAX_VARIANT_STYLE};
use crate::coord::CoordStyle;
use crate::load::{self, GameInfo};
use crate::sgf::ParseError;
use crate::tree::{EditKind, GameTree, Markup, NodeId};

/// How variations are shown. Bit 0 picks siblings instead of children as
/// the variants of the current position; bit 1 hides their markup.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VariantStyle(u8);

impl VariantStyle {
    /// A style from its record value; only 0 through 3 exist.
    pub fn new(value: u8) -> Option<Self> {
        (value <= MAX_VARIANT_STYLE).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn shows_siblings(self) -> bool {
        self.0 & 1 != 0
    }

    pub fn hides_markup(self) -> bool {
        self.0 & 2 != 0
    }

    /// Flip the markup bit when `show` is set, otherwise the children/siblings bit.
    pub fn toggled(self, show: bool) -> Self {
        if show { Self(self.0 ^ 2) } else { Self(self.0 ^ 1) }
    }
}

impl fmt::Display for VariantStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    NavOnly,
    #[default]
    Auto,
    PlayBlack,
    PlayWhite,
    AddBlack,
    AddWhite,
    AddEmpty,
    ClearMarkup,
    Circle,
    Square,
    Triangle,
    Cross,
    Block,
    Label,
}

impl Tool {
    pub const ALL: [Tool; 14] = [
        Tool::NavOnly,
        Tool::Auto,
        Tool::PlayBlack,
        Tool::PlayWhite,
        Tool::AddBlack,
        Tool::AddWhite,
        Tool::AddEmpty,
        Tool::ClearMarkup,
        Tool::Circle,
        Tool::Square,
        Tool::Triangle,
        Tool::Cross,
        Tool::Block,
        Tool::Label,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::NavOnly => "navOnly",
            Tool::Auto => "auto",
            Tool::PlayBlack => "playB",
            Tool::PlayWhite => "playW",
            Tool::AddBlack => "addB",
            Tool::AddWhite => "addW",
            Tool::AddEmpty => "addE",
            Tool::ClearMarkup => "clrMark",
            Tool::Circle => "circle",
            Tool::Square => "square",
            Tool::Triangle => "triangle",
            Tool::Cross => "cross",
            Tool::Block => "block",
            Tool::Label => "label",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Modifier keys held during a click.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Allow illegal moves; with the add tools, play a move instead.
    pub ctrl: bool,
    /// Search the whole tree when navigating by click.
    pub shift: bool,
}

/// What changed, as sent to listeners.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Change {
    /// Nodes were added, removed or reordered.
    pub tree: bool,
    /// The cursor moved.
    pub nav: bool,
    /// Stones changed on the current node.
    pub stones: bool,
    /// Markup changed on the current node, or how variants are marked.
    pub markup: bool,
    pub tool: Option<Tool>,
    pub label: Option<String>,
    pub coord_style: Option<CoordStyle>,
    pub variant_style: Option<VariantStyle>,
    pub game_info: bool,
    pub comment: Option<String>,
}

/// Handle returned by [`Editor::add_listener`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Box<dyn FnMut(&Change)>;

/// Initial editor settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorConfig {
    pub size: BoardSize,
    pub coord_style: CoordStyle,
    pub tool: Tool,
    pub variant_style: VariantStyle,
}

/// Editor state: the tree, the cursor and the tool settings.
pub struct Editor {
    tree: GameTree,
    current: NodeId,
    /// Nodes left by `prev_node`, replayed by `next_node`.
    history: Vec<NodeId>,
    tool: Tool,
    label: String,
    coord_style: CoordStyle,
    variant_style: VariantStyle,
    game_info: GameInfo,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor on an empty board of the given size.
    pub fn new(size: BoardSize) -> Self {
        Self::with_config(EditorConfig {
            size,
            ..EditorConfig::default()
        })
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let tree = GameTree::new(config.size);
        let current = tree.root();
        Self {
            tree,
            current,
            history: Vec::new(),
            tool: config.tool,
            label: DEFAULT_LABEL.to_string(),
            coord_style: config.coord_style,
            variant_style: config.variant_style,
            game_info: GameInfo::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    pub fn add_listener(&mut self, listener: impl FnMut(&Change) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Send `change` to every listener. A cursor move clears the navigation
    /// history unless `keep_history` is set.
    fn notify(&mut self, change: Change, keep_history: bool) {
        if change.nav && !keep_history {
            self.history.clear();
        }
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }

    fn nav_change() -> Change {
        Change {
            nav: true,
            ..Change::default()
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn size(&self) -> BoardSize {
        self.tree.size()
    }

    pub fn comment(&self) -> &str {
        self.tree[self.current].comment()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn coord_style(&self) -> CoordStyle {
        self.coord_style
    }

    pub fn variant_style(&self) -> VariantStyle {
        self.variant_style
    }

    pub fn game_info(&self) -> &GameInfo {
        &self.game_info
    }

    /// Nodes shown as variants of the current position.
    pub fn variants(&self) -> &[NodeId] {
        if self.variant_style.hides_markup() {
            &[]
        } else if self.variant_style.shows_siblings() {
            self.tree.siblings(self.current)
        } else {
            self.tree.children(self.current)
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Select a tool. Selecting the label tool again switches the label
    /// between numbers and letters. Returns false if nothing changed.
    pub fn set_tool(&mut self, tool: Tool) -> bool {
        if tool == Tool::Label && self.tool == Tool::Label {
            let next = if is_integer(&self.label) {
                LETTER_LABEL
            } else {
                DEFAULT_LABEL
            };
            self.set_label(next);
            return true;
        }
        if tool == self.tool {
            return false;
        }
        self.tool = tool;
        self.notify(
            Change {
                tool: Some(tool),
                label: Some(self.label.clone()),
                ..Change::default()
            },
            false,
        );
        true
    }

    /// Set the next label and select the label tool.
    pub fn set_label(&mut self, text: &str) {
        let spaced: String = text
            .chars()
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .collect();
        let trimmed = spaced.trim();
        self.label = if trimmed.is_empty() { DEFAULT_LABEL } else { trimmed }.to_string();
        self.tool = Tool::Label;
        self.notify(
            Change {
                tool: Some(Tool::Label),
                label: Some(self.label.clone()),
                ..Change::default()
            },
            false,
        );
    }

    pub fn toggle_coord_style(&mut self) {
        self.set_coord_style(self.coord_style.next());
    }

    pub fn set_coord_style(&mut self, style: CoordStyle) {
        self.coord_style = style;
        self.notify(
            Change {
                coord_style: Some(style),
                ..Change::default()
            },
            false,
        );
    }

    pub fn toggle_variant_style(&mut self, show: bool) {
        self.apply_variant_style(self.variant_style.toggled(show));
    }

    /// Set the variant style from its numeric value; only 0 through 3 are accepted.
    pub fn set_variant_style(&mut self, value: u8) -> bool {
        match VariantStyle::new(value) {
            Some(style) => {
                self.apply_variant_style(style);
                true
            }
            None => false,
        }
    }

    fn apply_variant_style(&mut self, style: VariantStyle) {
        self.variant_style = style;
        self.notify(
            Change {
                variant_style: Some(style),
                markup: true,
                ..Change::default()
            },
            false,
        );
    }

    pub fn set_game_info(&mut self, info: GameInfo) {
        self.game_info = info;
        self.notify_game_info();
    }

    pub fn set_game_info_field(&mut self, id: &str, value: &str) {
        self.game_info.insert(id.to_string(), value.to_string());
        self.notify_game_info();
    }

    fn notify_game_info(&mut self) {
        self.notify(
            Change {
                game_info: true,
                ..Change::default()
            },
            false,
        );
    }

    /// Replace the current node's comment: trimmed, with line breaks as LF.
    pub fn set_comment(&mut self, text: &str) {
        let text = text
            .trim()
            .replace("\r\n", "\n")
            .replace("\n\r", "\n")
            .replace('\r', "\n");
        self.tree.set_comment(self.current, text.clone());
        self.notify(
            Change {
                comment: Some(text),
                ..Change::default()
            },
            false,
        );
    }

    // =========================================================================
    // Whole-record load and save
    // =========================================================================

    /// Replace the tree and put the cursor on its root.
    pub fn load_root(&mut self, tree: GameTree) {
        self.tree = tree;
        self.current = self.tree.root();
        self.notify(
            Change {
                tree: true,
                nav: true,
                stones: true,
                ..Change::default()
            },
            false,
        );
    }

    /// Parse record text and load it. On error the editor is unchanged.
    pub fn load_record(&mut self, text: &str) -> Result<(), ParseError> {
        let record = load::load(text)?;
        if let Some(style) = record.variant_style {
            self.apply_variant_style(style);
        }
        self.set_game_info(record.game_info);
        self.load_root(record.tree);
        Ok(())
    }

    /// Record text for the whole tree.
    pub fn compose_record(&self) -> String {
        compose(&self.tree, &self.game_info, self.variant_style)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move forward `steps` nodes, retracing earlier backward steps when
    /// there are any, else following first children. Negative `steps` goes
    /// to the end of the line. Returns false at a leaf.
    pub fn next_node(&mut self, mut steps: i32) -> bool {
        if self.tree.children(self.current).is_empty() {
            return false;
        }
        while steps != 0 {
            let Some(&first) = self.tree.children(self.current).first() else {
                break;
            };
            self.current = self.history.pop().unwrap_or(first);
            if steps > 0 {
                steps -= 1;
            }
        }
        trace!("next_node -> {:?}", self.current);
        self.notify(Self::nav_change(), true);
        true
    }

    /// Move back `steps` nodes (negative: to the root). Returns false at the root.
    pub fn prev_node(&mut self, mut steps: i32) -> bool {
        if self.tree.parent(self.current).is_none() {
            return false;
        }
        while steps != 0 {
            let Some(parent) = self.tree.parent(self.current) else {
                break;
            };
            self.history.push(self.current);
            self.current = parent;
            if steps > 0 {
                steps -= 1;
            }
        }
        trace!("prev_node -> {:?}", self.current);
        self.notify(Self::nav_change(), true);
        true
    }

    /// Switch to the sibling `delta` places away, wrapping around.
    pub fn next_sibling(&mut self, delta: isize) -> bool {
        let siblings = self.tree.siblings(self.current);
        if siblings.len() <= 1 {
            return false;
        }
        let Some(i) = siblings.iter().position(|&s| s == self.current) else {
            return false;
        };
        let len = siblings.len() as isize;
        let target = siblings[(i as isize + delta).rem_euclid(len) as usize];
        self.current = target;
        self.notify(Self::nav_change(), false);
        true
    }

    /// Go back to the nearest earlier node with more than one child.
    pub fn prev_branch_point(&mut self) -> bool {
        let mut node = self.current;
        while let Some(parent) = self.tree.parent(node) {
            if self.tree.children(parent).len() != 1 {
                break;
            }
            node = parent;
        }
        match self.tree.parent(node) {
            Some(branch) => {
                self.current = branch;
                self.notify(Self::nav_change(), false);
                true
            }
            None => false,
        }
    }

    /// Jump to `node`. Returns false if it is already current or not in the tree.
    pub fn set_current(&mut self, node: NodeId) -> bool {
        if node == self.current || !self.tree.is_attached(node) {
            return false;
        }
        self.current = node;
        self.notify(Self::nav_change(), false);
        true
    }

    /// Jump to the first node, in depth-first order from `start`, whose move
    /// is at `point`. The subtree of `skip` is not searched.
    pub fn jump_to_move(&mut self, point: Point, start: NodeId, skip: Option<NodeId>) -> bool {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if Some(id) == skip {
                continue;
            }
            if self.tree[id].has_move_at(point) {
                self.current = id;
                self.notify(Self::nav_change(), false);
                return true;
            }
            stack.extend(self.tree.children(id).iter().rev());
        }
        false
    }

    /// Go to a child with a move at `point`. With `deep`, search each
    /// child's subtree and finally the rest of the tree.
    fn navigate(&mut self, point: Point, deep: bool) -> bool {
        let children = self.tree.children(self.current).to_vec();
        for child in children {
            if deep {
                if self.jump_to_move(point, child, None) {
                    return true;
                }
            } else if self.tree[child].has_move_at(point) {
                self.current = child;
                self.notify(Self::nav_change(), false);
                return true;
            }
        }
        deep && self.jump_to_move(point, self.tree.root(), Some(self.current))
    }

    // =========================================================================
    // Tree edits
    // =========================================================================

    /// Delete the current node and its subtree; the cursor moves to the parent.
    pub fn cut_current(&mut self) -> bool {
        if self.tool == Tool::NavOnly {
            return false;
        }
        let Some(parent) = self.tree.parent(self.current) else {
            return false;
        };
        self.tree.remove_child(parent, self.current);
        self.current = parent;
        self.notify(
            Change {
                tree: true,
                nav: true,
                ..Change::default()
            },
            false,
        );
        true
    }

    /// Raise the current variation one place among its siblings.
    pub fn promote(&mut self) -> bool {
        self.reorder(GameTree::promote)
    }

    /// Lower the current variation one place among its siblings.
    pub fn demote(&mut self) -> bool {
        self.reorder(GameTree::demote)
    }

    fn reorder(&mut self, op: fn(&mut GameTree, NodeId, NodeId) -> bool) -> bool {
        if self.tool == Tool::NavOnly {
            return false;
        }
        let Some(parent) = self.tree.parent(self.current) else {
            return false;
        };
        if !op(&mut self.tree, parent, self.current) {
            return false;
        }
        self.notify(
            Change {
                tree: true,
                ..Change::default()
            },
            false,
        );
        true
    }

    // =========================================================================
    // Clicks
    // =========================================================================

    /// Apply the active tool at `point`. Returns true if anything changed.
    pub fn click(&mut self, point: Point, modifiers: Modifiers) -> bool {
        let Modifiers { ctrl, shift } = modifiers;
        match self.tool {
            Tool::NavOnly => self.navigate(point, shift),
            Tool::Auto => self.navigate(point, shift) || (!shift && self.play_move(point, None, ctrl)),
            Tool::PlayBlack => self.play_move(point, Some(Color::Black), ctrl),
            Tool::PlayWhite => self.play_move(point, Some(Color::White), ctrl),
            Tool::AddBlack if ctrl => self.play_move(point, Some(Color::Black), true),
            Tool::AddBlack => self.place_setup(point, Some(Color::Black)),
            Tool::AddWhite if ctrl => self.play_move(point, Some(Color::White), true),
            Tool::AddWhite => self.place_setup(point, Some(Color::White)),
            Tool::AddEmpty => self.place_setup(point, None),
            Tool::ClearMarkup => self.set_markup(point, None),
            Tool::Circle => self.set_markup(point, Some(Markup::Circle)),
            Tool::Square => self.set_markup(point, Some(Markup::Square)),
            Tool::Triangle => self.set_markup(point, Some(Markup::Triangle)),
            Tool::Cross => self.set_markup(point, Some(Markup::Cross)),
            Tool::Block => self.set_markup(point, Some(Markup::Selected)),
            Tool::Label => {
                let label = Markup::Label(self.label.clone());
                self.set_markup(point, Some(label))
            }
        }
    }

    /// Play a move from the cursor: in place when the current node can take
    /// it, otherwise in a new child that is kept only if the move is legal.
    pub fn play_move(&mut self, point: Point, color: Option<Color>, allow_illegal: bool) -> bool {
        let current = self.current;
        let in_place =
            self.tree.is_mutable(current, EditKind::Move) && self.tree.parent(current).is_some();
        if in_place {
            if let Err(e) = self.tree.play_move(current, point, color, allow_illegal) {
                trace!("move at {point:?} refused: {e}");
                return false;
            }
            self.notify(
                Change {
                    stones: true,
                    ..Change::default()
                },
                false,
            );
            return true;
        }
        let child = self.tree.make_child(current);
        if let Err(e) = self.tree.play_move(child, point, color, allow_illegal) {
            trace!("move at {point:?} refused: {e}");
            self.tree.discard(child);
            return false;
        }
        self.enter_new_child(child);
        true
    }

    /// Setup edit from the cursor. Asking for the stone already there
    /// removes it.
    pub fn place_setup(&mut self, point: Point, stone: Option<Color>) -> bool {
        let current = self.current;
        let mut stone = stone;
        if stone == self.tree.stone(current, point) {
            if stone.is_none() {
                return false;
            }
            stone = None;
        }
        if self.tree.is_mutable(current, EditKind::Setup) {
            if self.tree.place_setup(current, point, stone).is_err() {
                return false;
            }
            self.notify(
                Change {
                    stones: true,
                    ..Change::default()
                },
                false,
            );
            return true;
        }
        let child = self.tree.make_child(current);
        if self.tree.place_setup(child, point, stone).is_err() {
            self.tree.discard(child);
            return false;
        }
        self.enter_new_child(child);
        true
    }

    fn enter_new_child(&mut self, child: NodeId) {
        self.tree.add_child(child);
        self.current = child;
        self.notify(
            Change {
                tree: true,
                nav: true,
                stones: true,
                ..Change::default()
            },
            false,
        );
    }

    /// Markup edit on the current node. Repeating the mark already there
    /// removes it; placing a label advances the next label.
    pub fn set_markup(&mut self, point: Point, mark: Option<Markup>) -> bool {
        let current = self.current;
        let mut mark = mark;
        if mark.as_ref() == self.tree.markup(current, point) {
            if mark.is_none() {
                return false;
            }
            mark = None;
        }
        let placed_label = match &mark {
            Some(Markup::Label(text)) => Some(text.clone()),
            _ => None,
        };
        if self.tree.add_markup(current, point, mark).is_err() {
            return false;
        }
        if let Some(next) = placed_label.as_deref().and_then(next_label) {
            self.set_label(&next);
        }
        self.notify(
            Change {
                markup: true,
                ..Change::default()
            },
            false,
        );
        true
    }
}

/// Whether `text` is an optionally negative decimal integer.
fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// The label after `label`: integers count up, a trailing letter advances
/// (`z` wraps to `A`, `Z` to `a`). Other labels have no successor.
fn next_label(label: &str) -> Option<String> {
    if is_integer(label) {
        return label.parse::<i64>().ok().and_then(|n| n.checked_add(1)).map(|n| n.to_string());
    }
    let last = label.chars().last().filter(char::is_ascii_alphabetic)?;
    let next = match last {
        'z' => 'A',
        'Z' => 'a',
        c => (c as u8 + 1) as char,
    };
    let mut out = label[..label.len() - 1].to_string();
    out.push(next);
    Some(out)
}
