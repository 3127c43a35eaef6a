//! Kifu-Rust: the core of a Go game-record editor.
//!
//! Records are read and written in the SGF text format. A record loads
//! into a tree of positions; the editor walks the tree, plays moves under
//! the rules of Go, places setup stones and markup, and writes the record
//! back out.
//!
//! ## Modules
//!
//! - [`constants`] - Board size limits and record format constants
//! - [`board`] - Colors, board sizes and a text view of a position
//! - [`coord`] - Two-letter record coordinates and label styles
//! - [`sgf`] - Record text parser
//! - [`tree`] - Game tree of positions
//! - [`rules`] - Moves, captures, ko, suicide, setup and markup
//! - [`load`] - Building a game tree from a parsed record
//! - [`compose`] - Writing a game tree back to record text
//! - [`playout`] - Random games for demo records
//! - [`editor`] - Cursor, tools, navigation and change notifications
//!
//! ## Example
//!
//! ```
//! use kifu_rust::editor::{Editor, Modifiers};
//!
//! let mut editor = Editor::default();
//! editor.load_record("(;SZ[9];B[ee];W[gc])").unwrap();
//! editor.next_node(-1);
//! assert!(editor.click((3, 7), Modifiers::default()));
//! println!("{}", editor.tree().board(editor.current()));
//! println!("{}", editor.compose_record());
//! ```

pub mod board;
pub mod compose;
pub mod constants;
pub mod coord;
pub mod editor;
pub mod load;
pub mod playout;
pub mod rules;
pub mod sgf;
pub mod tree;

pub use board::{BoardSize, Color, Point};
pub use editor::{Change, Editor, EditorConfig, Modifiers, Tool, VariantStyle};
pub use rules::EditError;
pub use sgf::ParseError;
pub use tree::{GameTree, NodeId};
