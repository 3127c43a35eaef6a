//! Building a game tree from a parsed record.
//!
//! Moves are played with illegal moves allowed so that recorded games are
//! reproduced exactly, even when they break the rules. Edits the tree still
//! refuses (a second move in one node, setup in a move node, points off the
//! board) are skipped.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::board::{BoardSize, Color, Point};
use crate::constants::{GAME_INFO_IDS, MULTILINE_INFO_ID};
use crate::coord;
use crate::editor::VariantStyle;
use crate::rules::EditError;
use crate::sgf::{self, ParseError, Property, SgfTree};
use crate::tree::{GameTree, Markup, NodeId};

/// Free-form game metadata keyed by property id (`PB`, `KM`, `RE`, ...).
pub type GameInfo = BTreeMap<String, String>;

/// Everything a record file holds.
#[derive(Clone, Debug)]
pub struct Record {
    pub tree: GameTree,
    pub game_info: GameInfo,
    /// The `ST` property, when present and valid.
    pub variant_style: Option<VariantStyle>,
}

/// Parse record text and build its game tree.
pub fn load(text: &str) -> Result<Record, ParseError> {
    let parsed = sgf::parse(text)?;
    Ok(load_parsed(&parsed))
}

/// Build a game tree from an already parsed record.
pub fn load_parsed(sgf: &SgfTree) -> Record {
    let mut size = BoardSize::default();
    let mut variant_style = None;
    let mut game_info = GameInfo::new();

    let root_props = sgf.root().map_or(&[][..], |root| root.props.as_slice());
    for prop in root_props {
        let value = prop.joined();
        match prop.id.as_str() {
            "SZ" => size = BoardSize::parse(&value),
            "ST" => variant_style = value.parse().ok().and_then(VariantStyle::new),
            id if GAME_INFO_IDS.contains(&id) => {
                let value = if id == MULTILINE_INFO_ID {
                    value
                } else {
                    value.replace('\n', " ")
                };
                if !value.is_empty() {
                    game_info.insert(id.to_string(), value);
                }
            }
            _ => {}
        }
    }

    let mut tree = GameTree::new(size);
    // Each entry is a sequence and the node it continues from; the
    // outermost sequence starts on the root itself.
    let mut stack: Vec<(&SgfTree, Option<NodeId>)> = vec![(sgf, None)];
    while let Some((seq, parent)) = stack.pop() {
        let mut last = parent;
        for sgf_node in &seq.nodes {
            let id = match last {
                Some(p) => {
                    let child = tree.make_child(p);
                    tree.add_child(child);
                    child
                }
                None => tree.root(),
            };
            for prop in &sgf_node.props {
                load_property(&mut tree, id, prop);
            }
            last = Some(id);
        }
        if let Some(last) = last {
            stack.extend(seq.variations.iter().rev().map(|v| (v, Some(last))));
        }
    }

    info!("loaded {}x{} record with {} game-info fields", size.x, size.y, game_info.len());
    Record {
        tree,
        game_info,
        variant_style,
    }
}

fn is_root_property(id: &str) -> bool {
    id == "SZ" || id == "ST" || GAME_INFO_IDS.contains(&id)
}

fn report(id: &str, point: Point, result: Result<(), EditError>) {
    if let Err(e) = result {
        debug!("skipping {id} at {point:?}: {e}");
    }
}

fn load_property(tree: &mut GameTree, node: NodeId, prop: &Property) {
    let id = prop.id.as_str();
    let shape = match id {
        "B" | "W" => {
            let color = if id == "B" { Color::Black } else { Color::White };
            let point = coord::decode(prop.values.first().map_or("", String::as_str));
            report(id, point, tree.play_move(node, point, Some(color), true));
            return;
        }
        "AB" | "AW" | "AE" => {
            let stone = match id {
                "AB" => Some(Color::Black),
                "AW" => Some(Color::White),
                _ => None,
            };
            apply_point_list(&prop.values, |point| {
                report(id, point, tree.place_setup(node, point, stone));
            });
            return;
        }
        "LB" | "L" => {
            for value in &prop.values {
                let point = coord::decode(&value.chars().take(2).collect::<String>());
                let text: String = value.chars().skip(3).collect::<String>().replace('\n', " ");
                if text.is_empty() {
                    continue;
                }
                report(id, point, tree.add_markup(node, point, Some(Markup::Label(text))));
            }
            return;
        }
        "C" => {
            let text = prop.joined();
            let node = tree.node_mut(node);
            if node.comment.is_empty() {
                node.comment = text;
            } else {
                node.comment.push('\n');
                node.comment.push_str(&text);
            }
            return;
        }
        "CR" => Markup::Circle,
        "SQ" => Markup::Square,
        "TR" => Markup::Triangle,
        "MA" | "M" => Markup::Cross,
        "SL" => Markup::Selected,
        _ => {
            if !is_root_property(id) {
                debug!("ignoring property {id}");
            }
            return;
        }
    };
    apply_point_list(&prop.values, |point| {
        report(id, point, tree.add_markup(node, point, Some(shape.clone())));
    });
}

/// Call `apply` on every point of a point list.
///
/// A value `ab:cd` is a rectangle with corners `ab` and `cd`. Equal corners
/// give one point; corners out of order give just the two corners.
fn apply_point_list(values: &[String], mut apply: impl FnMut(Point)) {
    for value in values {
        let corner = coord::decode(&value.chars().take(2).collect::<String>());
        if value.chars().nth(2) != Some(':') {
            apply(corner);
            continue;
        }
        let other = coord::decode(&value.chars().skip(3).collect::<String>());
        if other == corner {
            apply(corner);
        } else if other.0 < corner.0 || other.1 < corner.1 {
            apply(corner);
            apply(other);
        } else {
            for x in corner.0..=other.0 {
                for y in corner.1..=other.1 {
                    apply((x, y));
                }
            }
        }
    }
}
