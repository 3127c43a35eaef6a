//! Writing a game tree back out as record text.
//!
//! The output is equivalent to what was loaded, not byte-identical: every
//! point is written individually (no compressed point lists) and layout is
//! normalised.

use crate::board::{Color, Point};
use crate::constants::{APP_NAME, APP_VERSION, RECORD_HEADER};
use crate::coord;
use crate::editor::VariantStyle;
use crate::load::GameInfo;
use crate::tree::{GameTree, Markup, NodeId, NodeType, SetupKind};

const SETUP_KINDS: [SetupKind; 3] = [SetupKind::AddBlack, SetupKind::AddWhite, SetupKind::AddEmpty];

const MARKUP_IDS: [&str; 6] = ["CR", "SQ", "TR", "MA", "SL", "LB"];

/// Compose the whole tree, with root metadata, into record text.
pub fn compose(tree: &GameTree, game_info: &GameInfo, variant_style: VariantStyle) -> String {
    let composer = Composer {
        tree,
        game_info,
        variant_style,
    };
    let mut out = String::from("(");
    composer.sequence(tree.root(), &mut out);
    out.push(')');
    out
}

/// Escape text for use inside a property value.
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace(']', "\\]")
}

struct Composer<'a> {
    tree: &'a GameTree,
    game_info: &'a GameInfo,
    variant_style: VariantStyle,
}

impl Composer<'_> {
    /// Write `id` and its single-child descendants as one `;` sequence,
    /// then each branch in its own parentheses.
    fn sequence(&self, mut id: NodeId, out: &mut String) {
        loop {
            out.push(';');
            if id == self.tree.root() {
                self.root_props(out);
            }
            out.push_str(&self.node_props(id));

            match self.tree.children(id) {
                [] => return,
                [only] => {
                    out.push('\n');
                    id = *only;
                }
                children => {
                    for &child in children {
                        out.push_str("\n(");
                        self.sequence(child, out);
                        out.push(')');
                    }
                    return;
                }
            }
        }
    }

    fn root_props(&self, out: &mut String) {
        out.push_str(RECORD_HEADER);
        out.push_str(&format!("AP[{APP_NAME}:{APP_VERSION}]"));
        out.push_str(&format!("SZ[{}]", self.tree.size()));
        out.push_str(&format!("ST[{}]\n", self.variant_style));

        let mut wrote_info = false;
        for (id, value) in self.game_info {
            if !value.is_empty() {
                out.push_str(&format!("{id}[{}]", escape_text(value)));
                wrote_info = true;
            }
        }
        if wrote_info {
            out.push('\n');
        }
    }

    fn node_props(&self, id: NodeId) -> String {
        let tree = self.tree;
        let mut props = String::new();

        match tree.node_type(id) {
            NodeType::Move => {
                if let Some(mv) = tree[id].get_move() {
                    let prop_id = if mv.color == Color::White { "W" } else { "B" };
                    props.push_str(&format!("{prop_id}[{}]", coord::encode(mv.point)));
                }
            }
            NodeType::Setup => {
                let mut changed: Vec<Point> = tree[id].setup.keys().copied().collect();
                changed.sort_unstable();
                for kind in SETUP_KINDS {
                    let points: Vec<String> = changed
                        .iter()
                        .filter(|&&p| tree.setup_at(id, p) == Some(kind))
                        .map(|&p| coord::encode(p))
                        .collect();
                    push_list(&mut props, kind.property_id(), &points);
                }
            }
            NodeType::Empty => {}
        }

        // Points sort x first, then y.
        let mut marks: Vec<(Point, &Markup)> = tree[id].markup.iter().map(|(&p, m)| (p, m)).collect();
        marks.sort_unstable_by_key(|&(p, _)| p);
        for markup_id in MARKUP_IDS {
            let values: Vec<String> = marks
                .iter()
                .filter(|(_, mark)| mark.property_id() == markup_id)
                .map(|(p, mark)| match mark {
                    Markup::Label(text) => format!("{}:{}", coord::encode(*p), escape_text(text)),
                    _ => coord::encode(*p),
                })
                .collect();
            push_list(&mut props, markup_id, &values);
        }

        let comment = tree[id].comment();
        if !comment.is_empty() {
            if !props.is_empty() {
                props.push('\n');
            }
            props.push_str(&format!("C[{}]", escape_text(comment)));
        }
        props
    }
}

fn push_list(out: &mut String, id: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    out.push_str(id);
    for value in values {
        out.push('[');
        out.push_str(value);
        out.push(']');
    }
}
