//! Record tests: parsing, loading and composing whole records.
//!
//! Round trips are checked semantically. A record is loaded, composed,
//! loaded again, and the two trees must describe the same game: the same
//! shape, moves, setup, markup and comments, and the same root metadata.

use kifu_rust::board::{BoardSize, Color};
use kifu_rust::compose::compose;
use kifu_rust::editor::{Editor, Modifiers, Tool, VariantStyle};
use kifu_rust::load::{Record, load};
use kifu_rust::sgf::{parse, parse_collection};
use kifu_rust::tree::{GameTree, Markup, NodeId, NodeType, SetupKind};
use pretty_assertions::assert_eq;

// =============================================================================
// Helper functions
// =============================================================================

/// One line per node in pre-order, indented by depth.
fn describe(tree: &GameTree) -> Vec<String> {
    let mut lines = Vec::new();
    describe_node(tree, tree.root(), 0, &mut lines);
    lines
}

fn describe_node(tree: &GameTree, id: NodeId, depth: usize, lines: &mut Vec<String>) {
    let node = &tree[id];
    let mut parts = vec![format!("{:indent$}#{}", "", node.move_number(), indent = depth)];
    if let Some(mv) = node.get_move() {
        parts.push(format!("{:?}{:?}x{}", mv.color, mv.point, mv.captures));
    }
    for p in tree.size().points() {
        if let Some(kind) = tree.setup_at(id, p) {
            parts.push(format!("{}{p:?}", kind.property_id()));
        }
        if let Some(mark) = tree.markup(id, p) {
            parts.push(format!("{mark:?}{p:?}"));
        }
    }
    if !node.comment().is_empty() {
        parts.push(format!("C:{:?}", node.comment()));
    }
    lines.push(parts.join(" "));
    for &child in tree.children(id) {
        describe_node(tree, child, depth + 1, lines);
    }
}

fn reload(record: &Record) -> Record {
    let style = record.variant_style.unwrap_or_default();
    let text = compose(&record.tree, &record.game_info, style);
    load(&text).unwrap_or_else(|e| panic!("composed record failed to parse: {e}\n{text}"))
}

fn assert_round_trip(text: &str) {
    let first = load(text).unwrap();
    let second = reload(&first);
    assert_eq!(describe(&first.tree), describe(&second.tree));
    assert_eq!(first.tree.size(), second.tree.size());
    assert_eq!(first.game_info, second.game_info);
    assert_eq!(
        first.variant_style.unwrap_or_default(),
        second.variant_style.unwrap_or_default()
    );
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn test_round_trip_main_line_with_captures() {
    assert_round_trip("(;GM[1]FF[4]SZ[9]KM[6.5]PB[Black]PW[White];B[ba];W[aa];B[ab];W[ee];B[tt])");
}

#[test]
fn test_round_trip_branches() {
    assert_round_trip(
        "(;SZ[13]ST[2](;B[dd];W[jj](;B[dj])(;B[jd];W[cc]))(;B[gg];W[];B[])(;B[aa]C[corner]))",
    );
}

#[test]
fn test_round_trip_setup_and_markup() {
    assert_round_trip(
        "(;SZ[9]AB[aa:cc][ee]AW[ga:ia]CR[dd]SQ[ed]TR[fd]MA[gd]SL[hd]LB[ab:x][ba:long label]\
         ;AE[bb][ee]AB[ii];W[hh]LB[hh:1])",
    );
}

#[test]
fn test_round_trip_comments_and_escapes() {
    assert_round_trip(
        "(;SZ[19]GC[first line\nsecond line]EV[Big \\] Cup]C[Root\\\\comment\n\nwith a blank line]\
         ;B[pd]C[]\n;W[dp]C[a]C[b]LB[dd:a\\]b])",
    );
}

#[test]
fn test_round_trip_rectangular_board() {
    assert_round_trip("(;SZ[19:7]AB[sa][ag];B[ba];W[rg])");
}

#[test]
fn test_round_trip_editor_session() {
    let mut editor = Editor::new(BoardSize::square(9));
    for p in [(3, 3), (7, 7), (3, 7)] {
        assert!(editor.click(p, Modifiers::default()));
    }
    editor.set_comment("branch point");
    editor.prev_node(1);
    assert!(editor.click((7, 3), Modifiers::default()));
    editor.set_tool(Tool::AddWhite);
    assert!(editor.click((5, 5), Modifiers::default()));
    editor.set_tool(Tool::Label);
    assert!(editor.click((1, 1), Modifiers::default()));
    editor.set_game_info_field("RE", "B+R");

    let text = editor.compose_record();
    let mut again = Editor::default();
    again.load_record(&text).unwrap();
    assert_eq!(describe(editor.tree()), describe(again.tree()));
    assert_eq!(again.game_info().get("RE").map(String::as_str), Some("B+R"));
    assert_eq!(again.compose_record(), text);
}

// =============================================================================
// Composed output
// =============================================================================

#[test]
fn test_compose_is_stable() {
    let record = load("(;SZ[9]C[x](;B[aa];W[bb])(;B[cc]AB[dd]))").unwrap();
    let once = compose(&record.tree, &record.game_info, VariantStyle::default());
    let twice = {
        let reloaded = load(&once).unwrap();
        compose(&reloaded.tree, &reloaded.game_info, VariantStyle::default())
    };
    assert_eq!(once, twice);
}

#[test]
fn test_compose_expands_point_lists() {
    let record = load("(;SZ[5]AB[aa:ab])").unwrap();
    let text = compose(&record.tree, &record.game_info, VariantStyle::default());
    assert!(text.contains("AB[aa][ab]"), "{text}");
    assert!(!text.contains("aa:ab"), "{text}");
}

#[test]
fn test_compose_pass_as_empty_value() {
    let record = load("(;SZ[9];B[tt];W[])").unwrap();
    let text = compose(&record.tree, &record.game_info, VariantStyle::default());
    assert!(text.ends_with(";B[]\n;W[])"), "{text}");
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_point_list_expansion() {
    let record = load("(;SZ[9]AB[bb:dc]AW[ff:ff][hh:gg]TR[ia:ib])").unwrap();
    let tree = &record.tree;
    let root = tree.root();
    let black: Vec<_> = tree
        .size()
        .points()
        .filter(|&p| tree.stone(root, p) == Some(Color::Black))
        .collect();
    assert_eq!(black, vec![(2, 2), (2, 3), (3, 2), (3, 3), (4, 2), (4, 3)]);
    assert_eq!(tree.setup_at(root, (6, 6)), Some(SetupKind::AddWhite));
    assert_eq!(tree.stone(root, (8, 8)), Some(Color::White));
    assert_eq!(tree.stone(root, (7, 7)), Some(Color::White));
    assert_eq!(tree.stone(root, (7, 8)), None);
    assert_eq!(tree.markup(root, (9, 1)), Some(&Markup::Triangle));
    assert_eq!(tree.markup(root, (9, 2)), Some(&Markup::Triangle));
}

#[test]
fn test_legacy_property_aliases() {
    let record = load("(;SZ[9]M[aa]L[bb:q])").unwrap();
    let root = record.tree.root();
    assert_eq!(record.tree.markup(root, (1, 1)), Some(&Markup::Cross));
    assert_eq!(record.tree.markup(root, (2, 2)), Some(&Markup::Label("q".into())));
}

#[test]
fn test_lowercase_in_property_ids() {
    let record = load("(;SiZe[9]CoPyright[me];bB[cc])").unwrap();
    assert_eq!(record.tree.size(), BoardSize::square(9));
    assert_eq!(record.game_info.get("CP").map(String::as_str), Some("me"));
    let n = record.tree.main_line()[1];
    assert_eq!(record.tree[n].get_move().map(|m| m.color), Some(Color::Black));
}

#[test]
fn test_setup_in_move_node_skipped() {
    let record = load("(;SZ[9];B[aa]AW[bb])").unwrap();
    let n = record.tree.main_line()[1];
    assert_eq!(record.tree.node_type(n), NodeType::Move);
    assert_eq!(record.tree.stone(n, (2, 2)), None);
}

#[test]
fn test_game_info_flattening() {
    let record = load("(;SZ[9]PC[Tokyo\nJapan]GC[a\nb]RE[])").unwrap();
    assert_eq!(record.game_info.get("PC").map(String::as_str), Some("Tokyo Japan"));
    assert_eq!(record.game_info.get("GC").map(String::as_str), Some("a\nb"));
    assert!(!record.game_info.contains_key("RE"));
}

#[test]
fn test_long_main_line_on_small_stack() {
    let mut text = String::from("(;SZ[19]");
    for i in 0..100_000 {
        text.push_str(if i % 2 == 0 { ";B[]" } else { ";W[]" });
    }
    text.push(')');
    let handle = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            let record = load(&text).unwrap();
            let line = record.tree.main_line();
            let last = record.tree[line[line.len() - 1]].move_number();
            let composed = compose(&record.tree, &record.game_info, VariantStyle::default());
            (line.len(), last, composed.ends_with(";W[])"))
        })
        .unwrap();
    assert_eq!(handle.join().unwrap(), (100_001, 100_000, true));
}

#[test]
fn test_leading_text_and_trailing_trees_ignored() {
    let record = load("garbage before (;SZ[9];B[aa]) (;SZ[13])").unwrap();
    assert_eq!(record.tree.size(), BoardSize::square(9));
    assert_eq!(record.tree.main_line().len(), 2);
}

// =============================================================================
// Parser
// =============================================================================

#[test]
fn test_collection() {
    let trees = parse_collection("(;GN[one])\n(;GN[two])(;GN[three])").unwrap();
    let names: Vec<String> = trees
        .iter()
        .map(|t| t.root().and_then(|r| r.prop("GN")).map(|p| p.joined()).unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["one", "two", "three"]);
}

#[test]
fn test_parse_errors_report_offsets() {
    let cases = [
        ("", 0),
        ("no tree here", 12),
        ("(B[aa])", 1),
        ("(;B)", 3),
        ("(;[aa])", 2),
        ("(;B[aa]", 7),
        ("(;B[aa", 6),
    ];
    for (text, offset) in cases {
        let err = parse(text).unwrap_err();
        assert_eq!(err.offset, offset, "{text:?}: {err}");
    }
}

#[test]
fn test_value_text_rules() {
    let tree = parse("(;C[a\\]b\\\\c\\\nd\re\tf])").unwrap();
    assert_eq!(tree.nodes[0].props[0].values, vec!["a]b\\cd\ne f".to_string()]);
}
