//! Kifu-Rust: command-line front end for the record editor core.
//!
//! ## Usage
//!
//! - `kifu-rust check <file>` - Parse a record and summarize it
//! - `kifu-rust normalize <file>` - Load a record and print it rewritten
//! - `kifu-rust replay <file>` - Print the board along the main line
//! - `kifu-rust demo` - Print a record of a random game
//!
//! Set `RUST_LOG=debug` to see skipped properties and refused edits.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;

use kifu_rust::board::BoardSize;
use kifu_rust::compose::compose;
use kifu_rust::constants::{MAX_SIZE, MIN_SIZE};
use kifu_rust::editor::{Editor, VariantStyle};
use kifu_rust::load::GameInfo;
use kifu_rust::playout::random_game;

/// Kifu-Rust: read, check and rewrite Go game records
#[derive(Parser)]
#[command(name = "kifu-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a record and print a summary of its tree
    Check { file: PathBuf },
    /// Load a record and print it in normalized form
    Normalize { file: PathBuf },
    /// Print the board after each move of the main line
    Replay {
        file: PathBuf,
        /// Stop after this many moves
        #[arg(long)]
        moves: Option<usize>,
    },
    /// Play a random game and print its record
    Demo {
        /// Board size
        #[arg(long, default_value_t = 9)]
        size: usize,
        /// Maximum number of moves, passes included
        #[arg(long, default_value_t = 60)]
        moves: usize,
        /// Seed for the random generator
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => run_check(&file),
        Commands::Normalize { file } => run_normalize(&file),
        Commands::Replay { file, moves } => run_replay(&file, moves),
        Commands::Demo { size, moves, seed } => run_demo(size, moves, seed),
    }
}

fn read_record(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_editor(path: &Path) -> Result<Editor> {
    let text = read_record(path)?;
    let mut editor = Editor::default();
    editor
        .load_record(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(editor)
}

fn run_check(path: &Path) -> Result<()> {
    let editor = load_editor(path)?;
    let tree = editor.tree();
    let root = tree.root();
    let nodes = tree.walk(root).count();
    let branches = tree.walk(root).filter(|&id| tree.children(id).len() > 1).count();
    let main_line = tree.main_line();
    let last = main_line.last().copied().unwrap_or(root);

    println!("size: {}", tree.size());
    println!("nodes: {nodes}");
    println!("branch points: {branches}");
    println!("main line moves: {}", tree[last].move_number());
    println!(
        "captures: black {} white {}",
        tree[last].black_captures(),
        tree[last].white_captures()
    );
    for (id, value) in editor.game_info() {
        println!("{id}: {value}");
    }
    Ok(())
}

fn run_normalize(path: &Path) -> Result<()> {
    let editor = load_editor(path)?;
    println!("{}", editor.compose_record());
    Ok(())
}

fn run_replay(path: &Path, moves: Option<usize>) -> Result<()> {
    let mut editor = load_editor(path)?;
    let limit = moves.unwrap_or(usize::MAX);
    println!("{}", editor.tree().board(editor.current()));

    let mut played = 0;
    while played < limit && editor.next_node(1) {
        let tree = editor.tree();
        let node = &tree[editor.current()];
        if let Some(mv) = node.get_move() {
            played += 1;
            println!(
                "move {} {:?} at {:?} (captures {})",
                node.move_number(),
                mv.color,
                mv.point,
                mv.captures
            );
            println!("{}", tree.board(editor.current()));
        }
    }
    Ok(())
}

fn run_demo(size: usize, moves: usize, seed: Option<u64>) -> Result<()> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        bail!("board size must be between {MIN_SIZE} and {MAX_SIZE}, got {size}");
    }
    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let tree = random_game(BoardSize::square(size), moves, &mut rng);
    info!("demo game generated on {size}x{size}");

    let mut info = GameInfo::new();
    info.insert("GN".to_string(), "Random demo".to_string());
    println!("{}", compose(&tree, &info, VariantStyle::default()));
    Ok(())
}
