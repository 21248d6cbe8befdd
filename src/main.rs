//! Arimaa-Rust: rules and notation engine for Arimaa.
//!
//! ## Usage
//!
//! - `arimaa-rust` - Show a demo
//! - `arimaa-rust validate [FILE]` - Validate a game transcript from a
//!   file or stdin
//! - `arimaa-rust reconstruct <BEFORE> <AFTER>` - Recover the step
//!   sequence between two canonical position strings

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use arimaa_rust::board::{Board, Side};
use arimaa_rust::{codec, record, search};

/// Arimaa-Rust: a rules and notation engine for Arimaa
#[derive(Parser)]
#[command(name = "arimaa-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a game transcript read from FILE, or stdin when omitted
    Validate { file: Option<PathBuf> },
    /// Reconstruct the step sequence between two canonical position strings
    Reconstruct { before: String, after: String },
    /// Run a simple demo of the engine
    Demo,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate { file }) => validate(file),
        Some(Commands::Reconstruct { before, after }) => reconstruct(&before, &after),
        Some(Commands::Demo) | None => {
            run_demo();
            Ok(())
        }
    }
}

fn validate(file: Option<PathBuf>) -> Result<()> {
    let text = match file {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("reading transcript {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading transcript from stdin")?;
            buf
        }
    };

    let report = record::validate(&text);
    if !report.valid {
        for err in &report.errors {
            eprintln!("{err}");
        }
        bail!("transcript rejected with {} error(s)", report.errors.len());
    }

    if let Some(tree) = report.root {
        let chain = tree.main_line();
        for node in &chain {
            println!(
                "{}{} {}",
                node.number,
                node.side.letter(),
                node.tokens.join(" ")
            );
        }
        println!("transcript ok: {} turn(s)", chain.len());
    }
    Ok(())
}

fn reconstruct(before: &str, after: &str) -> Result<()> {
    match search::reconstruct_snapshots(before, after)? {
        Some(moves) => println!("{moves}"),
        None => bail!("no 1-4 step sequence connects the two positions"),
    }
    Ok(())
}

fn run_demo() {
    println!("Arimaa-Rust: rules and notation engine\n");

    println!("=== Starting position ===");
    let board = Board::starting_array();
    println!("{board}");
    println!("{}\n", codec::encode(&board, Side::Gold));

    println!("=== Transcript parsing ===");
    let transcript = "1w Ee2 Md2 Ra1 Rb1\n1b ed7 md8 ra8 rb8\n2w Ee2n Ee3n";
    println!("{transcript}\n");
    let tree = record::parse(transcript);
    let chain = tree.main_line();
    for node in &chain {
        println!("{}{}: {}", node.number, node.side.letter(), node.snapshot);
    }

    println!("\n=== Move reconstruction ===");
    if chain.len() >= 2 {
        let before = &chain[chain.len() - 2].snapshot;
        let after = &chain[chain.len() - 1].snapshot;
        match search::reconstruct_snapshots(before, after) {
            Ok(Some(moves)) => println!("recovered steps: {moves}"),
            Ok(None) => println!("no sequence found"),
            Err(err) => println!("bad snapshot: {err}"),
        }
    }
}
