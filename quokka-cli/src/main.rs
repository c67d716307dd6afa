//! quokka CLI
//!
//! Inspect, reformat and check markup documents from the command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use quokka_tree::{Document, NodeId};

#[derive(Parser)]
#[command(name = "quokka", about = "Inspect and reformat quokka markup documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file and print a colored tree outline
    Show {
        /// The document to read
        file: PathBuf,
    },
    /// Parse a file and emit the pretty serialization
    Fmt {
        /// The document to read
        file: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse a file and report `ok` or the full diagnostic
    Check {
        /// The document to read
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Show { file } => show(&file),
        Command::Fmt { file, output } => fmt(&file, output.as_deref()),
        Command::Check { file } => check(&file),
    }
}

fn load(file: &Path) -> Result<Document> {
    quokka_markup::load(file).with_context(|| format!("cannot load {}", file.display()))
}

fn show(file: &Path) -> Result<()> {
    let document = load(file)?;
    print_outline(&document, document.root(), 0);
    Ok(())
}

fn fmt(file: &Path, output: Option<&Path>) -> Result<()> {
    let document = load(file)?;
    let formatted = document.as_formatted_text(document.root());
    match output {
        Some(path) => fs::write(path, formatted)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => print!("{formatted}"),
    }
    Ok(())
}

fn check(file: &Path) -> Result<()> {
    let _ = load(file)?;
    println!("{} {}", "ok".green(), file.display());
    Ok(())
}

/// One element per line: name, attributes, then the value if any.
fn print_outline(document: &Document, id: NodeId, depth: usize) {
    let indent = "  ".repeat(depth);
    print!("{indent}{}", document.name(id).cyan());
    for attr in document.attributes(id) {
        print!(" {}={}", attr.name().green(), format!("\"{}\"", attr.value()).yellow());
    }
    let value = document.value(id);
    if !value.is_empty() {
        print!(" {value:?}");
    }
    println!();
    for &child in document.children(id) {
        print_outline(document, child, depth + 1);
    }
}
