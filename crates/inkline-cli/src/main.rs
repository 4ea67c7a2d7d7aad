use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "inkline",
    about = "Inline local variables and classify branch outcomes in a JavaScript subset"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inline every local variable and print the rewritten source.
    Substitute {
        /// Source file to rewrite.
        file: PathBuf,
    },
    /// Substitute, then classify each if/else-if line against parameters.
    Classify {
        /// Source file to analyze.
        file: PathBuf,
        /// Comma-delimited parameter values, e.g. "1,[2,3],'text'".
        #[arg(long)]
        params: String,
        /// Emit the classification as JSON instead of annotated source.
        #[arg(long)]
        json: bool,
    },
    /// Parse a source file and dump its syntax tree as JSON.
    DumpAst {
        /// Source file to parse.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Substitute { file } => {
            let source = read_source(&file)?;
            let rewritten = inkline_core::substitute_source(&source)?;
            println!("{rewritten}");
        }
        Command::Classify { file, params, json } => {
            let source = read_source(&file)?;
            let analysis = inkline_core::analyze(&source, &params)?;
            eprintln!(
                "[classify] {} true / {} false branch line(s)",
                analysis.classification.true_lines.len(),
                analysis.classification.false_lines.len()
            );
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&analysis.classification)?
                );
            } else {
                print_annotated(&analysis);
            }
        }
        Command::DumpAst { file } => {
            let source = read_source(&file)?;
            let program = inkline_core::parser::parse(&source)?;
            println!("{}", serde_json::to_string_pretty(&program)?);
        }
    }
    Ok(())
}

/// Print the rendered source with a leading `+` on true branch lines, `-` on
/// false ones, and a space everywhere else.
fn print_annotated(analysis: &inkline_core::Analysis) {
    for (i, line) in analysis.rendered.lines().enumerate() {
        let number = i + 1;
        let marker = if analysis.classification.true_lines.contains(&number) {
            '+'
        } else if analysis.classification.false_lines.contains(&number) {
            '-'
        } else {
            ' '
        };
        println!("{marker} {line}");
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
