/**
 * rep: a small grep built on the regex engine. Reads standard input
 * line by line, prints the lines the pattern matches with every match
 * painted red, plus optional context lines around them.
 *
 * Example: cat ~/.vimrc | rep "^set"
 */

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use yansi::Paint as _;

use rx_graph::Graph;

/// Search PATTERN in lines read from standard input.
#[derive(Parser, Debug)]
#[command(name = "rep")]
struct Args {
    /// Print NUM lines of trailing context after a matching line
    #[arg(short = 'A', value_name = "NUM", default_value_t = 0)]
    after: usize,

    /// Print NUM lines of leading context before a matching line
    #[arg(short = 'B', value_name = "NUM", default_value_t = 0)]
    before: usize,

    /// The pattern to search for
    pattern: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let graph = Graph::compile(&args.pattern)
        .with_context(|| format!("cannot compile pattern `{}`", args.pattern))?;
    // the engine's own substitution does the highlighting
    let template = format!("{}", "\\0".red()).into_bytes();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut before: VecDeque<String> = VecDeque::new();
    let mut after = 0usize;

    for line in stdin.lock().lines() {
        let line = line.context("cannot read standard input")?;
        if graph.find(line.as_bytes()).ok() {
            while let Some(old) = before.pop_front() {
                writeln!(out, "{}", old)?;
            }
            out.write_all(&graph.sub(&template, line.as_bytes()))?;
            writeln!(out)?;
            after = args.after;
        }
        else if after > 0 {
            writeln!(out, "{}", line)?;
            after -= 1;
        }
        else if args.before > 0 {
            if before.len() == args.before {
                before.pop_front();
            }
            before.push_back(line);
        }
    }
    Ok(())
}
