use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use retrace_core::{OptLevel, Regex};

#[derive(Parser)]
#[command(name = "retrace")]
#[command(about = "Retrace - a backtracking regex engine")]
#[command(version)]
struct Cli {
    /// Optimization level (O0 or O1)
    #[arg(long, global = true, default_value = "O0")]
    opt: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a pattern against the start of the input
    Match {
        /// The regex pattern
        pattern: String,
        /// The input string
        input: String,
    },
    /// Scan the input for the first match
    Search {
        /// The regex pattern
        pattern: String,
        /// The input string
        input: String,
        /// Show capture group details
        #[arg(short, long)]
        verbose: bool,
    },
    /// List every non-overlapping match
    Find {
        /// The regex pattern
        pattern: String,
        /// The input string
        input: String,
    },
    /// Write the compiled NFA (or AST) as Graphviz DOT
    Dump {
        /// The regex pattern
        pattern: String,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        /// Dump the AST instead of the NFA
        #[arg(long)]
        ast: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let opt = match cli.opt.parse::<OptLevel>() {
        Ok(opt) => opt,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Match { pattern, input } => cmd_match(&pattern, &input, opt),
        Commands::Search {
            pattern,
            input,
            verbose,
        } => cmd_search(&pattern, &input, opt, verbose),
        Commands::Find { pattern, input } => cmd_find(&pattern, &input, opt),
        Commands::Dump { pattern, out, ast } => cmd_dump(&pattern, &out, opt, ast),
    }
}

fn compile(pattern: &str, opt: OptLevel) -> Regex {
    match Regex::with_opt(pattern, opt) {
        Ok(regex) => regex,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

fn cmd_match(pattern: &str, input: &str, opt: OptLevel) {
    let regex = compile(pattern, opt);

    if let Some(found) = regex.match_(input) {
        let (start, end) = found.span(0).unwrap_or_default();
        println!("{}", "✓ Match at start".green().bold());
        println!("  Position: {start}..{end}");
        println!("  Match:    {}", found.as_str().green());
    } else {
        println!("{}", "✗ No match".red());
        process::exit(1);
    }
}

fn cmd_search(pattern: &str, input: &str, opt: OptLevel, verbose: bool) {
    println!("{}", "Searching...".bold());
    println!("  Pattern: {}", pattern.cyan());
    println!("  Input:   {}", input.yellow());
    println!();

    let regex = compile(pattern, opt);

    if let Some(found) = regex.search(input) {
        let (start, end) = found.span(0).unwrap_or_default();
        println!("{}", "✓ Match found!".green().bold());
        println!("  Position: {start}..{end}");
        println!("  Match:    {}", found.as_str().green());

        if verbose {
            println!();
            println!("{}", "Capture groups:".bold());
            for index in found.group_ids() {
                if index == 0 {
                    continue;
                }
                let (start, end) = found.span(index).unwrap_or_default();
                let text = found.group(index).unwrap_or_default();
                println!("  Group {index}: {start}..{end} = {}", text.green());
            }
        }
    } else {
        println!("{}", "✗ No match".red());
        process::exit(1);
    }
}

fn cmd_find(pattern: &str, input: &str, opt: OptLevel) {
    let regex = compile(pattern, opt);

    let matches: Vec<_> = regex.finditer(input).collect();

    if matches.is_empty() {
        println!("{}", "No matches found".red());
        process::exit(1);
    }

    println!(
        "{} {}",
        "Found".bold(),
        format!("{} match(es)", matches.len()).green()
    );
    println!();

    for (i, found) in matches.iter().enumerate() {
        let (start, end) = found.span(0).unwrap_or_default();
        println!(
            "  [{}] {start}..{end} = {}",
            i + 1,
            found.as_str().green()
        );
    }
}

fn cmd_dump(pattern: &str, out: &PathBuf, opt: OptLevel, ast: bool) {
    let regex = compile(pattern, opt);

    let written = if ast {
        regex.dump_ast("ast", out)
    } else {
        regex.dump_nfa("nfa", out)
    };

    match written {
        Ok(path) => println!(
            "{} {}",
            "Wrote".green().bold(),
            path.display().to_string().cyan()
        ),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}
