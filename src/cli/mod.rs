pub mod analyze;
pub mod config;
pub mod verdict;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use crate::error::Result;

#[derive(Parser)]
#[command(
    name = "ledgerlens",
    about = "Monthly, category, recurrence and anomaly analytics for transaction ledgers."
)]
pub struct Cli {
    /// Debug logging to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a ledger (CSV or workbook) and print the report.
    Analyze {
        /// Ledger with Date, Credit, Debit, Balance, Transaction Detail,
        /// Category and Subcategory columns
        file: String,
        /// Rows shown per table (default from settings, 5 if unset)
        #[arg(long = "top-n", value_parser = parse_top_n)]
        top_n: Option<usize>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
    /// Print the classifier prompt built from a ledger's report.
    Prompt {
        file: String,
        #[arg(long = "top-n", value_parser = parse_top_n)]
        top_n: Option<usize>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Parse a saved classifier reply into a structured verdict.
    Verdict {
        /// File holding the raw model reply
        file: String,
    },
    /// Show or change persistent settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings.
    Show,
    /// Update settings.
    Set {
        /// Default rows per report table
        #[arg(long = "top-n", value_parser = parse_top_n)]
        top_n: Option<usize>,
        /// Preferred date format (chrono syntax, e.g. %d/%m/%Y)
        #[arg(long = "date-format", conflicts_with = "clear_date_format")]
        date_format: Option<String>,
        /// Go back to the built-in date formats
        #[arg(long = "clear-date-format")]
        clear_date_format: bool,
    },
}

/// Row caps below 1 would render header-only tables.
fn parse_top_n(raw: &str) -> std::result::Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err("must be at least 1".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Write to `output` if given, else stdout.
pub(crate) fn emit(content: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            let p = PathBuf::from(path);
            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&p, content)?;
            info!(path = %p.display(), bytes = content.len(), "report written");
            println!("Wrote {}", p.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

/// Color only when a human is watching.
pub(crate) fn configure_color(output: Option<&str>) {
    if output.is_some() || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

/// Bold the `=== X ===` section headings for terminal display.
pub(crate) fn highlight_headings(report: &str) -> String {
    report
        .lines()
        .map(|line| {
            if line.starts_with("=== ") && line.ends_with(" ===") {
                line.bold().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_top_n_rejects_zero() {
        assert_eq!(parse_top_n("3"), Ok(3));
        assert!(parse_top_n("0").unwrap_err().contains("at least 1"));
        assert!(parse_top_n("-1").is_err());
        assert!(parse_top_n("many").is_err());
    }

    #[test]
    fn test_top_n_zero_rejected_on_every_command() {
        for args in [
            vec!["ledgerlens", "analyze", "f.csv", "--top-n", "0"],
            vec!["ledgerlens", "prompt", "f.csv", "--top-n", "0"],
            vec!["ledgerlens", "config", "set", "--top-n", "0"],
        ] {
            assert!(Cli::try_parse_from(args.iter().copied()).is_err(), "{args:?}");
        }
        assert!(Cli::try_parse_from(["ledgerlens", "analyze", "f.csv", "--top-n", "1"]).is_ok());
    }

    #[test]
    fn test_highlight_headings_only_touches_headings() {
        colored::control::set_override(true);
        let text = highlight_headings("=== SUMMARY ===\nNETFLIX rose\n== not a heading ==");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains('\u{1b}'));
        assert!(lines[0].contains("=== SUMMARY ==="));
        assert_eq!(lines[1], "NETFLIX rose");
        assert_eq!(lines[2], "== not a heading ==");
    }
}
