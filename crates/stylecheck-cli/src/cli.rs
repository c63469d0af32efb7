//! CLI argument parsing using clap.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// stylecheck - SQL style linter and formatter
#[derive(Parser, Debug)]
#[command(name = "stylecheck")]
#[command(about = "Lint and format SQL against a house style guide", long_about = None)]
#[command(version)]
pub struct Args {
    /// SQL files or directories to check (reads from stdin if none provided)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// JSON style configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma-separated list of rule ids to skip (e.g., no-select-star,identifier-case)
    #[arg(long, value_delimiter = ',')]
    pub exclude_rules: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,

    /// Apply rule auto-fixes in place before reporting
    #[arg(long, conflicts_with_all = ["write", "check"])]
    pub fix: bool,

    /// Reformat files in place (stdin input is printed formatted)
    #[arg(long, conflicts_with = "check")]
    pub write: bool,

    /// Report files whose formatting would change
    #[arg(long)]
    pub check: bool,

    /// Ignore violations recorded in this baseline file
    #[arg(long, value_name = "FILE")]
    pub baseline: Option<PathBuf>,

    /// Record the current violations as a baseline file
    #[arg(long, value_name = "FILE")]
    pub write_baseline: Option<PathBuf>,

    /// List the available rules and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Print the JSON schema of the configuration file and exit
    #[arg(long)]
    pub print_config_schema: bool,

    /// Suppress warnings and summaries on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// True when formatting rather than linting.
    pub fn format_mode(&self) -> bool {
        self.write || self.check
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::parse_from(["stylecheck", "test.sql"]);
        assert_eq!(args.files.len(), 1);
        assert_eq!(args.format, OutputFormat::Table);
        assert!(args.config.is_none());
        assert!(!args.fix);
        assert!(!args.format_mode());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_parse_full_args() {
        let args = Args::parse_from([
            "stylecheck",
            "--config",
            "style.json",
            "-f",
            "json",
            "-o",
            "report.json",
            "--baseline",
            "baseline.json",
            "--quiet",
            "--compact",
            "-vv",
            "file1.sql",
            "queries",
        ]);
        assert_eq!(args.config.unwrap().to_str().unwrap(), "style.json");
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.output.unwrap().to_str().unwrap(), "report.json");
        assert_eq!(args.baseline.unwrap().to_str().unwrap(), "baseline.json");
        assert!(args.quiet);
        assert!(args.compact);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn test_exclude_rules() {
        let args = Args::parse_from([
            "stylecheck",
            "--exclude-rules",
            "no-select-star,identifier-case",
            "--exclude-rules",
            "indentation",
            "test.sql",
        ]);
        assert_eq!(
            args.exclude_rules,
            vec!["no-select-star", "identifier-case", "indentation"]
        );
    }

    #[test]
    fn test_write_and_check_are_format_mode() {
        assert!(Args::parse_from(["stylecheck", "--write", "a.sql"]).format_mode());
        assert!(Args::parse_from(["stylecheck", "--check", "a.sql"]).format_mode());
    }

    #[test]
    fn test_fix_conflicts_with_write() {
        let result = Args::try_parse_from(["stylecheck", "--fix", "--write", "test.sql"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_write_conflicts_with_check() {
        let result = Args::try_parse_from(["stylecheck", "--write", "--check", "test.sql"]);
        assert!(result.is_err());
    }
}
