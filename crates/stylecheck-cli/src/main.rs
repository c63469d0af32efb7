//! stylecheck CLI - SQL style linter and formatter

use stylecheck_cli::cli;
use stylecheck_cli::fix::fix_document;
use stylecheck_cli::input::{self, SqlInput};
use stylecheck_cli::output;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use stylecheck_core::{
    format, rule_ids, verify_equivalence, Equivalence, IgnoreList, Linter, StyleConfig,
    StyleError,
};
use tracing_subscriber::EnvFilter;

use cli::{Args, OutputFormat};
use output::{format_check_results, format_lint_json, format_lint_results, FileLintResult};

/// Error-severity violations, lex errors or formatting differences.
const EXIT_FAILURE: u8 = 1;
/// Configuration or usage error.
const EXIT_CONFIG_ERROR: u8 = 66;

/// Environment variable holding the tracing filter.
const LOG_ENV: &str = "STYLECHECK_LOG";

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(failed) => {
            if failed {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("stylecheck: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("stylecheck=debug,stylecheck_cli=debug,stylecheck_core=debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Returns whether the run failed (exit status 1).
fn run(args: Args) -> Result<bool> {
    if args.print_config_schema {
        let schema = schemars::schema_for!(StyleConfig);
        let json = serde_json::to_string_pretty(&schema).context("Failed to render schema")?;
        write_output(&args.output, &json)?;
        return Ok(false);
    }

    let config = load_config(args.config.as_deref(), &args.exclude_rules)?;
    let linter = Linter::new(config).context("Invalid configuration")?;

    if args.list_rules {
        let table = output::format_rule_table(linter.rules(), linter.config());
        write_output(&args.output, &table)?;
        return Ok(false);
    }

    let inputs = input::read_input(&args.files)?;
    tracing::debug!(inputs = inputs.len(), "read input");

    if args.format_mode() {
        run_format(&args, linter.config(), inputs)
    } else {
        run_lint(&args, &linter, inputs)
    }
}

/// Read the JSON configuration (defaults when absent) and add excluded rules.
fn load_config(path: Option<&Path>, exclude_rules: &[String]) -> Result<StyleConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            StyleConfig::from_json(&raw)
                .with_context(|| format!("Invalid config: {}", path.display()))?
        }
        None => StyleConfig::default(),
    };

    for rule in exclude_rules {
        let rule = rule.trim();
        if rule.is_empty() {
            continue;
        }
        if !rule_ids::is_known(rule) {
            anyhow::bail!("--exclude-rules: unknown rule id '{rule}'");
        }
        if !config.disabled_rules.iter().any(|r| r == rule) {
            config.disabled_rules.push(rule.to_string());
        }
    }

    Ok(config)
}

fn load_baseline(path: Option<&Path>) -> Result<IgnoreList> {
    let Some(path) = path else {
        return Ok(IgnoreList::new());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read baseline: {}", path.display()))?;
    IgnoreList::from_json(&raw).with_context(|| format!("Invalid baseline: {}", path.display()))
}

/// Lint mode: optional in-place fixes, then a report of what remains.
fn run_lint(args: &Args, linter: &Linter, mut inputs: Vec<SqlInput>) -> Result<bool> {
    let started_at = Instant::now();
    let baseline = load_baseline(args.baseline.as_deref())?;

    if args.fix {
        apply_fixes_in_place(args, linter, &mut inputs)?;
    }

    let mut results = Vec::with_capacity(inputs.len());
    let mut recorded = IgnoreList::new();

    for input in &inputs {
        match linter.lint_with_ignore(&input.content, &baseline) {
            Ok(violations) => {
                if args.write_baseline.is_some() {
                    recorded.extend(IgnoreList::from_violations(&input.content, &violations));
                }
                results.push(FileLintResult::new(&input.name, &violations));
            }
            Err(err) => {
                tracing::debug!(file = %input.name, error = %err, "lex error");
                results.push(FileLintResult::lex_failure(&input.name, &err));
            }
        }
    }

    if let Some(path) = &args.write_baseline {
        recorded.extend(baseline);
        fs::write(path, recorded.to_json())
            .with_context(|| format!("Failed to write baseline to {}", path.display()))?;
        if !args.quiet {
            eprintln!(
                "stylecheck: recorded {} violation(s) in {}",
                recorded.len(),
                path.display()
            );
        }
    }

    let failed = results.iter().any(FileLintResult::has_errors);
    let colored = args.output.is_none() && io::stdout().is_terminal();

    let report = match args.format {
        OutputFormat::Json => format_lint_json(&results, args.compact),
        OutputFormat::Table => format_lint_results(&results, colored, started_at.elapsed()),
    };
    write_output(&args.output, &report)?;

    Ok(failed)
}

fn apply_fixes_in_place(args: &Args, linter: &Linter, inputs: &mut [SqlInput]) -> Result<()> {
    let mut total_applied = 0usize;
    let mut files_modified = 0usize;
    let mut skipped_due_to_regression = 0usize;
    let mut stdin_modified = false;

    for input in inputs.iter_mut() {
        // Lex errors are reported by the lint pass that follows.
        let Ok(report) = fix_document(linter, &input.content) else {
            continue;
        };

        if report.skipped_due_to_regression {
            skipped_due_to_regression += 1;
            continue;
        }
        if !report.changed() {
            continue;
        }

        total_applied += report.applied;
        files_modified += 1;
        input.content = report.text;

        if let Some(path) = &input.path {
            fs::write(path, &input.content)
                .with_context(|| format!("Failed to write fixed SQL to {}", path.display()))?;
        } else {
            stdin_modified = true;
        }
    }

    if !args.quiet {
        eprintln!("stylecheck: applied {total_applied} auto-fix(es) across {files_modified} input(s)");
        if skipped_due_to_regression > 0 {
            eprintln!(
                "stylecheck: skipped auto-fix for {skipped_due_to_regression} input(s) because fixes increased total violations"
            );
        }
        if stdin_modified {
            eprintln!(
                "stylecheck: auto-fixes were applied to stdin input for linting output only (no file was written)"
            );
        }
    }
    Ok(())
}

/// Format mode: `--check` reports differences, `--write` rewrites files.
fn run_format(args: &Args, config: &StyleConfig, inputs: Vec<SqlInput>) -> Result<bool> {
    let mut failed = false;
    let mut changed = Vec::new();
    let mut unchanged = 0;
    let mut errors = 0;
    let mut printed = 0;
    let total = inputs.len();

    for input in &inputs {
        let formatted = match format(&input.content, config) {
            Ok(formatted) => formatted,
            Err(StyleError::Lex(err)) => {
                eprintln!("stylecheck: error: {}: {err}", input.name);
                failed = true;
                errors += 1;
                continue;
            }
            Err(err) => return Err(err).context("Invalid configuration"),
        };

        if args.check {
            if formatted != input.content {
                changed.push(input.name.clone());
            }
            continue;
        }

        match verify_equivalence(&input.content, &formatted) {
            Ok(Equivalence::Verified) => {}
            Ok(Equivalence::Unverified) => {
                tracing::info!(file = %input.name, "formatting not verified; input is outside the sqlparser grammar");
            }
            Err(err) => {
                eprintln!("stylecheck: error: refusing to write {}: {err}", input.name);
                failed = true;
                errors += 1;
                continue;
            }
        }

        match &input.path {
            Some(path) if formatted != input.content => {
                fs::write(path, &formatted)
                    .with_context(|| format!("Failed to write formatted SQL to {}", path.display()))?;
                changed.push(input.name.clone());
            }
            Some(_) => unchanged += 1,
            None => {
                write_output(&args.output, &formatted)?;
                printed += 1;
            }
        }
    }

    if args.check {
        let colored = args.output.is_none() && io::stdout().is_terminal();
        write_output(&args.output, &format_check_results(&changed, total, colored))?;
        return Ok(failed || !changed.is_empty());
    }

    if !args.quiet {
        let mut summary = format!(
            "stylecheck: reformatted {} file(s), {unchanged} unchanged",
            changed.len()
        );
        if errors > 0 {
            summary.push_str(&format!(", {errors} failed"));
        }
        if printed > 0 {
            summary.push_str(&format!(", {printed} printed to stdout"));
        }
        eprintln!("{summary}");
    }
    Ok(failed)
}

fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure newline at end for terminal output
        if !content.is_empty() && !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
