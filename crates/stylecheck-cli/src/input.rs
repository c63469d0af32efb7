//! Input handling for files, directories and stdin.

use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One SQL document to check.
#[derive(Debug, Clone)]
pub struct SqlInput {
    /// Display name: the path, or `<stdin>`.
    pub name: String,
    /// File to write back to; `None` for stdin.
    pub path: Option<PathBuf>,
    pub content: String,
}

/// Read SQL input from files, directories or stdin.
///
/// If no paths are provided, reads from stdin. Directories are walked
/// recursively for `*.sql` files in file-name order.
pub fn read_input(paths: &[PathBuf]) -> Result<Vec<SqlInput>> {
    if paths.is_empty() {
        return read_from_stdin().map(|input| vec![input]);
    }

    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            for file in sql_files_in(path)? {
                inputs.push(read_file(&file)?);
            }
        } else {
            inputs.push(read_file(path)?);
        }
    }
    Ok(inputs)
}

fn read_from_stdin() -> Result<SqlInput> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    Ok(SqlInput {
        name: "<stdin>".to_string(),
        path: None,
        content,
    })
}

fn read_file(path: &Path) -> Result<SqlInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    Ok(SqlInput {
        name: path.display().to_string(),
        path: Some(path.to_path_buf()),
        content,
    })
}

fn sql_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk directory: {}", dir.display()))?;
        if entry.file_type().is_file() && is_sql_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
}
