//! Loads vocabulary records from a directory of books.
//!
//! # Layout
//! ```text
//! data/
//!   book-one/
//!     unit1.csv
//!     unit2.csv
//! ```
//!
//! Each unit is a CSV file with the header `english,chinese,examples`
//! (an optional `kind` column may hold `word` or `phrase`).

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vocab_core::{Kind, RawRecord};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: missing required column {column:?}")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{path}: unterminated quoted field starting at line {line}")]
    UnterminatedQuote { path: PathBuf, line: usize },
}

/// Reads books and units below a data directory.
#[derive(Debug, Clone)]
pub struct DataLoader {
    data_dir: PathBuf,
}

impl DataLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Book names (sub-directories), sorted.
    pub fn books(&self) -> Result<Vec<String>, LoadError> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }
        list_dir(&self.data_dir, |path| path.is_dir())
    }

    /// Unit file names of a book, sorted.
    pub fn units(&self, book: &str) -> Result<Vec<String>, LoadError> {
        let book_dir = self.data_dir.join(book);
        if !book_dir.exists() {
            return Ok(Vec::new());
        }
        list_dir(&book_dir, |path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == "csv")
        })
    }

    /// Load the given units of a book in order.
    ///
    /// Missing unit files are skipped with a warning; rows without an
    /// `english` value are dropped.
    pub fn load(&self, book: &str, units: &[String]) -> Result<Vec<RawRecord>, LoadError> {
        let mut records = Vec::new();
        for unit in units {
            let path = self.data_dir.join(book).join(unit);
            if !path.exists() {
                tracing::warn!("unit file not found, skipping: {}", path.display());
                continue;
            }
            let content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            let loaded = parse_unit(&content, &path)?;
            tracing::debug!("loaded {} records from {}", loaded.len(), path.display());
            records.extend(loaded);
        }
        Ok(records)
    }
}

fn list_dir(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<String>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for item in fs::read_dir(dir).map_err(io_err)? {
        let path = item.map_err(io_err)?.path();
        if keep(&path) {
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Parse one unit file into records.
pub fn parse_unit(content: &str, path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut rows = parse_csv(content).map_err(|line| LoadError::UnterminatedQuote {
        path: path.to_path_buf(),
        line,
    })?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let header: Vec<String> = rows.remove(0).iter().map(|h| h.trim().to_lowercase()).collect();
    let column = |name: &'static str| header.iter().position(|h| h == name);
    let english = column("english").ok_or_else(|| LoadError::MissingColumn {
        path: path.to_path_buf(),
        column: "english",
    })?;
    let chinese = column("chinese").ok_or_else(|| LoadError::MissingColumn {
        path: path.to_path_buf(),
        column: "chinese",
    })?;
    let examples = column("examples");
    let kind = column("kind");

    let field = |row: &[String], idx: Option<usize>| -> String {
        idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
    };

    Ok(rows
        .iter()
        .filter(|row| !field(row, Some(english)).trim().is_empty())
        .map(|row| RawRecord {
            english: field(row, Some(english)),
            chinese: field(row, Some(chinese)),
            examples: field(row, examples),
            kind: match field(row, kind).trim().to_lowercase().as_str() {
                "word" => Some(Kind::Word),
                "phrase" => Some(Kind::Phrase),
                _ => None,
            },
        })
        .collect())
}

/// Split CSV text into rows of fields. Quoted fields may hold commas,
/// newlines and doubled quotes. Errors with the line a dangling quote opened on.
fn parse_csv(content: &str) -> Result<Vec<Vec<String>>, usize> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 0;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                line += 1;
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(quote_line);
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }
    Ok(rows)
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    // Blank lines come through as a single empty field.
    if !(row.len() == 1 && row[0].trim().is_empty()) {
        rows.push(row);
    }
}
