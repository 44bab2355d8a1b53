//! Reader for HYDRUS-1D `T_Level.out` water-balance tables
//!
//! The file opens with a free-text banner, then a column header line
//! starting with `Time`, a units line (`[T]`, `[L/T]`, ...), numeric rows,
//! and finally a line reading `end`.

use std::path::{Path, PathBuf};

use ahash::AHashMap;

use crate::core::error::{CouplerError, Result};

/// Parsed time-level table
#[derive(Debug, Clone)]
pub struct TLevel {
    path: PathBuf,
    columns: Vec<String>,
    index: AHashMap<String, usize>,
    rows: Vec<Vec<f64>>,
}

impl TLevel {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values of one named column, in print-time order
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| CouplerError::MissingSeries {
                path: self.path.clone(),
                column: name.to_string(),
            })?;
        Ok(self.rows.iter().map(|row| row[idx]).collect())
    }
}

pub fn read_tlevel(path: &Path) -> Result<TLevel> {
    let content = std::fs::read_to_string(path)?;
    parse_tlevel(&content, path)
}

pub fn parse_tlevel(content: &str, path: &Path) -> Result<TLevel> {
    let parse_err = |line: usize, message: String| CouplerError::Parse {
        file: path.to_path_buf(),
        line,
        message,
    };

    let mut lines = content.lines().enumerate();

    let columns: Vec<String> = loop {
        match lines.next() {
            Some((_, line)) => {
                let mut tokens = line.split_whitespace().peekable();
                if tokens.peek() == Some(&"Time") {
                    break tokens.map(str::to_string).collect();
                }
            }
            None => return Err(parse_err(0, "no column header line found".into())),
        }
    };

    let index: AHashMap<String, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect();

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('[') {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("end") {
            break;
        }

        let row = trimmed
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|_| parse_err(line_no + 1, format!("invalid number '{}'", tok)))
            })
            .collect::<Result<Vec<f64>>>()?;

        if row.len() != columns.len() {
            return Err(parse_err(
                line_no + 1,
                format!("expected {} values, found {}", columns.len(), row.len()),
            ));
        }
        rows.push(row);
    }

    Ok(TLevel {
        path: path.to_path_buf(),
        columns,
        index,
        rows,
    })
}
