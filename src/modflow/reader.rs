//! Line reader and array control records for MODFLOW-2005 package files
//!
//! Supported array records:
//! - `CONSTANT c`
//! - `INTERNAL cnstnt fmt iprn` followed by free-format values
//! - `OPEN/CLOSE file cnstnt fmt iprn`, relative to the model directory
//! - numeric `LOCAT CNSTNT ...`: LOCAT 0 is a constant, anything else
//!   means values follow inline
//!
//! Free-format values may span lines and use `n*v` repeat counts.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::core::error::{CouplerError, Result};
use crate::core::grid::Grid;

pub struct PackageReader {
    file: PathBuf,
    model_dir: PathBuf,
    lines: Vec<String>,
    pos: usize,
    /// Tokens left over from a partially consumed value line
    pending: VecDeque<String>,
}

impl PackageReader {
    pub fn open(file: &Path, model_dir: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(file)?;
        Ok(Self::from_content(&content, file, model_dir))
    }

    pub fn from_content(content: &str, file: &Path, model_dir: &Path) -> Self {
        Self {
            file: file.to_path_buf(),
            model_dir: model_dir.to_path_buf(),
            lines: content.lines().map(str::to_string).collect(),
            pos: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn error(&self, message: impl Into<String>) -> CouplerError {
        CouplerError::Parse {
            file: self.file.clone(),
            line: self.pos,
            message: message.into(),
        }
    }

    /// Next non-blank, non-comment line
    pub fn next_line(&mut self) -> Result<String> {
        self.pending.clear();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos].clone();
            self.pos += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(line);
        }
        Err(self.error("unexpected end of file"))
    }

    /// Peek at the next data line without consuming it
    pub fn peek_line(&self) -> Option<&str> {
        self.lines[self.pos..]
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty() && !l.starts_with('#'))
    }

    fn next_token(&mut self) -> Result<String> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return Ok(tok);
            }
            let line = self.next_line()?;
            self.pending = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// Read `n` free-format values, expanding `count*value` repeats
    pub fn read_values(&mut self, n: usize) -> Result<Vec<f64>> {
        let mut values = Vec::with_capacity(n);
        while values.len() < n {
            let tok = self.next_token()?;
            let (count, value) = match tok.split_once('*') {
                Some((count, value)) => {
                    let count: usize = count
                        .parse()
                        .map_err(|_| self.error(format!("invalid repeat count '{}'", tok)))?;
                    (count, value)
                }
                None => (1, tok.as_str()),
            };
            let value = parse_fortran_real(value)
                .ok_or_else(|| self.error(format!("invalid number '{}'", value)))?;
            values.extend(std::iter::repeat(value).take(count));
        }
        if values.len() > n {
            return Err(self.error(format!("expected {} values, found {}", n, values.len())));
        }
        // Values never share a line with the next record
        self.pending.clear();
        Ok(values)
    }

    /// Read `n` whitespace-separated integers from the stream
    pub fn read_ints(&mut self, n: usize) -> Result<Vec<i32>> {
        self.read_values(n)?
            .into_iter()
            .map(|v| to_int(v).ok_or_else(|| self.error(format!("expected integer, found {}", v))))
            .collect()
    }

    /// Read a real array of `n` cells preceded by its control record
    pub fn read_real_array(&mut self, n: usize, name: &str) -> Result<Vec<f64>> {
        let header = self.next_line()?;
        let mut tokens = header.split_whitespace();
        let keyword = tokens
            .next()
            .ok_or_else(|| self.error(format!("missing control record for {}", name)))?;

        match keyword.to_ascii_uppercase().as_str() {
            "CONSTANT" => {
                let value = self.parse_cnstnt(tokens.next(), name)?;
                Ok(vec![value; n])
            }
            "INTERNAL" => {
                let cnstnt = self.parse_cnstnt(tokens.next(), name)?;
                let values = self.read_values(n)?;
                Ok(scale(values, cnstnt))
            }
            "OPEN/CLOSE" => {
                let fname = tokens
                    .next()
                    .ok_or_else(|| self.error(format!("OPEN/CLOSE without file name for {}", name)))?;
                let cnstnt = self.parse_cnstnt(tokens.next(), name)?;
                let path = self.model_dir.join(fname.trim_matches(|c| c == '\'' || c == '"'));
                let mut external = PackageReader::open(&path, &self.model_dir)?;
                let values = external.read_values(n)?;
                Ok(scale(values, cnstnt))
            }
            "EXTERNAL" => Err(CouplerError::UnsupportedInput(format!(
                "EXTERNAL array records ({} in {})",
                name,
                self.file.display()
            ))),
            other => {
                let locat: i32 = other
                    .parse()
                    .map_err(|_| self.error(format!("unknown array control record '{}'", other)))?;
                let cnstnt = self.parse_cnstnt(tokens.next(), name)?;
                if locat == 0 {
                    Ok(vec![cnstnt; n])
                } else {
                    let values = self.read_values(n)?;
                    Ok(scale(values, cnstnt))
                }
            }
        }
    }

    pub fn read_real_grid(&mut self, rows: usize, cols: usize, name: &str) -> Result<Grid<f64>> {
        let values = self.read_real_array(rows * cols, name)?;
        Grid::from_vec(rows, cols, values).ok_or_else(|| self.error(format!("bad size for {}", name)))
    }

    pub fn read_int_grid(&mut self, rows: usize, cols: usize, name: &str) -> Result<Grid<i32>> {
        let values = self
            .read_real_array(rows * cols, name)?
            .into_iter()
            .map(|v| to_int(v).ok_or_else(|| self.error(format!("{} holds non-integer {}", name, v))))
            .collect::<Result<Vec<i32>>>()?;
        Grid::from_vec(rows, cols, values).ok_or_else(|| self.error(format!("bad size for {}", name)))
    }

    fn parse_cnstnt(&self, token: Option<&str>, name: &str) -> Result<f64> {
        let token = token.ok_or_else(|| self.error(format!("missing multiplier for {}", name)))?;
        parse_fortran_real(token).ok_or_else(|| self.error(format!("invalid multiplier '{}'", token)))
    }
}

/// Parse a real as Fortran writes it, including `D` exponents
pub fn parse_fortran_real(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .or_else(|| token.replace(['d', 'D'], "e").parse::<f64>().ok())
}

fn to_int(value: f64) -> Option<i32> {
    if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

fn scale(values: Vec<f64>, cnstnt: f64) -> Vec<f64> {
    if cnstnt == 1.0 {
        values
    } else {
        values.into_iter().map(|v| v * cnstnt).collect()
    }
}

/// Write a real grid as an INTERNAL free-format record
///
/// Values use Rust's shortest round-trip formatting so re-reading yields
/// bit-identical numbers.
pub fn write_real_grid(out: &mut String, grid: &Grid<f64>, name: &str) {
    out.push_str(&format!("INTERNAL 1.0 (FREE) -1    # {}\n", name));
    for row in grid.row_slices() {
        let line: Vec<String> = row.iter().map(|v| format!("{:e}", v)).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
}

pub fn write_int_grid(out: &mut String, grid: &Grid<i32>, name: &str) {
    out.push_str(&format!("INTERNAL 1 (FREE) -1    # {}\n", name));
    for row in grid.row_slices() {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(content: &str) -> PackageReader {
        PackageReader::from_content(content, Path::new("test.rch"), Path::new("."))
    }

    #[test]
    fn test_constant_record() {
        let mut r = reader("CONSTANT 2.5E-04\n");
        assert_eq!(r.read_real_array(3, "rech").unwrap(), vec![2.5e-4; 3]);
    }

    #[test]
    fn test_internal_record_spans_lines_with_repeats() {
        let mut r = reader("INTERNAL 2.0 (FREE) -1\n1.0 2.0\n3*0.5\nNEXT LINE\n");
        assert_eq!(
            r.read_real_array(5, "rech").unwrap(),
            vec![2.0, 4.0, 1.0, 1.0, 1.0]
        );
        assert_eq!(r.next_line().unwrap(), "NEXT LINE");
    }

    #[test]
    fn test_locat_records() {
        let mut r = reader("         0  1.5D-03\n        18  1.0 (10G12.4) -1\n 1 2 3 4\n");
        assert_eq!(r.read_real_array(2, "a").unwrap(), vec![1.5e-3; 2]);
        assert_eq!(r.read_real_array(4, "b").unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_external_unsupported() {
        let mut r = reader("EXTERNAL 50 1.0 (FREE) -1\n");
        assert!(matches!(
            r.read_real_array(1, "rech"),
            Err(CouplerError::UnsupportedInput(_))
        ));
    }

    #[test]
    fn test_comments_skipped() {
        let mut r = reader("# heading\n\n  # another\n 1 2\n");
        assert_eq!(r.next_line().unwrap().trim(), "1 2");
    }

    #[test]
    fn test_int_grid_rejects_fraction() {
        let mut r = reader("INTERNAL 1 (FREE) -1\n1 2.5\n");
        assert!(r.read_int_grid(1, 2, "irch").is_err());
    }

    #[test]
    fn test_written_grid_reads_back_exactly() {
        let grid = Grid::from_rows(vec![vec![0.1, 1.0 / 3.0], vec![-2.5e-7, 0.0]]).unwrap();
        let mut out = String::new();
        write_real_grid(&mut out, &grid, "rech");
        let mut r = reader(&out);
        assert_eq!(r.read_real_grid(2, 2, "rech").unwrap(), grid);
    }
}
