//! Row-major 2-D grids aligned with the flow model's layer geometry
//!
//! `Grid<T>` stores recharge values, layer indices and raw shape arrays.
//! `Mask` is the boolean view of a shape: a cell is included only when
//! the shape holds exactly `1` there.

use std::fmt;

/// Cell value that marks a shape cell as included
pub const MASK_INCLUDED: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

/// Returned when nested rows do not form a rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct RaggedRows {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for RaggedRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} has {} cells, expected {}",
            self.row, self.found, self.expected
        )
    }
}

impl std::error::Error for RaggedRows {}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Build from row-major data; `None` if the length does not match
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    /// Build from nested rows, as shapes are persisted
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, RaggedRows> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != cols {
                return Err(RaggedRows {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self {
            rows: n_rows,
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Iterate rows as slices
    pub fn row_slices(&self) -> impl Iterator<Item = &[T]> {
        // chunks() panics on 0, and an empty grid has no rows anyway
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }
}

impl<T: Copy> Grid<T> {
    /// Write `value` into every cell selected by `mask`
    ///
    /// The caller guarantees matching dimensions; cells outside the mask
    /// keep whatever they held before.
    pub fn fill_masked(&mut self, mask: &Mask, value: T) {
        debug_assert_eq!(self.dims(), mask.dims());
        for (cell, included) in self.data.iter_mut().zip(mask.cells.iter()) {
            if *included {
                *cell = value;
            }
        }
    }
}

/// Boolean cell selection derived from a shape
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Mask {
    pub fn from_shape(shape: &Grid<f64>) -> Self {
        Self {
            rows: shape.rows,
            cols: shape.cols,
            cells: shape.data.iter().map(|v| *v == MASK_INCLUDED).collect(),
        }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_included(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Number of included cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    pub fn overlaps(&self, other: &Mask) -> bool {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .any(|(a, b)| *a && *b)
    }
}
