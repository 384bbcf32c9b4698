//! Assignment matrix: the solution encoding.
//!
//! A dense row-major boolean grid, rows = TAs, columns = sections.
//! Entry (t, s) is `true` iff TA t is assigned to section s.
//!
//! The matrix enforces no constraint beyond its shape: objectives are
//! evaluated on constraint-violating matrices on purpose, since
//! violations are costs rather than illegal states.

use serde::{Deserialize, Serialize};

/// A TA-by-section boolean assignment grid.
///
/// Equality is bit-identical cell comparison, which the repair-agent
/// no-op contracts rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl AssignmentMatrix {
    /// Creates an all-unassigned matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Creates an all-assigned matrix (the standard search seed).
    pub fn ones(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![true; rows * cols],
        }
    }

    /// Builds a matrix from row vectors.
    ///
    /// # Panics
    /// Panics if the rows have unequal lengths.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut cells = Vec::with_capacity(n_rows * n_cols);
        for row in &rows {
            assert_eq!(row.len(), n_cols, "ragged matrix rows");
            cells.extend_from_slice(row);
        }
        Self {
            rows: n_rows,
            cols: n_cols,
            cells,
        }
    }

    /// Number of TA rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of section columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether TA `ta` is assigned to section `section`.
    #[inline]
    pub fn is_assigned(&self, ta: usize, section: usize) -> bool {
        self.cells[ta * self.cols + section]
    }

    /// Assigns TA `ta` to section `section`.
    #[inline]
    pub fn assign(&mut self, ta: usize, section: usize) {
        self.cells[ta * self.cols + section] = true;
    }

    /// Removes TA `ta` from section `section`.
    #[inline]
    pub fn unassign(&mut self, ta: usize, section: usize) {
        self.cells[ta * self.cols + section] = false;
    }

    /// Number of sections assigned to TA `ta`.
    pub fn assigned_in_row(&self, ta: usize) -> u32 {
        let start = ta * self.cols;
        self.cells[start..start + self.cols]
            .iter()
            .filter(|&&c| c)
            .count() as u32
    }

    /// Number of TAs assigned to section `section`.
    pub fn assigned_in_col(&self, section: usize) -> u32 {
        (0..self.rows)
            .filter(|&t| self.is_assigned(t, section))
            .count() as u32
    }

    /// Section columns currently assigned to TA `ta`.
    pub fn assigned_sections(&self, ta: usize) -> Vec<usize> {
        (0..self.cols).filter(|&s| self.is_assigned(ta, s)).collect()
    }

    /// TA rows currently unassigned for section `section`.
    pub fn unassigned_tas(&self, section: usize) -> Vec<usize> {
        (0..self.rows)
            .filter(|&t| !self.is_assigned(t, section))
            .collect()
    }

    /// All assigned (ta, section) cells in row-major order.
    pub fn assigned_cells(&self) -> Vec<(usize, usize)> {
        self.cells_where(true)
    }

    /// All unassigned (ta, section) cells in row-major order.
    pub fn unassigned_cells(&self) -> Vec<(usize, usize)> {
        self.cells_where(false)
    }

    fn cells_where(&self, value: bool) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for t in 0..self.rows {
            for s in 0..self.cols {
                if self.is_assigned(t, s) == value {
                    out.push((t, s));
                }
            }
        }
        out
    }

    /// Total number of assigned cells.
    pub fn assignment_count(&self) -> u32 {
        self.cells.iter().filter(|&&c| c).count() as u32
    }
}
