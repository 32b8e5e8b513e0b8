//! A minimal GF(2) linear-algebra helper used only by
//! [`crate::inactivation`] to solve the small residual system left after
//! a cluster of checks has been inactivated.
//!
//! This is deliberately narrow: a dense matrix type and one Gauss-Jordan
//! solver, nothing more. A full sparse GF(2) type is out of scope here;
//! [`crate::inactivation`] is this module's only caller and the systems
//! it hands over are always small (the size of one inactivated cluster).

/// A dense matrix over GF(2), stored one `u8` (0 or 1) per entry,
/// row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gf2Matrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl Gf2Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0; rows * cols] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.data[row * self.cols + col] = value & 1;
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for col in 0..self.cols {
            self.data.swap(a * self.cols + col, b * self.cols + col);
        }
    }

    fn xor_row_into(&mut self, source: usize, target: usize) {
        for col in 0..self.cols {
            let value = self.get(source, col) ^ self.get(target, col);
            self.set(target, col, value);
        }
    }
}

/// Solves `matrix * x = rhs` over GF(2), zero-filling every non-pivot
/// column of `x`. `matrix` need not be square: stabilizer-inactivation
/// hands over one row per inactivated check and one column per
/// inactivated bit, and a cluster's checks usually outnumber its bits.
/// Returns `None` if the system is inconsistent.
pub fn solve(matrix: &Gf2Matrix, rhs: &[u8]) -> Option<Vec<u8>> {
    assert_eq!(rhs.len(), matrix.rows());

    let mut reduced = matrix.clone();
    let mut rhs = rhs.to_vec();
    let mut pivots = Vec::new();
    let mut pivot_row = 0;
    for col in 0..reduced.cols() {
        if pivot_row >= reduced.rows() {
            break;
        }
        let Some(found) = (pivot_row..reduced.rows()).find(|&r| reduced.get(r, col) == 1) else {
            continue;
        };
        reduced.swap_rows(pivot_row, found);
        rhs.swap(pivot_row, found);
        for row in 0..reduced.rows() {
            if row != pivot_row && reduced.get(row, col) == 1 {
                reduced.xor_row_into(pivot_row, row);
                rhs[row] ^= rhs[pivot_row];
            }
        }
        pivots.push(col);
        pivot_row += 1;
    }

    // Every row past the last pivot is all-zero in `reduced`; the system
    // is inconsistent unless its right-hand side reduced to zero too.
    if rhs[pivots.len()..].iter().any(|&bit| bit != 0) {
        return None;
    }

    let mut x = vec![0u8; matrix.cols()];
    for (row, &pivot_col) in pivots.iter().enumerate() {
        x[pivot_col] = rhs[row];
    }
    Some(x)
}
