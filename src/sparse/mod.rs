//! An orthogonally linked sparse binary matrix.
//!
//! [`SparseMod2`] stores only the positions of the 1s of a binary matrix,
//! but unlike a plain coordinate or CSR format, every nonzero also carries
//! two mutable message slots and a sign accumulator, and can be reached
//! from its row *or* its column neighbor in O(1). This is what lets the
//! belief-propagation kernels in [`crate::bp`] run their two-pass
//! forward/backward sweeps without any scratch array indexed by nonzero
//! position: the messages live on the edge itself.
//!
//! The matrix never frees or moves an entry once constructed; decoding
//! only ever mutates the message fields in place.

use crate::error::Error;
use std::collections::HashSet;

mod iter;
pub use iter::{ColIter, RowIter};

/// Identifies a single nonzero entry (or, internally, a row/column
/// sentinel). Opaque to callers beyond equality and use as a traversal
/// cursor.
pub type EntryId = usize;

#[derive(Debug, Clone, Copy)]
struct Entry {
    row: usize,
    col: usize,
    bit_to_check: f64,
    check_to_bit: f64,
    sign: i32,
    row_next: EntryId,
    row_prev: EntryId,
    col_next: EntryId,
    col_prev: EntryId,
}

impl Entry {
    fn sentinel(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            bit_to_check: 0.0,
            check_to_bit: 0.0,
            sign: 0,
            row_next: 0,
            row_prev: 0,
            col_next: 0,
            col_prev: 0,
        }
    }
}

/// A sparse binary matrix of shape `m x n` with mutable per-entry message
/// state, linked both row-major and column-major.
///
/// See the [module documentation](self) for the rationale behind the
/// orthogonal linking.
#[derive(Debug, Clone)]
pub struct SparseMod2 {
    n_rows: usize,
    n_cols: usize,
    entries: Vec<Entry>,
    row_heads: Vec<EntryId>,
    col_heads: Vec<EntryId>,
    nnz: usize,
}

impl SparseMod2 {
    /// Builds a matrix of shape `m x n` whose 1-entries are at the given
    /// `(row, col)` coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMatrix`] if any coordinate is out of range
    /// or if the same coordinate appears twice.
    ///
    /// # Example
    ///
    /// ```
    /// # use ldpc_bp_decoder::sparse::SparseMod2;
    /// // 3-bit repetition code: H = [[1,1,0],[0,1,1]]
    /// let h = SparseMod2::construct(2, 3, vec![(0, 0), (0, 1), (1, 1), (1, 2)]).unwrap();
    /// assert_eq!(h.number_of_rows(), 2);
    /// assert_eq!(h.number_of_cols(), 3);
    /// assert_eq!(h.nnz(), 4);
    /// ```
    pub fn construct<I>(m: usize, n: usize, nonzeros: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut seen = HashSet::new();
        let mut coords: Vec<(usize, usize)> = Vec::new();
        for (row, col) in nonzeros {
            if row >= m || col >= n {
                return Err(Error::InvalidMatrix(format!(
                    "coordinate ({}, {}) is out of range for a {}x{} matrix",
                    row, col, m, n
                )));
            }
            if !seen.insert((row, col)) {
                return Err(Error::InvalidMatrix(format!(
                    "duplicate nonzero at ({}, {})",
                    row, col
                )));
            }
            coords.push((row, col));
        }

        let nnz = coords.len();
        let mut entries = Vec::with_capacity(m + n + nnz);
        for row in 0..m {
            entries.push(Entry::sentinel(row, usize::MAX));
        }
        for col in 0..n {
            entries.push(Entry::sentinel(usize::MAX, col));
        }
        for &(row, col) in &coords {
            entries.push(Entry {
                row,
                col,
                bit_to_check: 0.0,
                check_to_bit: 0.0,
                sign: 0,
                row_next: 0,
                row_prev: 0,
                col_next: 0,
                col_prev: 0,
            });
        }

        let row_heads: Vec<EntryId> = (0..m).collect();
        let col_heads: Vec<EntryId> = (m..m + n).collect();
        let first_entry = m + n;

        let mut by_row: Vec<Vec<EntryId>> = vec![Vec::new(); m];
        let mut by_col: Vec<Vec<EntryId>> = vec![Vec::new(); n];
        for (k, &(row, col)) in coords.iter().enumerate() {
            by_row[row].push(first_entry + k);
            by_col[col].push(first_entry + k);
        }
        for row_list in by_row.iter_mut() {
            row_list.sort_by_key(|&id| entries[id].col);
        }
        for col_list in by_col.iter_mut() {
            col_list.sort_by_key(|&id| entries[id].row);
        }

        let mut matrix = Self {
            n_rows: m,
            n_cols: n,
            entries,
            row_heads,
            col_heads,
            nnz,
        };
        for (row, ids) in by_row.iter().enumerate() {
            matrix.stitch_row(row, ids);
        }
        for (col, ids) in by_col.iter().enumerate() {
            matrix.stitch_col(col, ids);
        }
        Ok(matrix)
    }

    fn stitch_row(&mut self, row: usize, ids: &[EntryId]) {
        let head = self.row_heads[row];
        let mut prev = head;
        for &id in ids {
            self.entries[prev].row_next = id;
            self.entries[id].row_prev = prev;
            prev = id;
        }
        self.entries[prev].row_next = head;
        self.entries[head].row_prev = prev;
    }

    fn stitch_col(&mut self, col: usize, ids: &[EntryId]) {
        let head = self.col_heads[col];
        let mut prev = head;
        for &id in ids {
            self.entries[prev].col_next = id;
            self.entries[id].col_prev = prev;
            prev = id;
        }
        self.entries[prev].col_next = head;
        self.entries[head].col_prev = prev;
    }

    /// Number of rows (checks) of the matrix.
    pub fn number_of_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns (bits) of the matrix.
    pub fn number_of_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of nonzero (1-valued) entries.
    pub fn nnz(&self) -> usize {
        self.nnz
    }

    /// True if `entry` is a row or column sentinel, i.e. traversal has
    /// gone one step past the last real entry.
    pub fn at_end(&self, entry: EntryId) -> bool {
        entry < self.n_rows + self.n_cols
    }

    /// The first nonzero of row `i` in increasing column order, or the
    /// row's sentinel if the row is empty.
    pub fn first_in_row(&self, row: usize) -> EntryId {
        self.entries[self.row_heads[row]].row_next
    }

    /// The last nonzero of row `i` in increasing column order, or the
    /// row's sentinel if the row is empty.
    pub fn last_in_row(&self, row: usize) -> EntryId {
        self.entries[self.row_heads[row]].row_prev
    }

    /// The entry immediately after `entry` in its row, or that row's
    /// sentinel if `entry` was the last one.
    pub fn next_in_row(&self, entry: EntryId) -> EntryId {
        self.entries[entry].row_next
    }

    /// The entry immediately before `entry` in its row, or that row's
    /// sentinel if `entry` was the first one.
    pub fn prev_in_row(&self, entry: EntryId) -> EntryId {
        self.entries[entry].row_prev
    }

    /// The first nonzero of column `j` in increasing row order, or the
    /// column's sentinel if the column is empty.
    pub fn first_in_col(&self, col: usize) -> EntryId {
        self.entries[self.col_heads[col]].col_next
    }

    /// The last nonzero of column `j` in increasing row order, or the
    /// column's sentinel if the column is empty.
    pub fn last_in_col(&self, col: usize) -> EntryId {
        self.entries[self.col_heads[col]].col_prev
    }

    /// The entry immediately after `entry` in its column, or that
    /// column's sentinel if `entry` was the last one.
    pub fn next_in_col(&self, entry: EntryId) -> EntryId {
        self.entries[entry].col_next
    }

    /// The entry immediately before `entry` in its column, or that
    /// column's sentinel if `entry` was the first one.
    pub fn prev_in_col(&self, entry: EntryId) -> EntryId {
        self.entries[entry].col_prev
    }

    /// Iterates over the nonzeros of row `i` in increasing column order.
    pub fn row(&self, row: usize) -> RowIter<'_> {
        RowIter::new(self, row)
    }

    /// Iterates over the nonzeros of column `j` in increasing row order.
    pub fn col(&self, col: usize) -> ColIter<'_> {
        ColIter::new(self, col)
    }

    /// The `(row, col)` coordinates of `entry`.
    pub fn coordinates(&self, entry: EntryId) -> (usize, usize) {
        (self.entries[entry].row, self.entries[entry].col)
    }

    pub fn row_of(&self, entry: EntryId) -> usize {
        self.entries[entry].row
    }

    pub fn col_of(&self, entry: EntryId) -> usize {
        self.entries[entry].col
    }

    pub fn bit_to_check(&self, entry: EntryId) -> f64 {
        self.entries[entry].bit_to_check
    }

    pub fn set_bit_to_check(&mut self, entry: EntryId, value: f64) {
        self.entries[entry].bit_to_check = value;
    }

    pub fn check_to_bit(&self, entry: EntryId) -> f64 {
        self.entries[entry].check_to_bit
    }

    pub fn set_check_to_bit(&mut self, entry: EntryId, value: f64) {
        self.entries[entry].check_to_bit = value;
    }

    pub fn sign(&self, entry: EntryId) -> i32 {
        self.entries[entry].sign
    }

    pub fn set_sign(&mut self, entry: EntryId, value: i32) {
        self.entries[entry].sign = value;
    }

    /// Resets every entry's message and sign fields to zero. Called at
    /// the start of every BP run so that a decoder can be reused across
    /// independent calls without carrying over stale messages.
    pub fn reset_messages(&mut self) {
        for entry in self.entries.iter_mut().skip(self.n_rows + self.n_cols) {
            entry.bit_to_check = 0.0;
            entry.check_to_bit = 0.0;
            entry.sign = 0;
        }
    }

    /// Computes `out[i] = XOR_j H[i,j] * v[j]` by row traversal.
    ///
    /// # Panics
    ///
    /// Panics if `v.len() != number_of_cols()` or `out.len() != number_of_rows()`.
    pub fn mulvec(&self, v: &[u8], out: &mut [u8]) {
        assert_eq!(v.len(), self.n_cols, "mulvec: input length must equal n");
        assert_eq!(out.len(), self.n_rows, "mulvec: output length must equal m");
        for (row, slot) in out.iter_mut().enumerate() {
            let mut acc = 0u8;
            let mut e = self.first_in_row(row);
            while !self.at_end(e) {
                acc ^= v[self.col_of(e)];
                e = self.next_in_row(e);
            }
            *slot = acc;
        }
    }
}
