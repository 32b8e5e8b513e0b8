use super::{EntryId, SparseMod2};

/// Iterates the nonzeros of a single row in increasing column order.
///
/// Returned by [`SparseMod2::row`](super::SparseMod2::row).
#[derive(Debug, Clone)]
pub struct RowIter<'a> {
    matrix: &'a SparseMod2,
    front: EntryId,
    back: EntryId,
    done: bool,
}

impl<'a> RowIter<'a> {
    pub(super) fn new(matrix: &'a SparseMod2, row: usize) -> Self {
        let front = matrix.first_in_row(row);
        let back = matrix.last_in_row(row);
        let done = matrix.at_end(front);
        Self { matrix, front, back, done }
    }
}

impl<'a> Iterator for RowIter<'a> {
    type Item = EntryId;

    fn next(&mut self) -> Option<EntryId> {
        if self.done {
            return None;
        }
        let current = self.front;
        if current == self.back {
            self.done = true;
        } else {
            self.front = self.matrix.next_in_row(current);
        }
        Some(current)
    }
}

/// Iterates the nonzeros of a single column in increasing row order.
///
/// Returned by [`SparseMod2::col`](super::SparseMod2::col).
#[derive(Debug, Clone)]
pub struct ColIter<'a> {
    matrix: &'a SparseMod2,
    front: EntryId,
    back: EntryId,
    done: bool,
}

impl<'a> ColIter<'a> {
    pub(super) fn new(matrix: &'a SparseMod2, col: usize) -> Self {
        let front = matrix.first_in_col(col);
        let back = matrix.last_in_col(col);
        let done = matrix.at_end(front);
        Self { matrix, front, back, done }
    }
}

impl<'a> Iterator for ColIter<'a> {
    type Item = EntryId;

    fn next(&mut self) -> Option<EntryId> {
        if self.done {
            return None;
        }
        let current = self.front;
        if current == self.back {
            self.done = true;
        } else {
            self.front = self.matrix.next_in_col(current);
        }
        Some(current)
    }
}
