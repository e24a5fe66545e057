/// Lower-triangular pairwise distance buffer over the current window.
///
/// A flat `max_size × max_size` block allocated once; only entries `[i][j]`
/// with `j < i < current window size` are meaningful. Rows and columns are
/// shifted in place when window members leave, so a neighbor lookup is O(1)
/// at the price of an O(size²) shift per removal.
pub(crate) struct DistanceCache {
    max_size: usize,
    cells: Vec<f64>,
}

impl DistanceCache {
    pub(crate) fn new(max_size: usize) -> DistanceCache {
        DistanceCache {
            max_size,
            cells: vec![0.0; max_size * max_size],
        }
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        i * self.max_size + j
    }

    pub(crate) fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(j < i && i < self.max_size);
        self.cells[self.offset(i, j)]
    }

    /// The valid prefix of row `i`: distances from window position `i` to
    /// every older position `j < i`.
    pub(crate) fn row(&self, i: usize) -> &[f64] {
        let start = self.offset(i, 0);
        &self.cells[start..start + i]
    }

    /// Writes the distances from the instance newly stored at `row` to all
    /// older window members. `distances[j]` must hold the distance to
    /// position `j`, for every `j < row`.
    pub(crate) fn append_row(&mut self, row: usize, distances: &[f64]) {
        debug_assert_eq!(distances.len(), row);
        let start = self.offset(row, 0);
        self.cells[start..start + row].copy_from_slice(distances);
    }

    /// Removes window position `index` from a window of `current_size`
    /// entries: every surviving row above it moves down by one, taking its
    /// columns `< index` unchanged and its columns `>= index` from one
    /// position further right.
    pub(crate) fn remove_at(&mut self, index: usize, current_size: usize) {
        debug_assert!(index < current_size && current_size <= self.max_size);
        for i in index..current_size - 1 {
            for j in 0..index {
                let src = self.offset(i + 1, j);
                let dst = self.offset(i, j);
                self.cells[dst] = self.cells[src];
            }
            for j in index..i {
                let src = self.offset(i + 1, j + 1);
                let dst = self.offset(i, j);
                self.cells[dst] = self.cells[src];
            }
        }
    }

    /// Drops the `count` oldest rows/columns by shifting the remaining
    /// block toward the origin.
    pub(crate) fn truncate_front(&mut self, count: usize, current_size: usize) {
        debug_assert!(count <= current_size && current_size <= self.max_size);
        for i in 0..current_size - count {
            for j in 0..i {
                let src = self.offset(i + count, j + count);
                let dst = self.offset(i, j);
                self.cells[dst] = self.cells[src];
            }
        }
    }
}
