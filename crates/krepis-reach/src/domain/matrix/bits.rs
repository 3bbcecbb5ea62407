//! Dense Bit Matrix
//!
//! Row-major, one `u64` word per 64 columns:
//!
//! ```text
//! set(r, c):        bits[r * stride + c / 64] |= 1 << (c % 64)
//! row_overlaps:     any(A.row(i)[w] & B.row(j)[w])
//! row iteration:    trailing_zeros() per word
//! ```

use std::fmt;

const WORD_BITS: usize = u64::BITS as usize;

/// Boolean relation between two index ranges
#[derive(Clone, PartialEq, Eq)]
pub struct DependencyMatrix {
    rows: usize,
    cols: usize,
    stride: usize,
    bits: Vec<u64>,
}

impl DependencyMatrix {
    /// All-false matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        let stride = cols.div_ceil(WORD_BITS);
        Self { rows, cols, stride, bits: vec![0; rows * stride] }
    }

    /// Matrix with `(r, c)` set for every `c` in `sets[r]`
    ///
    /// # Panics
    ///
    /// Panics if a column index is `>= cols`.
    pub fn from_rows<R: AsRef<[usize]>>(sets: &[R], cols: usize) -> Self {
        let mut matrix = Self::new(sets.len(), cols);
        for (r, set) in sets.iter().enumerate() {
            for &c in set.as_ref() {
                matrix.set(r, c, true);
            }
        }
        matrix
    }

    /// Row count
    #[inline(always)]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Column count
    #[inline(always)]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Read `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> bool {
        let (word, mask) = self.locate(row, col);
        self.bits[word] & mask != 0
    }

    /// Write `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        let (word, mask) = self.locate(row, col);
        if value {
            self.bits[word] |= mask;
        } else {
            self.bits[word] &= !mask;
        }
    }

    /// Columns set in `row`, ascending
    pub fn row(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        assert!(row < self.rows, "row {row} out of range ({})", self.rows);
        let words = &self.bits[row * self.stride..(row + 1) * self.stride];
        words.iter().enumerate().flat_map(|(w, &word)| SetBits { word, base: w * WORD_BITS })
    }

    /// Rows set in `col`, ascending
    pub fn col(&self, col: usize) -> impl Iterator<Item = usize> + '_ {
        assert!(col < self.cols, "column {col} out of range ({})", self.cols);
        (0..self.rows).filter(move |&r| self.get(r, col))
    }

    /// Whether row `i` of `self` and row `j` of `other` share a column
    ///
    /// Both matrices must have the same column count.
    pub fn rows_overlap(&self, i: usize, other: &Self, j: usize) -> bool {
        debug_assert_eq!(self.cols, other.cols);
        let a = &self.bits[i * self.stride..(i + 1) * self.stride];
        let b = &other.bits[j * other.stride..(j + 1) * other.stride];
        a.iter().zip(b).any(|(x, y)| x & y != 0)
    }

    /// Number of set entries
    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline(always)]
    fn locate(&self, row: usize, col: usize) -> (usize, u64) {
        assert!(
            row < self.rows && col < self.cols,
            "({row}, {col}) out of range ({} x {})",
            self.rows,
            self.cols
        );
        (row * self.stride + col / WORD_BITS, 1 << (col % WORD_BITS))
    }
}

impl fmt::Debug for DependencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DependencyMatrix({} x {})", self.rows, self.cols)?;
        for r in 0..self.rows {
            let line: String =
                (0..self.cols).map(|c| if self.get(r, c) { '+' } else { '-' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Indices of the set bits of one word
struct SetBits {
    word: u64,
    base: usize,
}

impl Iterator for SetBits {
    type Item = usize;

    #[inline(always)]
    fn next(&mut self) -> Option<usize> {
        if self.word == 0 {
            return None;
        }
        let bit = self.word.trailing_zeros() as usize;
        self.word &= self.word - 1;
        Some(self.base + bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_across_word_boundary() {
        let mut m = DependencyMatrix::new(3, 130);
        m.set(1, 0, true);
        m.set(1, 63, true);
        m.set(1, 64, true);
        m.set(2, 129, true);

        assert!(m.get(1, 63) && m.get(1, 64) && m.get(2, 129));
        assert!(!m.get(0, 64));
        assert_eq!(m.row(1).collect::<Vec<_>>(), vec![0, 63, 64]);
        assert_eq!(m.col(129).collect::<Vec<_>>(), vec![2]);
        assert_eq!(m.count_ones(), 4);

        m.set(1, 63, false);
        assert_eq!(m.row(1).collect::<Vec<_>>(), vec![0, 64]);
    }

    #[test]
    fn test_rows_overlap() {
        let reads = DependencyMatrix::from_rows(&[vec![0, 70], vec![5]], 80);
        let writes = DependencyMatrix::from_rows(&[vec![70], vec![1]], 80);

        assert!(reads.rows_overlap(0, &writes, 0));
        assert!(!reads.rows_overlap(1, &writes, 0));
        assert!(!reads.rows_overlap(1, &writes, 1));
    }

    #[test]
    fn test_zero_columns() {
        let m = DependencyMatrix::new(2, 0);
        assert_eq!(m.row(1).count(), 0);
        assert_eq!(m.count_ones(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_panics() {
        let m = DependencyMatrix::new(2, 2);
        let _ = m.get(2, 0);
    }
}
