//! Bit-line projections of the board and the five-in-a-row test.
//!
//! Every cell belongs to exactly four lines: its row, its column, its
//! diagonal and its anti-diagonal. A `LineSet` stores the board four times,
//! once per direction, with one `u64` word per line and the cells of that
//! line occupying contiguous bits. Checking any direction for a run of five
//! is then a handful of shifts on a single word.
//!
//! Layout of the `6 * N` words (diagonals need `2N - 1` words each):
//!
//! ```text
//! rows            word y                   bit x
//! columns         word N + x               bit y
//! diagonals       word 2N + (x + N-1 - y)  bit x
//! anti-diagonals  word 4N + (2N-2 - x - y) bit x
//! ```
//!
//! Renumbering bits so a line stops being contiguous breaks `has_five`.

/// Number of directions a line can run in.
pub const DIRECTIONS: usize = 4;

/// Test a line word for five consecutive set bits.
///
/// `m & (m >> 1)` keeps the start of every run of two or more, the shift by
/// two combines two of those into runs of four, and the last step extends
/// to five.
#[inline]
#[must_use]
pub const fn has_five(word: u64) -> bool {
    let mut m = word;
    m &= m >> 1;
    m &= m >> 2;
    (m & (m >> 1)) != 0
}

/// Scan-based reference for `has_five`.
#[must_use]
pub fn has_five_naive(word: u64) -> bool {
    let mut run = 0;
    for bit in 0..u64::BITS {
        if word & (1u64 << bit) != 0 {
            run += 1;
            if run >= 5 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Word index of row `y`.
#[inline]
#[must_use]
pub const fn row_line<const N: usize>(y: usize) -> usize {
    y
}

/// Word index of column `x`.
#[inline]
#[must_use]
pub const fn column_line<const N: usize>(x: usize) -> usize {
    N + x
}

/// Word index of the diagonal (`x - y` constant) through `(x, y)`.
#[inline]
#[must_use]
pub const fn diagonal_line<const N: usize>(x: usize, y: usize) -> usize {
    2 * N + x + N - 1 - y
}

/// Word index of the anti-diagonal (`x + y` constant) through `(x, y)`.
#[inline]
#[must_use]
pub const fn anti_diagonal_line<const N: usize>(x: usize, y: usize) -> usize {
    4 * N + 2 * N - 2 - x - y
}

/// Four directional projections of one set of cells.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct LineSet<const N: usize> {
    words: [[u64; N]; 6],
}

impl<const N: usize> Default for LineSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineSet<N> {
    /// Total number of line words, including unused padding.
    pub const WORDS: usize = 6 * N;

    /// Create an empty line set.
    #[must_use]
    pub const fn new() -> Self {
        Self { words: [[0; N]; 6] }
    }

    #[inline]
    fn word_mut(&mut self, line: usize) -> &mut u64 {
        &mut self.words[line / N][line % N]
    }

    /// Read a line word by its index.
    #[inline]
    #[must_use]
    pub fn word(&self, line: usize) -> u64 {
        self.words[line / N][line % N]
    }

    /// Mark `(x, y)` in all four projections.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize) {
        *self.word_mut(row_line::<N>(y)) |= 1u64 << x;
        *self.word_mut(column_line::<N>(x)) |= 1u64 << y;
        *self.word_mut(diagonal_line::<N>(x, y)) |= 1u64 << x;
        *self.word_mut(anti_diagonal_line::<N>(x, y)) |= 1u64 << x;
    }

    /// Is `(x, y)` marked? Reads the row projection.
    #[inline]
    #[must_use]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.word(row_line::<N>(y)) & (1u64 << x) != 0
    }

    /// The four line words through `(x, y)`: row, column, diagonal and
    /// anti-diagonal.
    #[inline]
    #[must_use]
    pub fn lines_through(&self, x: usize, y: usize) -> [u64; DIRECTIONS] {
        [
            self.word(row_line::<N>(y)),
            self.word(column_line::<N>(x)),
            self.word(diagonal_line::<N>(x, y)),
            self.word(anti_diagonal_line::<N>(x, y)),
        ]
    }

    /// Does any line through `(x, y)` hold five in a row?
    #[inline]
    #[must_use]
    pub fn five_through(&self, x: usize, y: usize) -> bool {
        self.lines_through(x, y).into_iter().any(has_five)
    }

    /// XOR every word of `other` into `self`.
    #[inline]
    pub fn xor_assign(&mut self, other: &Self) {
        for (dst, src) in self.words.iter_mut().zip(other.words.iter()) {
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d ^= *s;
            }
        }
    }

    /// Number of marked cells (counted on the row projection).
    #[must_use]
    pub fn count(&self) -> u32 {
        (0..N).map(|y| self.word(row_line::<N>(y)).count_ones()).sum()
    }
}
