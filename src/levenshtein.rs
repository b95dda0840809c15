// src/levenshtein.rs
use std::ops::{Index, IndexMut};

use clap::ValueEnum;

use crate::error::SedError;

/// An opaque sequence element. Tokens are only ever compared for equality.
pub type Token = i32;

/// Wide enough for `len1 + len2`, the worst case.
pub type Distance = i32;

/// How the dynamic-programming table is held in memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// The whole (len1+1) x (len2+1) matrix.
    #[default]
    FullTable,
    /// Two rows as wide as the shorter sequence.
    RollingRows,
}

/// Row-major (len1+1) x (len2+1) edit distance matrix. Cell `(i, j)` holds the
/// distance between the first `i` tokens of one sequence and the first `j`
/// tokens of the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceTable {
    rows: usize,
    cols: usize,
    cells: Vec<Distance>,
}

impl DistanceTable {
    /// Allocates a zeroed table, aborting like any `Vec` if memory runs out.
    pub fn new(rows: usize, cols: usize) -> Self {
        // An overflowing cell count turns into a capacity overflow panic.
        let len = rows.checked_mul(cols).unwrap_or(usize::MAX);
        DistanceTable {
            rows,
            cols,
            cells: vec![0; len],
        }
    }

    pub fn try_new(rows: usize, cols: usize) -> Result<Self, SedError> {
        let cells = try_zeroed(rows.checked_mul(cols), rows, cols)?;
        Ok(DistanceTable { rows, cols, cells })
    }

    /// Builds and fills the table for `seq1` (rows) against `seq2` (columns).
    pub fn build(seq1: &[Token], seq2: &[Token]) -> Self {
        let mut table = DistanceTable::new(seq1.len() + 1, seq2.len() + 1);
        table.fill(seq1, seq2);
        table
    }

    pub fn try_build(seq1: &[Token], seq2: &[Token]) -> Result<Self, SedError> {
        let mut table = DistanceTable::try_new(seq1.len() + 1, seq2.len() + 1)?;
        table.fill(seq1, seq2);
        Ok(table)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Distance> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// The bottom-right cell: the distance between the full sequences.
    pub fn last(&self) -> Distance {
        self[(self.rows - 1, self.cols - 1)]
    }

    fn fill(&mut self, seq1: &[Token], seq2: &[Token]) {
        debug_assert_eq!((self.rows, self.cols), (seq1.len() + 1, seq2.len() + 1));

        for i in 0..self.rows {
            self[(i, 0)] = i as Distance;
        }
        for j in 0..self.cols {
            self[(0, j)] = j as Distance;
        }

        for i in 1..self.rows {
            for j in 1..self.cols {
                self[(i, j)] = if seq1[i - 1] == seq2[j - 1] {
                    self[(i - 1, j - 1)]
                } else {
                    1 + min3(self[(i - 1, j)], self[(i, j - 1)], self[(i - 1, j - 1)])
                };
            }
        }
    }
}

impl Index<(usize, usize)> for DistanceTable {
    type Output = Distance;

    fn index(&self, (row, col): (usize, usize)) -> &Distance {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({}, {}) is outside the {}x{} table",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.cells[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for DistanceTable {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Distance {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({}, {}) is outside the {}x{} table",
            row,
            col,
            self.rows,
            self.cols
        );
        &mut self.cells[row * self.cols + col]
    }
}

/// Previous and current row of the matrix, swapped after every outer step.
struct RollingRows {
    previous: Vec<Distance>,
    current: Vec<Distance>,
}

impl RollingRows {
    fn try_new(width: usize) -> Result<Self, SedError> {
        Ok(RollingRows {
            previous: try_zeroed(Some(width), 2, width)?,
            current: try_zeroed(Some(width), 2, width)?,
        })
    }

    fn run(mut self, outer: &[Token], inner: &[Token]) -> Distance {
        let len_inner = inner.len();

        for (j_idx, cell) in self.previous.iter_mut().enumerate() {
            *cell = j_idx as Distance;
        }

        for (i_idx, outer_token) in outer.iter().enumerate() {
            self.current[0] = (i_idx + 1) as Distance;
            for j_idx in 1..=len_inner {
                self.current[j_idx] = if *outer_token == inner[j_idx - 1] {
                    self.previous[j_idx - 1]
                } else {
                    1 + min3(
                        self.previous[j_idx],
                        self.current[j_idx - 1],
                        self.previous[j_idx - 1],
                    )
                };
            }
            std::mem::swap(&mut self.previous, &mut self.current);
        }
        self.previous[len_inner]
    }
}

/// Edit distance between two token sequences, using the full table.
///
/// # Panics
///
/// If `seq1.len() + seq2.len()` does not fit in a [`Distance`], or the table
/// cannot be allocated. Use [`try_distance`] to get these as errors.
pub fn distance(seq1: &[Token], seq2: &[Token]) -> Distance {
    if let Err(e) = check_representable(seq1.len(), seq2.len()) {
        panic!("{}", e);
    }
    if let Some(dist) = base_case(seq1, seq2) {
        return dist;
    }
    DistanceTable::build(seq1, seq2).last()
}

/// Edit distance "normalized" under the empty-sequence policy of [`normalize`].
///
/// # Panics
///
/// Under the same conditions as [`distance`].
pub fn normalized_distance(seq1: &[Token], seq2: &[Token]) -> f64 {
    normalize(seq1.len(), seq2.len(), distance(seq1, seq2))
}

/// Maps a raw distance to its normalized value.
///
/// Both sequences empty gives 0 and exactly one empty gives 1. Any other pair
/// gets the raw distance back unscaled, so the result is only confined to
/// [0, 1] in the empty-sequence cases. Callers relying on compatibility with
/// existing results depend on this, so it is not `raw / max(len1, len2)`.
pub fn normalize(len1: usize, len2: usize, raw: Distance) -> f64 {
    match (len1, len2) {
        (0, 0) => 0.0,
        (0, _) | (_, 0) => 1.0,
        _ => f64::from(raw),
    }
}

pub fn try_distance(
    seq1: &[Token],
    seq2: &[Token],
    strategy: Strategy,
) -> Result<Distance, SedError> {
    check_representable(seq1.len(), seq2.len())?;
    if let Some(dist) = base_case(seq1, seq2) {
        return Ok(dist);
    }

    log::debug!(
        "computing edit distance of {} x {} tokens with {:?}",
        seq1.len(),
        seq2.len(),
        strategy
    );

    match strategy {
        Strategy::FullTable => Ok(DistanceTable::try_build(seq1, seq2)?.last()),
        Strategy::RollingRows => {
            let (outer, inner) = if seq1.len() >= seq2.len() {
                (seq1, seq2)
            } else {
                (seq2, seq1)
            };
            Ok(RollingRows::try_new(inner.len() + 1)?.run(outer, inner))
        }
    }
}

pub fn try_normalized_distance(
    seq1: &[Token],
    seq2: &[Token],
    strategy: Strategy,
) -> Result<f64, SedError> {
    let raw = try_distance(seq1, seq2, strategy)?;
    Ok(normalize(seq1.len(), seq2.len(), raw))
}

fn base_case(seq1: &[Token], seq2: &[Token]) -> Option<Distance> {
    match (seq1.is_empty(), seq2.is_empty()) {
        (true, true) => Some(0),
        (true, false) => Some(seq2.len() as Distance),
        (false, true) => Some(seq1.len() as Distance),
        (false, false) => None,
    }
}

fn check_representable(len1: usize, len2: usize) -> Result<(), SedError> {
    match len1.checked_add(len2) {
        Some(total) if Distance::try_from(total).is_ok() => Ok(()),
        _ => Err(SedError::SequenceTooLong {
            first: len1,
            second: len2,
        }),
    }
}

fn try_zeroed(len: Option<usize>, rows: usize, cols: usize) -> Result<Vec<Distance>, SedError> {
    let failure = || SedError::AllocationFailure { rows, cols };
    let len = len.ok_or_else(failure)?;
    let mut cells = Vec::new();
    cells.try_reserve_exact(len).map_err(|_| failure())?;
    cells.resize(len, 0);
    Ok(cells)
}

#[inline]
fn min3(a: Distance, b: Distance, c: Distance) -> Distance {
    std::cmp::min(a, std::cmp::min(b, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRATEGIES: [Strategy; 2] = [Strategy::FullTable, Strategy::RollingRows];

    /// Small sequences over a tiny alphabet (including -1) so that matches,
    /// repeats and length differences all show up.
    fn corpus() -> Vec<Vec<Token>> {
        let mut state: u32 = 0x2545_f491;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        };
        (0..24)
            .map(|n| (0..n % 9).map(|_| (next() % 4) as Token - 1).collect())
            .collect()
    }

    #[test]
    fn empty_sequences() {
        assert_eq!(distance(&[], &[]), 0);
        assert_eq!(normalized_distance(&[], &[]), 0.0);
    }

    #[test]
    fn one_empty_sequence() {
        let seq = [4, 8, 15, 16];
        assert_eq!(distance(&seq, &[]), 4);
        assert_eq!(distance(&[], &seq), 4);
        assert_eq!(normalized_distance(&seq, &[]), 1.0);
        assert_eq!(normalized_distance(&[], &seq), 1.0);
    }

    #[test]
    fn concrete_cases() {
        assert_eq!(distance(&[1, 2, 3], &[1, 2, 3]), 0);
        assert_eq!(distance(&[1, 2, 3], &[1, 2, 4]), 1);
        assert_eq!(distance(&[1, 2, 3], &[]), 3);
        assert_eq!(normalized_distance(&[1, 2, 3], &[]), 1.0);
        assert_eq!(distance(&[1, 2], &[2, 1, 3]), 2);
        assert_eq!(distance(&[-5, 7, 7, 9], &[7, 9, -5]), 3);
    }

    #[test]
    fn normalization_leaves_general_case_unscaled() {
        // Known asymmetry: only the empty-sequence cases are mapped into [0, 1].
        assert_eq!(normalized_distance(&[1, 2, 3, 4], &[5, 6, 7]), 4.0);
        assert_eq!(normalized_distance(&[1, 2, 3], &[1, 2, 4]), 1.0);
        assert_eq!(normalized_distance(&[1, 2], &[1, 2]), 0.0);
        assert_eq!(normalize(3, 0, 3), 1.0);
        assert_eq!(normalize(3, 5, 4), 4.0);
    }

    #[test]
    fn strategies_agree_with_full_table() {
        let corpus = corpus();
        for a in &corpus {
            for b in &corpus {
                let expected = distance(a, b);
                for strategy in STRATEGIES {
                    assert_eq!(try_distance(a, b, strategy).unwrap(), expected, "{:?} {:?}", a, b);
                    assert_eq!(
                        try_normalized_distance(a, b, strategy).unwrap(),
                        normalized_distance(a, b)
                    );
                }
            }
        }
    }

    #[test]
    fn metric_properties() {
        let corpus = corpus();
        for a in &corpus {
            assert_eq!(distance(a, a), 0);
            for b in &corpus {
                let ab = distance(a, b);
                assert_eq!(ab, distance(b, a), "symmetry {:?} {:?}", a, b);

                let lower = a.len().abs_diff(b.len()) as Distance;
                let upper = a.len().max(b.len()) as Distance;
                assert!(lower <= ab && ab <= upper, "bounds {:?} {:?} = {}", a, b, ab);

                for c in &corpus {
                    assert!(distance(a, c) <= ab + distance(b, c));
                }
            }
        }
    }

    #[test]
    fn table_is_seeded_with_indices() {
        let table = DistanceTable::build(&[1, 2, 3], &[1, 2, 4, 5]);
        assert_eq!((table.rows(), table.cols()), (4, 5));
        for i in 0..table.rows() {
            assert_eq!(table[(i, 0)], i as Distance);
        }
        for j in 0..table.cols() {
            assert_eq!(table[(0, j)], j as Distance);
        }
        assert_eq!(table[(2, 2)], 0);
        assert_eq!(table[(3, 3)], 1);
        assert_eq!(table.last(), 2);
        assert_eq!(table.get(4, 0), None);
        assert_eq!(table.get(3, 4), Some(2));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn table_access_is_bounds_checked() {
        let table = DistanceTable::new(2, 3);
        let _ = table[(0, 3)];
    }

    #[test]
    fn oversized_table_reports_allocation_failure() {
        assert!(matches!(
            DistanceTable::try_new(usize::MAX, 2),
            Err(SedError::AllocationFailure { rows: usize::MAX, cols: 2 })
        ));
        assert!(matches!(
            DistanceTable::try_new(1 << 31, 1 << 31),
            Err(SedError::AllocationFailure { .. })
        ));
    }

    #[test]
    fn unrepresentable_lengths_are_rejected() {
        assert!(check_representable(10_000, 10_000).is_ok());
        assert!(matches!(
            check_representable(Distance::MAX as usize, 1),
            Err(SedError::SequenceTooLong { second: 1, .. })
        ));
        assert!(check_representable(usize::MAX, 1).is_err());
    }

    #[test]
    fn reference_maximum_length() {
        let seq1: Vec<Token> = (0..10_000).collect();
        let mut seq2 = seq1.clone();
        seq2[5_000] = -7;
        seq2.push(10_000);
        assert_eq!(try_distance(&seq1, &seq2, Strategy::RollingRows).unwrap(), 2);
        assert_eq!(distance(&seq1, &[]), 10_000);
    }
}
