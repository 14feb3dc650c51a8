use crate::scoring::AlignmentStats;
use crate::{AlignerError, GAP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackOperation {
    Match,
    Mismatch,
    // Gap in S2
    Insertion,
    // Gap in S1
    Deletion,
}

/// Dense row-major matrix of scores. Rows index S2 prefixes, columns S1
/// prefixes; row and column 0 stand for the empty prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl ScoreMatrix {
    pub fn new(rows: usize, cols: usize, fill: f64) -> Self {
        Self {
            data: vec![fill; rows * cols],
            rows,
            cols,
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// First cell holding the maximum value, scanning row by row.
    pub fn argmax(&self) -> (usize, usize, f64) {
        let mut best = (0, 0, self.data[0]);
        for (idx, &value) in self.data.iter().enumerate() {
            if value > best.2 {
                best = (idx / self.cols, idx % self.cols, value);
            }
        }
        best
    }
}

/// Per-cell direction codes. What a code means depends on the aligner
/// that filled the matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracebackMatrix {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl TracebackMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0; rows * cols],
            rows,
            cols,
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.data[row * self.cols + col] = value;
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.cols + col]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

/// Checks that a `rows x cols` matrix was filled for `s1` across and `s2`
/// down before any traceback indexes into it.
pub(crate) fn check_dimensions(
    s1: &[u8],
    s2: &[u8],
    rows: usize,
    cols: usize,
) -> Result<(), AlignerError> {
    let expected_rows = s2.len() + 1;
    let expected_cols = s1.len() + 1;
    if rows != expected_rows || cols != expected_cols {
        return Err(AlignerError::DimensionMismatch {
            rows,
            cols,
            expected_rows,
            expected_cols,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseAlignment {
    pub aligned_seq1: Vec<u8>,
    pub aligned_seq2: Vec<u8>,
    pub score: f64,
}

impl PairwiseAlignment {
    pub fn len(&self) -> usize {
        self.aligned_seq1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_seq1.is_empty()
    }

    pub fn seq1_str(&self) -> String {
        String::from_utf8_lossy(&self.aligned_seq1).into_owned()
    }

    pub fn seq2_str(&self) -> String {
        String::from_utf8_lossy(&self.aligned_seq2).into_owned()
    }

    pub fn operations(&self) -> Vec<TracebackOperation> {
        self.aligned_seq1
            .iter()
            .zip(self.aligned_seq2.iter())
            .map(|(&a, &b)| match (a, b) {
                (GAP, _) => TracebackOperation::Deletion,
                (_, GAP) => TracebackOperation::Insertion,
                (a, b) if a == b => TracebackOperation::Match,
                _ => TracebackOperation::Mismatch,
            })
            .collect()
    }

    pub fn stats(&self) -> AlignmentStats {
        self.operations()
            .into_iter()
            .fold(AlignmentStats::default(), |mut acc, op| {
                match op {
                    TracebackOperation::Match => acc.matches += 1,
                    TracebackOperation::Mismatch => acc.mismatches += 1,
                    TracebackOperation::Insertion => acc.insertions += 1,
                    TracebackOperation::Deletion => acc.deletions += 1,
                }
                acc
            })
    }
}

/// Aligned columns collected while walking a traceback from the end of the
/// sequences towards the origin. `finish` restores left-to-right order.
#[derive(Debug, Default)]
pub(crate) struct ReverseTrace {
    seq1: Vec<u8>,
    seq2: Vec<u8>,
}

impl ReverseTrace {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            seq1: Vec::with_capacity(capacity),
            seq2: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, a: u8, b: u8) {
        self.seq1.push(a);
        self.seq2.push(b);
    }

    pub(crate) fn finish(mut self) -> (Vec<u8>, Vec<u8>) {
        self.seq1.reverse();
        self.seq2.reverse();
        (self.seq1, self.seq2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_matrix_argmax_first_in_row_major() {
        let mut m = ScoreMatrix::new(3, 3, 0.0);
        m.set(1, 2, 4.0);
        m.set(2, 0, 4.0);
        m.set(2, 2, 3.0);
        assert_eq!(m.argmax(), (1, 2, 4.0));
        assert_eq!(m.row(2), &[4.0, 0.0, 3.0]);
    }

    #[test]
    fn test_operations_and_stats() {
        let alignment = PairwiseAlignment {
            aligned_seq1: b"G-ATTACA".to_vec(),
            aligned_seq2: b"GCA-TGCU".to_vec(),
            score: 17.0,
        };
        let ops = alignment.operations();
        assert_eq!(ops[0], TracebackOperation::Match);
        assert_eq!(ops[1], TracebackOperation::Deletion);
        assert_eq!(ops[3], TracebackOperation::Insertion);
        assert_eq!(ops[5], TracebackOperation::Mismatch);

        let stats = alignment.stats();
        assert_eq!(stats.matches, 4);
        assert_eq!(stats.mismatches, 2);
        assert_eq!(stats.gaps(), 2);
        assert_eq!(stats.columns() as usize, alignment.len());
    }

    #[test]
    fn test_reverse_trace() {
        let mut trace = ReverseTrace::with_capacity(3);
        trace.push(b'C', b'C');
        trace.push(b'-', b'A');
        trace.push(b'G', b'G');
        let (a, b) = trace.finish();
        assert_eq!(a, b"G-C");
        assert_eq!(b, b"GAC");
    }
}
