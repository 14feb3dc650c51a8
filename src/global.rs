//! Needleman-Wunsch global alignment with linear gap costs.
//!
//! ```text
//! V(i,j) = max(
//!     V(i-1, j-1) + match/mismatch(S1[j-1], S2[i-1]),   // diagonal
//!     V(i-1, j) + del_cost,                             // up, gap in S1
//!     V(i, j-1) + ins_cost,                             // left, gap in S2
//! )
//! ```
//!
//! Ties resolve in the order diagonal, up, left.

use log::debug;

use crate::scoring::LinearScoring;
use crate::traceback::{
    check_dimensions, PairwiseAlignment, ReverseTrace, ScoreMatrix, TracebackMatrix,
};
use crate::{validate_sequence, AlignerError, GAP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Move {
    Diagonal = 0,
    Up = 1,
    Left = 2,
}

impl Move {
    fn decode(code: u8, i: usize, j: usize) -> Result<Self, AlignerError> {
        match code {
            0 => Ok(Move::Diagonal),
            1 => Ok(Move::Up),
            2 => Ok(Move::Left),
            _ => Err(AlignerError::InvalidTraceback { code, i, j }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalMatrices {
    pub scores: ScoreMatrix,
    pub paths: TracebackMatrix,
}

/// Picks the best of the three moves; earlier moves win ties.
pub(crate) fn best_move(diagonal: f64, up: f64, left: f64) -> (f64, Move) {
    if diagonal >= up && diagonal >= left {
        (diagonal, Move::Diagonal)
    } else if up >= left {
        (up, Move::Up)
    } else {
        (left, Move::Left)
    }
}

pub fn needleman_wunsch(
    s1: &[u8],
    s2: &[u8],
    scoring: &LinearScoring,
) -> Result<GlobalMatrices, AlignerError> {
    validate_sequence(0, s1)?;
    validate_sequence(1, s2)?;

    let rows = s2.len() + 1;
    let cols = s1.len() + 1;
    debug!("Needleman-Wunsch matrix {}x{}", rows, cols);

    let mut scores = ScoreMatrix::new(rows, cols, 0.0);
    let mut paths = TracebackMatrix::new(rows, cols);

    for j in 1..cols {
        scores.set(0, j, scores.get(0, j - 1) + scoring.ins_cost);
        paths.set(0, j, Move::Left as u8);
    }
    for i in 1..rows {
        scores.set(i, 0, scores.get(i - 1, 0) + scoring.del_cost);
        paths.set(i, 0, Move::Up as u8);
    }

    for i in 1..rows {
        for j in 1..cols {
            let (value, step) = best_move(
                scores.get(i - 1, j - 1) + scoring.substitution(s1[j - 1], s2[i - 1]),
                scores.get(i - 1, j) + scoring.del_cost,
                scores.get(i, j - 1) + scoring.ins_cost,
            );
            scores.set(i, j, value);
            paths.set(i, j, step as u8);
        }
    }

    Ok(GlobalMatrices { scores, paths })
}

pub fn reconstruct(
    s1: &[u8],
    s2: &[u8],
    matrices: &GlobalMatrices,
) -> Result<PairwiseAlignment, AlignerError> {
    check_dimensions(s1, s2, matrices.scores.rows(), matrices.scores.cols())?;
    check_dimensions(s1, s2, matrices.paths.rows(), matrices.paths.cols())?;

    let mut i = s2.len();
    let mut j = s1.len();
    let score = matrices.scores.get(i, j);
    let mut trace = ReverseTrace::with_capacity(i + j);

    while i > 0 || j > 0 {
        let code = matrices.paths.get(i, j);
        match Move::decode(code, i, j)? {
            Move::Diagonal if i > 0 && j > 0 => {
                trace.push(s1[j - 1], s2[i - 1]);
                i -= 1;
                j -= 1;
            }
            Move::Up if i > 0 => {
                trace.push(GAP, s2[i - 1]);
                i -= 1;
            }
            Move::Left if j > 0 => {
                trace.push(s1[j - 1], GAP);
                j -= 1;
            }
            _ => return Err(AlignerError::InvalidTraceback { code, i, j }),
        }
    }

    let (aligned_seq1, aligned_seq2) = trace.finish();
    debug!("Global traceback: {} columns, score {}", aligned_seq1.len(), score);

    Ok(PairwiseAlignment {
        aligned_seq1,
        aligned_seq2,
        score,
    })
}

pub fn align(
    s1: &[u8],
    s2: &[u8],
    scoring: &LinearScoring,
) -> Result<PairwiseAlignment, AlignerError> {
    let matrices = needleman_wunsch(s1, s2, scoring)?;
    reconstruct(s1, s2, &matrices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gattaca_golden() {
        let scoring = LinearScoring::default();
        let alignment = align(b"GATTACA", b"GCATGCU", &scoring).unwrap();

        assert_eq!(alignment.seq1_str(), "G-ATTACA");
        assert_eq!(alignment.seq2_str(), "GCA-TGCU");
        assert_eq!(alignment.score, 17.0);
    }

    #[test]
    fn test_score_is_bottom_right_cell() {
        let scoring = LinearScoring::new(-1.0, -2.0, 3.0, -1.5);
        let matrices = needleman_wunsch(b"ACCGT", b"AGT", &scoring).unwrap();
        let alignment = reconstruct(b"ACCGT", b"AGT", &matrices).unwrap();
        assert_eq!(alignment.score, matrices.scores.get(3, 5));
    }

    #[test]
    fn test_borders_are_cumulative_costs() {
        let scoring = LinearScoring::new(-1.0, -2.0, 1.0, -1.0);
        let matrices = needleman_wunsch(b"AAA", b"CC", &scoring).unwrap();
        assert_eq!(matrices.scores.row(0), &[0.0, -1.0, -2.0, -3.0]);
        assert_eq!(matrices.scores.get(1, 0), -2.0);
        assert_eq!(matrices.scores.get(2, 0), -4.0);
        assert_eq!(matrices.paths.get(0, 2), Move::Left as u8);
        assert_eq!(matrices.paths.get(2, 0), Move::Up as u8);
    }

    #[test]
    fn test_tie_prefers_diagonal_then_up() {
        assert_eq!(best_move(1.0, 1.0, 1.0).1, Move::Diagonal);
        assert_eq!(best_move(0.0, 1.0, 1.0).1, Move::Up);
        assert_eq!(best_move(0.0, 0.0, 1.0).1, Move::Left);
    }

    #[test]
    fn test_identical_sequences() {
        let scoring = LinearScoring::default();
        let alignment = align(b"ACGT", b"ACGT", &scoring).unwrap();
        assert_eq!(alignment.seq1_str(), "ACGT");
        assert_eq!(alignment.seq2_str(), "ACGT");
        assert_eq!(alignment.score, 20.0);
    }

    #[test]
    fn test_length_difference_gets_gaps() {
        let scoring = LinearScoring::new(-2.0, -2.0, 5.0, -1.0);
        let alignment = align(b"ACGT", b"ACGTAAAA", &scoring).unwrap();
        assert_eq!(alignment.seq1_str(), "ACGT----");
        assert_eq!(alignment.seq2_str(), "ACGTAAAA");
        assert_eq!(alignment.score, 12.0);
    }

    #[test]
    fn test_rejects_empty_and_gapped_input() {
        let scoring = LinearScoring::default();
        assert!(matches!(
            needleman_wunsch(b"", b"ACGT", &scoring),
            Err(AlignerError::EmptySequence(0))
        ));
        assert!(matches!(
            needleman_wunsch(b"ACGT", b"--", &scoring),
            Err(AlignerError::GapSymbol { index: 1, .. })
        ));
    }

    #[test]
    fn test_corrupted_code_is_reported() {
        let scoring = LinearScoring::default();
        let mut matrices = needleman_wunsch(b"AC", b"AC", &scoring).unwrap();
        matrices.paths.set(2, 2, 9);
        assert!(matches!(
            reconstruct(b"AC", b"AC", &matrices),
            Err(AlignerError::InvalidTraceback { code: 9, i: 2, j: 2 })
        ));
    }

    #[test]
    fn test_mismatched_sequences_are_reported() {
        let scoring = LinearScoring::default();
        let matrices = needleman_wunsch(b"A", b"A", &scoring).unwrap();
        assert!(matches!(
            reconstruct(b"ACGT", b"AC", &matrices),
            Err(AlignerError::DimensionMismatch {
                rows: 2,
                cols: 2,
                expected_rows: 3,
                expected_cols: 5,
            })
        ));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let scoring = LinearScoring::default();
        let first = needleman_wunsch(b"GATTACA", b"GCATGCU", &scoring).unwrap();
        let second = needleman_wunsch(b"GATTACA", b"GCATGCU", &scoring).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            reconstruct(b"GATTACA", b"GCATGCU", &first).unwrap(),
            reconstruct(b"GATTACA", b"GCATGCU", &second).unwrap()
        );
    }
}
