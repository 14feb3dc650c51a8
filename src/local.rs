//! Smith-Waterman local alignment with linear gap costs.
//!
//! The matrix has a zero floor: every cell is the best of a reset to zero
//! and the three usual moves, with ties resolved as reset, diagonal, up,
//! left. Reconstruction anchors on the first maximal cell, traces the core
//! segment back to the reset boundary, then pads both ends with the
//! unaligned flanks so the output still spells the full input sequences.

use log::debug;

use crate::scoring::{LinearScoring, Position};
use crate::traceback::{
    check_dimensions, PairwiseAlignment, ReverseTrace, ScoreMatrix, TracebackMatrix,
};
use crate::{validate_sequence, AlignerError, GAP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LocalMove {
    Reset = 0,
    Diagonal = 1,
    Up = 2,
    Left = 3,
}

impl LocalMove {
    fn decode(code: u8, i: usize, j: usize) -> Result<Self, AlignerError> {
        match code {
            0 => Ok(LocalMove::Reset),
            1 => Ok(LocalMove::Diagonal),
            2 => Ok(LocalMove::Up),
            3 => Ok(LocalMove::Left),
            _ => Err(AlignerError::InvalidTraceback { code, i, j }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalMatrices {
    pub scores: ScoreMatrix,
    pub paths: TracebackMatrix,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalAlignment {
    pub alignment: PairwiseAlignment,
    /// Cell where the core segment starts (the reset boundary).
    pub start: Position,
    /// Cell holding the maximal score (the anchor).
    pub end: Position,
}

impl LocalAlignment {
    pub fn score(&self) -> f64 {
        self.alignment.score
    }

    /// Length of the core segment in S1 and S2 characters.
    pub fn core_lengths(&self) -> (usize, usize) {
        (self.end.j - self.start.j, self.end.i - self.start.i)
    }
}

fn best_local(diagonal: f64, up: f64, left: f64) -> (f64, LocalMove) {
    if 0.0 >= diagonal && 0.0 >= up && 0.0 >= left {
        (0.0, LocalMove::Reset)
    } else if diagonal >= up && diagonal >= left {
        (diagonal, LocalMove::Diagonal)
    } else if up >= left {
        (up, LocalMove::Up)
    } else {
        (left, LocalMove::Left)
    }
}

pub fn smith_waterman(
    s1: &[u8],
    s2: &[u8],
    scoring: &LinearScoring,
) -> Result<LocalMatrices, AlignerError> {
    validate_sequence(0, s1)?;
    validate_sequence(1, s2)?;

    let rows = s2.len() + 1;
    let cols = s1.len() + 1;
    debug!("Smith-Waterman matrix {}x{}", rows, cols);

    // Row 0 and column 0 stay at zero with the reset code.
    let mut scores = ScoreMatrix::new(rows, cols, 0.0);
    let mut paths = TracebackMatrix::new(rows, cols);

    for i in 1..rows {
        for j in 1..cols {
            let (value, step) = best_local(
                scores.get(i - 1, j - 1) + scoring.substitution(s1[j - 1], s2[i - 1]),
                scores.get(i - 1, j) + scoring.del_cost,
                scores.get(i, j - 1) + scoring.ins_cost,
            );
            scores.set(i, j, value);
            paths.set(i, j, step as u8);
        }
    }

    Ok(LocalMatrices { scores, paths })
}

pub fn reconstruct(
    s1: &[u8],
    s2: &[u8],
    matrices: &LocalMatrices,
) -> Result<LocalAlignment, AlignerError> {
    check_dimensions(s1, s2, matrices.scores.rows(), matrices.scores.cols())?;
    check_dimensions(s1, s2, matrices.paths.rows(), matrices.paths.cols())?;

    let (anchor_i, anchor_j, score) = matrices.scores.argmax();
    let mut i = anchor_i;
    let mut j = anchor_j;
    let mut trace = ReverseTrace::with_capacity(s1.len() + s2.len());

    // Core segment: follow recorded moves until a reset cell.
    loop {
        let code = matrices.paths.get(i, j);
        match LocalMove::decode(code, i, j)? {
            LocalMove::Reset => break,
            LocalMove::Diagonal if i > 0 && j > 0 => {
                trace.push(s1[j - 1], s2[i - 1]);
                i -= 1;
                j -= 1;
            }
            LocalMove::Up if i > 0 => {
                trace.push(GAP, s2[i - 1]);
                i -= 1;
            }
            LocalMove::Left if j > 0 => {
                trace.push(s1[j - 1], GAP);
                j -= 1;
            }
            _ => return Err(AlignerError::InvalidTraceback { code, i, j }),
        }
    }
    let start = Position::new(i, j);

    // Leading flank, paired from the boundary backwards.
    while i > 0 || j > 0 {
        if i > 0 && j > 0 {
            trace.push(s1[j - 1], s2[i - 1]);
            i -= 1;
            j -= 1;
        } else if i > 0 {
            trace.push(GAP, s2[i - 1]);
            i -= 1;
        } else {
            trace.push(s1[j - 1], GAP);
            j -= 1;
        }
    }
    let (mut aligned_seq1, mut aligned_seq2) = trace.finish();

    // Trailing flank from the anchor to the bottom-right corner.
    let (mut i, mut j) = (anchor_i, anchor_j);
    while i < s2.len() || j < s1.len() {
        if i < s2.len() && j < s1.len() {
            aligned_seq1.push(s1[j]);
            aligned_seq2.push(s2[i]);
            i += 1;
            j += 1;
        } else if i < s2.len() {
            aligned_seq1.push(GAP);
            aligned_seq2.push(s2[i]);
            i += 1;
        } else {
            aligned_seq1.push(s1[j]);
            aligned_seq2.push(GAP);
            j += 1;
        }
    }

    let end = Position::new(anchor_i, anchor_j);
    debug!(
        "Local traceback: core ({}, {}) -> ({}, {}), score {}",
        start.i, start.j, end.i, end.j, score
    );

    Ok(LocalAlignment {
        alignment: PairwiseAlignment {
            aligned_seq1,
            aligned_seq2,
            score,
        },
        start,
        end,
    })
}

pub fn align(
    s1: &[u8],
    s2: &[u8],
    scoring: &LinearScoring,
) -> Result<LocalAlignment, AlignerError> {
    let matrices = smith_waterman(s1, s2, scoring)?;
    reconstruct(s1, s2, &matrices)
}
