//! Center-star multiple alignment built on pairwise global alignment.
//!
//! A center sequence is either supplied or chosen among the inputs, every
//! other sequence is aligned to it with Needleman-Wunsch, and the pairwise
//! results are merged into one block using the gaps of the center
//! projections as the shared coordinate system.
//!
//! Auto-selection keeps the candidate with the *minimum* summed pairwise
//! score. With the default costs (match reward positive) this picks the
//! least similar candidate, which is the opposite of the textbook
//! heuristic; the policy is kept as is and ties go to the earliest input.

use log::{debug, info};
use rayon::prelude::*;

use crate::config::CenterStarConfig;
use crate::global;
use crate::scoring::LinearScoring;
use crate::traceback::PairwiseAlignment;
use crate::{validate_sequence, AlignerError, Sequence, GAP};

#[derive(Debug, Clone, PartialEq)]
pub struct CenterSelection {
    pub center_index: usize,
    pub total_score: f64,
    /// `(input index, center vs. that input)` for every non-center input.
    pub pairwise: Vec<(usize, PairwiseAlignment)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedAlignment {
    pub center: Vec<u8>,
    pub others: Vec<Vec<u8>>,
}

impl MergedAlignment {
    pub fn width(&self) -> usize {
        self.center.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipleAlignment {
    pub center_index: usize,
    pub total_score: f64,
    pub center_row: Vec<u8>,
    pub other_indices: Vec<usize>,
    pub other_rows: Vec<Vec<u8>>,
}

impl MultipleAlignment {
    pub fn width(&self) -> usize {
        self.center_row.len()
    }

    /// Merged rows in input order, center included.
    pub fn rows(&self) -> Vec<&[u8]> {
        let mut rows: Vec<(usize, &[u8])> = self
            .other_indices
            .iter()
            .copied()
            .zip(self.other_rows.iter().map(|r| r.as_slice()))
            .collect();
        rows.push((self.center_index, self.center_row.as_slice()));
        rows.sort_by_key(|&(idx, _)| idx);
        rows.into_iter().map(|(_, row)| row).collect()
    }
}

fn validate_inputs(sequences: &[Sequence]) -> Result<(), AlignerError> {
    if sequences.len() < 2 {
        return Err(AlignerError::TooFewSequences(sequences.len()));
    }
    for (index, seq) in sequences.iter().enumerate() {
        validate_sequence(index, seq.as_bytes())?;
    }
    Ok(())
}

fn align_candidate(
    sequences: &[Sequence],
    center_index: usize,
    scoring: &LinearScoring,
) -> Result<CenterSelection, AlignerError> {
    let center = sequences[center_index].as_bytes();
    let mut total_score = 0.0;
    let mut pairwise = Vec::with_capacity(sequences.len() - 1);

    for (index, other) in sequences.iter().enumerate() {
        if index == center_index {
            continue;
        }
        let alignment = global::align(center, other.as_bytes(), scoring)?;
        total_score += alignment.score;
        pairwise.push((index, alignment));
    }

    Ok(CenterSelection {
        center_index,
        total_score,
        pairwise,
    })
}

/// Tries every input as the center and keeps the one with the lowest
/// summed pairwise score.
pub fn select_center(
    sequences: &[Sequence],
    scoring: &LinearScoring,
    config: &CenterStarConfig,
) -> Result<CenterSelection, AlignerError> {
    validate_inputs(sequences)?;

    let candidates: Vec<Result<CenterSelection, AlignerError>> = if config.parallel {
        (0..sequences.len())
            .into_par_iter()
            .map(|idx| align_candidate(sequences, idx, scoring))
            .collect()
    } else {
        (0..sequences.len())
            .map(|idx| align_candidate(sequences, idx, scoring))
            .collect()
    };

    let mut best: Option<CenterSelection> = None;
    for candidate in candidates {
        let candidate = candidate?;
        debug!(
            "Center candidate {}: total score {}",
            candidate.center_index, candidate.total_score
        );
        if best
            .as_ref()
            .map_or(true, |b| candidate.total_score < b.total_score)
        {
            best = Some(candidate);
        }
    }

    let best = best.ok_or(AlignerError::TooFewSequences(sequences.len()))?;
    info!(
        "Selected center {} with total score {}",
        best.center_index, best.total_score
    );
    Ok(best)
}

/// Aligns every input against a caller-chosen center. The first input equal
/// to `center` becomes the center row.
pub fn align_to_center(
    center: &Sequence,
    sequences: &[Sequence],
    scoring: &LinearScoring,
) -> Result<CenterSelection, AlignerError> {
    validate_inputs(sequences)?;
    let center_index = sequences
        .iter()
        .position(|seq| seq == center)
        .ok_or(AlignerError::CenterNotFound)?;
    align_candidate(sequences, center_index, scoring)
}

/// Merges pairwise alignments that share a center into one block.
///
/// At each column, projections whose next symbol is a gap contribute their
/// counterpart's character and advance; every other row gets a gap. When
/// no projection shows a gap, all of them must agree on the next center
/// residue and every row advances.
pub fn merge(
    center_projections: &[Vec<u8>],
    other_projections: &[Vec<u8>],
) -> Result<MergedAlignment, AlignerError> {
    let n = center_projections.len();
    if n == 0 || n != other_projections.len() {
        return Err(AlignerError::ProjectionMismatch(format!(
            "{} center projections for {} sequences",
            n,
            other_projections.len()
        )));
    }
    for (k, (cp, op)) in center_projections.iter().zip(other_projections).enumerate() {
        if cp.len() != op.len() {
            return Err(AlignerError::ProjectionMismatch(format!(
                "pair {} has lengths {} and {}",
                k,
                cp.len(),
                op.len()
            )));
        }
    }

    let width = center_projections.iter().map(Vec::len).max().unwrap_or(0);
    let mut cursors = vec![0usize; n];
    let mut center = Vec::with_capacity(width);
    let mut others = vec![Vec::with_capacity(width); n];

    while (0..n).any(|k| cursors[k] < center_projections[k].len()) {
        let gapped: Vec<bool> = (0..n)
            .map(|k| {
                cursors[k] < center_projections[k].len()
                    && center_projections[k][cursors[k]] == GAP
            })
            .collect();

        if gapped.iter().any(|&g| g) {
            center.push(GAP);
            for k in 0..n {
                if gapped[k] {
                    others[k].push(other_projections[k][cursors[k]]);
                    cursors[k] += 1;
                } else {
                    others[k].push(GAP);
                }
            }
            continue;
        }

        let mut residue = None;
        for k in 0..n {
            let c = center_projections[k].get(cursors[k]).copied().ok_or_else(|| {
                AlignerError::ProjectionMismatch(format!(
                    "center projection {} ends before the others",
                    k
                ))
            })?;
            match residue {
                None => residue = Some(c),
                Some(r) if r != c => {
                    return Err(AlignerError::ProjectionMismatch(format!(
                        "center projections disagree at column {}",
                        center.len()
                    )))
                }
                Some(_) => {}
            }
        }
        if let Some(r) = residue {
            center.push(r);
        }
        for k in 0..n {
            others[k].push(other_projections[k][cursors[k]]);
            cursors[k] += 1;
        }
    }

    debug!("Merged {} pairwise alignments into {} columns", n, center.len());
    Ok(MergedAlignment { center, others })
}

/// Drops columns that are a gap in every row, center included.
///
/// `merge` never produces such a column: a column that is a gap in the
/// center row still carries the character of the row that opened it. So
/// inside `center_star` this leaves the block unchanged; it only removes
/// anything from blocks assembled by hand.
pub fn prune_gap_columns(merged: MergedAlignment) -> MergedAlignment {
    let keep: Vec<bool> = (0..merged.center.len())
        .map(|c| merged.center[c] != GAP || merged.others.iter().any(|row| row[c] != GAP))
        .collect();
    let filter = |row: &[u8]| -> Vec<u8> {
        row.iter()
            .zip(&keep)
            .filter(|&(_, &k)| k)
            .map(|(&c, _)| c)
            .collect()
    };

    MergedAlignment {
        center: filter(&merged.center),
        others: merged.others.iter().map(|row| filter(row)).collect(),
    }
}

pub fn center_star(
    sequences: &[Sequence],
    center: Option<&Sequence>,
    scoring: &LinearScoring,
    config: &CenterStarConfig,
) -> Result<MultipleAlignment, AlignerError> {
    let selection = match center {
        Some(center) => align_to_center(center, sequences, scoring)?,
        None => select_center(sequences, scoring, config)?,
    };

    let (other_indices, pairs): (Vec<usize>, Vec<PairwiseAlignment>) =
        selection.pairwise.into_iter().unzip();
    let center_projections: Vec<Vec<u8>> = pairs.iter().map(|p| p.aligned_seq1.clone()).collect();
    let other_projections: Vec<Vec<u8>> = pairs.into_iter().map(|p| p.aligned_seq2).collect();

    let merged = prune_gap_columns(merge(&center_projections, &other_projections)?);

    Ok(MultipleAlignment {
        center_index: selection.center_index,
        total_score: selection.total_score,
        center_row: merged.center,
        other_indices,
        other_rows: merged.others,
    })
}
