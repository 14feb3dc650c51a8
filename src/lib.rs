use thiserror::Error;

pub mod alignment_mode;
pub mod center_star;
pub mod config;
pub mod display;
pub mod global;
pub mod gotoh;
pub mod local;
pub mod scoring;
pub mod traceback;

pub use alignment_mode::{align_pair, AlignmentMode, AlignmentParams};
pub use center_star::{CenterSelection, MergedAlignment, MultipleAlignment};
pub use config::CenterStarConfig;
pub use local::LocalAlignment;
pub use scoring::{AffineScoring, AlignmentStats, LinearScoring, Position};
pub use traceback::{PairwiseAlignment, ScoreMatrix, TracebackMatrix, TracebackOperation};

pub const GAP: u8 = b'-';

// Linear gap defaults
pub const DEFAULT_INS_COST: f64 = -0.5;
pub const DEFAULT_DEL_COST: f64 = -0.5;
pub const DEFAULT_MATCH_COST: f64 = 5.0;
pub const DEFAULT_MISMATCH_COST: f64 = -1.0;

// Affine gap defaults, f(k) = a + b * k
pub const DEFAULT_GAP_A: f64 = 2.0;
pub const DEFAULT_GAP_B: f64 = 0.5;

#[derive(Debug, Error)]
pub enum AlignerError {
    #[error("Sequence {0} is empty")]
    EmptySequence(usize),
    #[error("Sequence {index} contains the gap symbol at position {position}")]
    GapSymbol { index: usize, position: usize },
    #[error("Center sequence is not one of the input sequences")]
    CenterNotFound,
    #[error("Multiple alignment needs at least two sequences, got {0}")]
    TooFewSequences(usize),
    #[error("Pairwise projections cannot be merged: {0}")]
    ProjectionMismatch(String),
    #[error("Invalid traceback code {code} at ({i}, {j})")]
    InvalidTraceback { code: u8, i: usize, j: usize },
    #[error("Matrix is {rows}x{cols} but the sequences need {expected_rows}x{expected_cols}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    data: Vec<u8>,
}

impl Sequence {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<&str> for Sequence {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.data))
    }
}

/// Rejects inputs the engines cannot align without producing degenerate
/// output: empty sequences and sequences that already contain gaps.
pub fn validate_sequence(index: usize, seq: &[u8]) -> Result<(), AlignerError> {
    if seq.is_empty() {
        return Err(AlignerError::EmptySequence(index));
    }
    if let Some(position) = seq.iter().position(|&c| c == GAP) {
        return Err(AlignerError::GapSymbol { index, position });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sequence() {
        assert!(validate_sequence(0, b"ACGT").is_ok());
        assert!(matches!(
            validate_sequence(1, b""),
            Err(AlignerError::EmptySequence(1))
        ));
        assert!(matches!(
            validate_sequence(0, b"---"),
            Err(AlignerError::GapSymbol { index: 0, position: 0 })
        ));
        assert!(matches!(
            validate_sequence(2, b"AC-T"),
            Err(AlignerError::GapSymbol { index: 2, position: 2 })
        ));
    }

    #[test]
    fn test_sequence_from_str() {
        let seq = Sequence::from("GATTACA");
        assert_eq!(seq.len(), 7);
        assert_eq!(seq.as_bytes(), b"GATTACA");
        assert_eq!(seq.to_string(), "GATTACA");
    }
}
