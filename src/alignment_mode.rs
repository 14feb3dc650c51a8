use crate::scoring::{AffineScoring, LinearScoring};
use crate::traceback::PairwiseAlignment;
use crate::{global, gotoh, local, AlignerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentMode {
    Global, // Needleman-Wunsch
    Affine, // Gotoh
    Local,  // Smith-Waterman
}

#[derive(Debug, Clone, Copy)]
pub struct AlignmentParams {
    pub mode: AlignmentMode,
    pub linear: LinearScoring,
    pub affine: AffineScoring,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            mode: AlignmentMode::Global,
            linear: LinearScoring::default(),
            affine: AffineScoring::default(),
        }
    }
}

impl AlignmentParams {
    pub fn new(mode: AlignmentMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_linear(mut self, linear: LinearScoring) -> Self {
        self.linear = linear;
        self
    }

    pub fn with_affine(mut self, affine: AffineScoring) -> Self {
        self.affine = affine;
        self
    }
}

/// Aligns two sequences with the aligner selected by `params.mode`. Local
/// alignments are returned with their flanks, as `local::align` builds them.
pub fn align_pair(
    params: &AlignmentParams,
    s1: &[u8],
    s2: &[u8],
) -> Result<PairwiseAlignment, AlignerError> {
    match params.mode {
        AlignmentMode::Global => global::align(s1, s2, &params.linear),
        AlignmentMode::Affine => gotoh::align(s1, s2, &params.affine),
        AlignmentMode::Local => local::align(s1, s2, &params.linear).map(|l| l.alignment),
    }
}
