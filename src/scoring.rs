use crate::{
    DEFAULT_DEL_COST, DEFAULT_GAP_A, DEFAULT_GAP_B, DEFAULT_INS_COST, DEFAULT_MATCH_COST,
    DEFAULT_MISMATCH_COST,
};

/// Costs for the linear-gap aligners (Needleman-Wunsch, Smith-Waterman).
///
/// All values are added to the running score as given, so penalties are
/// normally negative and the match reward positive. No sign checks are made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScoring {
    pub ins_cost: f64,
    pub del_cost: f64,
    pub match_cost: f64,
    pub mismatch_cost: f64,
}

impl Default for LinearScoring {
    fn default() -> Self {
        Self {
            ins_cost: DEFAULT_INS_COST,
            del_cost: DEFAULT_DEL_COST,
            match_cost: DEFAULT_MATCH_COST,
            mismatch_cost: DEFAULT_MISMATCH_COST,
        }
    }
}

impl LinearScoring {
    pub fn new(ins_cost: f64, del_cost: f64, match_cost: f64, mismatch_cost: f64) -> Self {
        Self {
            ins_cost,
            del_cost,
            match_cost,
            mismatch_cost,
        }
    }

    pub fn substitution(&self, a: u8, b: u8) -> f64 {
        if a == b {
            self.match_cost
        } else {
            self.mismatch_cost
        }
    }
}

/// Costs for the affine-gap aligner. A gap run of length `k` costs
/// `f(k) = a + b * k`, which is subtracted from the score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineScoring {
    pub a: f64,
    pub b: f64,
    pub match_cost: f64,
    pub mismatch_cost: f64,
}

impl Default for AffineScoring {
    fn default() -> Self {
        Self {
            a: DEFAULT_GAP_A,
            b: DEFAULT_GAP_B,
            match_cost: DEFAULT_MATCH_COST,
            mismatch_cost: DEFAULT_MISMATCH_COST,
        }
    }
}

impl AffineScoring {
    pub fn new(a: f64, b: f64, match_cost: f64, mismatch_cost: f64) -> Self {
        Self {
            a,
            b,
            match_cost,
            mismatch_cost,
        }
    }

    pub fn gap_cost(&self, k: usize) -> f64 {
        self.a + self.b * k as f64
    }

    pub fn substitution(&self, a: u8, b: u8) -> f64 {
        if a == b {
            self.match_cost
        } else {
            self.mismatch_cost
        }
    }
}

/// Cell coordinates: `i` is the row (S2 prefix length), `j` the column
/// (S1 prefix length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub i: usize,
    pub j: usize,
}

impl Position {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentStats {
    pub matches: u32,
    pub mismatches: u32,
    pub insertions: u32,
    pub deletions: u32,
}

impl AlignmentStats {
    pub fn gaps(&self) -> u32 {
        self.insertions + self.deletions
    }

    pub fn columns(&self) -> u32 {
        self.matches + self.mismatches + self.gaps()
    }
}
