//! Gotoh global alignment with affine gap costs `f(k) = a + b * k`.
//!
//! Three coupled matrices over the same grid:
//!
//! ```text
//! F(i,j) = max(F(i-1,j) - b, G(i-1,j) - f(1))       // ends in a vertical gap
//! E(i,j) = max(E(i,j-1) - b, G(i,j-1) - f(1))       // ends in a horizontal gap
//! G(i,j) = max(G(i-1,j-1) + match/mismatch, E(i,j), F(i,j))
//! ```
//!
//! Each matrix keeps its own direction codes and ties go to the first
//! listed choice.

use log::debug;

use crate::scoring::AffineScoring;
use crate::traceback::{
    check_dimensions, PairwiseAlignment, ReverseTrace, ScoreMatrix, TracebackMatrix,
};
use crate::{validate_sequence, AlignerError, GAP};

/// Direction codes of the G matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GStep {
    Diagonal = 0,
    JumpToE = 1,
    JumpToF = 2,
}

/// Direction codes of the E and F matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GapStep {
    Extend = 0,
    JumpToG = 1,
}

impl GStep {
    fn decode(code: u8, i: usize, j: usize) -> Result<Self, AlignerError> {
        match code {
            0 => Ok(GStep::Diagonal),
            1 => Ok(GStep::JumpToE),
            2 => Ok(GStep::JumpToF),
            _ => Err(AlignerError::InvalidTraceback { code, i, j }),
        }
    }
}

impl GapStep {
    fn decode(code: u8, i: usize, j: usize) -> Result<Self, AlignerError> {
        match code {
            0 => Ok(GapStep::Extend),
            1 => Ok(GapStep::JumpToG),
            _ => Err(AlignerError::InvalidTraceback { code, i, j }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AffineMatrices {
    pub g: ScoreMatrix,
    pub e: ScoreMatrix,
    pub f: ScoreMatrix,
    pub g_paths: TracebackMatrix,
    pub e_paths: TracebackMatrix,
    pub f_paths: TracebackMatrix,
}

fn best_gap(extend: f64, open: f64) -> (f64, GapStep) {
    if extend >= open {
        (extend, GapStep::Extend)
    } else {
        (open, GapStep::JumpToG)
    }
}

fn best_g(diagonal: f64, e: f64, f: f64) -> (f64, GStep) {
    if diagonal >= e && diagonal >= f {
        (diagonal, GStep::Diagonal)
    } else if e >= f {
        (e, GStep::JumpToE)
    } else {
        (f, GStep::JumpToF)
    }
}

pub fn gotoh(
    s1: &[u8],
    s2: &[u8],
    scoring: &AffineScoring,
) -> Result<AffineMatrices, AlignerError> {
    validate_sequence(0, s1)?;
    validate_sequence(1, s2)?;

    let rows = s2.len() + 1;
    let cols = s1.len() + 1;
    debug!("Gotoh matrices 3x {}x{}", rows, cols);

    let mut g = ScoreMatrix::new(rows, cols, 0.0);
    let mut e = ScoreMatrix::new(rows, cols, 0.0);
    let mut f = ScoreMatrix::new(rows, cols, 0.0);
    let mut g_paths = TracebackMatrix::new(rows, cols);
    let mut e_paths = TracebackMatrix::new(rows, cols);
    let mut f_paths = TracebackMatrix::new(rows, cols);

    // Border: a leading gap run of length k costs f(k). Row 0 can only be
    // reached through E, column 0 only through F.
    for j in 1..cols {
        let cost = -scoring.gap_cost(j);
        g.set(0, j, cost);
        e.set(0, j, cost);
        g_paths.set(0, j, GStep::JumpToE as u8);
    }
    for i in 1..rows {
        let cost = -scoring.gap_cost(i);
        g.set(i, 0, cost);
        f.set(i, 0, cost);
        g_paths.set(i, 0, GStep::JumpToF as u8);
    }
    for i in 0..rows {
        e.set(i, 0, f64::NEG_INFINITY);
    }
    for j in 0..cols {
        f.set(0, j, f64::NEG_INFINITY);
    }

    let open = scoring.gap_cost(1);
    for i in 1..rows {
        for j in 1..cols {
            let (f_value, f_step) = best_gap(f.get(i - 1, j) - scoring.b, g.get(i - 1, j) - open);
            f.set(i, j, f_value);
            f_paths.set(i, j, f_step as u8);

            let (e_value, e_step) = best_gap(e.get(i, j - 1) - scoring.b, g.get(i, j - 1) - open);
            e.set(i, j, e_value);
            e_paths.set(i, j, e_step as u8);

            let (g_value, g_step) = best_g(
                g.get(i - 1, j - 1) + scoring.substitution(s1[j - 1], s2[i - 1]),
                e_value,
                f_value,
            );
            g.set(i, j, g_value);
            g_paths.set(i, j, g_step as u8);
        }
    }

    Ok(AffineMatrices {
        g,
        e,
        f,
        g_paths,
        e_paths,
        f_paths,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    G,
    E,
    F,
}

pub fn reconstruct(
    s1: &[u8],
    s2: &[u8],
    matrices: &AffineMatrices,
) -> Result<PairwiseAlignment, AlignerError> {
    check_dimensions(s1, s2, matrices.g.rows(), matrices.g.cols())?;
    for paths in [&matrices.g_paths, &matrices.e_paths, &matrices.f_paths] {
        check_dimensions(s1, s2, paths.rows(), paths.cols())?;
    }

    let mut i = s2.len();
    let mut j = s1.len();
    let score = matrices.g.get(i, j);
    let mut trace = ReverseTrace::with_capacity(i + j);
    let mut state = State::G;

    while i > 0 || j > 0 {
        match state {
            State::G => {
                let code = matrices.g_paths.get(i, j);
                match GStep::decode(code, i, j)? {
                    GStep::Diagonal if i > 0 && j > 0 => {
                        trace.push(s1[j - 1], s2[i - 1]);
                        i -= 1;
                        j -= 1;
                    }
                    GStep::JumpToE => state = State::E,
                    GStep::JumpToF => state = State::F,
                    _ => return Err(AlignerError::InvalidTraceback { code, i, j }),
                }
            }
            State::E => {
                let code = matrices.e_paths.get(i, j);
                let step = GapStep::decode(code, i, j)?;
                if j == 0 {
                    return Err(AlignerError::InvalidTraceback { code, i, j });
                }
                trace.push(s1[j - 1], GAP);
                j -= 1;
                if step == GapStep::JumpToG {
                    state = State::G;
                }
            }
            State::F => {
                let code = matrices.f_paths.get(i, j);
                let step = GapStep::decode(code, i, j)?;
                if i == 0 {
                    return Err(AlignerError::InvalidTraceback { code, i, j });
                }
                trace.push(GAP, s2[i - 1]);
                i -= 1;
                if step == GapStep::JumpToG {
                    state = State::G;
                }
            }
        }
    }

    let (aligned_seq1, aligned_seq2) = trace.finish();
    debug!("Gotoh traceback: {} columns, score {}", aligned_seq1.len(), score);

    Ok(PairwiseAlignment {
        aligned_seq1,
        aligned_seq2,
        score,
    })
}

pub fn align(
    s1: &[u8],
    s2: &[u8],
    scoring: &AffineScoring,
) -> Result<PairwiseAlignment, AlignerError> {
    let matrices = gotoh(s1, s2, scoring)?;
    reconstruct(s1, s2, &matrices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global;
    use crate::scoring::LinearScoring;

    #[test]
    fn test_gattaca_default_costs() {
        let scoring = AffineScoring::default();
        let alignment = align(b"GATTACA", b"GCATGCU", &scoring).unwrap();

        assert_eq!(alignment.seq1_str(), "G-ATTACA");
        assert_eq!(alignment.seq2_str(), "GCA-TGCU");
        assert_eq!(alignment.score, 13.0);
    }

    #[test]
    fn test_borders() {
        let scoring = AffineScoring::new(2.0, 0.5, 5.0, -1.0);
        let m = gotoh(b"ACG", b"AC", &scoring).unwrap();

        assert_eq!(m.g.get(0, 0), 0.0);
        assert_eq!(m.g.get(0, 3), -3.5);
        assert_eq!(m.e.get(0, 2), -3.0);
        assert_eq!(m.g.get(2, 0), -3.0);
        assert_eq!(m.f.get(1, 0), -2.5);
        assert_eq!(m.e.get(1, 0), f64::NEG_INFINITY);
        assert_eq!(m.f.get(0, 1), f64::NEG_INFINITY);
        assert_eq!(m.g_paths.get(0, 2), GStep::JumpToE as u8);
        assert_eq!(m.g_paths.get(2, 0), GStep::JumpToF as u8);
    }

    #[test]
    fn test_g_is_max_of_three() {
        let scoring = AffineScoring::default();
        let (s1, s2) = (b"TTAGGC", b"TAGC");
        let m = gotoh(s1, s2, &scoring).unwrap();
        for i in 1..=s2.len() {
            for j in 1..=s1.len() {
                let diagonal = m.g.get(i - 1, j - 1) + scoring.substitution(s1[j - 1], s2[i - 1]);
                let expected = diagonal.max(m.e.get(i, j)).max(m.f.get(i, j));
                assert_eq!(m.g.get(i, j), expected);
            }
        }
    }

    #[test]
    fn test_flat_extension_differs_from_linear() {
        // With b = 0 a gap run costs a no matter how long it is, while the
        // linear model charges every gap character.
        let affine = AffineScoring::new(2.0, 0.0, 5.0, -1.0);
        let linear = LinearScoring::new(-2.0, -2.0, 5.0, -1.0);

        let gotoh_alignment = align(b"ACGT", b"ACGTAAAA", &affine).unwrap();
        let global_alignment = global::align(b"ACGT", b"ACGTAAAA", &linear).unwrap();

        assert_eq!(gotoh_alignment.seq1_str(), "ACGT----");
        assert_eq!(global_alignment.seq1_str(), "ACGT----");
        assert_eq!(gotoh_alignment.score, 18.0);
        assert_eq!(global_alignment.score, 12.0);
        assert_ne!(gotoh_alignment.score, global_alignment.score);
    }

    #[test]
    fn test_gap_run_charged_once_for_open() {
        let scoring = AffineScoring::new(2.0, 0.5, 5.0, -1.0);
        let alignment = align(b"ACGT", b"ACGTAAAA", &scoring).unwrap();
        assert_eq!(alignment.seq2_str(), "ACGTAAAA");
        // 4 matches, one run of 4: 20 - (2 + 0.5 * 4)
        assert_eq!(alignment.score, 16.0);
    }

    #[test]
    fn test_round_trip_with_leading_gaps() {
        let scoring = AffineScoring::default();
        let alignment = align(b"CCCCACGT", b"ACGT", &scoring).unwrap();
        let strip = |s: &[u8]| s.iter().copied().filter(|&c| c != GAP).collect::<Vec<u8>>();
        assert_eq!(strip(&alignment.aligned_seq1), b"CCCCACGT");
        assert_eq!(strip(&alignment.aligned_seq2), b"ACGT");
        assert_eq!(alignment.aligned_seq1.len(), alignment.aligned_seq2.len());
    }

    #[test]
    fn test_corrupted_code_is_reported() {
        let scoring = AffineScoring::default();
        let mut m = gotoh(b"AC", b"AC", &scoring).unwrap();
        m.g_paths.set(2, 2, 7);
        assert!(matches!(
            reconstruct(b"AC", b"AC", &m),
            Err(AlignerError::InvalidTraceback { code: 7, .. })
        ));
    }

    #[test]
    fn test_mismatched_sequences_are_reported() {
        let scoring = AffineScoring::default();
        let m = gotoh(b"A", b"A", &scoring).unwrap();
        assert!(matches!(
            reconstruct(b"ACGT", b"AC", &m),
            Err(AlignerError::DimensionMismatch {
                expected_rows: 3,
                expected_cols: 5,
                ..
            })
        ));

        let mut m = gotoh(b"AC", b"AC", &scoring).unwrap();
        m.f_paths = TracebackMatrix::new(2, 2);
        assert!(matches!(
            reconstruct(b"AC", b"AC", &m),
            Err(AlignerError::DimensionMismatch { rows: 2, cols: 2, .. })
        ));
    }

    #[test]
    fn test_tie_prefers_first_choice() {
        assert_eq!(best_gap(-1.0, -1.0).1, GapStep::Extend);
        assert_eq!(best_gap(-2.0, -1.0).1, GapStep::JumpToG);
        assert_eq!(best_g(1.0, 1.0, 1.0).1, GStep::Diagonal);
        assert_eq!(best_g(-3.0, -1.0, -1.0).1, GStep::JumpToE);
        assert_eq!(best_g(-3.0, -2.0, -1.0).1, GStep::JumpToF);

        // One mismatch that is cheaper to skip: E and F both reach -5 at
        // (1, 1) while the diagonal is -10.
        let scoring = AffineScoring::new(2.0, 0.5, 5.0, -10.0);
        let m = gotoh(b"A", b"T", &scoring).unwrap();
        assert_eq!(m.e.get(1, 1), -5.0);
        assert_eq!(m.f.get(1, 1), -5.0);
        assert_eq!(m.g_paths.get(1, 1), GStep::JumpToE as u8);
        let alignment = reconstruct(b"A", b"T", &m).unwrap();
        assert_eq!(alignment.seq1_str(), "A-");
        assert_eq!(alignment.seq2_str(), "-T");

        // Free gaps: extending E at (1, 2) costs the same as reopening it.
        let free = AffineScoring::new(0.0, 0.0, 5.0, -10.0);
        let m = gotoh(b"AA", b"T", &free).unwrap();
        assert_eq!(m.e.get(1, 1), m.g.get(1, 1));
        assert_eq!(m.e_paths.get(1, 2), GapStep::Extend as u8);
    }
}
