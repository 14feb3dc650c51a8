//! Text rendering of DP matrices: each cell is shown as its direction glyph
//! followed by its score.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};

use crate::traceback::{ScoreMatrix, TracebackMatrix};

pub const GLOBAL_GLYPHS: &[&str] = &["↖", "↑", "←"];
pub const LOCAL_GLYPHS: &[&str] = &["", "↖", "↑", "←"];
pub const GOTOH_G_GLYPHS: &[&str] = &["↖", "↓↓", "↑↑"];
pub const GOTOH_E_GLYPHS: &[&str] = &["←", "↑↑"];
pub const GOTOH_F_GLYPHS: &[&str] = &["↑", "↓↓"];

#[derive(Debug, Clone, Copy, Default)]
pub struct CellFormat {
    /// Digits after the decimal point; `None` prints the shortest exact form.
    pub precision: Option<usize>,
}

impl CellFormat {
    pub fn with_precision(precision: usize) -> Self {
        Self {
            precision: Some(precision),
        }
    }

    pub fn number(&self, value: f64) -> String {
        match self.precision {
            Some(p) => format!("{:.*}", p, value),
            None => format!("{:?}", value),
        }
    }
}

pub fn format_cell(value: f64, glyph: &str, format: &CellFormat) -> String {
    if value == f64::INFINITY {
        "∞".to_string()
    } else if value == f64::NEG_INFINITY {
        "-∞".to_string()
    } else {
        format!("{}{}", glyph, format.number(value))
    }
}

/// Lays out a matrix with S1 across the header and S2 down the first
/// column. Codes without a glyph render as `?`.
pub fn render_matrix(
    s1: &[u8],
    s2: &[u8],
    scores: &ScoreMatrix,
    paths: &TracebackMatrix,
    glyphs: &[&str],
    format: &CellFormat,
) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec![Cell::new(""), Cell::new("")];
    header.extend(s1.iter().map(|&c| Cell::new(c as char)));
    table.set_header(header);

    for i in 0..scores.rows() {
        let label = if i == 0 {
            String::new()
        } else {
            (s2[i - 1] as char).to_string()
        };
        let mut row = vec![Cell::new(label)];
        for j in 0..scores.cols() {
            let glyph = glyphs.get(paths.get(i, j) as usize).copied().unwrap_or("?");
            row.push(Cell::new(format_cell(scores.get(i, j), glyph, format)));
        }
        table.add_row(row);
    }

    table
}
