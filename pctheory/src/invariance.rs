// Invariance matrices between two twelve-tone rows.
//
// Given rows A and B (each a length-12 bijection), the matrix lays A down
// the side and B across the top. The cell at (a_i, b_j) holds the single
// operator of the configured kind that sends a_i to b_j:
//
// - `T` matrix: `Tn` with n = b_j - a_i
// - `I` matrix: `TnI` with n = a_i + b_j
//
// Cells are addressed by pitch-class value (`cell_at(p, q)`), which is
// resolved to positions through per-row position tables. Reading the cells
// that hold a given operator shows which elements of A that operator maps
// onto the corresponding elements of B; that is the view
// `render_operator_index` produces. `print_filtered` instead restricts the
// grid to rows and columns whose pitch class is in a chosen subset.
//
// Built once, immutable afterwards.

use crate::error::{PcError, Result};
use crate::pcseg::PcSeg;
use crate::pcset::PitchClassSet;
use crate::pitch::PitchClass;
use crate::transformations::{OperatorKind, Transformation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const N: usize = 12;

/// Which operator family fills the cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatrixKind {
    T,
    I,
}

impl FromStr for MatrixKind {
    type Err = PcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "T" | "t" => Ok(MatrixKind::T),
            "I" | "i" => Ok(MatrixKind::I),
            other => Err(PcError::UnknownOperator(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InvarianceMatrix {
    kind: MatrixKind,
    row_a: PcSeg,
    row_b: PcSeg,
    /// cells[i][j] relates position i of A to position j of B.
    cells: [[Transformation; N]; N],
    /// Position of each pitch-class value in A and in B.
    pos_a: [usize; N],
    pos_b: [usize; N],
}

fn positions(row: &PcSeg, label: &str) -> Result<[usize; N]> {
    if !row.is_row() {
        return Err(PcError::DegenerateRow {
            reason: format!(
                "row {label} {row} has {} elements and {} distinct pitch classes; expected 12 and 12",
                row.len(),
                row.to_pcset().len()
            ),
        });
    }
    let mut pos = [0usize; N];
    for (i, pc) in row.iter().enumerate() {
        pos[pc.value() as usize] = i;
    }
    Ok(pos)
}

impl InvarianceMatrix {
    /// Both rows must be length-12 bijections; otherwise `DegenerateRow`
    /// and nothing is built.
    pub fn new(kind: MatrixKind, row_a: &PcSeg, row_b: &PcSeg) -> Result<Self> {
        let pos_a = positions(row_a, "A")?;
        let pos_b = positions(row_b, "B")?;
        let mut cells = [[Transformation::identity(); N]; N];
        for (i, a) in row_a.iter().enumerate() {
            for (j, b) in row_b.iter().enumerate() {
                let (a, b) = (a.value() as i32, b.value() as i32);
                cells[i][j] = match kind {
                    MatrixKind::T => Transformation::new(OperatorKind::Transposition, b - a),
                    MatrixKind::I => Transformation::new(OperatorKind::Inversion, a + b),
                };
            }
        }
        Ok(InvarianceMatrix {
            kind,
            row_a: row_a.clone(),
            row_b: row_b.clone(),
            cells,
            pos_a,
            pos_b,
        })
    }

    pub fn kind(&self) -> MatrixKind {
        self.kind
    }

    pub fn row_a(&self) -> &PcSeg {
        &self.row_a
    }

    pub fn row_b(&self) -> &PcSeg {
        &self.row_b
    }

    /// The operator sending pitch class `p` (from A) to `q` (from B).
    pub fn cell_at(&self, p: PitchClass, q: PitchClass) -> Transformation {
        self.cells[self.pos_a[p.value() as usize]][self.pos_b[q.value() as usize]]
    }

    /// Positional access: row `i` of A, column `j` of B.
    pub fn cell(&self, i: usize, j: usize) -> Option<Transformation> {
        self.cells.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Pairs `(a_i, b_j)` whose cell holds `op`, in row-major order.
    pub fn invariant_pairs(&self, op: Transformation) -> Vec<(PitchClass, PitchClass)> {
        let mut pairs = Vec::new();
        for (i, &a) in self.row_a.iter().enumerate() {
            for (j, &b) in self.row_b.iter().enumerate() {
                if self.cells[i][j] == op {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }

    /// Grid restricted to the rows and columns whose pitch class is in
    /// `indices`. Read-only view; render with `Display`.
    pub fn print_filtered(&self, indices: &[PitchClass]) -> MatrixView<'_> {
        let keep: PitchClassSet = indices.iter().copied().collect();
        MatrixView {
            matrix: self,
            rows: keep,
            cols: keep,
            operators: None,
        }
    }

    /// Full grid showing only cells whose operator index is in `indices`;
    /// every other cell renders as `.`.
    pub fn render_operator_index(&self, indices: &[PitchClass]) -> MatrixView<'_> {
        MatrixView {
            matrix: self,
            rows: PitchClassSet::aggregate(),
            cols: PitchClassSet::aggregate(),
            operators: Some(indices.iter().copied().collect()),
        }
    }
}

/// A filtered rendering of an `InvarianceMatrix`.
pub struct MatrixView<'a> {
    matrix: &'a InvarianceMatrix,
    rows: PitchClassSet,
    cols: PitchClassSet,
    operators: Option<PitchClassSet>,
}

impl fmt::Display for MatrixView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.matrix;
        let cols: Vec<(usize, PitchClass)> = m
            .row_b
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, pc)| self.cols.contains(*pc))
            .collect();

        write!(f, "{:>3} |", m.kind_label())?;
        for (_, b) in &cols {
            write!(f, "{b:>3}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(5 + 3 * cols.len()))?;

        for (i, &a) in m.row_a.iter().enumerate() {
            if !self.rows.contains(a) {
                continue;
            }
            write!(f, "{a:>3} |")?;
            for &(j, _) in &cols {
                let op = m.cells[i][j];
                let shown = self
                    .operators
                    .is_none_or(|ops| ops.contains(PitchClass::new(op.index() as i32)));
                if shown {
                    write!(f, "{:>3}", op.index())?;
                } else {
                    write!(f, "{:>3}", ".")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl InvarianceMatrix {
    fn kind_label(&self) -> &'static str {
        match self.kind {
            MatrixKind::T => "T",
            MatrixKind::I => "I",
        }
    }
}

impl fmt::Display for InvarianceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = MatrixView {
            matrix: self,
            rows: PitchClassSet::aggregate(),
            cols: PitchClassSet::aggregate(),
            operators: None,
        };
        fmt::Display::fmt(&view, f)
    }
}
