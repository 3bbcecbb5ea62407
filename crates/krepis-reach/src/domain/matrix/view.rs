//! Query surface over the derived matrices
//!
//! A query names a matrix by one character and may invert it:
//!
//! ```text
//! view('g', false): transition → its guards        (in T, out G)
//! view('g', true):  guard → transitions it guards   (in G, out T)
//! ```
//!
//! Views compose by feeding the image of one into the next, e.g. the NES of
//! every guard of transition 4 is `view('e').image_of_set(view('g').image(4))`.

use super::bits::DependencyMatrix;
use super::builder::DependencyMatrices;
use std::collections::BTreeSet;
use std::fmt;

/// Index range of a matrix side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Transition groups
    Transitions,
    /// Guards
    Guards,
    /// State slots
    Slots,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transitions => "transitions",
            Self::Guards => "guards",
            Self::Slots => "slots",
        })
    }
}

/// Queryable matrices, by query character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixKind {
    /// `g`: transition guard function
    GuardsOf,
    /// `R`: transition read set
    Read,
    /// `w`: transition write set
    Write,
    /// `r`: actions read set
    ActionsRead,
    /// `t`: guard test set
    GuardTests,
    /// `c`: guards may be coenabled
    Coenabled,
    /// `m`: guard-transition must-disable set
    MustDisable,
    /// `e`: guard-transition necessary enabling set
    Nes,
    /// `d`: guard-transition necessary disabling set
    Nds,
    /// `u`: transitions commute
    Commutes,
    /// `a`: do-not-accord, before refinement
    DnaRaw,
    /// `A`: do-not-accord
    Dna,
    /// `b`: do-not-left-accord
    Dnb,
}

impl MatrixKind {
    /// Every kind, in listing order
    pub const ALL: [Self; 13] = [
        Self::GuardsOf,
        Self::Commutes,
        Self::DnaRaw,
        Self::Dna,
        Self::Dnb,
        Self::Nes,
        Self::Nds,
        Self::MustDisable,
        Self::Coenabled,
        Self::GuardTests,
        Self::ActionsRead,
        Self::Read,
        Self::Write,
    ];

    /// Kind for a query character
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'g' => Self::GuardsOf,
            'R' => Self::Read,
            'w' => Self::Write,
            'r' => Self::ActionsRead,
            't' => Self::GuardTests,
            'c' => Self::Coenabled,
            'm' => Self::MustDisable,
            'e' => Self::Nes,
            'd' => Self::Nds,
            'u' => Self::Commutes,
            'a' => Self::DnaRaw,
            'A' => Self::Dna,
            'b' => Self::Dnb,
            _ => return None,
        })
    }

    /// Query character
    pub const fn as_char(self) -> char {
        match self {
            Self::GuardsOf => 'g',
            Self::Read => 'R',
            Self::Write => 'w',
            Self::ActionsRead => 'r',
            Self::GuardTests => 't',
            Self::Coenabled => 'c',
            Self::MustDisable => 'm',
            Self::Nes => 'e',
            Self::Nds => 'd',
            Self::Commutes => 'u',
            Self::DnaRaw => 'a',
            Self::Dna => 'A',
            Self::Dnb => 'b',
        }
    }

    /// Short name and meaning
    pub const fn description(self) -> &'static str {
        match self {
            Self::GuardsOf => "G_T (transition guard function)",
            Self::Read => "T2R (transition read set)",
            Self::Write => "T2W (transition write set)",
            Self::ActionsRead => "A2R (actions read set)",
            Self::GuardTests => "GDM (guard-slot test set)",
            Self::Coenabled => "MCE (guard^2 may-be coenabled)",
            Self::MustDisable => "MDS (guard-trans must disable set)",
            Self::Nes => "NES (guard-trans necessary enabling set)",
            Self::Nds => "NDS (guard-trans necessary disabling set)",
            Self::Commutes => "COM (transition^2 commutes)",
            Self::DnaRaw => "DNA (transition^2 do-not-accord)",
            Self::Dna => "DNA- (transition^2 do-not-accord, refined)",
            Self::Dnb => "DNB (transition^2 not-left-accord)",
        }
    }

    /// Row and column dimensions
    pub const fn dimensions(self) -> (Dimension, Dimension) {
        use Dimension::{Guards, Slots, Transitions};
        match self {
            Self::GuardsOf => (Transitions, Guards),
            Self::Read | Self::Write | Self::ActionsRead => (Transitions, Slots),
            Self::GuardTests => (Guards, Slots),
            Self::Coenabled => (Guards, Guards),
            Self::MustDisable | Self::Nes | Self::Nds => (Guards, Transitions),
            Self::Commutes | Self::DnaRaw | Self::Dna | Self::Dnb => (Transitions, Transitions),
        }
    }
}

/// One matrix, read by rows or (inverted) by columns
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    kind: MatrixKind,
    matrix: &'a DependencyMatrix,
    invert: bool,
}

impl<'a> MatrixView<'a> {
    /// Queried matrix
    pub const fn kind(&self) -> MatrixKind {
        self.kind
    }

    /// Whether rows and columns are swapped
    pub const fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Size of the input side
    pub const fn in_dim(&self) -> usize {
        if self.invert { self.matrix.cols() } else { self.matrix.rows() }
    }

    /// Size of the output side
    pub const fn out_dim(&self) -> usize {
        if self.invert { self.matrix.rows() } else { self.matrix.cols() }
    }

    /// Dimension kinds of the input and output sides
    pub const fn dimensions(&self) -> (Dimension, Dimension) {
        let (rows, cols) = self.kind.dimensions();
        if self.invert { (cols, rows) } else { (rows, cols) }
    }

    /// Outputs related to `index`; `None` when `index >= in_dim()`
    pub fn image(&self, index: usize) -> Option<Vec<usize>> {
        if index >= self.in_dim() {
            return None;
        }
        Some(if self.invert {
            self.matrix.col(index).collect()
        } else {
            self.matrix.row(index).collect()
        })
    }

    /// Union of the images of `indices`, ascending
    ///
    /// Indices outside the input side are skipped.
    pub fn image_of_set<I: IntoIterator<Item = usize>>(&self, indices: I) -> Vec<usize> {
        let mut out = BTreeSet::new();
        for index in indices {
            if let Some(image) = self.image(index) {
                out.extend(image);
            }
        }
        out.into_iter().collect()
    }

    /// Whether `index` relates to `target`
    pub fn relates(&self, index: usize, target: usize) -> bool {
        index < self.in_dim()
            && target < self.out_dim()
            && if self.invert {
                self.matrix.get(target, index)
            } else {
                self.matrix.get(index, target)
            }
    }
}

impl fmt::Display for MatrixView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matrix{}({})", if self.invert { "-1" } else { "" }, self.kind.as_char())
    }
}

impl DependencyMatrices {
    /// Matrix of `kind`
    pub const fn matrix(&self, kind: MatrixKind) -> &DependencyMatrix {
        match kind {
            MatrixKind::GuardsOf => &self.guards_of,
            MatrixKind::Read => &self.read,
            MatrixKind::Write => &self.may_write,
            MatrixKind::ActionsRead => &self.actions_read,
            MatrixKind::GuardTests => &self.guard_tests,
            MatrixKind::Coenabled => &self.coenabled,
            MatrixKind::MustDisable => &self.must_disable,
            MatrixKind::Nes => &self.nes,
            MatrixKind::Nds => &self.nds,
            MatrixKind::Commutes => &self.commutes,
            MatrixKind::DnaRaw => &self.dna_raw,
            MatrixKind::Dna => &self.dna,
            MatrixKind::Dnb => &self.dnb,
        }
    }

    /// View of the matrix named by `c`; `None` for an unknown character
    pub fn view(&self, c: char, invert: bool) -> Option<MatrixView<'_>> {
        let kind = MatrixKind::from_char(c)?;
        Some(MatrixView { kind, matrix: self.matrix(kind), invert })
    }
}
