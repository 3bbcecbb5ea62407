//! Matrix derivations
//!
//! # Dimensions
//!
//! ```text
//! T = transition groups   G = guards   S = state slots
//!
//! T2R, T2W, A2R : T × S       GDM : G × S       G_T : T × G
//! MCE : G × G                 MDS, NES, NDS : G × T
//! COM, DNA-raw, DNA, DNB : T × T
//! ```
//!
//! # Derivation
//!
//! ```text
//! NES[g][t]  = W(t) ∩ test(g) ≠ ∅  ∧ ¬MDS[g][t]
//! NDS[g][t]  = W(t) ∩ test(g) ≠ ∅  ∧ ∀ h ∈ guards(t): MCE[g][h]
//! COM[i][j]  = W(i)∩R(j) = W(i)∩W(j) = R(i)∩W(j) = ∅
//! coen(i, j) = ∀ g ∈ guards(i), h ∈ guards(j): MCE[g][h]
//! nds(i, j)  = ∃ g ∈ guards(i): NDS[g][j]  ∨  ∃ g ∈ guards(j): NDS[g][i]
//!
//! DNA-raw[i][j] = i ≠ j ∧ coen(i, j) ∧ (¬COM[i][j] ∨ nds(i, j))
//! DNA[i][j]     = i = j
//!               ∨ coen(i, j) ∧ DNA-raw[i][j] ∧ (nds(i, j) ∨ W(i)∩A(j) ≠ ∅ ∨ A(i)∩W(j) ≠ ∅)
//! DNB[i][j]     = 0                                          if ∃ g ∈ guards(i): MDS[g][j]
//!               = DNA[i][j] ∨ ∃ g ∈ guards(i): NES[g][j]     otherwise
//! ```

use super::bits::DependencyMatrix;
use super::input::{DependencyInput, MatrixError};
use tracing::debug;

/// Every matrix derived from one `DependencyInput`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyMatrices {
    /// Guards of each group (T × G)
    pub guards_of: DependencyMatrix,
    /// Read set (T × S)
    pub read: DependencyMatrix,
    /// May-write set (T × S)
    pub may_write: DependencyMatrix,
    /// Must-write set (T × S)
    pub must_write: DependencyMatrix,
    /// Actions-read set (T × S)
    pub actions_read: DependencyMatrix,
    /// Guard test set (G × S)
    pub guard_tests: DependencyMatrix,
    /// May-be-coenabled (G × G)
    pub coenabled: DependencyMatrix,
    /// Must-disable (G × T)
    pub must_disable: DependencyMatrix,
    /// Necessary enabling sets (G × T)
    pub nes: DependencyMatrix,
    /// Necessary disabling sets (G × T)
    pub nds: DependencyMatrix,
    /// Commutes (T × T)
    pub commutes: DependencyMatrix,
    /// Do-not-accord, before refinement (T × T)
    pub dna_raw: DependencyMatrix,
    /// Do-not-accord (T × T)
    pub dna: DependencyMatrix,
    /// Do-not-left-accord (T × T)
    pub dnb: DependencyMatrix,
}

impl DependencyMatrices {
    /// Validate `input` and derive every matrix
    ///
    /// # Errors
    ///
    /// Any `MatrixError` from `DependencyInput::validate`.
    pub fn build(input: &DependencyInput) -> Result<Self, MatrixError> {
        input.validate()?;

        let t = input.groups.len();
        let g = input.guards.len();
        let s = input.slots.len();

        let guards_of = DependencyMatrix::from_rows(
            &input.groups.iter().map(|d| d.guards.as_slice()).collect::<Vec<_>>(),
            g,
        );
        let read = DependencyMatrix::from_rows(
            &input.groups.iter().map(|d| d.read.as_slice()).collect::<Vec<_>>(),
            s,
        );
        let must_write = DependencyMatrix::from_rows(
            &input.groups.iter().map(|d| d.must_write.as_slice()).collect::<Vec<_>>(),
            s,
        );
        // Must-write implies may-write
        let mut may_write = DependencyMatrix::from_rows(
            &input.groups.iter().map(|d| d.may_write.as_slice()).collect::<Vec<_>>(),
            s,
        );
        for i in 0..t {
            for slot in must_write.row(i) {
                may_write.set(i, slot, true);
            }
        }
        let actions_read = DependencyMatrix::from_rows(
            &(0..t).map(|i| input.actions_read(i)).collect::<Vec<_>>(),
            s,
        );
        let guard_tests = DependencyMatrix::from_rows(
            &input.guards.iter().map(|d| d.tests.as_slice()).collect::<Vec<_>>(),
            s,
        );

        let coenabled = coenabled_matrix(input.may_be_coenabled.as_deref(), g);
        let must_disable = explicit_matrix(input.must_disable.as_deref(), g, t);

        let mut nes = DependencyMatrix::new(g, t);
        let mut nds = DependencyMatrix::new(g, t);
        for guard in 0..g {
            for group in 0..t {
                if !guard_tests.rows_overlap(guard, &may_write, group) {
                    continue;
                }
                nes.set(guard, group, !must_disable.get(guard, group));
                nds.set(guard, group, guards_of.row(group).all(|h| coenabled.get(guard, h)));
            }
        }

        let mut commutes = DependencyMatrix::new(t, t);
        for i in 0..t {
            for j in 0..t {
                let conflict = may_write.rows_overlap(i, &read, j)
                    || read.rows_overlap(i, &may_write, j)
                    || may_write.rows_overlap(i, &may_write, j);
                commutes.set(i, j, !conflict);
            }
        }

        let mut matrices = Self {
            dna_raw: DependencyMatrix::new(t, t),
            dna: DependencyMatrix::new(t, t),
            dnb: DependencyMatrix::new(t, t),
            guards_of,
            read,
            may_write,
            must_write,
            actions_read,
            guard_tests,
            coenabled,
            must_disable,
            nes,
            nds,
            commutes,
        };
        matrices.derive_accords();

        debug!(
            groups = t,
            guards = g,
            slots = s,
            dna = matrices.dna.count_ones(),
            dnb = matrices.dnb.count_ones(),
            "dependency matrices built"
        );
        Ok(matrices)
    }

    /// Transition groups
    pub const fn groups(&self) -> usize {
        self.read.rows()
    }

    /// Guards
    pub const fn guards(&self) -> usize {
        self.guard_tests.rows()
    }

    /// State slots
    pub const fn slots(&self) -> usize {
        self.read.cols()
    }

    /// Whether some guard of `i` and some guard of `j` can never hold together
    fn never_coenabled(&self, i: usize, j: usize) -> bool {
        self.guards_of
            .row(i)
            .any(|g| self.guards_of.row(j).any(|h| !self.coenabled.get(g, h)))
    }

    /// Whether a guard of `i` has `j` in its NDS, or the other way round
    fn mutually_disabling(&self, i: usize, j: usize) -> bool {
        self.guards_of.row(i).any(|g| self.nds.get(g, j))
            || self.guards_of.row(j).any(|g| self.nds.get(g, i))
    }

    fn derive_accords(&mut self) {
        let t = self.groups();

        for i in 0..t {
            for j in 0..t {
                if i == j || self.never_coenabled(i, j) {
                    continue;
                }
                let raw = !self.commutes.get(i, j) || self.mutually_disabling(i, j);
                self.dna_raw.set(i, j, raw);
            }
        }

        for i in 0..t {
            for j in 0..t {
                let dna = if i == j {
                    true
                } else if self.never_coenabled(i, j) || !self.dna_raw.get(i, j) {
                    false
                } else {
                    self.mutually_disabling(i, j)
                        || self.may_write.rows_overlap(i, &self.actions_read, j)
                        || self.actions_read.rows_overlap(i, &self.may_write, j)
                };
                self.dna.set(i, j, dna);
            }
        }

        for i in 0..t {
            for j in 0..t {
                let dnb = if self.guards_of.row(i).any(|g| self.must_disable.get(g, j)) {
                    false
                } else {
                    self.dna.get(i, j) || self.guards_of.row(i).any(|g| self.nes.get(g, j))
                };
                self.dnb.set(i, j, dnb);
            }
        }
    }
}

/// Symmetric, reflexive may-be-coenabled relation; all pairs when absent
fn coenabled_matrix(rows: Option<&[Vec<bool>]>, guards: usize) -> DependencyMatrix {
    let mut matrix = DependencyMatrix::new(guards, guards);
    for a in 0..guards {
        for b in 0..guards {
            let value = match rows {
                None => true,
                Some(rows) => a == b || rows[a][b] || rows[b][a],
            };
            matrix.set(a, b, value);
        }
    }
    matrix
}

fn explicit_matrix(rows: Option<&[Vec<bool>]>, r: usize, c: usize) -> DependencyMatrix {
    let mut matrix = DependencyMatrix::new(r, c);
    if let Some(rows) = rows {
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                matrix.set(i, j, value);
            }
        }
    }
    matrix
}
