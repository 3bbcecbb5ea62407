//! Raw dependency data of a model
//!
//! Index lists rather than bit vectors, so the JSON form stays readable:
//!
//! ```json
//! {
//!   "slots":  ["x", "y"],
//!   "groups": [{ "name": "x++", "read": [0], "may_write": [0], "must_write": [0], "guards": [0] }],
//!   "guards": [{ "name": "x < 3", "tests": [0] }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Dependencies of one transition group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDependencies {
    /// Statement text
    #[serde(default)]
    pub name: String,

    /// Slots read (guards and actions)
    #[serde(default)]
    pub read: Vec<usize>,

    /// Slots possibly written
    #[serde(default)]
    pub may_write: Vec<usize>,

    /// Slots written on every execution (subset of `may_write`)
    #[serde(default)]
    pub must_write: Vec<usize>,

    /// Slots read by the actions only; `read` when absent
    #[serde(default)]
    pub actions_read: Option<Vec<usize>>,

    /// Guards that enable this group
    #[serde(default)]
    pub guards: Vec<usize>,
}

/// Dependencies of one guard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardDependencies {
    /// Guard expression text
    #[serde(default)]
    pub name: String,

    /// Slots the guard tests
    #[serde(default)]
    pub tests: Vec<usize>,
}

/// Static dependency information of a model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyInput {
    /// State slot names
    pub slots: Vec<String>,

    /// One entry per transition group
    pub groups: Vec<GroupDependencies>,

    /// One entry per guard
    #[serde(default)]
    pub guards: Vec<GuardDependencies>,

    /// Guard × guard: may both hold in some state; all pairs when absent
    #[serde(default)]
    pub may_be_coenabled: Option<Vec<Vec<bool>>>,

    /// Guard × group: executing the group always falsifies the guard
    #[serde(default)]
    pub must_disable: Option<Vec<Vec<bool>>>,
}

/// Malformed dependency input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// A group or guard names a slot that does not exist
    #[error("{owner} refers to slot {slot}, model has {slots} slots")]
    SlotOutOfRange {
        /// Referring group or guard
        owner: String,
        /// Offending index
        slot: usize,
        /// Slot count
        slots: usize,
    },

    /// A group names a guard that does not exist
    #[error("group {group} refers to guard {guard}, model has {guards} guards")]
    GuardOutOfRange {
        /// Referring group
        group: usize,
        /// Offending index
        guard: usize,
        /// Guard count
        guards: usize,
    },

    /// An explicit matrix has the wrong shape
    #[error("matrix '{matrix}' must be {rows} x {cols}")]
    Shape {
        /// Input field name
        matrix: &'static str,
        /// Expected rows
        rows: usize,
        /// Expected columns
        cols: usize,
    },
}

impl DependencyInput {
    /// Check every index against the declared slot, guard and group counts
    ///
    /// # Errors
    ///
    /// The first out-of-range index or misshapen matrix found.
    pub fn validate(&self) -> Result<(), MatrixError> {
        let slots = self.slots.len();
        for (i, group) in self.groups.iter().enumerate() {
            let owner = || format!("group {i}");
            check_slots(owner, &group.read, slots)?;
            check_slots(owner, &group.may_write, slots)?;
            check_slots(owner, &group.must_write, slots)?;
            if let Some(actions) = &group.actions_read {
                check_slots(owner, actions, slots)?;
            }
            if let Some(&guard) = group.guards.iter().find(|&&g| g >= self.guards.len()) {
                return Err(MatrixError::GuardOutOfRange {
                    group: i,
                    guard,
                    guards: self.guards.len(),
                });
            }
        }
        for (i, guard) in self.guards.iter().enumerate() {
            check_slots(|| format!("guard {i}"), &guard.tests, slots)?;
        }

        let (g, t) = (self.guards.len(), self.groups.len());
        check_shape("may_be_coenabled", self.may_be_coenabled.as_deref(), g, g)?;
        check_shape("must_disable", self.must_disable.as_deref(), g, t)?;
        Ok(())
    }

    /// Actions-read set of `group`
    pub fn actions_read(&self, group: usize) -> &[usize] {
        let deps = &self.groups[group];
        deps.actions_read.as_deref().unwrap_or(&deps.read)
    }
}

fn check_slots(
    owner: impl FnOnce() -> String,
    set: &[usize],
    slots: usize,
) -> Result<(), MatrixError> {
    match set.iter().find(|&&s| s >= slots) {
        Some(&slot) => Err(MatrixError::SlotOutOfRange { owner: owner(), slot, slots }),
        None => Ok(()),
    }
}

fn check_shape(
    matrix: &'static str,
    rows: Option<&[Vec<bool>]>,
    expected_rows: usize,
    expected_cols: usize,
) -> Result<(), MatrixError> {
    match rows {
        Some(rows) if rows.len() != expected_rows || rows.iter().any(|r| r.len() != expected_cols) => {
            Err(MatrixError::Shape { matrix, rows: expected_rows, cols: expected_cols })
        }
        _ => Ok(()),
    }
}
