//! Per-group dependency listing
//!
//! One line per transition group:
//!
//! ```text
//! 0)	x++	R(x), w(x), W(y),
//! ```
//!
//! `R` marks a read, `w` a must-write and `W` a write that may not happen.

use super::input::DependencyInput;
use std::fmt::Write;

/// Render the dependency listing of `input`
///
/// Slot indices outside `input.slots` are skipped.
pub fn dependency_listing(input: &DependencyInput) -> String {
    let mut out = String::new();
    for (i, group) in input.groups.iter().enumerate() {
        let _ = write!(out, "{i})\t{}\t", group.name);
        for (slot, name) in input.slots.iter().enumerate() {
            if group.read.contains(&slot) {
                let _ = write!(out, "R({name}), ");
            }
            if group.must_write.contains(&slot) {
                let _ = write!(out, "w({name}), ");
            } else if group.may_write.contains(&slot) {
                let _ = write!(out, "W({name}), ");
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::matrix::input::GroupDependencies;

    #[test]
    fn test_listing_marks_reads_and_writes() {
        let input = DependencyInput {
            slots: vec!["x".into(), "y".into()],
            groups: vec![
                GroupDependencies {
                    name: "x = y".into(),
                    read: vec![1],
                    may_write: vec![0],
                    must_write: vec![0],
                    ..Default::default()
                },
                GroupDependencies {
                    name: "if y".into(),
                    read: vec![1],
                    may_write: vec![1],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        assert_eq!(
            dependency_listing(&input),
            "0)\tx = y\tw(x), R(y), \n1)\tif y\tR(y), W(y), \n"
        );
    }
}
