//! State rendering for diagnostics

use super::oracle::ModelIntrospection;
use std::fmt;

/// `name = value` rendering of a state
///
/// Names are left-aligned in a 30-column field; enumerated values print by
/// name, integer values right-aligned in 3 columns.
///
/// # Example
///
/// ```rust
/// use krepis_reach::domain::explorer::{ModelIntrospection, StateDisplay};
///
/// struct Anonymous;
/// impl ModelIntrospection for Anonymous {}
///
/// let text = StateDisplay::new(&Anonymous, &[7, 12]).to_string();
/// assert!(text.starts_with("slot_0"));
/// assert!(text.contains("=   7"));
/// ```
pub struct StateDisplay<'a, M: ?Sized> {
    model: &'a M,
    state: &'a [i32],
}

impl<'a, M: ModelIntrospection + ?Sized> StateDisplay<'a, M> {
    /// Render `state` with the names of `model`
    pub const fn new(model: &'a M, state: &'a [i32]) -> Self {
        Self { model, state }
    }
}

impl<M: ModelIntrospection + ?Sized> fmt::Display for StateDisplay<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, &value) in self.state.iter().enumerate() {
            write!(f, "{:<30}= ", self.model.variable_name(slot))?;
            let ty = self.model.variable_type(slot);
            if self.model.type_value_count(ty) == 0 {
                writeln!(f, "{value:3}")?;
            } else {
                writeln!(f, "{}", self.model.type_value_name(ty, value))?;
            }
        }
        Ok(())
    }
}
