//! Dependency Matrices
//!
//! # Overview
//!
//! Partial-order reduction needs to know which transitions can influence
//! each other. This module turns the static read/write/guard information of
//! a model into the relation matrices a reduction (or a person debugging
//! one) queries.
//!
//! # Architecture
//!
//! ```text
//! DependencyInput (serde)
//!     │ validate
//!     ▼
//! DependencyMatrices::build
//!     ├─ input relations:   g R w r t c m
//!     ├─ guard/transition:  e d
//!     └─ transition pairs:  u a A b
//!     │
//!     ▼
//! view(char, invert) → MatrixView → image / image_of_set
//! ```
//!
//! # Example
//!
//! ```rust
//! use krepis_reach::domain::matrix::{DependencyInput, DependencyMatrices};
//!
//! let input: DependencyInput = serde_json::from_str(r#"{
//!     "slots": ["x"],
//!     "groups": [
//!         { "name": "x = 1", "may_write": [0], "must_write": [0] },
//!         { "name": "y = x", "read": [0] }
//!     ]
//! }"#).unwrap();
//!
//! let matrices = DependencyMatrices::build(&input).unwrap();
//! let commutes = matrices.view('u', false).unwrap();
//! assert_eq!(commutes.image(0), Some(vec![]));
//! ```

mod bits;
mod builder;
mod input;
mod listing;
mod view;

pub use bits::DependencyMatrix;
pub use builder::DependencyMatrices;
pub use input::{DependencyInput, GroupDependencies, GuardDependencies, MatrixError};
pub use listing::dependency_listing;
pub use view::{Dimension, MatrixKind, MatrixView};
