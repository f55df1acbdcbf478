//! Reactive Cells
//!
//! Cells are the user-facing layer over the host's state and memo hooks.
//!
//! - [`ReactiveCell`]: value snapshot plus setter, with helpers for
//!   optional values (`is_defined`, `if_present`, `reset`).
//! - Computed cells: recomputed from their previous value when dependencies
//!   change, and still writable.
//! - Read-only computed values: the same mechanism, returning only the value.
//!
//! Constructors come in named variants instead of optional arguments:
//! `use_cell` / `use_cell_with` / `use_optional_cell`, and seeded vs
//! `_unseeded` computed cells.

mod computed;
mod reactive;
mod truthy;

pub use computed::{use_computed, use_computed_cell, use_computed_cell_unseeded, use_computed_unseeded};
pub use reactive::{use_cell, use_cell_with, use_optional_cell, ReactiveCell};
pub use truthy::Truthy;
