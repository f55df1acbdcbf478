//! Computed Cells
//!
//! A computed cell is a [`ReactiveCell`] whose value is recomputed from its
//! own previous value whenever a dependency value changes. The cell stays
//! writable: a manual write lands in the same slot, so the next
//! recomputation receives it as `previous`.
//!
//! # How Recomputation Works
//!
//! 1. The cell's state slot is seeded with the initial value on mount.
//!
//! 2. A memo keyed by the dependencies runs the factory with the slot's
//!    latest value (including writes no render has seen yet).
//!
//! 3. The result is committed through the cell's setter, like any other
//!    write. The render that ran the factory still shows the previous
//!    value; the owner re-renders and the next render shows the result.
//!
//! So a cell seeded with 0 whose factory adds one shows 0 on mount, then 1
//! and 2 as the dependencies change twice.
//!
//! With `deps = ()` the factory runs once, on mount.

use super::reactive::{use_cell, ReactiveCell};
use crate::error::HookError;
use crate::host::use_memo;

/// Declare a computed cell seeded with `initial`.
pub fn use_computed_cell<S, D, F>(factory: F, deps: D, initial: S) -> Result<ReactiveCell<S>, HookError>
where
    S: Clone + Send + 'static,
    D: PartialEq + Send + 'static,
    F: FnOnce(S) -> S,
{
    let cell = use_cell(initial)?;
    let setter = cell.setter();

    let mut committed = Ok(());
    use_memo(|| committed = setter.set(factory(setter.current())), deps)?;
    committed?;

    Ok(cell)
}

/// Declare a computed cell without a seed; the first `previous` is `None`.
pub fn use_computed_cell_unseeded<T, D, F>(factory: F, deps: D) -> Result<ReactiveCell<Option<T>>, HookError>
where
    T: Clone + Send + 'static,
    D: PartialEq + Send + 'static,
    F: FnOnce(Option<T>) -> Option<T>,
{
    use_computed_cell(factory, deps, None)
}

/// Read-only form of [`use_computed_cell`].
pub fn use_computed<S, D, F>(factory: F, deps: D, initial: S) -> Result<S, HookError>
where
    S: Clone + Send + 'static,
    D: PartialEq + Send + 'static,
    F: FnOnce(S) -> S,
{
    Ok(use_computed_cell(factory, deps, initial)?.into_value())
}

/// Read-only form of [`use_computed_cell_unseeded`].
pub fn use_computed_unseeded<T, D, F>(factory: F, deps: D) -> Result<Option<T>, HookError>
where
    T: Clone + Send + 'static,
    D: PartialEq + Send + 'static,
    F: FnOnce(Option<T>) -> Option<T>,
{
    Ok(use_computed_cell_unseeded(factory, deps)?.into_value())
}
