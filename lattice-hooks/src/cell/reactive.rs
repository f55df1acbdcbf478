//! Reactive Cell
//!
//! A [`ReactiveCell`] bundles a state snapshot with its setter, so a parent
//! can give a child one object that both reads and writes the parent's
//! state. The child's writes land in the parent's slot and re-render the
//! parent; no callbacks need threading through.
//!
//! # Example
//!
//! ```rust,ignore
//! let parent = Component::new("Form");
//! let child = Component::new("Input");
//!
//! parent.render(|| {
//!     let name = use_cell(String::new())?;
//!     child.render(|| {
//!         name.set("ada".into())?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! })?;
//!
//! assert!(parent.needs_render());
//! ```
//!
//! The cell object is rebuilt every render. Only the slot behind it
//! persists, and it belongs to the component that called the hook.

use std::fmt;

use super::truthy::Truthy;
use crate::error::HookError;
use crate::host::{use_state, Setter};

/// A state snapshot plus the means to change it.
#[derive(Clone)]
pub struct ReactiveCell<S> {
    value: S,
    setter: Setter<S>,
}

impl<S> ReactiveCell<S>
where
    S: Clone + Send + 'static,
{
    pub(crate) fn from_parts(value: S, setter: Setter<S>) -> Self {
        Self { value, setter }
    }

    /// The value as of the render that produced this cell.
    pub fn value(&self) -> &S {
        &self.value
    }

    /// Consume the cell, keeping only the value.
    pub fn into_value(self) -> S {
        self.value
    }

    /// The setter, e.g. to move into a future.
    pub fn setter(&self) -> &Setter<S> {
        &self.setter
    }

    /// Replace the value and request a re-render of the owner.
    pub fn set(&self, value: S) -> Result<(), HookError> {
        self.setter.set(value)
    }

    /// Replace the value with `update(&latest)`.
    ///
    /// `latest` includes writes made since this cell's render.
    pub fn update_with<F>(&self, update: F) -> Result<(), HookError>
    where
        F: FnOnce(&S) -> S,
    {
        self.setter.update_with(update)
    }

    /// Create a new, independent cell seeded with `transform(value)`.
    ///
    /// This is a hook call, not a derivation: the new cell is seeded once,
    /// when the component mounts, and never follows later changes to this
    /// cell. Call it unconditionally during render like any other hook.
    pub fn map<U, F>(&self, transform: F) -> Result<ReactiveCell<U>, HookError>
    where
        U: Clone + Send + 'static,
        F: FnOnce(&S) -> U,
    {
        use_cell_with(|| transform(&self.value))
    }

    /// Whether the value is falsy: zero, empty string, `false` or `None`.
    ///
    /// Broader than `!is_defined()`; see [`Truthy`].
    pub fn is_empty(&self) -> bool
    where
        S: Truthy,
    {
        !self.value.is_truthy()
    }
}

impl<T> ReactiveCell<Option<T>>
where
    T: Clone + Send + 'static,
{
    /// Whether the value is `Some`.
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }

    /// Borrow the value if it is defined.
    pub fn as_defined(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Run `action` with the value and setter if the value is defined.
    pub fn if_present<F>(&self, action: F) -> &Self
    where
        F: FnOnce(&T, &Setter<Option<T>>),
    {
        if let Some(value) = &self.value {
            action(value, &self.setter);
        }
        self
    }

    /// Set the value to `None`.
    pub fn reset(&self) -> Result<&Self, HookError> {
        self.setter.set(None)?;
        Ok(self)
    }
}

impl<S: fmt::Debug> fmt::Debug for ReactiveCell<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveCell")
            .field("value", &self.value)
            .finish()
    }
}

/// Declare a cell seeded with `value` on mount.
pub fn use_cell<S>(value: S) -> Result<ReactiveCell<S>, HookError>
where
    S: Clone + Send + 'static,
{
    use_cell_with(move || value)
}

/// Declare a cell seeded lazily; `init` runs on mount only.
pub fn use_cell_with<S, I>(init: I) -> Result<ReactiveCell<S>, HookError>
where
    S: Clone + Send + 'static,
    I: FnOnce() -> S,
{
    let (value, setter) = use_state(init)?;
    Ok(ReactiveCell::from_parts(value, setter))
}

/// Declare a cell that starts out undefined.
pub fn use_optional_cell<T>() -> Result<ReactiveCell<Option<T>>, HookError>
where
    T: Clone + Send + 'static,
{
    use_cell_with(|| None)
}
