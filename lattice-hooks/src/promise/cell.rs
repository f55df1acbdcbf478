//! The handle returned by future adapters.

use std::fmt;

use crate::cell::ReactiveCell;
use crate::error::Rejection;

/// A cell fed by a future, plus the outcome of the latest rejection.
#[derive(Clone)]
pub struct PromiseCell<S> {
    cell: ReactiveCell<S>,
    rejection: Option<Rejection>,
    generation: u64,
}

impl<S> PromiseCell<S>
where
    S: Clone + Send + 'static,
{
    pub(crate) fn new(cell: ReactiveCell<S>, rejection: Option<Rejection>, generation: u64) -> Self {
        Self {
            cell,
            rejection,
            generation,
        }
    }

    /// The underlying cell. It stays writable while a future is in flight.
    pub fn cell(&self) -> &ReactiveCell<S> {
        &self.cell
    }

    /// Consume the handle, keeping only the cell.
    pub fn into_cell(self) -> ReactiveCell<S> {
        self.cell
    }

    /// The value as of the render that produced this handle.
    pub fn value(&self) -> &S {
        self.cell.value()
    }

    /// The last rejection seen before this render, cleared by a later
    /// successful resolution.
    pub fn rejection(&self) -> Option<&Rejection> {
        self.rejection.as_ref()
    }

    /// Whether [`rejection`](Self::rejection) is set.
    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }

    /// Generation of the most recent launch. Starts at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<S: fmt::Debug> fmt::Debug for PromiseCell<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromiseCell")
            .field("cell", &self.cell)
            .field("rejection", &self.rejection)
            .field("generation", &self.generation)
            .finish()
    }
}
