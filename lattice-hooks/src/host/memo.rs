//! Memo and Ref Hooks
//!
//! `use_memo` is the host's memoization primitive: it caches the result of
//! a factory together with the dependency value it was computed for, and
//! runs the factory again only when a render passes different dependencies.
//!
//! Dependencies compare with `PartialEq`. Tuples, arrays and vectors of keys
//! all work; for identity comparison pass pointer keys such as
//! `Arc::as_ptr(&value) as usize`.
//!
//! `use_ref` keeps an arbitrary object alive for the lifetime of the
//! component without ever triggering renders.

use std::sync::Arc;

use parking_lot::Mutex;

use super::context::RenderContext;
use crate::error::HookError;

/// Dirty state of a memo slot, as seen by the current render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoState {
    /// Never computed.
    Empty,
    /// Dependencies match the cached entry.
    Clean,
    /// Dependencies changed since the cached entry was computed.
    Dirty,
}

/// Storage behind one `use_memo` call.
struct MemoSlot<T, D> {
    entry: Mutex<Option<(D, T)>>,
}

impl<T, D: PartialEq> MemoSlot<T, D> {
    fn state(&self, deps: &D) -> MemoState {
        match &*self.entry.lock() {
            None => MemoState::Empty,
            Some((cached, _)) if cached == deps => MemoState::Clean,
            Some(_) => MemoState::Dirty,
        }
    }
}

/// Memoize `factory()` across renders, keyed by `deps`.
///
/// The factory runs on the first render and again whenever `deps` differs
/// from the value passed by the previous computation. With `deps = ()` it
/// runs exactly once.
pub fn use_memo<T, D, F>(factory: F, deps: D) -> Result<T, HookError>
where
    T: Clone + Send + 'static,
    D: PartialEq + Send + 'static,
    F: FnOnce() -> T,
{
    let (component, index) = RenderContext::next_slot("use_memo")?;
    let slot = component.slot(index, "use_memo", || MemoSlot::<T, D> {
        entry: Mutex::new(None),
    })?;

    let state = slot.state(&deps);
    if state == MemoState::Clean {
        if let Some((_, value)) = &*slot.entry.lock() {
            return Ok(value.clone());
        }
    }

    tracing::debug!(component = %component.name(), index, ?state, "recomputing memo");
    let value = factory();
    *slot.entry.lock() = Some((deps, value.clone()));

    Ok(value)
}

/// Keep an object alive across renders.
///
/// `init` runs while the component mounts; later renders return the same
/// `Arc`.
pub fn use_ref<T, I>(init: I) -> Result<Arc<T>, HookError>
where
    T: Send + Sync + 'static,
    I: FnOnce() -> T,
{
    let (component, index) = RenderContext::next_slot("use_ref")?;
    component.slot(index, "use_ref", init)
}
