//! Host Runtime
//!
//! The smallest runtime that gives hooks somewhere to live. It supplies the
//! two primitives the cell layer is built on:
//!
//! - **State**: [`use_state`] returns a snapshot plus a [`Setter`] that
//!   writes a per-component slot and requests a re-render.
//! - **Memoization**: [`use_memo`] recomputes a value only when its
//!   dependency value changes.
//!
//! # Concepts
//!
//! ## Components
//!
//! A [`Component`] owns an ordered table of hook slots. Every render must
//! call the same hooks in the same order; the n-th call of a render maps to
//! the n-th slot.
//!
//! ## Render Context
//!
//! [`RenderContext`] is a thread-local stack recording which component is
//! rendering and how far through its hooks it is. Hooks called with an empty
//! stack fail with [`HookError::OutsideRender`](crate::HookError).
//!
//! There is no virtual DOM and no scheduler thread: the embedder calls
//! [`Component::render`] and decides when to render again.

mod component;
mod context;
mod memo;
mod state;

pub use component::{Component, ComponentId};
pub use context::RenderContext;
pub use memo::{use_memo, use_ref, MemoState};
pub use state::{use_state, Setter};

use crate::error::HookError;

/// The component currently rendering on this thread.
pub fn current_component(hook: &'static str) -> Result<Component, HookError> {
    RenderContext::current_component().ok_or(HookError::OutsideRender { hook })
}
