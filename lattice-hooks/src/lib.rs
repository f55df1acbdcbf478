//! Lattice Hooks
//!
//! This crate provides reactive references for hook-based components: a
//! parent hands a child one [`ReactiveCell`] that reads and writes the
//! parent's state, instead of a value plus update callbacks.
//!
//! It implements:
//!
//! - A minimal host runtime (components, hook slots, state and memo hooks)
//! - Reactive cells with helpers for optional values
//! - Computed cells that recompute from their previous value
//! - Adapters that publish future outputs into cells
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `host`: component instances, render context, `use_state` / `use_memo`
//! - `cell`: reactive and computed cells built on the host hooks
//! - `promise`: future adapters with generation tracking
//! - `config`: per-component settings
//!
//! # Example
//!
//! ```rust,ignore
//! use lattice_hooks::{use_cell, use_computed, Component};
//!
//! let counter = Component::new("Counter");
//!
//! let (count, doubled) = counter.render(|| {
//!     let count = use_cell(1)?;
//!     let doubled = use_computed(|_| count.value() * 2, *count.value(), 0)?;
//!     Ok((count, doubled))
//! })?;
//!
//! // `doubled` is 0 on mount; the factory's result shows from the next render.
//! count.update_with(|v| v + 1)?;
//! // `counter.needs_render()` is now true.
//! ```

pub mod cell;
pub mod config;
pub mod error;
pub mod host;
pub mod promise;

pub use cell::{
    use_cell, use_cell_with, use_computed, use_computed_cell, use_computed_cell_unseeded,
    use_computed_unseeded, use_optional_cell, ReactiveCell, Truthy,
};
pub use config::HostConfig;
pub use error::{HookError, Rejection};
pub use host::{use_memo, use_ref, use_state, Component, ComponentId, RenderContext, Setter};
pub use promise::{
    use_computed_promise, use_computed_promise_cell, use_promise_cell, use_try_computed_promise_cell,
    use_try_promise_cell, PromiseCell,
};
