//! Future Adapters
//!
//! These hooks publish the output of a future into a cell.
//!
//! - [`use_promise_cell`] / [`use_try_promise_cell`]: spawn one future on
//!   mount. Futures passed on later renders are dropped unpolled.
//! - [`use_computed_promise_cell`] / [`use_try_computed_promise_cell`]: run a
//!   future factory with the cell's previous value each time the
//!   dependencies change. Only the newest launch may publish.
//! - [`use_computed_promise`]: read-only form of the above.
//!
//! Futures run on the ambient tokio runtime and are owned by the rendering
//! component: [`Component::settle`](crate::host::Component::settle) waits
//! for them and [`Component::unmount`](crate::host::Component::unmount)
//! aborts them.
//!
//! The cell stays writable while a future is in flight. A resolution that
//! arrives after a manual write still overwrites it.
//!
//! Fallible (`try_`) variants record an `Err` as a
//! [`Rejection`](crate::Rejection) instead of losing it.

mod cell;
mod launch;

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;

use futures_util::FutureExt;

pub use cell::PromiseCell;

use crate::error::HookError;
use launch::use_future_cell;

/// Publish the output of `future` into a cell seeded with `initial`.
pub fn use_promise_cell<S, Fut>(future: Fut, initial: S) -> Result<PromiseCell<S>, HookError>
where
    S: Clone + Send + 'static,
    Fut: Future<Output = S> + Send + 'static,
{
    use_future_cell(
        "use_promise_cell",
        move |_| future.map(Ok::<S, Infallible>),
        (),
        initial,
    )
}

/// Like [`use_promise_cell`] for futures that can fail.
pub fn use_try_promise_cell<S, E, Fut>(future: Fut, initial: S) -> Result<PromiseCell<S>, HookError>
where
    S: Clone + Send + 'static,
    E: Display + Send + 'static,
    Fut: Future<Output = Result<S, E>> + Send + 'static,
{
    use_future_cell("use_try_promise_cell", move |_| future, (), initial)
}

/// Run `factory(previous)` whenever `deps` changes and publish the newest
/// launch's output.
pub fn use_computed_promise_cell<S, D, F, Fut>(
    factory: F,
    deps: D,
    initial: S,
) -> Result<PromiseCell<S>, HookError>
where
    S: Clone + Send + 'static,
    D: PartialEq + Send + 'static,
    F: FnOnce(S) -> Fut,
    Fut: Future<Output = S> + Send + 'static,
{
    use_future_cell(
        "use_computed_promise_cell",
        move |previous| factory(previous).map(Ok::<S, Infallible>),
        deps,
        initial,
    )
}

/// Like [`use_computed_promise_cell`] for factories whose futures can fail.
pub fn use_try_computed_promise_cell<S, D, E, F, Fut>(
    factory: F,
    deps: D,
    initial: S,
) -> Result<PromiseCell<S>, HookError>
where
    S: Clone + Send + 'static,
    D: PartialEq + Send + 'static,
    E: Display + Send + 'static,
    F: FnOnce(S) -> Fut,
    Fut: Future<Output = Result<S, E>> + Send + 'static,
{
    use_future_cell("use_try_computed_promise_cell", factory, deps, initial)
}

/// Read-only form of [`use_computed_promise_cell`].
pub fn use_computed_promise<S, D, F, Fut>(factory: F, deps: D, initial: S) -> Result<S, HookError>
where
    S: Clone + Send + 'static,
    D: PartialEq + Send + 'static,
    F: FnOnce(S) -> Fut,
    Fut: Future<Output = S> + Send + 'static,
{
    Ok(use_computed_promise_cell(factory, deps, initial)?
        .into_cell()
        .into_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostConfig;
    use crate::host::Component;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn single_future_publishes_after_settle() {
        let component = Component::new("Loader");

        let cell = component
            .render(|| use_promise_cell(async { 7 }, 0))
            .unwrap();
        assert_eq!(*cell.value(), 0);
        assert_eq!(cell.generation(), 1);

        component.settle().await;
        assert!(component.needs_render());

        let cell = component
            .render(|| use_promise_cell(async { 99 }, 0))
            .unwrap();
        assert_eq!(*cell.value(), 7);
    }

    #[tokio::test]
    async fn later_futures_are_not_polled() {
        let component = Component::new("Loader");
        let polled = Arc::new(AtomicI32::new(0));

        for _ in 0..3 {
            let polled = polled.clone();
            component
                .render(move || {
                    use_promise_cell(
                        async move {
                            polled.fetch_add(1, Ordering::SeqCst);
                            1
                        },
                        0,
                    )
                })
                .unwrap();
        }
        component.settle().await;

        assert_eq!(polled.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resolution_overwrites_manual_write() {
        let component = Component::new("Race");
        let (tx, rx) = oneshot::channel::<i32>();

        let cell = component
            .render(move || use_promise_cell(async move { rx.await.unwrap_or(-1) }, 0))
            .unwrap();
        cell.cell().set(5).unwrap();

        tx.send(9).unwrap();
        component.settle().await;

        let cell = component
            .render(|| use_promise_cell(async { 0 }, 0))
            .unwrap();
        assert_eq!(*cell.value(), 9);
    }

    #[tokio::test]
    async fn rejection_is_recorded_then_cleared() {
        let component = Component::new("Fetch");

        let render = |dep: u32| {
            component
                .render(move || {
                    use_try_computed_promise_cell(
                        move |_prev: i32| async move {
                            if dep == 1 {
                                Err("offline")
                            } else {
                                Ok(dep as i32)
                            }
                        },
                        dep,
                        0,
                    )
                })
                .unwrap()
        };

        render(1);
        component.settle().await;
        let cell = render(1);
        let rejection = cell.rejection().cloned().unwrap();
        assert_eq!(rejection.generation, 1);
        assert_eq!(rejection.message, "offline");
        assert_eq!(*cell.value(), 0);

        render(2);
        component.settle().await;
        let cell = render(2);
        assert!(!cell.is_rejected());
        assert_eq!(*cell.value(), 2);
    }

    #[tokio::test]
    async fn factory_receives_previous_value() {
        let component = Component::new("Accumulate");

        let render = |dep: u32| {
            component
                .render(move || use_computed_promise(move |prev: u32| async move { prev + dep }, dep, 100))
                .unwrap()
        };

        assert_eq!(render(1), 100);
        component.settle().await;
        assert_eq!(render(1), 101);

        render(2);
        component.settle().await;
        assert_eq!(render(2), 103);
    }

    #[tokio::test]
    async fn stale_resolution_is_discarded() {
        let component = Component::new("Search");
        let (slow_tx, slow_rx) = oneshot::channel::<&'static str>();
        let (fast_tx, fast_rx) = oneshot::channel::<&'static str>();

        let first = component
            .render(move || {
                use_computed_promise_cell(
                    move |_| async move { slow_rx.await.unwrap_or("dropped") },
                    "a",
                    "",
                )
            })
            .unwrap();
        let second = component
            .render(move || {
                use_computed_promise_cell(
                    move |_| async move { fast_rx.await.unwrap_or("dropped") },
                    "ab",
                    "",
                )
            })
            .unwrap();
        assert_eq!((first.generation(), second.generation()), (1, 2));

        fast_tx.send("ab-result").unwrap();
        tokio::task::yield_now().await;
        slow_tx.send("a-result").unwrap();
        component.settle().await;

        let cell = component
            .render(|| use_computed_promise_cell(|_| async { "unused" }, "ab", ""))
            .unwrap();
        assert_eq!(*cell.value(), "ab-result");
    }

    #[tokio::test]
    async fn superseded_task_is_aborted_when_configured() {
        let config = HostConfig {
            abort_stale_tasks: true,
            ..HostConfig::default()
        };
        let component = Component::with_config("Abort", config);
        let finished = Arc::new(AtomicI32::new(0));

        for dep in [1, 2] {
            let finished = finished.clone();
            component
                .render(move || {
                    use_computed_promise_cell(
                        move |_| async move {
                            if dep == 1 {
                                std::future::pending::<()>().await;
                            }
                            finished.fetch_add(1, Ordering::SeqCst);
                            dep
                        },
                        dep,
                        0,
                    )
                })
                .unwrap();
        }

        // Would hang on the pending future if it had not been aborted.
        component.settle().await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn adapters_require_a_runtime() {
        let component = Component::new("NoRuntime");
        let err = component
            .render(|| use_promise_cell(async { 1 }, 0))
            .unwrap_err();
        assert_eq!(err, HookError::NoRuntime { hook: "use_promise_cell" });
    }
}
