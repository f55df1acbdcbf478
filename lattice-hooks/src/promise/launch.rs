//! Future Launching
//!
//! Both adapters share one mechanism: a memo keyed by the dependencies hands
//! out generations, and every new generation launches the factory's future
//! on the component's runtime. When the future completes, its result is
//! published only if no newer generation has been launched since.
//!
//! # Why Generations
//!
//! Without them, a slow future from an old dependency value could resolve
//! after a fast one from the new value and overwrite it. The counter turns
//! "last to finish wins" into "last to launch wins".

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::AbortHandle;

use super::cell::PromiseCell;
use crate::cell::use_cell;
use crate::error::{HookError, Rejection};
use crate::host::{current_component, use_memo, use_ref, Setter};

/// Per-cell launch bookkeeping, kept in a ref slot.
#[derive(Default)]
struct Launcher {
    /// Latest generation handed out by the dependency memo.
    generation: AtomicU64,
    /// Latest generation whose future was actually spawned.
    launched: AtomicU64,
    /// Abort handle of the latest spawned task.
    in_flight: Mutex<Option<AbortHandle>>,
}

impl Launcher {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

/// Core of every future adapter.
pub(crate) fn use_future_cell<S, D, E, F, Fut>(
    hook: &'static str,
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
    let cell = use_cell(initial)?;
    let rejection = use_cell::<Option<Rejection>>(None)?;
    let launcher = use_ref(Launcher::default)?;
    let generation = use_memo(|| launcher.generation.fetch_add(1, Ordering::SeqCst) + 1, deps)?;

    if launcher.launched.load(Ordering::SeqCst) != generation {
        let component = current_component(hook)?;
        let future = factory(cell.setter().current());

        let task = publish(
            component.name().to_string(),
            Arc::clone(&launcher),
            generation,
            future,
            cell.setter().clone(),
            rejection.setter().clone(),
        );
        let abort = component.spawn(hook, task)?;
        launcher.launched.store(generation, Ordering::SeqCst);
        tracing::debug!(component = %component.name(), hook, generation, "launched future");

        let stale = launcher.in_flight.lock().replace(abort);
        if let Some(stale) = stale {
            if component.config().abort_stale_tasks && !stale.is_finished() {
                stale.abort();
                tracing::debug!(component = %component.name(), generation, "aborted superseded task");
            }
        }
    }

    Ok(PromiseCell::new(cell, rejection.into_value(), generation))
}

/// Await `future` and publish its outcome if `generation` is still current.
async fn publish<S, E, Fut>(
    component: String,
    launcher: Arc<Launcher>,
    generation: u64,
    future: Fut,
    value: Setter<S>,
    rejection: Setter<Option<Rejection>>,
) where
    S: Clone + Send + 'static,
    E: Display,
    Fut: Future<Output = Result<S, E>>,
{
    let outcome = future.await;

    if !launcher.is_current(generation) {
        tracing::debug!(
            component = %component,
            generation,
            current = launcher.generation.load(Ordering::SeqCst),
            "discarding stale resolution"
        );
        return;
    }

    match outcome {
        Ok(resolved) => {
            if let Err(err) = value.set(resolved) {
                tracing::warn!(component = %component, error = %err, "could not publish resolution");
            }
            if rejection.current().is_some() {
                if let Err(err) = rejection.set(None) {
                    tracing::warn!(component = %component, error = %err, "could not clear rejection");
                }
            }
        }
        Err(err) => {
            let record = Rejection {
                generation,
                message: err.to_string(),
            };
            tracing::warn!(component = %component, generation, error = %record.message, "future rejected");
            if let Err(err) = rejection.set(Some(record)) {
                tracing::warn!(component = %component, error = %err, "could not record rejection");
            }
        }
    }
}
