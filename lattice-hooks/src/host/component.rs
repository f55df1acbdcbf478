//! Component Instances
//!
//! A component instance owns the storage behind its hooks. Hook values do
//! not live in the cell objects handed out during a render; they live in the
//! component's slot table, indexed by call order, and survive across renders
//! until the component is unmounted.
//!
//! # Lifecycle
//!
//! 1. The first successful render mounts the component and fixes the number
//!    of hooks it calls.
//!
//! 2. Setters mark the component dirty. The embedder decides when to render
//!    again; [`Component::render_until_stable`] renders until no setter fired
//!    during the last pass.
//!
//! 3. Hooks may spawn tasks (future adapters). [`Component::settle`] awaits
//!    them; [`Component::unmount`] aborts them and releases the slots.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::mem;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};

use super::context::RenderContext;
use crate::config::HostConfig;
use crate::error::HookError;

/// Unique identifier for a component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Generate a new unique component ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

type Slot = Arc<dyn Any + Send + Sync>;

/// Shared state of a component instance.
///
/// Setters hold a `Weak` to this so that a dropped component does not stay
/// alive through callbacks parked in futures.
pub(crate) struct ComponentInner {
    id: ComponentId,
    name: String,
    config: HostConfig,

    /// Hook storage in call order.
    slots: Mutex<Vec<Slot>>,

    /// Set by the first successful render, cleared by unmount.
    mounted: AtomicBool,

    /// Bumped by every unmount. Setters from an older epoch are orphaned.
    epoch: AtomicU64,

    /// A setter requested a re-render since the last render started.
    dirty: AtomicBool,

    render_count: AtomicU64,

    /// Tasks spawned by hooks of this component.
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ComponentInner {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Mark the component as needing a render, unless the request comes
    /// from a setter of an earlier mount.
    pub(crate) fn request_render(&self, epoch: u64) {
        if epoch != self.epoch() {
            tracing::trace!(component = %self.name, epoch, "update from earlier mount ignored");
            return;
        }
        self.dirty.store(true, Ordering::SeqCst);
        tracing::trace!(component = %self.name, "re-render requested");
    }
}

/// Handle to a component instance.
///
/// Cloning the handle shares the instance.
#[derive(Clone)]
pub struct Component {
    inner: Arc<ComponentInner>,
}

impl Component {
    /// Create an unmounted component with the default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, HostConfig::default())
    }

    /// Create an unmounted component with an explicit configuration.
    pub fn with_config(name: impl Into<String>, config: HostConfig) -> Self {
        Self {
            inner: Arc::new(ComponentInner {
                id: ComponentId::new(),
                name: name.into(),
                config,
                slots: Mutex::new(Vec::new()),
                mounted: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                dirty: AtomicBool::new(false),
                render_count: AtomicU64::new(0),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &HostConfig {
        &self.inner.config
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::SeqCst)
    }

    /// Whether a setter requested a re-render since the last render began.
    pub fn needs_render(&self) -> bool {
        self.inner.dirty.load(Ordering::SeqCst)
    }

    /// Number of completed renders.
    pub fn render_count(&self) -> u64 {
        self.inner.render_count.load(Ordering::SeqCst)
    }

    /// Number of hook slots currently allocated.
    pub fn hook_count(&self) -> usize {
        self.inner.slots.lock().len()
    }

    /// Run one render pass.
    ///
    /// Hooks called inside `render` resolve against this component's slots.
    /// The first successful pass mounts the component; every later pass must
    /// call the same number of hooks.
    pub fn render<R, F>(&self, render: F) -> Result<R, HookError>
    where
        F: FnOnce() -> Result<R, HookError>,
    {
        let span = tracing::trace_span!(
            "render",
            component = %self.inner.name,
            id = self.inner.id.raw()
        );
        let _entered = span.enter();

        self.inner.dirty.store(false, Ordering::SeqCst);

        let context = RenderContext::enter(self.clone());
        let output = render()?;
        let used = context.hooks_used();
        drop(context);

        if self.is_mounted() {
            let expected = self.hook_count();
            if used != expected {
                return Err(HookError::HookCountChanged {
                    component: self.inner.name.clone(),
                    expected,
                    found: used,
                });
            }
        } else {
            self.inner.mounted.store(true, Ordering::SeqCst);
            tracing::trace!(hooks = used, "mounted");
        }

        self.inner.render_count.fetch_add(1, Ordering::SeqCst);
        Ok(output)
    }

    /// Render until a pass leaves the component clean.
    ///
    /// Returns the output of the last pass. Fails after
    /// [`HostConfig::max_rerenders`] passes that all requested another one.
    pub fn render_until_stable<R, F>(&self, mut render: F) -> Result<R, HookError>
    where
        F: FnMut() -> Result<R, HookError>,
    {
        let limit = self.inner.config.max_rerenders.max(1);

        for _ in 0..limit {
            let output = self.render(&mut render)?;
            if !self.needs_render() {
                return Ok(output);
            }
        }

        tracing::warn!(component = %self.inner.name, limit, "render limit exceeded");
        Err(HookError::RenderLimitExceeded {
            component: self.inner.name.clone(),
            limit,
        })
    }

    /// Spawn a task owned by this component on the ambient tokio runtime.
    pub fn spawn<F>(&self, hook: &'static str, future: F) -> Result<AbortHandle, HookError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = Handle::try_current().map_err(|_| HookError::NoRuntime { hook })?;
        let task = handle.spawn(future);
        let abort = task.abort_handle();

        let mut tasks = self.inner.tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(task);

        Ok(abort)
    }

    /// Number of spawned tasks that have not finished yet.
    pub fn pending_tasks(&self) -> usize {
        self.inner
            .tasks
            .lock()
            .iter()
            .filter(|task| !task.is_finished())
            .count()
    }

    /// Wait for every task spawned by this component's hooks.
    ///
    /// Tasks spawned while waiting are awaited too.
    pub async fn settle(&self) {
        loop {
            let pending = mem::take(&mut *self.inner.tasks.lock());
            if pending.is_empty() {
                break;
            }

            for task in pending {
                match task.await {
                    Ok(()) => {}
                    Err(err) if err.is_cancelled() => {
                        tracing::trace!(component = %self.inner.name, "hook task cancelled");
                    }
                    Err(err) => {
                        tracing::warn!(component = %self.inner.name, error = %err, "hook task panicked");
                    }
                }
            }
        }
    }

    /// Abort in-flight tasks and release all hook storage.
    ///
    /// Setters handed out earlier stop scheduling renders, including after
    /// the next render mounts the component afresh.
    pub fn unmount(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);

        for task in mem::take(&mut *self.inner.tasks.lock()) {
            task.abort();
        }
        let released = mem::take(&mut *self.inner.slots.lock()).len();

        self.inner.mounted.store(false, Ordering::SeqCst);
        self.inner.dirty.store(false, Ordering::SeqCst);
        tracing::debug!(component = %self.inner.name, released, "unmounted");
    }

    /// Fetch the slot at `index`, allocating it with `init` while mounting.
    pub(crate) fn slot<S, I>(&self, index: usize, hook: &'static str, init: I) -> Result<Arc<S>, HookError>
    where
        S: Any + Send + Sync,
        I: FnOnce() -> S,
    {
        let existing = self.inner.slots.lock().get(index).cloned();
        if let Some(slot) = existing {
            return slot.downcast::<S>().map_err(|_| self.mismatch(index, hook));
        }

        if self.is_mounted() {
            return Err(HookError::HookCountChanged {
                component: self.inner.name.clone(),
                expected: self.hook_count(),
                found: index + 1,
            });
        }

        // `init` runs without the lock held; it is user code.
        let slot = Arc::new(init());
        let mut slots = self.inner.slots.lock();
        if slots.len() != index {
            return Err(self.mismatch(index, hook));
        }
        let erased: Slot = slot.clone();
        slots.push(erased);
        tracing::trace!(component = %self.inner.name, index, hook, "allocated hook slot");

        Ok(slot)
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.inner.epoch()
    }

    pub(crate) fn downgrade(&self) -> Weak<ComponentInner> {
        Arc::downgrade(&self.inner)
    }

    fn mismatch(&self, index: usize, hook: &'static str) -> HookError {
        HookError::SlotTypeMismatch {
            component: self.inner.name.clone(),
            index,
            hook,
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("mounted", &self.is_mounted())
            .field("dirty", &self.needs_render())
            .field("hook_count", &self.hook_count())
            .field("render_count", &self.render_count())
            .finish()
    }
}
