//! State Hook
//!
//! `use_state` is the host's mutable-state primitive: a slot that survives
//! renders, a snapshot of its value for the current render, and a
//! [`Setter`] that writes the slot and asks the owning component to render
//! again.
//!
//! # Snapshot Semantics
//!
//! The value returned by `use_state` is a clone taken when the hook ran.
//! Writes through the setter land in the slot immediately but only show up
//! in snapshots taken by later renders.

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};

use super::component::ComponentInner;
use super::context::RenderContext;
use crate::error::HookError;

/// Storage behind one `use_state` call.
pub(crate) struct StateSlot<T> {
    value: Mutex<T>,
    /// Serializes writers. The flag is set while an updater runs; only the
    /// thread running it can observe `true`, others wait for the lock.
    update: ReentrantMutex<Cell<bool>>,
}

impl<T> StateSlot<T> {
    fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            update: ReentrantMutex::new(Cell::new(false)),
        }
    }
}

/// Clears the updating flag even if the updater panics.
struct UpdatingGuard<'a>(&'a Cell<bool>);

impl Drop for UpdatingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Write handle for a state slot.
///
/// Setters are `Send + Sync` and may be moved into futures. Writes from
/// different threads are serialized; the last one wins. A setter from an
/// earlier mount, or whose component was dropped, still writes its slot but
/// no longer schedules renders.
pub struct Setter<T> {
    slot: Arc<StateSlot<T>>,
    owner: Weak<ComponentInner>,
    /// Mount epoch of the owner when this setter was handed out.
    epoch: u64,
}

impl<T> Setter<T>
where
    T: Clone + Send + 'static,
{
    /// Replace the value.
    ///
    /// Waits for an updater running on another thread to finish.
    pub fn set(&self, value: T) -> Result<(), HookError> {
        let lock = self.slot.update.lock();
        if lock.get() {
            return Err(self.reentrant());
        }
        *self.slot.value.lock() = value;
        drop(lock);

        self.request_render();
        Ok(())
    }

    /// Replace the value with `update(&current)`.
    ///
    /// Writing the same slot from inside `update` fails with
    /// [`HookError::ReentrantUpdate`].
    pub fn update_with<F>(&self, update: F) -> Result<(), HookError>
    where
        F: FnOnce(&T) -> T,
    {
        let lock = self.slot.update.lock();
        if lock.replace(true) {
            return Err(self.reentrant());
        }
        let running = UpdatingGuard(&*lock);

        let current = self.slot.value.lock().clone();
        let next = update(&current);
        *self.slot.value.lock() = next;

        drop(running);
        drop(lock);
        self.request_render();
        Ok(())
    }

    /// Read the slot, including writes not yet seen by a render.
    pub fn current(&self) -> T {
        self.slot.value.lock().clone()
    }

    /// Whether the owning component is alive and still in the mount this
    /// setter came from.
    pub fn is_attached(&self) -> bool {
        self.owner
            .upgrade()
            .map_or(false, |owner| owner.epoch() == self.epoch)
    }

    /// Whether both setters write the same slot.
    pub fn same_slot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    fn request_render(&self) {
        match self.owner.upgrade() {
            Some(owner) => owner.request_render(self.epoch),
            None => tracing::trace!("update after component was dropped ignored"),
        }
    }

    fn reentrant(&self) -> HookError {
        let component = self
            .owner
            .upgrade()
            .map(|owner| owner.name().to_string())
            .unwrap_or_else(|| "<dropped>".to_string());
        HookError::ReentrantUpdate { component }
    }
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            owner: Weak::clone(&self.owner),
            epoch: self.epoch,
        }
    }
}

impl<T> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("slot", &Arc::as_ptr(&self.slot))
            .field("epoch", &self.epoch)
            .field("locked", &self.slot.update.is_locked())
            .finish()
    }
}

/// Declare a piece of component state.
///
/// `init` runs only while the component mounts. Returns the value as of this
/// render and the slot's setter.
pub fn use_state<T, I>(init: I) -> Result<(T, Setter<T>), HookError>
where
    T: Clone + Send + 'static,
    I: FnOnce() -> T,
{
    let (component, index) = RenderContext::next_slot("use_state")?;
    let slot = component.slot(index, "use_state", || StateSlot::new(init()))?;
    let snapshot = slot.value.lock().clone();

    Ok((
        snapshot,
        Setter {
            slot,
            owner: component.downgrade(),
            epoch: component.epoch(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Component;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn state_survives_renders() {
        let component = Component::new("Counter");

        let (value, setter) = component.render(|| use_state(|| 1)).unwrap();
        assert_eq!(value, 1);

        setter.set(5).unwrap();
        assert!(component.needs_render());

        let (value, _) = component.render(|| use_state(|| 1)).unwrap();
        assert_eq!(value, 5);
        assert!(!component.needs_render());
    }

    #[test]
    fn init_runs_on_mount_only() {
        let component = Component::new("Lazy");
        let mut calls = 0;

        for _ in 0..3 {
            component
                .render(|| {
                    use_state(|| {
                        calls += 1;
                        "seed".to_string()
                    })
                })
                .unwrap();
        }

        assert_eq!(calls, 1);
    }

    #[test]
    fn update_with_sees_latest_write() {
        let component = Component::new("Updater");
        let (_, setter) = component.render(|| use_state(|| 10)).unwrap();

        setter.set(20).unwrap();
        setter.update_with(|v| v + 1).unwrap();

        assert_eq!(setter.current(), 21);
    }

    #[test]
    fn reentrant_update_fails_fast() {
        let component = Component::new("Loop");
        let (_, setter) = component.render(|| use_state(|| 0)).unwrap();

        let inner = setter.clone();
        let mut nested = None;
        setter
            .update_with(|v| {
                nested = Some(inner.set(99));
                v + 1
            })
            .unwrap();

        assert_eq!(
            nested,
            Some(Err(HookError::ReentrantUpdate {
                component: "Loop".into()
            }))
        );
        assert_eq!(setter.current(), 1);

        // The flag is cleared once the updater returns.
        setter.set(3).unwrap();
        assert_eq!(setter.current(), 3);
    }

    #[test]
    fn dropped_component_detaches_setter() {
        let component = Component::new("Temp");
        let (_, setter) = component.render(|| use_state(|| 0)).unwrap();
        assert!(setter.is_attached());

        drop(component);

        assert!(!setter.is_attached());
        setter.set(1).unwrap();
        assert_eq!(setter.current(), 1);
    }

    #[test]
    fn unmounted_component_ignores_updates() {
        let component = Component::new("Closed");
        let (_, setter) = component.render(|| use_state(|| 0)).unwrap();

        component.unmount();
        setter.set(1).unwrap();

        assert!(!component.needs_render());
        assert!(!setter.is_attached());
    }

    #[test]
    fn writer_on_other_thread_waits_for_updater() {
        let component = Component::new("Shared");
        let (_, setter) = component.render(|| use_state(|| 0)).unwrap();
        let barrier = Barrier::new(2);

        thread::scope(|scope| {
            let updater = setter.clone();
            let barrier = &barrier;
            scope.spawn(move || {
                updater
                    .update_with(|v| {
                        barrier.wait();
                        thread::sleep(Duration::from_millis(50));
                        v + 1
                    })
                    .unwrap();
            });

            barrier.wait();
            // Not re-entrant: this thread is not running the updater.
            assert_eq!(setter.set(42), Ok(()));
        });

        assert_eq!(setter.current(), 42);
    }

    #[test]
    fn setter_from_previous_mount_does_not_dirty_remount() {
        let component = Component::new("Remount");
        let (_, stale) = component.render(|| use_state(|| 0)).unwrap();

        component.unmount();
        let (value, fresh) = component.render(|| use_state(|| 0)).unwrap();
        assert_eq!(value, 0);

        stale.set(9).unwrap();
        assert!(!stale.is_attached());
        assert!(!component.needs_render());

        fresh.set(1).unwrap();
        assert!(fresh.is_attached());
        assert!(component.needs_render());
    }

    #[test]
    fn use_state_outside_render_fails() {
        let err = use_state(|| 0).unwrap_err();
        assert_eq!(err, HookError::OutsideRender { hook: "use_state" });
    }
}
