//! Render Context
//!
//! The render context tracks which component is currently rendering and how
//! many hooks it has called so far. Hooks use it to find their slot: the
//! n-th hook call of a render always maps to the n-th slot of the component.
//!
//! # Implementation
//!
//! We use a thread-local stack of frames. Rendering a component pushes a
//! frame; the guard returned by [`RenderContext::enter`] pops it on drop.
//! Rendering a child inside a parent's render pushes a second frame, so the
//! child's hooks land in the child's slots and the parent resumes with its
//! own cursor afterwards.

use std::cell::RefCell;

use super::component::{Component, ComponentId};
use crate::error::HookError;

thread_local! {
    static RENDER_STACK: RefCell<Vec<Frame>> = RefCell::new(Vec::new());
}

/// An entry in the render stack.
struct Frame {
    component: Component,
    /// Number of hooks called so far in this render.
    cursor: usize,
}

/// Guard that pops the render frame when dropped.
///
/// This keeps the stack balanced even if the render function panics.
pub struct RenderContext {
    component_id: ComponentId,
}

impl RenderContext {
    /// Enter a render frame for the given component.
    pub fn enter(component: Component) -> Self {
        let component_id = component.id();
        RENDER_STACK.with(|stack| {
            stack.borrow_mut().push(Frame {
                component,
                cursor: 0,
            });
        });

        Self { component_id }
    }

    /// Check if any component is rendering on this thread.
    pub fn is_active() -> bool {
        RENDER_STACK.with(|stack| !stack.borrow().is_empty())
    }

    /// Number of nested render frames on this thread.
    pub fn depth() -> usize {
        RENDER_STACK.with(|stack| stack.borrow().len())
    }

    /// The component of the innermost render frame, if any.
    pub fn current_component() -> Option<Component> {
        RENDER_STACK.with(|stack| stack.borrow().last().map(|frame| frame.component.clone()))
    }

    /// Claim the next hook slot of the innermost frame.
    pub(crate) fn next_slot(hook: &'static str) -> Result<(Component, usize), HookError> {
        RENDER_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            let frame = stack.last_mut().ok_or(HookError::OutsideRender { hook })?;
            let index = frame.cursor;
            frame.cursor += 1;
            Ok((frame.component.clone(), index))
        })
    }

    /// Hooks called so far in the innermost frame.
    pub fn hooks_used(&self) -> usize {
        RENDER_STACK.with(|stack| stack.borrow().last().map_or(0, |frame| frame.cursor))
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        let popped = RENDER_STACK.with(|stack| stack.borrow_mut().pop());

        if let Some(frame) = popped {
            debug_assert_eq!(
                frame.component.id(),
                self.component_id,
                "RenderContext mismatch: expected {:?}, got {:?}",
                self.component_id,
                frame.component.id()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_tracks_component() {
        let component = Component::new("Root");

        assert!(!RenderContext::is_active());
        assert!(RenderContext::current_component().is_none());

        {
            let _ctx = RenderContext::enter(component.clone());
            assert!(RenderContext::is_active());
            assert_eq!(
                RenderContext::current_component().map(|c| c.id()),
                Some(component.id())
            );
        }

        assert!(!RenderContext::is_active());
    }

    #[test]
    fn slots_are_claimed_in_order() {
        let ctx = RenderContext::enter(Component::new("Counter"));

        let (_, first) = RenderContext::next_slot("use_state").unwrap();
        let (_, second) = RenderContext::next_slot("use_memo").unwrap();

        assert_eq!((first, second), (0, 1));
        assert_eq!(ctx.hooks_used(), 2);
    }

    #[test]
    fn nested_frames_keep_separate_cursors() {
        let parent = Component::new("Parent");
        let child = Component::new("Child");

        let outer = RenderContext::enter(parent.clone());
        RenderContext::next_slot("use_state").unwrap();

        {
            let inner = RenderContext::enter(child.clone());
            let (component, index) = RenderContext::next_slot("use_state").unwrap();
            assert_eq!(component.id(), child.id());
            assert_eq!(index, 0);
            assert_eq!(RenderContext::depth(), 2);
            assert_eq!(inner.hooks_used(), 1);
        }

        let (component, index) = RenderContext::next_slot("use_state").unwrap();
        assert_eq!(component.id(), parent.id());
        assert_eq!(index, 1);
        assert_eq!(outer.hooks_used(), 2);
    }

    #[test]
    fn claiming_outside_render_fails() {
        let err = RenderContext::next_slot("use_memo").unwrap_err();
        assert_eq!(err, HookError::OutsideRender { hook: "use_memo" });
    }
}
