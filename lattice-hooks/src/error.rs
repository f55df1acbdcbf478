//! Error Types
//!
//! Hooks are only valid while a component is rendering, and only when every
//! render calls the same hooks in the same order. Violations of those rules
//! are reported as [`HookError`] rather than being silently tolerated.
//!
//! [`Rejection`] is not a hook failure: it records a future that resolved to
//! an error so the component can render it.

use thiserror::Error;

/// Errors raised by the host runtime when hook rules are broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// A hook was called while no component was rendering on this thread.
    #[error("`{hook}` called outside of a component render")]
    OutsideRender {
        /// Name of the offending hook.
        hook: &'static str,
    },

    /// The slot at this position holds state of a different hook or type.
    ///
    /// Almost always caused by calling hooks conditionally.
    #[error("hook slot {index} of component `{component}` does not match `{hook}`")]
    SlotTypeMismatch {
        component: String,
        index: usize,
        hook: &'static str,
    },

    /// A render called a different number of hooks than the mounting render.
    #[error("component `{component}` rendered {found} hooks, expected {expected}")]
    HookCountChanged {
        component: String,
        expected: usize,
        found: usize,
    },

    /// A setter was invoked from inside an updater running on the same slot.
    #[error("re-entrant update on a state slot of component `{component}`")]
    ReentrantUpdate { component: String },

    /// The component kept requesting re-renders.
    #[error("component `{component}` exceeded {limit} consecutive re-renders")]
    RenderLimitExceeded { component: String, limit: usize },

    /// A future adapter was used without a tokio runtime.
    #[error("`{hook}` requires a tokio runtime")]
    NoRuntime { hook: &'static str },
}

/// A future that resolved to an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("future of generation {generation} rejected: {message}")]
pub struct Rejection {
    /// Generation of the launch that produced this error.
    pub generation: u64,
    /// Display form of the error.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_component() {
        let err = HookError::HookCountChanged {
            component: "Form".into(),
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "component `Form` rendered 2 hooks, expected 3");

        let err = HookError::OutsideRender { hook: "use_state" };
        assert!(err.to_string().contains("use_state"));
    }

    #[test]
    fn rejection_display() {
        let rejection = Rejection {
            generation: 4,
            message: "timeout".into(),
        };
        assert_eq!(rejection.to_string(), "future of generation 4 rejected: timeout");
    }
}
