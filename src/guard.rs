// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-depth tracking.
//!
//! A [`DepthGuard`] raises the current thread's depth when it is created and
//! lowers it by exactly one when it is dropped.  Because the release is a
//! `Drop`, it also runs on early return, `?` propagation and panic unwinding,
//! so a failing call cannot leave the thread indented.
//!
//! Most code uses the [`indented`](crate::indented) attribute, which creates
//! the guard for a whole function body.  [`track`] does the same for a closure.

use std::borrow::Cow;

use crate::context::IndentContext;

/// Holds one level of call depth for as long as it lives.
///
/// While the guard is alive the operation name it was created with is the
/// "current operation" reported in the name block.
///
/// ```rust
/// use indentwise::{DepthGuard, IndentContext};
///
/// let before = IndentContext::current_depth();
/// {
///     let _guard = DepthGuard::enter("load_config");
///     assert_eq!(IndentContext::current_depth(), before + 1);
///     assert_eq!(IndentContext::current_operation().as_deref(), Some("load_config"));
/// }
/// assert_eq!(IndentContext::current_depth(), before);
/// ```
///
/// A guard belongs to the thread that created it.  Async code that may be
/// polled from several threads should run inside [`ApplyIndent`](crate::ApplyIndent).
#[must_use = "the depth is released as soon as the guard is dropped"]
pub struct DepthGuard<F: FnOnce() = fn()> {
    mark: usize,
    on_exit: Option<F>,
}

impl DepthGuard {
    /// Enters `operation`, one level deeper than the current depth.
    pub fn enter(operation: impl Into<Cow<'static, str>>) -> Self {
        Self::acquire(operation.into(), None)
    }
}

impl<F: FnOnce()> DepthGuard<F> {
    /// Enters `operation` and runs `on_exit` after the depth has been restored.
    ///
    /// `on_exit` therefore logs at the caller's level, matching an entry line
    /// logged just before the guard was created.
    pub fn with_exit(operation: impl Into<Cow<'static, str>>, on_exit: F) -> Self {
        Self::acquire(operation.into(), Some(on_exit))
    }

    fn acquire(operation: Cow<'static, str>, on_exit: Option<F>) -> Self {
        let mark = IndentContext::push_operation(operation);
        IndentContext::increment();
        Self { mark, on_exit }
    }
}

impl<F: FnOnce()> Drop for DepthGuard<F> {
    fn drop(&mut self) {
        IndentContext::decrement();
        IndentContext::pop_operations(self.mark);
        if let Some(on_exit) = self.on_exit.take() {
            on_exit();
        }
    }
}

impl<F: FnOnce()> std::fmt::Debug for DepthGuard<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepthGuard")
            .field("mark", &self.mark)
            .field("announces_exit", &self.on_exit.is_some())
            .finish()
    }
}

/// Runs `f` one level deeper, as the operation `operation`.
///
/// ```rust
/// use indentwise::{track, IndentContext};
///
/// let depth = track("parse", || IndentContext::current_depth());
/// assert_eq!(depth, IndentContext::current_depth() + 1);
/// ```
pub fn track<R>(operation: impl Into<Cow<'static, str>>, f: impl FnOnce() -> R) -> R {
    let _guard = DepthGuard::enter(operation);
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn guard_restores_depth_on_return() {
        IndentContext::reset();
        {
            let _outer = DepthGuard::enter("outer");
            {
                let _inner = DepthGuard::enter("inner");
                assert_eq!(IndentContext::current_depth(), 2);
                assert_eq!(IndentContext::current_operation().as_deref(), Some("inner"));
            }
            assert_eq!(IndentContext::current_depth(), 1);
            assert_eq!(IndentContext::current_operation().as_deref(), Some("outer"));
        }
        assert_eq!(IndentContext::current_depth(), 0);
        assert_eq!(IndentContext::current_operation(), None);
    }

    #[test]
    fn guard_restores_depth_on_error() {
        IndentContext::reset();
        fn fails(n: u32) -> Result<u32, String> {
            let _guard = DepthGuard::enter("fails");
            if n > 0 {
                return Err(format!("bad input {n}"));
            }
            Ok(n)
        }
        assert!(fails(3).is_err());
        assert_eq!(IndentContext::current_depth(), 0);
        assert_eq!(IndentContext::current_operation(), None);
    }

    #[test]
    fn guard_restores_depth_on_panic() {
        IndentContext::reset();
        let result = std::panic::catch_unwind(|| {
            let _guard = DepthGuard::enter("panics");
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(IndentContext::current_depth(), 0);
    }

    #[test]
    fn recursion_nests_and_unwinds() {
        IndentContext::reset();
        fn recurse(n: usize, seen: &mut Vec<usize>) {
            let _guard = DepthGuard::enter("recurse");
            seen.push(IndentContext::current_depth());
            if n > 0 {
                recurse(n - 1, seen);
            }
        }
        let mut seen = Vec::new();
        recurse(4, &mut seen);
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(IndentContext::current_depth(), 0);
    }

    #[test]
    fn exit_callback_runs_at_caller_depth() {
        IndentContext::reset();
        let observed = Rc::new(Cell::new(usize::MAX));
        {
            let observed = observed.clone();
            let _guard = DepthGuard::with_exit("announced", move || {
                observed.set(IndentContext::current_depth());
            });
            assert_eq!(IndentContext::current_depth(), 1);
        }
        assert_eq!(observed.get(), 0);
    }

    #[test]
    fn track_returns_closure_value() {
        IndentContext::reset();
        let (depth, op) = track("closure", || {
            (
                IndentContext::current_depth(),
                IndentContext::current_operation(),
            )
        });
        assert_eq!(depth, 1);
        assert_eq!(op.as_deref(), Some("closure"));
        assert_eq!(IndentContext::current_depth(), 0);
    }

    #[test]
    fn dynamic_operation_names() {
        IndentContext::reset();
        let name = format!("job-{}", 7);
        let _guard = DepthGuard::enter(name);
        assert_eq!(IndentContext::current_operation().as_deref(), Some("job-7"));
    }
}
