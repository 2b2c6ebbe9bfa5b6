// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core IndentContext implementation.

use std::borrow::Cow;
use std::cell::RefCell;

/// The indentation state of one execution context.
///
/// The live context for the current thread is reached through the associated
/// functions ([`current_depth`](IndentContext::current_depth),
/// [`increment`](IndentContext::increment), ...).  Values of this type are
/// snapshots: they can be inspected, moved to another thread, or installed with
/// [`set_current`](IndentContext::set_current).
///
/// # Examples
///
/// ```rust
/// use indentwise::IndentContext;
///
/// let ctx = IndentContext::with_depth(3);
/// let previous = ctx.set_current();
/// assert_eq!(IndentContext::current_depth(), 3);
/// previous.set_current();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IndentContext {
    depth: usize,
    operations: Vec<Cow<'static, str>>,
}

thread_local! {
    static CONTEXT: RefCell<IndentContext> = const { RefCell::new(IndentContext::new()) };
}

impl IndentContext {
    /// A context at depth 0 with no tracked operations.
    pub const fn new() -> Self {
        Self {
            depth: 0,
            operations: Vec::new(),
        }
    }

    /// A context starting at `depth`, with no tracked operations.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            operations: Vec::new(),
        }
    }

    /// The depth recorded in this snapshot.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The innermost tracked operation recorded in this snapshot.
    pub fn operation(&self) -> Option<&str> {
        self.operations.last().map(|op| op.as_ref())
    }

    /// Returns a snapshot of the current thread's context.
    pub fn current() -> IndentContext {
        CONTEXT
            .try_with(|c| c.borrow().clone())
            .unwrap_or_default()
    }

    /// Returns the current thread's depth.
    ///
    /// During thread teardown, after the context has been destroyed, this is 0.
    #[inline]
    pub fn current_depth() -> usize {
        CONTEXT.try_with(|c| c.borrow().depth).unwrap_or(0)
    }

    /// Returns the name of the innermost operation tracked on this thread.
    pub fn current_operation() -> Option<Cow<'static, str>> {
        CONTEXT
            .try_with(|c| c.borrow().operations.last().cloned())
            .ok()
            .flatten()
    }

    /// Raises the current thread's depth by one and returns the new depth.
    pub fn increment() -> usize {
        CONTEXT
            .try_with(|c| {
                let mut c = c.borrow_mut();
                c.depth += 1;
                c.depth
            })
            .unwrap_or(0)
    }

    /// Lowers the current thread's depth by one and returns the new depth.
    ///
    /// The depth never goes below 0.  A decrement at 0 is a bookkeeping bug in the
    /// caller; it is ignored and reported at `TRACE`.
    pub fn decrement() -> usize {
        let (depth, underflow) = CONTEXT
            .try_with(|c| {
                let mut c = c.borrow_mut();
                match c.depth.checked_sub(1) {
                    Some(depth) => {
                        c.depth = depth;
                        (depth, false)
                    }
                    None => (0, true),
                }
            })
            .unwrap_or((0, false));
        // the borrow is released before logging; the formatter reads this context
        if underflow {
            tracing::trace!(
                target: "indentwise::context",
                "indent decrement at depth 0 ignored"
            );
        }
        depth
    }

    /// Installs this context as the current thread's context and returns the
    /// one it replaced.
    pub fn set_current(self) -> IndentContext {
        CONTEXT
            .try_with(|c| c.replace(self))
            .unwrap_or_default()
    }

    /// Resets the current thread to depth 0 with no tracked operations.
    pub fn reset() {
        IndentContext::new().set_current();
    }

    /// Pushes an operation name and returns the stack height before the push.
    pub(crate) fn push_operation(operation: Cow<'static, str>) -> usize {
        CONTEXT
            .try_with(|c| {
                let mut c = c.borrow_mut();
                let mark = c.operations.len();
                c.operations.push(operation);
                mark
            })
            .unwrap_or(0)
    }

    /// Drops every operation pushed since `mark`.
    pub(crate) fn pop_operations(mark: usize) {
        let _ = CONTEXT.try_with(|c| c.borrow_mut().operations.truncate(mark));
    }
}

/*
Boilerplate notes.

Clone: a snapshot is a plain value, cloning it never touches thread-local state.
Default: same as new(), depth 0.
PartialEq/Eq/Hash: data equality, two threads at the same depth with the same operations compare equal.
Ord makes no sense.
Display is left out; the depth alone is not a meaningful rendering.
Send/Sync: automatic, the live state is in the thread-local, not here.
*/
