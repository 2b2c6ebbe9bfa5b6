// SPDX-License-Identifier: MIT OR Apache-2.0

//! Carrying indentation across executor polls.

use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

use super::context_impl::IndentContext;

/// A [`Future`] wrapper that gives the wrapped future its own [`IndentContext`].
///
/// Executors that use thread pools may poll a task on a different thread each
/// time, and several tasks share each thread.  Without help, a `#[indented]`
/// `async fn` would raise the depth of whatever thread polled it first and lower
/// the depth of whatever thread polled it last.
///
/// `ApplyIndent` installs the task's context before each poll and saves it
/// again afterwards, restoring the thread's own context, so depth changes made
/// by the task stay with the task.
///
/// # Examples
///
/// ```rust
/// use indentwise::{ApplyIndent, IndentContext};
///
/// #[indentwise::indented]
/// async fn step() -> usize {
///     IndentContext::current_depth()
/// }
///
/// # test_executors::spin_on(async {
/// let fut = ApplyIndent::new(IndentContext::with_depth(2), step());
/// assert_eq!(fut.await, 3);
/// # });
/// ```
pub struct ApplyIndent<F> {
    context: IndentContext,
    future: F,
}

impl<F> ApplyIndent<F> {
    /// Wraps `future` so that it runs in `context`.
    pub fn new(context: IndentContext, future: F) -> Self {
        Self { context, future }
    }

    /// Wraps `future` in a snapshot of the current thread's context.
    ///
    /// Use this when handing work to another task that should continue at the
    /// spawning code's depth.
    pub fn inherit(future: F) -> Self {
        Self::new(IndentContext::current(), future)
    }
}

/// Puts the thread's own context back even if the inner poll panics.
struct Restore<'a> {
    slot: &'a mut IndentContext,
    prior: Option<IndentContext>,
}

impl Drop for Restore<'_> {
    fn drop(&mut self) {
        if let Some(prior) = self.prior.take() {
            *self.slot = prior.set_current();
        }
    }
}

impl<F> Future for ApplyIndent<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        // SAFETY: `future` is structurally pinned and never moved; `context` is
        // not pinned and may be replaced freely.
        let (slot, fut) = unsafe {
            let d = self.get_unchecked_mut();
            (&mut d.context, Pin::new_unchecked(&mut d.future))
        };
        let ours = std::mem::take(slot);
        let prior = ours.set_current();
        let _restore = Restore {
            slot,
            prior: Some(prior),
        };
        fut.poll(cx)
    }
}

impl<F> std::fmt::Debug for ApplyIndent<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplyIndent")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
