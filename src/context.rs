// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-thread indentation state.
//!
//! Every thread owns exactly one [`IndentContext`]: a depth counter and the stack
//! of operations currently being tracked by [`DepthGuard`](crate::DepthGuard)s.
//! Contexts are created lazily at depth 0 the first time a thread logs, and no
//! thread can observe or modify another thread's context.
//!
//! # Manual control
//!
//! ```rust
//! use indentwise::IndentContext;
//!
//! assert_eq!(IndentContext::current_depth(), 0);
//! IndentContext::increment();
//! assert_eq!(IndentContext::current_depth(), 1);
//! IndentContext::decrement();
//! // decrementing below zero is clamped
//! IndentContext::decrement();
//! assert_eq!(IndentContext::current_depth(), 0);
//! ```
//!
//! # Threads
//!
//! A spawned thread starts at depth 0.  To continue at the parent's level, carry
//! a snapshot over:
//!
//! ```rust
//! use indentwise::IndentContext;
//!
//! IndentContext::increment();
//! let snapshot = IndentContext::current();
//! std::thread::spawn(move || {
//!     snapshot.set_current();
//!     assert_eq!(IndentContext::current_depth(), 1);
//! })
//! .join()
//! .unwrap();
//! # IndentContext::decrement();
//! ```
//!
//! # Async tasks
//!
//! Executors may poll a task on any thread.  [`ApplyIndent`] gives a future its
//! own context, swapped in for each poll and saved again afterwards, so the
//! task's depth travels with the task instead of the thread.

mod apply_indent;
mod context_impl;


pub use apply_indent::ApplyIndent;
pub use context_impl::IndentContext;
