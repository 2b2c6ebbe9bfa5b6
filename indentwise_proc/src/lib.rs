//SPDX-License-Identifier: MIT OR Apache-2.0

//! # Indentwise Procedural Macros
//!
//! This crate provides the `#[indented]` attribute for the indentwise crate.
//! The attribute wraps a function body in a depth guard so that every log line
//! emitted while the function runs is indented one level deeper than its caller.
//!
//! ## Expansion
//!
//! ```rust
//! // This function:
//! // #[indentwise::indented]
//! // fn load(path: &str) -> Result<(), Error> { ... }
//!
//! // Expands to approximately:
//! // fn load(path: &str) -> Result<(), Error> {
//! //     let _indentwise_depth_guard = indentwise::hidden::DepthGuard::enter("load");
//! //     { ... }
//! // }
//! ```
//!
//! The guard is released when it goes out of scope, which covers normal return,
//! early `return`, `?` propagation and panic unwinding.  `async fn` is supported;
//! the guard is acquired on first poll and released when the future completes or
//! is dropped.
//!
//! ## Options
//!
//! - `announce`: log `Entering <name>` before the depth is raised and
//!   `Exiting <name>` after it is restored, both at `DEBUG`.
//! - `name = "..."`: use a custom operation name instead of the function name.

use proc_macro::TokenStream;

mod indented_attr;

/// Tracks call depth for the annotated function.
///
/// ```
/// #[indentwise::indented]
/// fn inner() {
///     tracing::info!("one level deeper than the caller");
/// }
///
/// #[indentwise::indented(announce, name = "outer-step")]
/// fn outer() {
///     inner();
/// }
/// # outer();
/// ```
#[proc_macro_attribute]
pub fn indented(attr: TokenStream, item: TokenStream) -> TokenStream {
    indented_attr::indented_attr_impl(attr, item)
}
