//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# indentwise

indentwise indents `tracing` output by call depth and component hierarchy.

# The problem

A trace of a program that calls into several layers of its own code reads as a flat wall of lines.
Which line happened *inside* which call is exactly the information that gets lost.

indentwise puts that information back into the whitespace:

```text
2024-05-01 09:12:00 - DEBUG    - Entering load
2024-05-01 09:12:00 - INFO     -     reading settings.toml                     {load}
2024-05-01 09:12:00 - DEBUG    -     Entering parse
2024-05-01 09:12:00 - INFO     -         3 sections                            {parse}
2024-05-01 09:12:00 - DEBUG    -     Exiting parse
2024-05-01 09:12:00 - DEBUG    - Exiting load
```

# Where depth comes from

Each line's depth is resolved in this order:

1. **An explicit override.**  An event with an `indent` field is rendered at exactly that depth:
   `tracing::info!(indent = 2, "step")`.  Nothing else is consulted.
2. **Otherwise the sum of**
   * the **tracked call depth** of the current thread, raised by [`DepthGuard`], [`track`] and
     the [`indented`] attribute for the duration of a call, and
   * the **hierarchy depth** of the event's target (`app::store::cache`), when a
     [`HierarchyMode`] is configured.

Depth never goes below zero.  Call depth is stored per thread ([`IndentContext`]), so threads
never see each other's indentation; [`ApplyIndent`] carries it across the polls of an async task.

# The API

```rust
use indentwise::{IndentConfig, InMemoryWriter};
use tracing_subscriber::layer::SubscriberExt;

#[indentwise::indented]
fn inner() {
    tracing::info!("inner body");
}

#[indentwise::indented]
fn outer() {
    tracing::info!("outer body");
    inner();
}

let writer = InMemoryWriter::new();
let config = IndentConfig::new().with_date_format("");
let subscriber = tracing_subscriber::registry()
    .with(indentwise::layer(&config, writer.clone()).unwrap());
tracing::subscriber::with_default(subscriber, || {
    outer();
    tracing::info!("done");
});

assert_eq!(writer.drain_lines(), vec![
    "INFO     -     outer body",
    "INFO     -         inner body",
    "INFO     - done",
]);
```

Applications usually call [`setup`] once at startup instead of composing a subscriber by hand.

Nested data is logged with [`dump!`], one line per entry, each at its own depth.

# Configuration

[`IndentConfig`] controls spaces per level, the name block (`{component:operation}` at a
minimum column), message truncation, the timestamp format, the hierarchy mode, and an
optional log file.  It can be built in code or loaded from TOML.  Invalid configuration is
reported by [`setup`] before anything is installed; rendering a line never fails.
*/

mod config;
pub mod context;
pub mod dump;
mod error;
mod formatter;
mod guard;
mod hierarchy;
mod inmemory_writer;
mod log_record;
pub mod render;
mod setup;
mod template;

pub use config::IndentConfig;
pub use context::{ApplyIndent, IndentContext};
pub use dump::{DumpLine, Dumper, Value, dump};
pub use error::{ConfigError, SetupError};
pub use formatter::IndentFormatter;
pub use guard::{DepthGuard, track};
pub use hierarchy::{HierarchyMode, HierarchyPath};
pub use inmemory_writer::{InMemoryHandle, InMemoryWriter};
pub use log_record::{INDENT_FIELD, IndentRecord};
pub use render::Renderer;
pub use setup::{IndentLayer, layer, setup};
pub use template::NameTemplate;

pub use indentwise_proc::indented;

#[doc(hidden)]
pub mod hidden {
    pub use crate::guard::DepthGuard;
    pub use tracing;
}
extern crate self as indentwise;
