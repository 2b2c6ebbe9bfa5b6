// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `tracing_subscriber` plug-in.
//!
//! [`IndentFormatter`] implements [`FormatEvent`], so it can be handed to any
//! `fmt` layer:
//!
//! ```rust
//! use indentwise::{IndentConfig, IndentFormatter};
//!
//! let formatter = IndentFormatter::new(IndentConfig::new().with_operation_name(true)).unwrap();
//! let _layer = tracing_subscriber::fmt::layer::<tracing_subscriber::Registry>()
//!     .event_format(formatter)
//!     .with_writer(std::io::stderr);
//! ```
//!
//! The formatter reads the calling thread's [`IndentContext`], so it must run on
//! the thread that emitted the event.  Every `fmt` layer does.

use std::fmt;
use std::sync::Arc;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{ChronoLocal, FormatTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::config::IndentConfig;
use crate::context::IndentContext;
use crate::error::ConfigError;
use crate::log_record::IndentRecord;
use crate::render::Renderer;

/// Formats `tracing` events as indented lines.
#[derive(Debug, Clone)]
pub struct IndentFormatter<T = ChronoLocal> {
    renderer: Arc<Renderer>,
    timer: T,
}

impl IndentFormatter {
    /// A formatter with a local-time timestamp in `config.date_format`.
    pub fn new(config: IndentConfig) -> Result<Self, ConfigError> {
        let timer = ChronoLocal::new(config.date_format.clone());
        Ok(Self {
            renderer: Arc::new(Renderer::new(config)?),
            timer,
        })
    }
}

impl<T> IndentFormatter<T> {
    /// Replaces the timestamp source.
    pub fn with_timer<T2: FormatTime>(self, timer: T2) -> IndentFormatter<T2> {
        IndentFormatter {
            renderer: self.renderer,
            timer,
        }
    }

    /// Drops the timestamp entirely.
    pub fn without_time(self) -> IndentFormatter<()> {
        self.with_timer(())
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

impl<T: FormatTime> IndentFormatter<T> {
    fn timestamp(&self) -> String {
        let mut timestamp = String::new();
        if self.timer.format_time(&mut Writer::new(&mut timestamp)).is_err() {
            // a broken clock costs the timestamp, not the line
            timestamp.clear();
        }
        timestamp
    }
}

impl<S, N, T> FormatEvent<S, N> for IndentFormatter<T>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    T: FormatTime,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut record = IndentRecord::from_event(event);
        let operation = IndentContext::current_operation()
            .map(|operation| operation.into_owned())
            .or_else(|| ctx.lookup_current().map(|span| span.name().to_string()));
        record.set_operation(operation);

        let timestamp = self.timestamp();
        let line = self
            .renderer
            .render(&record, IndentContext::current_depth(), Some(&timestamp));
        writeln!(writer, "{line}")
    }
}
