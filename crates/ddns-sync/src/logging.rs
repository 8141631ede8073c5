//! Log sink construction
//!
//! Builds a [`Dispatch`] that the run is scoped to. Nothing is installed as
//! the global default.

use anyhow::{Context, Result};
use ddns_core::config::LoggingConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::field::RecordFields;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::{self, FormatFields};
use tracing_subscriber::prelude::*;

/// Field formatter for the log file
///
/// Span fields are formatted once per formatter type and cached on the span.
/// A type distinct from the stdout layer's `DefaultFields` keeps the file's
/// copy free of the colour codes the stdout layer renders.
struct FileFields(DefaultFields);

impl<'writer> FormatFields<'writer> for FileFields {
    fn format_fields<R: RecordFields>(&self, writer: Writer<'writer>, fields: R) -> std::fmt::Result {
        self.0.format_fields(writer, fields)
    }
}

/// Build the dispatcher for a run
///
/// Lines always go to stdout. When a logger name is configured the same
/// lines, without ANSI colour, are appended to `<log_dir>/<name>.log`.
pub fn build_dispatch(config: &LoggingConfig) -> Result<Dispatch> {
    let level = config
        .level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    let file_layer = match config.log_file_path() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            Some(
                fmt::layer()
                    .fmt_fields(FileFields(DefaultFields::new()))
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(level)
        .with(fmt::layer().with_target(false))
        .with(file_layer);

    Ok(Dispatch::new(subscriber))
}
