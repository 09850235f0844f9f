// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
//! Tracing subscriber setup with a glog-style line format.
//!
//! Lines look like `I20261016 09:14:03.123456 7 rolling.rs:88] message`. Output goes to
//! the file named by `$LISTAGG_LOG_FILE` when it can be opened, otherwise to stderr.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt};

use crate::common::app_config::ListAggConfig;

pub const LOG_FILE_ENV: &str = "LISTAGG_LOG_FILE";

static INIT: OnceLock<()> = OnceLock::new();

struct GlogFormatter;

fn level_char(level: &tracing::Level) -> char {
    match *level {
        tracing::Level::ERROR => 'E',
        tracing::Level::WARN => 'W',
        tracing::Level::INFO => 'I',
        tracing::Level::DEBUG => 'D',
        tracing::Level::TRACE => 'T',
    }
}

/// Numeric part of the current `ThreadId`, 0 if it cannot be parsed.
fn thread_number() -> u64 {
    format!("{:?}", std::thread::current().id())
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

fn short_file(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

impl<S, N> FormatEvent<S, N> for GlogFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        write!(
            writer,
            "{}{} {} {}:{}] ",
            level_char(metadata.level()),
            Local::now().format("%Y%m%d %H:%M:%S%.6f"),
            thread_number(),
            short_file(metadata.file().unwrap_or("unknown")),
            metadata.line().unwrap_or(0)
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn log_file_from_env() -> Option<PathBuf> {
    let value = std::env::var(LOG_FILE_ENV).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| PathBuf::from(value))
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent()
        && let Err(err) = fs::create_dir_all(parent)
    {
        eprintln!(
            "cannot create log directory {}: {err}, logging to stderr",
            parent.display()
        );
        return None;
    }
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!(
                "cannot open log file {}: {err}, logging to stderr",
                path.display()
            );
            None
        }
    }
}

/// Installs the global subscriber once; later calls are no-ops. `filter` is an
/// `EnvFilter` directive such as `info` or `novarocks_listagg=debug`.
pub fn init_with_level(filter: &str) {
    INIT.get_or_init(|| {
        let builder = tracing_fmt().with_env_filter(EnvFilter::new(filter));
        match log_file_from_env().as_deref().and_then(open_log_file) {
            Some(file) => {
                let _ = builder
                    .with_ansi(false)
                    .event_format(GlogFormatter)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
            None => {
                let _ = builder
                    .with_ansi(atty::is(atty::Stream::Stderr))
                    .event_format(GlogFormatter)
                    .with_writer(std::io::stderr)
                    .try_init();
            }
        }
    });
}

pub fn init_from_config(config: &ListAggConfig) {
    init_with_level(config.effective_log_filter());
}

pub fn init() {
    init_with_level("info");
}

pub use tracing::instrument;
pub use tracing::{debug, error, info, trace, warn};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_chars_follow_glog() {
        assert_eq!(level_char(&tracing::Level::ERROR), 'E');
        assert_eq!(level_char(&tracing::Level::WARN), 'W');
        assert_eq!(level_char(&tracing::Level::TRACE), 'T');
    }

    #[test]
    fn file_names_are_shortened() {
        assert_eq!(short_file("src/exec/window/rolling.rs"), "rolling.rs");
        assert_eq!(short_file("lib.rs"), "lib.rs");
    }

    #[test]
    fn log_file_is_created_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("listagg.log");
        assert!(open_log_file(&path).is_some());
        assert!(path.exists());
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_with_level("warn");
        init_with_level("debug");
        debug!("logging initialised twice");
    }
}
