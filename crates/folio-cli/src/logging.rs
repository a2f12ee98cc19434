// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// `FOLIO_LOG` when set, otherwise the configured level.
pub fn env_filter(configured: &str) -> Result<EnvFilter> {
    match env::var("FOLIO_LOG") {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(&directive)
            .with_context(|| format!("FOLIO_LOG={directive:?} is not a valid filter")),
        _ => EnvFilter::try_new(configured)
            .with_context(|| format!("log level {configured:?} is not a valid filter")),
    }
}

/// Send tracing output to `path`. The terminal belongs to the UI, so nothing
/// is written to stdout or stderr.
pub fn init(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;

    tracing::info!(log = %path.display(), version = env!("CARGO_PKG_VERSION"), "folio starting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::env_filter;
    use anyhow::Result;

    #[test]
    fn configured_level_is_used_without_env_override() -> Result<()> {
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("FOLIO_LOG");
        }
        let filter = env_filter("folio=debug")?;
        assert!(filter.to_string().contains("folio=debug"));
        Ok(())
    }

    #[test]
    fn invalid_level_is_reported() {
        let error = env_filter("folio=loud").expect_err("invalid directive");
        assert!(error.to_string().contains("not a valid filter"));
    }
}
