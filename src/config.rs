// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{env as vars, DEFAULT_POLL_INTERVAL};
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Test suite configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Interval between two checks while waiting on the cluster
    pub poll_interval: Duration,
    /// Filter directive for the tracing subscriber
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            poll_interval: DEFAULT_POLL_INTERVAL,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let poll_interval = match lookup(vars::POLL_INTERVAL_MS) {
            Some(raw) => {
                let millis: u64 = raw.trim().parse().with_context(|| {
                    format!(
                        "{} must be a number of milliseconds, got '{}'",
                        vars::POLL_INTERVAL_MS,
                        raw
                    )
                })?;
                anyhow::ensure!(
                    millis > 0,
                    "{} must be greater than zero",
                    vars::POLL_INTERVAL_MS
                );
                Duration::from_millis(millis)
            }
            None => defaults.poll_interval,
        };
        let log_filter = lookup(vars::LOG).unwrap_or(defaults.log_filter);

        Ok(Config {
            poll_interval,
            log_filter,
        })
    }
}
