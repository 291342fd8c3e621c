// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tracing setup for test suites.

use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber writing through the test harness.
///
/// Safe to call from every test: an already installed subscriber is kept.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
