// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

/// Interval between two readiness or deletion checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Environment variables read by [`Config::from_env`](crate::config::Config::from_env)
pub mod env {
    pub const POLL_INTERVAL_MS: &str = "CONVERGENT_POLL_INTERVAL_MS";
    pub const LOG: &str = "CONVERGENT_LOG";
}

/// Objects the platform provisions in every namespace on its own
pub mod system_objects {
    /// Resource name of config maps
    pub const CONFIG_MAPS: &str = "configmaps";
    /// Default config maps left in place by bulk cleanup
    pub const CONFIG_MAP_NAMES: [&str; 2] = ["kube-root-ca.crt", "openshift-service-ca.crt"];
}
