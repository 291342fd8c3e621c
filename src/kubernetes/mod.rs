// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Remote access to the cluster: the client traits builders talk through and
//! their implementations over `kube::Client`.

pub mod client;
pub mod dynamic;

pub use client::ResourceClient;
pub use dynamic::DynamicClient;
