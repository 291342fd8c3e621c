// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The reconciling resource builder: a kind-independent handle with
//! idempotent CRUD, bounded waits and bulk operations.

pub mod builder;
pub mod crud;
pub mod kind;
pub mod list;
pub mod poll;
pub mod wait;

pub use builder::Builder;
pub use kind::{Readiness, ReplicaCounts, ResourceKind};
pub use list::{clean_objects, list, system_objects};
pub use poll::poll_until;
