// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! crew-storage: the single durable store behind the Gateway.
//!
//! A plain relational schema over rusqlite, one table per entity in
//! `crew-core`. There is no write-ahead log or replay step — every
//! mutation is a direct `UPDATE`/`INSERT` against the sqlite file, and
//! durability comes from sqlite's own WAL, not ours.

mod agents;
mod artifacts;
mod conversations;
mod error;
mod events;
mod ideas;
mod idempotency;
mod migrations;
mod plans;
mod projects;
mod provider_usage;
mod store;
mod tasks;
mod users;

pub use error::{StorageError, StorageResult};
pub use store::Store;
