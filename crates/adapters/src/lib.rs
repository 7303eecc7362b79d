// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! crew-adapters: side-effecting integrations for the Gateway and the
//! Local Execution Agent.
//!
//! Everything that touches the outside world — subprocess spawning, the
//! WebSocket channel, the SSH fallback transport, the audit log, the
//! operator confirm prompt, and the chat front-end contract — lives here.
//! `crew-engine` holds the orchestration logic and calls through these
//! adapters via trait objects or free functions; nothing in this crate
//! knows about projects, plans, or tasks.

pub mod actions;
pub mod audit;
pub mod channel;
pub mod chat;
pub mod confirm;
pub mod fallback;
pub mod path_jail;
pub mod process;

pub use audit::{AuditError, AuditLog, AuditRecord};
pub use channel::{ChannelClient, ChannelServer, ClientEvent};
pub use chat::{ChatAdapter, ChatAdapterError, LoggingChatAdapter};
pub use confirm::{OperatorConfirm, TerminalConfirm, CONFIRM_TIMEOUT};
pub use fallback::{FallbackExecutor, SshFallbackExecutor, SshTarget};
pub use path_jail::{resolve_within_jail, PathJailError};
