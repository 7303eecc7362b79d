//! Workspace-level behavioral specs.
//!
//! These drive the real `gateway` and `agent` binaries as child
//! processes over HTTP/WebSocket, the way an operator or an Agent host
//! actually would — no library-level shortcuts into `crew_engine` or
//! `crew_adapters` internals.

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/gateway_status.rs"]
mod gateway_status;

#[path = "specs/action_dispatch.rs"]
mod action_dispatch;

#[path = "specs/project_lifecycle.rs"]
mod project_lifecycle;
