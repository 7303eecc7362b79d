// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Wire types for the Action Dispatch Channel and its loopback HTTP
//! control surface. Framing is JSON messages tagged by `type`; see
//! [`channel`] for the channel envelope and [`http`] for the HTTP DTOs.

mod channel;
mod error;
mod http;

pub use channel::{requires_upstream_confirmation, ClientMessage, ControlKind, ServerMessage};
pub use error::{check_frame_size, ProtocolError};
pub use http::{ActionRequestBody, EmergencyStopResponse, ResumeResponse, StatusResponse};
