// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The Action Dispatch Channel: [`server`] is the Gateway's half (axum
//! WebSocket route + correlation table), [`client`] is the Local Agent's
//! half (reconnecting WebSocket client with exponential backoff).

pub mod client;
pub mod server;

pub use client::{ChannelClient, ClientEvent};
pub use server::ChannelServer;
