// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Risk tiers for agent actions.

use serde::{Deserialize, Serialize};

/// Policy classification of an action, assigned by the security kernel's
/// action registry and enforced by the validator before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    /// Execute immediately, no confirmation required.
    Auto,
    /// Prompt the operator (or require upstream plan approval) before executing.
    Confirm,
    /// Never execute — reject instantly and audit the attempt.
    Blocked,
}

crate::simple_display! {
    Tier {
        Auto => "AUTO",
        Confirm => "CONFIRM",
        Blocked => "BLOCKED",
    }
}

impl Tier {
    /// True for actions that may run without an explicit `confirmed: true`.
    pub fn is_auto(&self) -> bool {
        matches!(self, Tier::Auto)
    }
}
