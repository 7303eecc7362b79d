// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! The action registry: the fixed table of every action name the Agent
//! will dispatch, its [`Tier`], and which parameters are filesystem paths
//! subject to the path jail.
//!
//! Names never appearing here are `unknown_action`; names appearing with
//! [`Tier::Blocked`] are refused without ever reaching a handler.

use crew_core::Tier;
use std::collections::HashMap;

/// A single registered action: its risk tier and the names of its
/// parameters that must resolve inside an allowed root.
#[derive(Debug, Clone)]
pub struct ActionSpec {
    pub tier: Tier,
    pub path_params: &'static [&'static str],
}

impl ActionSpec {
    const fn new(tier: Tier, path_params: &'static [&'static str]) -> Self {
        Self { tier, path_params }
    }
}

/// Static table of every action the kernel knows about. `lookup` is the
/// only way the validator learns an action's tier — there is no implicit
/// default.
pub struct ActionRegistry {
    actions: HashMap<&'static str, ActionSpec>,
}

impl ActionRegistry {
    pub fn lookup(&self, action_name: &str) -> Option<&ActionSpec> {
        self.actions.get(action_name)
    }

    pub fn action_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        let mut actions = HashMap::new();

        // AUTO — runs without operator confirmation.
        actions.insert("git_status", ActionSpec::new(Tier::Auto, &[]));
        actions.insert("run_tests", ActionSpec::new(Tier::Auto, &[]));
        actions.insert("lint_project", ActionSpec::new(Tier::Auto, &[]));
        actions.insert("start_dev_server", ActionSpec::new(Tier::Auto, &[]));
        actions.insert("build_project", ActionSpec::new(Tier::Auto, &[]));

        // CONFIRM — requires `confirmed: true` or an upstream approval.
        actions.insert("git_commit", ActionSpec::new(Tier::Confirm, &[]));
        actions.insert("git_push", ActionSpec::new(Tier::Confirm, &[]));
        actions.insert("install_dependencies", ActionSpec::new(Tier::Confirm, &[]));
        actions.insert("file_write", ActionSpec::new(Tier::Confirm, &["path"]));
        actions.insert("docker_build", ActionSpec::new(Tier::Confirm, &[]));
        actions.insert("docker_compose_up", ActionSpec::new(Tier::Confirm, &[]));
        actions.insert("zip_project", ActionSpec::new(Tier::Confirm, &["project_dir", "output_path"]));
        actions.insert("run_coding_agent", ActionSpec::new(Tier::Confirm, &[]));

        // BLOCKED — rejected before reaching any handler.
        actions.insert("shell_exec", ActionSpec::new(Tier::Blocked, &[]));
        actions.insert("format_disk", ActionSpec::new(Tier::Blocked, &[]));
        actions.insert("modify_registry", ActionSpec::new(Tier::Blocked, &[]));
        actions.insert("manage_users", ActionSpec::new(Tier::Blocked, &[]));
        actions.insert("firewall_change", ActionSpec::new(Tier::Blocked, &[]));
        actions.insert("download_exec", ActionSpec::new(Tier::Blocked, &[]));
        actions.insert("eval_code", ActionSpec::new(Tier::Blocked, &[]));

        Self { actions }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
