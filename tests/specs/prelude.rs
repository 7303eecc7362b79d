//! Shared harness for the workspace-level behavioral specs: spawns the
//! real `gateway` and `agent` binaries as child processes and drives
//! them over the network the way an operator or an Agent host actually
//! would, rather than calling library functions in-process.

use std::net::TcpListener;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

pub const SPEC_WAIT_MAX_MS: u64 = 5_000;

/// Polls `predicate` until it returns `true` or `max_ms` elapses.
pub fn wait_for(max_ms: u64, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if predicate() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

/// Binds an ephemeral port and releases it immediately; good enough for
/// handing a free port to a child process started a few lines later.
pub fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port").local_addr().expect("local addr").port()
}

/// A running project directory: a real git repo on disk so that
/// `git_status`/`git_commit` actions have something to act on.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn git_initialized() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let status = Command::new("git")
            .args(["init", "--quiet"])
            .current_dir(dir.path())
            .status()
            .expect("git must be on PATH for the spec suite");
        assert!(status.success(), "git init failed");
        Command::new("git").args(["config", "user.email", "specs@crewline.test"]).current_dir(dir.path()).status().expect("git config email");
        Command::new("git").args(["config", "user.name", "Crewline Specs"]).current_dir(dir.path()).status().expect("git config name");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Kills the child on drop so a failing assertion never leaves a
/// `gateway`/`agent` process running after the test exits.
struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

pub struct Gateway {
    _child: ChildGuard,
    control_plane_addr: String,
    pub channel_addr: String,
    pub auth_token: String,
    rt: tokio::runtime::Runtime,
    client: reqwest::Client,
}

impl Gateway {
    /// Starts a `gateway` binary against a throwaway sqlite store, with
    /// no SSH fallback configured and both listeners on free loopback
    /// ports (the channel listener binds `0.0.0.0` in production, but a
    /// loopback port is all the spec suite needs to dial into it).
    pub fn start(project_dir: &Path) -> Self {
        let control_port = free_port();
        let channel_port = free_port();
        let auth_token = format!("spec-token-{}", std::process::id());
        let store_path = project_dir.join("crewline.sqlite3");

        let bin = assert_cmd::cargo::cargo_bin("gateway");
        let child = Command::new(bin)
            .env("AUTH_TOKEN", &auth_token)
            .env("CONTROL_PLANE_ADDR", format!("127.0.0.1:{control_port}"))
            .env("CHANNEL_ADDR", format!("127.0.0.1:{channel_port}"))
            .env("STORE_PATH", &store_path)
            .env("LOG_LEVEL", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn gateway binary");

        let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
        let gateway = Self {
            _child: ChildGuard(child),
            control_plane_addr: format!("127.0.0.1:{control_port}"),
            channel_addr: format!("127.0.0.1:{channel_port}"),
            auth_token,
            rt,
            client: reqwest::Client::new(),
        };

        let ready = wait_for(SPEC_WAIT_MAX_MS, || gateway.try_status().is_some());
        assert!(ready, "gateway did not come up on the control plane within {SPEC_WAIT_MAX_MS}ms");
        gateway
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.control_plane_addr, path)
    }

    fn try_status(&self) -> Option<serde_json::Value> {
        self.rt.block_on(async { self.client.get(self.url("/status")).send().await.ok()?.json().await.ok() })
    }

    pub fn status(&self) -> serde_json::Value {
        self.try_status().expect("gateway /status should respond")
    }

    /// Posts `/action` and returns `(http_status, body)`.
    pub fn action(&self, action: &str, params: serde_json::Value, confirmed: bool) -> (u16, serde_json::Value) {
        self.rt.block_on(async {
            let response = self
                .client
                .post(self.url("/action"))
                .json(&serde_json::json!({"action": action, "params": params, "confirmed": confirmed}))
                .send()
                .await
                .expect("post /action");
            let status = response.status().as_u16();
            let body = response.json().await.expect("response body is json");
            (status, body)
        })
    }

    pub fn emergency_stop(&self) -> serde_json::Value {
        self.rt.block_on(async { self.client.post(self.url("/emergency-stop")).send().await.expect("post /emergency-stop").json().await.expect("json") })
    }

    pub fn resume(&self) -> serde_json::Value {
        self.rt.block_on(async { self.client.post(self.url("/resume")).send().await.expect("post /resume").json().await.expect("json") })
    }

    pub fn create_project(&self, name: &str, local_path: &Path) -> serde_json::Value {
        self.rt.block_on(async {
            self.client
                .post(self.url("/projects"))
                .json(&serde_json::json!({
                    "name": name,
                    "display_name": name,
                    "description": "spec project",
                    "local_path": local_path.to_string_lossy(),
                }))
                .send()
                .await
                .expect("post /projects")
                .json()
                .await
                .expect("json")
        })
    }

    pub fn capture_idea(&self, project_id: &str, message: &str) -> serde_json::Value {
        self.rt.block_on(async {
            self.client
                .post(self.url(&format!("/projects/{project_id}/ideas")))
                .json(&serde_json::json!({"message": message}))
                .send()
                .await
                .expect("post idea")
                .json()
                .await
                .expect("json")
        })
    }

    pub fn pause_project(&self, project_id: &str) -> u16 {
        self.rt.block_on(async { self.client.post(self.url(&format!("/projects/{project_id}/pause"))).send().await.expect("post pause").status().as_u16() })
    }

    pub fn cancel_project(&self, project_id: &str) -> u16 {
        self.rt.block_on(async { self.client.post(self.url(&format!("/projects/{project_id}/cancel"))).send().await.expect("post cancel").status().as_u16() })
    }

    pub fn resume_project(&self, project_id: &str) -> u16 {
        self.rt.block_on(async { self.client.post(self.url(&format!("/projects/{project_id}/resume"))).send().await.expect("post resume").status().as_u16() })
    }

    pub fn events(&self, project_id: &str) -> serde_json::Value {
        self.rt.block_on(async {
            self.client.get(self.url(&format!("/projects/{project_id}/events"))).send().await.expect("get events").json().await.expect("json")
        })
    }

    pub fn list_projects(&self) -> serde_json::Value {
        self.rt
            .block_on(async { self.client.get(self.url("/projects")).send().await.expect("get /projects").json().await.expect("json") })
    }

    pub fn approve_plan_status(&self, project_id: &str) -> u16 {
        self.rt.block_on(async {
            self.client.post(self.url(&format!("/projects/{project_id}/approve"))).send().await.expect("post approve").status().as_u16()
        })
    }

    pub fn start_project_status(&self, project_id: &str) -> u16 {
        self.rt
            .block_on(async { self.client.post(self.url(&format!("/projects/{project_id}/start"))).send().await.expect("post start").status().as_u16() })
    }

    pub fn capture_idea_status(&self, project_id: &str, message: &str) -> u16 {
        self.rt.block_on(async {
            self.client
                .post(self.url(&format!("/projects/{project_id}/ideas")))
                .json(&serde_json::json!({"message": message}))
                .send()
                .await
                .expect("post idea")
                .status()
                .as_u16()
        })
    }
}

pub struct Agent {
    _child: ChildGuard,
}

impl Agent {
    /// Starts an `agent` binary dialing into `gateway`'s channel, jailed
    /// to `project_dir`. Stdin is closed so any CONFIRM-tier prompt the
    /// Agent issues hits EOF and denies immediately instead of hanging.
    pub fn start(gateway: &Gateway, project_dir: &Path) -> Self {
        let bin = assert_cmd::cargo::cargo_bin("agent");
        let child = Command::new(bin)
            .env("AUTH_TOKEN", &gateway.auth_token)
            .env("GATEWAY_URL", format!("ws://{}/channel", gateway.channel_addr))
            .env("PROJECT_DIR", project_dir)
            .env("ALLOWED_ROOTS", project_dir)
            .env("AUDIT_LOG_DIR", project_dir)
            .env("LOG_LEVEL", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn agent binary");
        Self { _child: ChildGuard(child) }
    }
}

/// Starts a gateway and an agent paired over a real websocket connection,
/// waiting until the gateway reports the agent as connected.
pub fn paired(project: &Project) -> (Gateway, Agent) {
    let gateway = Gateway::start(project.path());
    let agent = Agent::start(&gateway, project.path());
    let connected = wait_for(SPEC_WAIT_MAX_MS, || gateway.status()["agent_connected"].as_bool().unwrap_or(false));
    assert!(connected, "agent did not connect to the gateway's channel within {SPEC_WAIT_MAX_MS}ms");
    (gateway, agent)
}
