use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_code-manager-dashboard"))
}

pub fn run(args: &[&str]) -> Result<Output> {
    let output = bin().args(args).output().context("run code-manager-dashboard")?;
    Ok(output)
}

pub fn run_ok(args: &[&str]) -> Result<String> {
    let output = run(args)?;
    if !output.status.success() {
        anyhow::bail!(
            "command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8(output.stdout).context("stdout is utf-8")
}

/// Writes a raw status snapshot with the given categories filled in.
pub fn write_snapshot(
    dir: &Path,
    name: &str,
    deploys_status: serde_json::Value,
    deployed: serde_json::Value,
) -> Result<PathBuf> {
    let mut status = serde_json::json!({"new": [], "queued": [], "deploying": [], "failed": []});
    if let Some(fields) = deploys_status.as_object() {
        for (key, value) in fields {
            status[key] = value.clone();
        }
    }
    let snapshot = serde_json::json!({
        "deploys-status": status,
        "file-sync-storage-status": {"deployed": deployed}
    });
    let path = dir.join(name);
    std::fs::write(
        &path,
        serde_json::to_vec_pretty(&snapshot).context("serialize snapshot")?,
    )
    .with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

pub struct ServerGuard {
    pub base_url: String,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_server(state_file: &Path, addr_file: &Path) -> Result<ServerGuard> {
    let child = bin()
        .args([
            "serve",
            "--state-file",
            state_file.to_str().context("state path is utf-8")?,
            "--listen-on",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().context("addr path is utf-8")?,
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn code-manager-dashboard serve")?;
    let mut guard = ServerGuard {
        base_url: String::new(),
        child,
    };

    guard.base_url = read_addr_file(addr_file)?;
    wait_for_healthz(&guard.base_url)?;
    Ok(guard)
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}
