//! Read-only HTML dashboard over the state file.

use std::fmt::Write as _;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::code_state::CodeState;
use crate::model::{EnvironmentState, sort_newest_first};
use crate::render::format_time;
use crate::store::StateFile;

pub struct ServeOptions {
    pub listen_on: String,
    pub addr_file: Option<PathBuf>,
    pub state_file: PathBuf,
}

struct WebState {
    state_file: StateFile,
}

pub async fn serve(opts: ServeOptions) -> Result<()> {
    let state = Arc::new(WebState {
        state_file: StateFile::new(opts.state_file),
    });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&opts.listen_on)
        .await
        .with_context(|| format!("bind {}", opts.listen_on))?;
    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("code-manager-dashboard listening on {}", local_addr);
    maybe_write_addr_file(opts.addr_file.as_ref(), local_addr)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

fn router(state: Arc<WebState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/state.json", get(state_json))
        .with_state(state)
}

fn maybe_write_addr_file(addr_file: Option<&PathBuf>, local_addr: SocketAddr) -> Result<()> {
    if let Some(addr_file) = addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

// The state file is re-read per request so a separate poller shows up live.
async fn home(State(state): State<Arc<WebState>>) -> Response {
    match state.state_file.load() {
        Ok(code_state) => Html(render_home(&code_state)).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn state_json(State(state): State<Arc<WebState>>) -> Response {
    let code_state = match state.state_file.load() {
        Ok(code_state) => code_state,
        Err(err) => return internal_error(err),
    };
    match serde_json::to_vec_pretty(&code_state) {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, "application/json")],
            axum::body::Bytes::from(bytes),
        )
            .into_response(),
        Err(err) => internal_error(err.into()),
    }
}

fn internal_error(err: anyhow::Error) -> Response {
    tracing::error!(error = %format!("{:#}", err), "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": format!("{:#}", err)})),
    )
        .into_response()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_home(code_state: &CodeState) -> String {
    let mut out = String::from(concat!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
        "<title>Code Manager deploys</title>\n</head>\n<body>\n",
        "<h1>Environments</h1>\n",
    ));

    if code_state.is_empty() {
        out.push_str("<p>No environments recorded yet.</p>\n");
    } else {
        out.push_str("<table class=\"summary\">\n<tr><th>Environment</th><th>Status</th><th>Time</th><th>Signature</th></tr>\n");
        for environment_state in code_state.environments() {
            let Some(latest) = environment_state.latest() else {
                continue;
            };
            let _ = writeln!(
                out,
                "<tr class=\"{status}\"><td><a href=\"#env-{name}\">{name}</a></td><td>{status}</td><td>{time}</td><td>{sha}</td></tr>",
                name = escape_html(&environment_state.environment),
                status = latest.status,
                time = format_time(latest.display_time()),
                sha = escape_html(&latest.sha),
            );
        }
        out.push_str("</table>\n");

        for environment_state in code_state.environments() {
            render_history(&mut out, environment_state);
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_history(out: &mut String, environment_state: &EnvironmentState) {
    let name = escape_html(&environment_state.environment);
    let _ = writeln!(out, "<h2 id=\"env-{name}\">{name}</h2>");
    out.push_str("<table class=\"history\">\n<tr><th>Status</th><th>Queued</th><th>Finished</th><th>Signature</th><th>Error</th></tr>\n");

    let mut deploys = environment_state.deploys.clone();
    sort_newest_first(&mut deploys);
    for deploy in &deploys {
        let error = deploy
            .error
            .as_ref()
            .and_then(|err| err.get("msg"))
            .and_then(|msg| msg.as_str())
            .unwrap_or("");
        let finished = deploy.finished_at.or(deploy.estimated_time);
        let _ = writeln!(
            out,
            "<tr class=\"{status}\"><td>{status}</td><td>{queued}</td><td>{finished}</td><td>{sha}</td><td>{error}</td></tr>",
            status = deploy.status,
            queued = format_time(deploy.queued_at),
            finished = format_time(finished),
            sha = escape_html(&deploy.sha),
            error = escape_html(error),
        );
    }
    out.push_str("</table>\n");
}

#[cfg(test)]
#[path = "tests/web_tests.rs"]
mod tests;
