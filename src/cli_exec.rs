use std::path::Path;

use anyhow::{Context, Result};
use time::OffsetDateTime;

use code_manager_dashboard::CodeState;
use code_manager_dashboard::model::ApiConfig;
use code_manager_dashboard::remote::ApiClient;
use code_manager_dashboard::render;
use code_manager_dashboard::snapshot::RawSnapshot;
use code_manager_dashboard::store::StateFile;
use code_manager_dashboard::web::{self, ServeOptions};

use crate::{ApiArgs, Commands};

pub(super) fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Getapi {
            api,
            state_file,
            show,
        } => {
            let state_file = state_file.map(StateFile::new);
            let mut code_state = load_optional(state_file.as_ref())?;

            let client = ApiClient::new(api_config(api))?;
            let snapshot = client.fetch_snapshot()?;
            code_state
                .update_from_snapshot(&snapshot, OffsetDateTime::now_utc())
                .context("reconcile deploy status")?;

            finish(&code_state, state_file.as_ref(), show)?;
        }
        Commands::Getfile {
            state_file,
            show,
            snapshots,
        } => {
            let state_file = state_file.map(StateFile::new);
            let mut code_state = load_optional(state_file.as_ref())?;

            for source in &snapshots {
                let snapshot = read_snapshot(source)?;
                code_state
                    .update_from_snapshot(&snapshot, OffsetDateTime::now_utc())
                    .with_context(|| format!("reconcile {}", source.display()))?;
            }

            finish(&code_state, state_file.as_ref(), show)?;
        }
        Commands::Show {
            state_file,
            environments,
        } => {
            let code_state = StateFile::new(state_file).load_existing()?;
            if environments.is_empty() {
                print!("{}", render::code_state_lines(&code_state));
            } else {
                for name in &environments {
                    match code_state.get(name) {
                        Some(environment_state) => {
                            print!("{}", render::environment_lines(environment_state))
                        }
                        None => eprintln!("No such environment: {}", name),
                    }
                }
            }
        }
        Commands::Serve {
            state_file,
            listen_on,
            addr_file,
        } => {
            let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
            runtime.block_on(web::serve(ServeOptions {
                listen_on,
                addr_file,
                state_file,
            }))?;
        }
    }
    Ok(())
}

fn api_config(api: ApiArgs) -> ApiConfig {
    ApiConfig {
        port: api.port,
        token: api.token,
        ca_cert: api.ca_cert,
        ..ApiConfig::new(api.host)
    }
}

fn load_optional(state_file: Option<&StateFile>) -> Result<CodeState> {
    match state_file {
        Some(state_file) => state_file.load(),
        None => Ok(CodeState::new()),
    }
}

fn read_snapshot(source: &Path) -> Result<RawSnapshot> {
    let bytes = std::fs::read(source).with_context(|| format!("read {}", source.display()))?;
    RawSnapshot::from_slice(&bytes).with_context(|| format!("decode {}", source.display()))
}

fn finish(code_state: &CodeState, state_file: Option<&StateFile>, show: bool) -> Result<()> {
    if show {
        print!("{}", render::code_state_lines(code_state));
    }
    if let Some(state_file) = state_file {
        state_file.save(code_state)?;
    }
    Ok(())
}
