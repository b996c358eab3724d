//! Plain-text listing of environments and their deploys.

use std::fmt::Write as _;
use std::sync::OnceLock;

use time::OffsetDateTime;
use time::format_description::FormatItem;

use crate::code_state::CodeState;
use crate::model::{EnvironmentState, sort_newest_first};

fn ts_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse(
            "[year]-[month repr:numerical padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]:[second padding:zero] UTC",
        )
        .expect("valid time format")
    })
}

/// `YYYY-MM-DD HH:MM:SS UTC`, truncated to the second.
pub fn format_time(ts: Option<OffsetDateTime>) -> String {
    let Some(ts) = ts else {
        return "-".to_string();
    };
    ts.to_offset(time::UtcOffset::UTC)
        .format(ts_format())
        .unwrap_or_else(|_| ts.to_string())
}

/// One line per deploy, newest first. The environment name is printed only
/// on its first line.
pub fn environment_lines(environment_state: &EnvironmentState) -> String {
    let mut deploys = environment_state.deploys.clone();
    sort_newest_first(&mut deploys);

    let mut out = String::new();
    let mut name = environment_state.environment.as_str();
    for deploy in &deploys {
        let _ = writeln!(
            out,
            "{:<45}  {:<9}  {}",
            name,
            deploy.status.as_str(),
            format_time(deploy.reference_time())
        );
        name = "";
    }
    out
}

pub fn code_state_lines(state: &CodeState) -> String {
    state.environments().map(environment_lines).collect()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
