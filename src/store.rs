//! On-disk persistence of the [`CodeState`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::code_state::CodeState;

#[derive(Clone, Debug)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the state file. A file that does not exist yet is an empty
    /// state; any other failure is an error.
    pub fn load(&self) -> Result<CodeState> {
        tracing::trace!(path = %self.path.display(), "loading code state");
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no state file yet, starting empty");
                return Ok(CodeState::new());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", self.path.display()));
            }
        };
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", self.path.display()))
    }

    /// Like [`StateFile::load`], but the file must exist.
    pub fn load_existing(&self) -> Result<CodeState> {
        let bytes =
            fs::read(&self.path).with_context(|| format!("read {}", self.path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", self.path.display()))
    }

    pub fn save(&self, state: &CodeState) -> Result<()> {
        tracing::trace!(path = %self.path.display(), "saving code state");
        let mut bytes = serde_json::to_vec_pretty(state).context("serialize code state")?;
        bytes.push(b'\n');
        write_atomic(&self.path, &bytes).with_context(|| format!("write {}", self.path.display()))
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
