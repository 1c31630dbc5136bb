//! Convenience login gate.
//!
//! The credentials are fixed and compared in-process; a successful login
//! writes a flag file under the data directory. Anyone with access to the
//! binary or the data directory can bypass this. It keeps casual users on
//! the login step and is not a security boundary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

/// Fixed username accepted by `fdas login`
pub const USERNAME: &str = "admin";

/// Fixed password accepted by `fdas login`
pub const PASSWORD: &str = "fdas123";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "FDAS_DATA_DIR";

const FLAG_FILE: &str = "auth";

/// Flag-file backed login state.
#[derive(Debug, Clone)]
pub struct Session {
    dir: PathBuf,
}

impl Session {
    /// Session rooted at `dir`
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Session { dir: dir.into() }
    }

    /// Session in `$FDAS_DATA_DIR`, or the platform data directory.
    pub fn locate() -> Result<Self> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(Session::at(dir));
        }
        let base = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("Could not determine a data directory; set {}", DATA_DIR_ENV))?;
        Ok(Session::at(base.join("fdas")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn flag_path(&self) -> PathBuf {
        self.dir.join(FLAG_FILE)
    }

    pub fn is_authenticated(&self) -> bool {
        fs::read_to_string(self.flag_path())
            .map(|s| s.trim() == "true")
            .unwrap_or(false)
    }

    /// Check the credentials and set the flag on a match.
    ///
    /// Returns `Ok(false)` for a mismatch.
    pub fn login(&self, username: &str, password: &str) -> Result<bool> {
        if username.trim() != USERNAME || password != PASSWORD {
            debug!(username = username.trim(), "login rejected");
            return Ok(false);
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        fs::write(self.flag_path(), "true")
            .with_context(|| format!("Failed to write {}", self.flag_path().display()))?;
        debug!(dir = %self.dir.display(), "login accepted");
        Ok(true)
    }

    pub fn logout(&self) -> Result<()> {
        let path = self.flag_path();
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    /// Fail unless logged in
    pub fn require(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(anyhow!(
                "Not logged in. Run `fdas login --username <USER> --password <PASS>` first"
            ))
        }
    }
}
