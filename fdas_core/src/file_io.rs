//! # File I/O Module
//!
//! Reads project documents and writes projects and exports with:
//! - **Atomic writes**: write to `<name>.tmp`, sync, rename over the target
//! - **Version validation**: reject documents from an incompatible schema
//! - **Sanitizing loads**: every rule value is re-clamped on the way in
//!
//! ## Example
//!
//! ```rust,no_run
//! use fdas_core::file_io::{load_project, save_project};
//! use fdas_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Tower B", "Estimator");
//! let path = Path::new("tower-b.fdas.json");
//!
//! save_project(&project, path)?;
//! let loaded = load_project(path)?;
//! assert_eq!(loaded.meta.title, "Tower B");
//! # Ok::<(), fdas_core::errors::FdasError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use semver::Version;
use tracing::{debug, info};

use crate::errors::{FdasError, FdasResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Temp path used while writing `path`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `contents` to `path` atomically.
///
/// The write process:
/// 1. Write to a temporary sibling file (`<name>.tmp`)
/// 2. Sync to disk (fsync)
/// 3. Rename over `path`
///
/// An interrupted write leaves any previous file intact.
pub fn write_atomic(path: &Path, contents: &[u8]) -> FdasResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        FdasError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents).map_err(|e| {
        FdasError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        FdasError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        FdasError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// Save a project document.
pub fn save_project(project: &Project, path: &Path) -> FdasResult<()> {
    let json = serde_json::to_string_pretty(project)?;
    write_atomic(path, json.as_bytes())?;
    info!(path = %path.display(), floors = project.floors.len(), "saved project");
    Ok(())
}

/// Write an export (CSV or JSON text) to `path`.
pub fn write_export(path: &Path, contents: &str) -> FdasResult<()> {
    write_atomic(path, contents.as_bytes())?;
    info!(path = %path.display(), "wrote export");
    Ok(())
}

/// Parse a project document from JSON text, validating its schema version
/// and re-clamping its rules.
pub fn parse_project(json: &str) -> FdasResult<Project> {
    let project: Project = serde_json::from_str(json)?;
    validate_version(&project.meta.version)?;
    Ok(project.sanitized())
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(Project)` - Loaded and sanitized project
/// * `Err(FdasError::VersionMismatch)` - Document version is incompatible
/// * `Err(FdasError::SerializationError)` - Invalid JSON or an empty floor list
/// * `Err(FdasError::FileError)` - I/O error
pub fn load_project(path: &Path) -> FdasResult<Project> {
    let contents = fs::read_to_string(path)
        .map_err(|e| FdasError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project = parse_project(&contents).map_err(|e| match e {
        FdasError::SerializationError { reason } => FdasError::SerializationError {
            reason: format!("Invalid project in {}: {}", path.display(), reason),
        },
        other => other,
    })?;

    debug!(path = %path.display(), floors = project.floors.len(), "loaded project");
    Ok(project)
}

/// Validate that a document version is compatible with the current schema.
///
/// Major versions must match; while the schema is 0.x, documents from a
/// newer minor version are rejected too.
fn validate_version(file_version: &str) -> FdasResult<()> {
    let mismatch = || FdasError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file = Version::parse(file_version.trim()).map_err(|_| mismatch())?;
    let current = Version::parse(SCHEMA_VERSION).map_err(|_| mismatch())?;

    if file.major != current.major {
        return Err(mismatch());
    }
    if current.major == 0 && file.minor > current.minor {
        return Err(mismatch());
    }
    Ok(())
}
