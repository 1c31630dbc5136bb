//! The project snapshot a command works on.
//!
//! Read commands derive from whatever `--input` holds (or the defaults).
//! Edit commands build the next snapshot and replace the document on disk
//! in one atomic write.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use fdas_core::{load_project, save_project, Project};
use tracing::info;

pub struct Workspace {
    project: Project,
    path: Option<PathBuf>,
}

impl Workspace {
    /// Load `path`, or start from the default project.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let project = match path {
            Some(p) => load_project(p).with_context(|| format!("Failed to load {}", p.display()))?,
            None => Project::default(),
        };
        Ok(Workspace {
            project,
            path: path.map(Path::to_path_buf),
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Replace the snapshot and persist it to the input document.
    pub fn replace(&mut self, next: Project) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            bail!(
                "Editing requires an estimate document; pass --input <PATH> \
                 (create one with `fdas init`)"
            );
        };
        save_project(&next, path).with_context(|| format!("Failed to save {}", path.display()))?;
        info!(path = %path.display(), "replaced snapshot");
        self.project = next;
        Ok(())
    }
}
