//! # Estimate Project
//!
//! The `Project` is the one input snapshot the estimator works from: a rule
//! set plus the floor registry, with a small metadata header. Projects are
//! stored as human-readable JSON (`.fdas.json`).
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (schema version, title, prepared by, timestamps)
//! ├── rules: RuleSet
//! └── floors: FloorRegistry (never empty)
//! ```
//!
//! Every section has a default, so a JSON export or a bare
//! `{"floors": [...]}` document also loads as a project.
//!
//! ## Example
//!
//! ```rust
//! use fdas_core::project::Project;
//!
//! let project = Project::new("Tower B", "J. Santos");
//! assert_eq!(project.floors.len(), 3);
//!
//! let estimate = project.estimate();
//! assert_eq!(estimate.slc_points, 0);
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("\"sparePercent\""));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::estimate::Estimate;
use crate::floors::FloorRegistry;
use crate::rules::RuleSet;

/// Current schema version for project documents
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Document header
    #[serde(default)]
    pub meta: ProjectMetadata,

    /// Estimation rules
    #[serde(default)]
    pub rules: RuleSet,

    /// Per-floor device counts
    #[serde(default)]
    pub floors: FloorRegistry,
}

impl Project {
    /// Create a project with default rules and the three default floors.
    pub fn new(title: impl Into<String>, prepared_by: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                title: title.into(),
                prepared_by: prepared_by.into(),
                created: now,
                modified: now,
            },
            rules: RuleSet::default(),
            floors: FloorRegistry::default(),
        }
    }

    /// Derive the estimate for this snapshot
    pub fn estimate(&self) -> Estimate {
        Estimate::derive(&self.rules, &self.floors)
    }

    /// Next snapshot with the rule set replaced
    pub fn with_rules(&self, rules: RuleSet) -> Project {
        let mut next = self.clone();
        next.rules = rules;
        next.touch();
        next
    }

    /// Next snapshot with the floor registry replaced
    pub fn with_floors(&self, floors: FloorRegistry) -> Project {
        let mut next = self.clone();
        next.floors = floors;
        next.touch();
        next
    }

    /// Re-clamp rule values loaded from outside the process
    pub fn sanitized(mut self) -> Project {
        self.rules = self.rules.sanitized();
        self
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Building or job title
    pub title: String,

    /// Person preparing the estimate
    pub prepared_by: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        let now = Utc::now();
        ProjectMetadata {
            version: SCHEMA_VERSION.to_string(),
            title: String::new(),
            prepared_by: String::new(),
            created: now,
            modified: now,
        }
    }
}
