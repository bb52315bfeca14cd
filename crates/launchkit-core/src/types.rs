//! Action vocabulary shared across the LaunchKit crates

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Canonical action verb resolved from user input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionVerb {
    /// Create a project or resource
    Create,
    /// Update an existing resource in place
    Update,
    /// Delete a project or resource
    Delete,
    /// Change the replica count of a deployment
    Scale,
    /// Build an image or container artifact
    Build,
    /// Deploy a project to the orchestrator
    Deploy,
    /// List known projects or resources
    List,
    /// Show details for a single project
    Show,
}

impl ActionVerb {
    /// Get all verbs in declaration order
    pub fn all() -> Vec<Self> {
        vec![
            Self::Create,
            Self::Update,
            Self::Delete,
            Self::Scale,
            Self::Build,
            Self::Deploy,
            Self::List,
            Self::Show,
        ]
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Scale => "scale",
            Self::Build => "build",
            Self::Deploy => "deploy",
            Self::List => "list",
            Self::Show => "show",
        }
    }

    /// Whether this verb mutates external state or the registry
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::List | Self::Show)
    }

    /// Whether this verb destroys external resources
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Delete)
    }

    /// Whether this verb requires an existing registry target
    pub fn requires_target(&self) -> bool {
        matches!(
            self,
            Self::Update | Self::Delete | Self::Scale | Self::Build | Self::Deploy | Self::Show
        )
    }
}

impl std::fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActionVerb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.to_lowercase();
        Self::all()
            .into_iter()
            .find(|v| v.as_str() == s_lower)
            .ok_or_else(|| {
                Error::unknown_verb(
                    s,
                    Self::all()
                        .iter()
                        .map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                )
            })
    }
}

/// Kind of resource an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A scaffolded project tracked in the registry
    Project,
    /// A container belonging to a project
    Container,
    /// An orchestrator deployment belonging to a project
    Deployment,
    /// A container image belonging to a project
    Image,
}

impl ResourceKind {
    /// Get all resource kinds
    pub fn all() -> Vec<Self> {
        vec![Self::Project, Self::Container, Self::Deployment, Self::Image]
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Container => "container",
            Self::Deployment => "deployment",
            Self::Image => "image",
        }
    }

    /// Get aliases accepted on input for this kind
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Project => vec!["app", "application", "repo"],
            Self::Container => vec!["docker-container"],
            Self::Deployment => vec!["cluster", "kubernetes-cluster"],
            Self::Image => vec!["docker-image"],
        }
    }

    /// Parse from string, checking aliases
    pub fn from_str_with_aliases(s: &str) -> Option<Self> {
        let s_lower = s.to_lowercase();

        for kind in Self::all() {
            if kind.as_str() == s_lower {
                return Some(kind);
            }

            for alias in kind.aliases() {
                if alias == s_lower {
                    return Some(kind);
                }
            }
        }

        None
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_with_aliases(s).ok_or_else(|| {
            Error::unknown_resource_kind(
                s,
                Self::all()
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        })
    }
}

/// How a resolved action is carried out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Run the action through its handler
    #[default]
    Execute,
    /// Render what would run, with the equivalent command line, and stop
    Explain,
}

impl ExecutionMode {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Execute => "execute",
            Self::Explain => "explain",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "execute" | "run" => Ok(Self::Execute),
            "explain" | "dry-run" => Ok(Self::Explain),
            _ => Err(Error::UnknownMode { mode: s.into() }),
        }
    }
}
