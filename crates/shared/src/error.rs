use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Render targets and capabilities the page core may find absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    IntersectionObserver,
    NavigationLinks,
    RevealBlock,
    Topbar,
    ScrollProgress,
    ParallaxScene,
    Timeline,
    StepTrigger,
    Overlay,
    OverlayContent,
    StepProgress,
    LiveRegion,
    Focus,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("missing collaborator: {collaborator:?}")]
    MissingCollaborator { collaborator: Collaborator },
    #[error("step index {index} out of range for {count} steps")]
    InvalidIndex { index: usize, count: usize },
    #[error("invalid step catalog: {0}")]
    InvalidCatalog(String),
}

impl PageError {
    pub fn missing(collaborator: Collaborator) -> Self {
        Self::MissingCollaborator { collaborator }
    }

    pub fn is_missing_collaborator(&self) -> bool {
        matches!(self, Self::MissingCollaborator { .. })
    }
}
