//! Layout provider abstraction.
//!
//! The block mapper never talks to a rendering engine directly. It asks a
//! [`LayoutProvider`] for the paragraph-level regions of a container, so the
//! browser bridge can back it with the live DOM while tests and offline
//! tooling use a [`StaticLayout`] fixture.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("container `{0}` not found")]
    ContainerNotFound(String),
    #[error("layout backend unavailable: {0}")]
    Unavailable(String),
    #[error("invalid layout fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}

/// Rendered geometry and text of one paragraph-like element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRegion {
    /// Viewport y of the top edge.
    pub top: f64,
    /// Viewport y of the bottom edge.
    pub bottom: f64,
    #[serde(default)]
    pub text: String,
}

impl LayoutRegion {
    pub fn new(top: f64, bottom: f64, text: impl Into<String>) -> Self {
        Self {
            top,
            bottom,
            text: text.into(),
        }
    }
}

/// Read-only access to rendered paragraph geometry.
pub trait LayoutProvider {
    /// Paragraph-level regions inside `container_id`, in document order,
    /// measured at call time.
    fn paragraphs(&self, container_id: &str) -> Result<Vec<LayoutRegion>, LayoutError>;
}

/// Fixed, in-memory layout.
///
/// Fixture files look like:
///
/// ```json
/// { "containers": { "readingBox": [ { "top": 100, "bottom": 150, "text": "..." } ] } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticLayout {
    containers: HashMap<String, Vec<LayoutRegion>>,
}

impl StaticLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(
        mut self,
        container_id: impl Into<String>,
        regions: Vec<LayoutRegion>,
    ) -> Self {
        self.containers.insert(container_id.into(), regions);
        self
    }

    pub fn from_json(data: &[u8]) -> Result<Self, LayoutError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Shift every region by `dy`, as a page scroll of `-dy` pixels would.
    pub fn scrolled(&self, dy: f64) -> Self {
        let containers = self
            .containers
            .iter()
            .map(|(id, regions)| {
                let moved = regions
                    .iter()
                    .map(|r| LayoutRegion::new(r.top + dy, r.bottom + dy, r.text.clone()))
                    .collect();
                (id.clone(), moved)
            })
            .collect();
        Self { containers }
    }
}

impl LayoutProvider for StaticLayout {
    fn paragraphs(&self, container_id: &str) -> Result<Vec<LayoutRegion>, LayoutError> {
        self.containers
            .get(container_id)
            .cloned()
            .ok_or_else(|| LayoutError::ContainerNotFound(container_id.to_string()))
    }
}
