//! The host surface as the bridge sees it.
//!
//! [`HostSurface`] is the narrow set of widget-tree primitives the router
//! and orchestrator need. The webview crate implements it by evaluating
//! scripts in the host page; tests implement it in memory.

use async_trait::async_trait;
use easel_common::{Dimensions, HostError};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

pub use crate::codec::NamedFile;

/// Opaque handle to an element of the host widget tree.
///
/// Handles are only meaningful to the surface that issued them and may go
/// stale when the host rebuilds the subtree they point into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementRef(pub String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// File set assigned to a file input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCollection {
    pub files: Vec<NamedFile>,
}

impl FileCollection {
    pub fn single(file: NamedFile) -> Self {
        Self { files: vec![file] }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A synthetic DOM event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub bubbles: bool,
    pub composed: bool,
}

impl SyntheticEvent {
    /// `change`, bubbling and composed, as a real file selection produces.
    pub fn change() -> Self {
        Self {
            kind: "change".into(),
            bubbles: true,
            composed: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserveOptions {
    pub attributes: bool,
    pub child_list: bool,
    pub subtree: bool,
}

impl ObserveOptions {
    /// Attribute, child-list and subtree changes.
    pub fn structural() -> Self {
        Self {
            attributes: true,
            child_list: true,
            subtree: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    #[serde(rename = "attributes")]
    Attributes,
    #[serde(rename = "childList")]
    ChildList,
    #[serde(rename = "characterData")]
    CharacterData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    #[serde(rename = "type")]
    pub kind: MutationKind,
    #[serde(default, rename = "attributeName")]
    pub attribute_name: Option<String>,
}

/// Disconnects an observer. Runs at most once, on [`disconnect`] or drop.
///
/// [`disconnect`]: DisconnectGuard::disconnect
pub struct DisconnectGuard(Option<Box<dyn FnOnce() + Send>>);

impl DisconnectGuard {
    pub fn new(disconnect: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(disconnect)))
    }

    pub fn noop() -> Self {
        Self(None)
    }

    pub fn disconnect(&mut self) {
        if let Some(disconnect) = self.0.take() {
            disconnect();
        }
    }

    pub fn is_connected(&self) -> bool {
        self.0.is_some()
    }
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Live mutation observer on a host subtree.
pub struct MutationSubscription {
    records: mpsc::UnboundedReceiver<MutationRecord>,
    guard: DisconnectGuard,
}

impl MutationSubscription {
    pub fn new(records: mpsc::UnboundedReceiver<MutationRecord>, guard: DisconnectGuard) -> Self {
        Self { records, guard }
    }

    /// Next observed mutation. `None` once the observer is gone.
    pub async fn next(&mut self) -> Option<MutationRecord> {
        self.records.recv().await
    }

    pub fn disconnect(&mut self) {
        self.guard.disconnect();
        self.records.close();
    }
}

/// Widget-tree primitives of the host surface.
#[async_trait]
pub trait HostSurface: Send + Sync {
    /// Call a no-argument global function of the host page.
    async fn call_global(&self, name: &str) -> Result<(), HostError>;

    /// All elements matching `selector`, in document order, under `scope`
    /// (or the whole document).
    async fn query(
        &self,
        scope: Option<&ElementRef>,
        selector: &str,
    ) -> Result<Vec<ElementRef>, HostError>;

    async fn children(&self, element: &ElementRef) -> Result<Vec<ElementRef>, HostError>;

    /// True when `descendant` is `ancestor` or inside it.
    async fn contains(
        &self,
        ancestor: &ElementRef,
        descendant: &ElementRef,
    ) -> Result<bool, HostError>;

    /// True when the element's own `display` style is `none`.
    async fn is_hidden(&self, element: &ElementRef) -> Result<bool, HostError>;

    async fn text_content(&self, element: &ElementRef) -> Result<String, HostError>;

    async fn click(&self, element: &ElementRef) -> Result<(), HostError>;

    /// Replace the file set of a file input.
    async fn assign_files(&self, input: &ElementRef, files: &FileCollection)
        -> Result<(), HostError>;

    async fn dispatch_event(
        &self,
        element: &ElementRef,
        event: &SyntheticEvent,
    ) -> Result<(), HostError>;

    /// Start observing mutations under `element`.
    async fn observe(
        &self,
        element: &ElementRef,
        options: ObserveOptions,
    ) -> Result<MutationSubscription, HostError>;

    /// Intrinsic pixel size of an image element.
    async fn natural_size(&self, image: &ElementRef) -> Result<Dimensions, HostError>;

    /// Resolved source locator of an image element.
    async fn image_source(&self, image: &ElementRef) -> Result<String, HostError>;
}
