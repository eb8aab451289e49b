//! Waiting for the host to rebuild part of its widget tree.
//!
//! The host tears down and recreates whole subtrees when the user switches
//! tabs or expands a section, so the first mutation observed under a root
//! is taken as "rebuilt". That is a heuristic: reads right after it may
//! still see a partly built tree.

use easel_common::HostError;

use crate::surface::{ElementRef, HostSurface, MutationSubscription, ObserveOptions};

/// An armed watch on one subtree.
///
/// Arm it before the action that triggers the rebuild, so a mutation that
/// lands before the caller starts waiting is not lost.
pub struct StructuralWatch {
    subscription: MutationSubscription,
    root: ElementRef,
}

impl StructuralWatch {
    pub async fn arm(host: &dyn HostSurface, root: &ElementRef) -> Result<Self, HostError> {
        let subscription = host.observe(root, ObserveOptions::structural()).await?;
        Ok(Self {
            subscription,
            root: root.clone(),
        })
    }

    /// Resolve on the first mutation, then stop observing.
    pub async fn changed(mut self) -> Result<(), HostError> {
        let first = self.subscription.next().await;
        self.subscription.disconnect();
        match first {
            Some(record) => {
                tracing::debug!(root = %self.root, kind = ?record.kind, "structural change observed");
                Ok(())
            }
            None => Err(HostError::Detached),
        }
    }
}

/// Resolve the first time anything under `root` changes structurally.
pub async fn await_structural_change(
    host: &dyn HostSurface,
    root: &ElementRef,
) -> Result<(), HostError> {
    StructuralWatch::arm(host, root).await?.changed().await
}
