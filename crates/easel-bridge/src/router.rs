//! Delivering an image to a host widget.

use std::sync::Arc;

use easel_common::{SurfaceTab, TransferError};
use serde::{Deserialize, Serialize};

use crate::locator::WidgetLocator;
use crate::surface::{ElementRef, FileCollection, HostSurface, NamedFile, SyntheticEvent};
use crate::watcher::StructuralWatch;

/// Where an incoming image goes. Built fresh for every transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationDescriptor {
    pub tab: SurfaceTab,
    /// Deliver to the auxiliary-model routing container instead of the
    /// tab's own input.
    pub route_to_auxiliary: bool,
    /// Routing unit inside the container. Ignored otherwise.
    pub widget_index: usize,
    /// The image is the editor's active layer only.
    pub active_sublayer_only: bool,
}

impl DestinationDescriptor {
    pub fn tab_input(tab: SurfaceTab) -> Self {
        Self {
            tab,
            route_to_auxiliary: false,
            widget_index: 0,
            active_sublayer_only: false,
        }
    }
}

pub struct DestinationRouter {
    host: Arc<dyn HostSurface>,
    locator: WidgetLocator,
}

impl DestinationRouter {
    pub fn new(host: Arc<dyn HostSurface>, locator: WidgetLocator) -> Self {
        Self { host, locator }
    }

    pub fn locator(&self) -> &WidgetLocator {
        &self.locator
    }

    /// Switch to the descriptor's tab, resolve its input and inject `file`.
    ///
    /// A collapsed routing container is expanded first, and the target
    /// input only exists once the host has rebuilt it, so one structural
    /// change is awaited. A missing element at any step fails with
    /// [`TransferError::DestinationNotFound`]; there is no fallback.
    pub async fn route(
        &self,
        descriptor: &DestinationDescriptor,
        file: NamedFile,
    ) -> Result<(), TransferError> {
        let host = self.host.as_ref();
        tracing::debug!(?descriptor, file = %file.name, "routing image");
        self.locator.switch_tab(host, descriptor.tab).await?;

        let input = if descriptor.route_to_auxiliary {
            self.resolve_aux_input(descriptor).await?
        } else {
            self.locator.default_input(host, descriptor.tab).await?
        };

        inject(host, &input, file).await
    }

    async fn resolve_aux_input(
        &self,
        descriptor: &DestinationDescriptor,
    ) -> Result<ElementRef, TransferError> {
        let host = self.host.as_ref();
        let container = self.locator.aux_container(host, descriptor.tab).await?;

        if self.locator.aux_is_collapsed(host, &container).await? {
            tracing::debug!(%container, "expanding routing container");
            let watch = StructuralWatch::arm(host, &container).await?;
            self.locator.expand_aux(host, &container).await?;
            watch.changed().await?;
        }

        let units = self.locator.sub_tabs(host, &container).await?;
        if units.len() > 1 {
            let unit = units.get(descriptor.widget_index).ok_or_else(|| {
                TransferError::DestinationNotFound(format!(
                    "routing unit {} of {}",
                    descriptor.widget_index,
                    units.len()
                ))
            })?;
            host.click(unit).await?;
        }

        self.locator
            .aux_input(host, &container, descriptor.widget_index)
            .await
    }
}

/// Put `file` into `input` the way a user file selection would: a one-entry
/// file set, then a bubbling, composed `change` event.
pub async fn inject(
    host: &dyn HostSurface,
    input: &ElementRef,
    file: NamedFile,
) -> Result<(), TransferError> {
    tracing::debug!(%input, file = %file.name, "injecting file");
    host.assign_files(input, &FileCollection::single(file)).await?;
    host.dispatch_event(input, &SyntheticEvent::change()).await?;
    Ok(())
}
