//! The transfer flows.
//!
//! Each flow is one linear sequence: every step starts only after the
//! previous step's editor response or host rebuild has completed. Nothing
//! is retried; the first error ends the flow and is returned.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use easel_common::{new_correlation_id, Dimensions, SurfaceTab, TransferError};
use easel_config::EaselConfig;

use crate::channel::{Bridge, ResponseSequence};
use crate::codec::{self, NamedFile};
use crate::command;
use crate::ipc::TransferRequest;
use crate::locator::WidgetLocator;
use crate::router::{inject, DestinationDescriptor, DestinationRouter};
use crate::surface::HostSurface;
use crate::watcher::StructuralWatch;

/// Per-flow settings, taken from the config at construction.
#[derive(Debug, Clone)]
pub struct TransferSettings {
    /// Base image of the mask flow is the active layer only.
    pub active_layer_only: bool,
    pub output_file_name: String,
    pub output_mime: String,
    pub new_document_notice: String,
    pub no_selection_notice: String,
    /// Base for host-relative image sources.
    pub host_base_url: Option<String>,
}

impl TransferSettings {
    pub fn from_config(config: &EaselConfig) -> Self {
        Self {
            active_layer_only: config.transfer.active_layer_only,
            output_file_name: config.editor.output_file_name.clone(),
            output_mime: config.editor.output_mime.clone(),
            new_document_notice: config.transfer.new_document_notice.clone(),
            no_selection_notice: config.transfer.no_selection_notice.clone(),
            host_base_url: Some(config.host.url.clone()),
        }
    }
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self::from_config(&EaselConfig::default())
    }
}

/// True when an image must open as its own document: it is larger than
/// the active document along either axis.
pub fn opens_as_new_document(image: Dimensions, document: Dimensions) -> bool {
    image.exceeds(&document)
}

pub struct TransferOrchestrator {
    host: Arc<dyn HostSurface>,
    bridge: Arc<Bridge>,
    router: DestinationRouter,
    settings: TransferSettings,
}

impl TransferOrchestrator {
    pub fn new(
        host: Arc<dyn HostSurface>,
        bridge: Arc<Bridge>,
        locator: WidgetLocator,
        settings: TransferSettings,
    ) -> Self {
        Self {
            router: DestinationRouter::new(Arc::clone(&host), locator),
            host,
            bridge,
            settings,
        }
    }

    pub fn from_config(
        host: Arc<dyn HostSurface>,
        bridge: Arc<Bridge>,
        config: &EaselConfig,
    ) -> Self {
        Self::new(
            host,
            bridge,
            WidgetLocator::new(config.widgets.clone()),
            TransferSettings::from_config(config),
        )
    }

    pub fn settings(&self) -> &TransferSettings {
        &self.settings
    }

    pub fn bridge(&self) -> &Arc<Bridge> {
        &self.bridge
    }

    fn locator(&self) -> &WidgetLocator {
        self.router.locator()
    }

    /// Run the flow a [`TransferRequest`] asks for.
    pub async fn run(&self, request: TransferRequest) -> Result<(), TransferError> {
        match request {
            TransferRequest::ToEditor { gallery } => {
                self.transfer_from_host_to_editor(&gallery).await
            }
            TransferRequest::ToHost {
                tab,
                route_to_auxiliary,
                widget_index,
                active_layer_only,
            } => {
                self.transfer_from_editor_to_host(
                    tab,
                    route_to_auxiliary,
                    widget_index,
                    active_layer_only,
                )
                .await
            }
            TransferRequest::SelectionMask => self.transfer_with_selection_mask().await,
        }
    }

    /// Open the first image of a host gallery in the editor.
    ///
    /// An image larger than the active document opens as a new document
    /// and the user is told why; otherwise it is placed into the active
    /// document and rasterized.
    pub async fn transfer_from_host_to_editor(&self, gallery: &str) -> Result<(), TransferError> {
        let flow = new_correlation_id();
        let host = self.host.as_ref();
        tracing::debug!(%flow, gallery, "host to editor: start");

        let image = self.locator().gallery_image(host, gallery).await?;
        self.locator().focus_editor(host).await?;

        let document = self
            .bridge
            .send(command::document_size_query())
            .await?
            .document_size()?;
        let size = host.natural_size(&image).await?;
        let as_new_document = opens_as_new_document(size, document);
        tracing::debug!(%flow, %size, %document, as_new_document, "host to editor: size compared");

        let source = host.image_source(&image).await?;
        let transferable =
            codec::fetch_as_transferable(&source, self.settings.host_base_url.as_deref())
                .await
                .inspect_err(|e| tracing::warn!(%flow, error = %e, "gallery image unreadable"))?;
        let data_url = codec::to_data_url(&transferable);
        self.bridge
            .send(command::open_image(&data_url, as_new_document))
            .await?;

        if as_new_document {
            tracing::info!(%flow, %size, %document, "image opened as a new document");
            self.bridge
                .send(command::notice(&self.settings.new_document_notice))
                .await?;
        } else {
            self.bridge.send(command::rasterize_active_layer()).await?;
        }
        tracing::debug!(%flow, "host to editor: done");
        Ok(())
    }

    /// Export the editor's image and deliver it to a host widget.
    pub async fn transfer_from_editor_to_host(
        &self,
        tab: SurfaceTab,
        route_to_auxiliary: bool,
        widget_index: usize,
        active_layer_only: bool,
    ) -> Result<(), TransferError> {
        let flow = new_correlation_id();
        let descriptor = DestinationDescriptor {
            tab,
            route_to_auxiliary,
            widget_index,
            active_sublayer_only: active_layer_only,
        };
        tracing::debug!(%flow, ?descriptor, "editor to host: start");

        let responses = self.bridge.send(command::save(active_layer_only)).await?;
        let file = self.exported_file(&flow, &responses)?;
        self.router
            .route(&descriptor, file)
            .await
            .inspect_err(|e| tracing::warn!(%flow, error = %e, "editor to host: routing failed"))?;
        tracing::debug!(%flow, "editor to host: done");
        Ok(())
    }

    /// Send the editor's image to inpaint upload with its selection as mask.
    ///
    /// Without a selection the user gets one notice and nothing else is
    /// sent. The mask goes in before the base image.
    pub async fn transfer_with_selection_mask(&self) -> Result<(), TransferError> {
        let flow = new_correlation_id();
        let host = self.host.as_ref();
        tracing::debug!(%flow, "selection mask: start");

        let has_selection = self.bridge.send(command::selection_query()).await?.flag()?;
        if !has_selection {
            tracing::info!(%flow, "no selection in active document");
            self.bridge
                .send(command::notice(&self.settings.no_selection_notice))
                .await?;
            return Ok(());
        }

        // The inpaint sub-view is built from scratch when img2img is entered.
        let root = self.locator().tab_root(host, SurfaceTab::Img2img).await?;
        let watch = StructuralWatch::arm(host, &root).await?;
        self.locator().switch_tab(host, SurfaceTab::Img2img).await?;
        watch.changed().await?;
        self.locator().open_inpaint_upload(host, &root).await?;

        let mask = self.bridge.send(command::mask_from_selection()).await?;
        let mask_file = self.exported_file(&flow, &mask)?;
        let mask_input = self.locator().mask_input(host).await?;
        inject(host, &mask_input, mask_file).await?;
        tracing::debug!(%flow, "selection mask: mask injected");

        let base = self
            .bridge
            .send(command::save(self.settings.active_layer_only))
            .await?;
        let base_file = self.exported_file(&flow, &base)?;
        let base_input = self.locator().base_input(host).await?;
        inject(host, &base_input, base_file).await?;
        tracing::debug!(%flow, "selection mask: done");
        Ok(())
    }

    fn exported_file(
        &self,
        flow: &str,
        responses: &ResponseSequence,
    ) -> Result<NamedFile, TransferError> {
        let decoded = responses
            .buffer(0)
            .and_then(|encoded| {
                codec::decode_from_text_safe(encoded, &self.settings.output_mime)
                    .map_err(TransferError::from)
            })
            .inspect_err(|e| tracing::warn!(%flow, error = %e, "editor export unusable"))?;
        tracing::debug!(%flow, bytes = decoded.len(), "editor export decoded");
        Ok(codec::wrap_as_named_file(decoded, &self.settings.output_file_name))
    }
}

/// Run `flow`, giving up after `deadline`.
///
/// Flows have no timeout of their own; a missing editor sentinel leaves
/// them suspended forever. Callers that need bounded latency wrap them
/// here and get [`TransferError::Aborted`] on expiry.
pub async fn with_deadline<T, F>(deadline: Duration, flow: F) -> Result<T, TransferError>
where
    F: Future<Output = Result<T, TransferError>>,
{
    match tokio::time::timeout(deadline, flow).await {
        Ok(result) => result,
        Err(_) => Err(TransferError::Aborted(deadline)),
    }
}
