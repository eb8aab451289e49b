//! Finding host widgets through the configured mapping table.
//!
//! The host UI offers no stable ids for most of what Easel drives. Every
//! selector, text match and positional convention comes from
//! [`WidgetMap`]; nothing outside this module builds a selector.

use easel_common::{SurfaceTab, TransferError};
use easel_config::WidgetMap;

use crate::surface::{ElementRef, HostSurface};

#[derive(Debug, Clone)]
pub struct WidgetLocator {
    map: WidgetMap,
}

impl WidgetLocator {
    pub fn new(map: WidgetMap) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &WidgetMap {
        &self.map
    }

    /// Activate a generation tab through the host's own switch function.
    pub async fn switch_tab(
        &self,
        host: &dyn HostSurface,
        tab: SurfaceTab,
    ) -> Result<(), TransferError> {
        let switch_fn = self.map.tab(tab).switch_fn;
        tracing::debug!(%tab, switch_fn = %switch_fn, "switching host tab");
        host.call_global(&switch_fn).await?;
        Ok(())
    }

    /// Bring the editor's tab to the foreground. The tab bar also holds
    /// "send to editor" buttons, so the label must match exactly.
    pub async fn focus_editor(&self, host: &dyn HostSurface) -> Result<(), TransferError> {
        let bar = self.first(host, None, &self.map.tab_bar).await?;
        let button = self
            .find_by_text(host, &bar, "button", &self.map.editor_tab_label)
            .await?;
        host.click(&button).await?;
        Ok(())
    }

    pub async fn tab_root(
        &self,
        host: &dyn HostSurface,
        tab: SurfaceTab,
    ) -> Result<ElementRef, TransferError> {
        self.first(host, None, &self.map.tab(tab).root).await
    }

    /// The single image input of a tab.
    pub async fn default_input(
        &self,
        host: &dyn HostSurface,
        tab: SurfaceTab,
    ) -> Result<ElementRef, TransferError> {
        let root = self.tab_root(host, tab).await?;
        self.first(host, Some(&root), &self.map.file_input).await
    }

    /// Auxiliary-model routing container used by `tab`.
    pub async fn aux_container(
        &self,
        host: &dyn HostSurface,
        tab: SurfaceTab,
    ) -> Result<ElementRef, TransferError> {
        self.first(host, None, &self.map.tab(tab).aux_container).await
    }

    /// Whether the container's expandable region is collapsed.
    ///
    /// The direct child holding the first marker element is the content
    /// region; it is collapsed when hidden. Without a marker or such a child
    /// the container is treated as expanded, so a broken layout never
    /// toggles it shut.
    pub async fn aux_is_collapsed(
        &self,
        host: &dyn HostSurface,
        container: &ElementRef,
    ) -> Result<bool, TransferError> {
        let markers = host.query(Some(container), &self.map.aux_marker).await?;
        let Some(marker) = markers.first() else {
            return Ok(false);
        };
        for child in host.children(container).await? {
            if host.contains(&child, marker).await? {
                return Ok(host.is_hidden(&child).await?);
            }
        }
        Ok(false)
    }

    pub async fn expand_aux(
        &self,
        host: &dyn HostSurface,
        container: &ElementRef,
    ) -> Result<(), TransferError> {
        let control = self
            .first(host, Some(container), &self.map.aux_expand_control)
            .await?;
        host.click(&control).await?;
        Ok(())
    }

    pub async fn sub_tabs(
        &self,
        host: &dyn HostSurface,
        scope: &ElementRef,
    ) -> Result<Vec<ElementRef>, TransferError> {
        Ok(host.query(Some(scope), &self.map.sub_tab_buttons).await?)
    }

    /// Input of routing unit `index`. Each unit renders `aux_input_stride`
    /// file inputs, and the image input comes first.
    pub async fn aux_input(
        &self,
        host: &dyn HostSurface,
        container: &ElementRef,
        index: usize,
    ) -> Result<ElementRef, TransferError> {
        let position = index
            .checked_mul(self.map.aux_input_stride as usize)
            .ok_or_else(|| {
                TransferError::DestinationNotFound(format!("routing input {index} (out of range)"))
            })?;
        let inputs = host.query(Some(container), &self.map.file_input).await?;
        tracing::debug!(index, position, candidates = inputs.len(), "resolving routing input");
        inputs.into_iter().nth(position).ok_or_else(|| {
            TransferError::DestinationNotFound(format!(
                "routing input {index} ({} #{position})",
                self.map.file_input
            ))
        })
    }

    /// Click the inpaint-upload sub-tab under the img2img root.
    pub async fn open_inpaint_upload(
        &self,
        host: &dyn HostSurface,
        img2img_root: &ElementRef,
    ) -> Result<(), TransferError> {
        let button = self
            .find_by_text(
                host,
                img2img_root,
                &self.map.sub_tab_buttons,
                &self.map.inpaint_upload_label,
            )
            .await?;
        host.click(&button).await?;
        Ok(())
    }

    pub async fn mask_input(&self, host: &dyn HostSurface) -> Result<ElementRef, TransferError> {
        self.first(host, None, &self.map.mask_input).await
    }

    pub async fn base_input(&self, host: &dyn HostSurface) -> Result<ElementRef, TransferError> {
        self.first(host, None, &self.map.base_input).await
    }

    /// First image of the gallery element with id `gallery_id`.
    pub async fn gallery_image(
        &self,
        host: &dyn HostSurface,
        gallery_id: &str,
    ) -> Result<ElementRef, TransferError> {
        let gallery = self.first(host, None, &format!("#{gallery_id}")).await?;
        self.first(host, Some(&gallery), &self.map.gallery_image)
            .await
    }

    async fn first(
        &self,
        host: &dyn HostSurface,
        scope: Option<&ElementRef>,
        selector: &str,
    ) -> Result<ElementRef, TransferError> {
        host.query(scope, selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TransferError::DestinationNotFound(selector.to_string()))
    }

    async fn find_by_text(
        &self,
        host: &dyn HostSurface,
        scope: &ElementRef,
        selector: &str,
        text: &str,
    ) -> Result<ElementRef, TransferError> {
        for candidate in host.query(Some(scope), selector).await? {
            if host.text_content(&candidate).await? == text {
                return Ok(candidate);
            }
        }
        Err(TransferError::DestinationNotFound(format!(
            "{selector} with text {text:?}"
        )))
    }
}
