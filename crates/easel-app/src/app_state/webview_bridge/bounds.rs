//! Coordinate conversion between window size and wry rects.

use crate::app_state::core::EaselApp;

// =============================================================================
// COORDINATE CONVERSION
// =============================================================================

/// A wry `Rect` covering the whole window, in logical coordinates.
pub fn window_bounds(width: f64, height: f64) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(
            width.max(0.0),
            height.max(0.0),
        )),
    }
}

impl EaselApp {
    /// Resize the host webview to fill the window.
    pub(in crate::app_state) fn sync_webview_bounds(&mut self) {
        let (Some(window), Some(handle)) = (self.window.as_ref(), self.webview.as_ref()) else {
            return;
        };
        let size = window
            .inner_size()
            .to_logical::<f64>(window.scale_factor());
        if let Err(e) = handle.set_bounds(window_bounds(size.width, size.height)) {
            tracing::warn!(error = %e, "Failed to resize host webview");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
