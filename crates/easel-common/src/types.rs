use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pixel dimensions of an image or document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when `self` is larger than `other` along either axis.
    pub fn exceeds(&self, other: &Dimensions) -> bool {
        self.width > other.width || self.height > other.height
    }

    /// Parse the editor's `"width,height"` reply. Fractional sizes are
    /// truncated, matching how the editor reports unit-converted documents.
    pub fn from_pair(raw: &str) -> Option<Self> {
        let (w, h) = raw.split_once(',')?;
        let width = w.trim().parse::<f64>().ok()?;
        let height = h.trim().parse::<f64>().ok()?;
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return None;
        }
        Some(Self {
            width: width as u32,
            height: height as u32,
        })
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Logical generation tabs of the host surface that can receive an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceTab {
    /// Primary generation (text to image).
    Txt2img,
    /// Image to image, including the inpaint sub-views.
    Img2img,
    /// Post-processing.
    Extras,
}

impl SurfaceTab {
    pub const ALL: [SurfaceTab; 3] = [Self::Txt2img, Self::Img2img, Self::Extras];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Txt2img => "txt2img",
            Self::Img2img => "img2img",
            Self::Extras => "extras",
        }
    }
}

impl fmt::Display for SurfaceTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt2img" => Ok(Self::Txt2img),
            "img2img" => Ok(Self::Img2img),
            "extras" => Ok(Self::Extras),
            other => Err(format!("unknown surface tab '{other}'")),
        }
    }
}
