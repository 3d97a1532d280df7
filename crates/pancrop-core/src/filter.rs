//! Client-side preview filters.
//!
//! These only change how the preview is drawn (as a CSS `filter`). The
//! backend never sees brightness, contrast or saturation; only the
//! black-and-white flag is forwarded, and only for signatures.

use serde::{Deserialize, Serialize};

pub const BRIGHTNESS_RANGE: (u32, u32) = (50, 150);
pub const CONTRAST_RANGE: (u32, u32) = (50, 150);
pub const SATURATION_RANGE: (u32, u32) = (0, 180);

/// Neutral value for every percentage slider.
pub const NEUTRAL_PERCENT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewFilter {
    /// Render in black and white
    pub bw: bool,
    /// Whether brightness/contrast/saturation are applied to the preview
    pub enabled: bool,
    pub brightness: u32,
    pub contrast: u32,
    pub saturation: u32,
}

impl Default for PreviewFilter {
    fn default() -> Self {
        Self {
            bw: false,
            enabled: false,
            brightness: NEUTRAL_PERCENT,
            contrast: NEUTRAL_PERCENT,
            saturation: NEUTRAL_PERCENT,
        }
    }
}

impl PreviewFilter {
    pub fn set_brightness(&mut self, value: u32) {
        self.brightness = value.clamp(BRIGHTNESS_RANGE.0, BRIGHTNESS_RANGE.1);
    }

    pub fn set_contrast(&mut self, value: u32) {
        self.contrast = value.clamp(CONTRAST_RANGE.0, CONTRAST_RANGE.1);
    }

    pub fn set_saturation(&mut self, value: u32) {
        self.saturation = value.clamp(SATURATION_RANGE.0, SATURATION_RANGE.1);
    }

    /// CSS `filter` value for the preview image, `none` when inactive.
    pub fn css(&self) -> String {
        if !self.enabled && !self.bw {
            return "none".to_string();
        }
        let mut parts = Vec::with_capacity(4);
        if self.enabled {
            parts.push(format!("brightness({}%)", self.brightness));
            parts.push(format!("contrast({}%)", self.contrast));
            parts.push(format!("saturate({}%)", self.saturation));
        }
        if self.bw {
            parts.push("grayscale(1)".to_string());
        }
        parts.join(" ")
    }
}
