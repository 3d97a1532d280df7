//! Editor configuration.
//!
//! Every field has a default, so the presentation layer can pass a partial
//! object (or nothing) and only override what it needs:
//!
//! ```typescript
//! const session = new EditorSession({ apiBase: "https://api.example.com", zoomMax: 4 });
//! ```

use crate::error::{PancropError, Result};
use crate::geometry::{FrameParams, DEFAULT_FRAME_FILL, DEFAULT_FRAME_INSET};
use crate::wire::Endpoint;
use serde::{Deserialize, Serialize};

/// Default backend base URL for local development.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Delay after the last transform change before a preview is requested.
pub const DEFAULT_PREVIEW_DEBOUNCE_MS: u64 = 180;

/// Delay after the last size-limit change before an estimate is requested.
pub const DEFAULT_SIZE_DEBOUNCE_MS: u64 = 1000;

pub const DEFAULT_ZOOM_MIN: f64 = 1.0;
pub const DEFAULT_ZOOM_MAX: f64 = 3.0;

/// Zoom change per mouse wheel notch.
pub const DEFAULT_WHEEL_STEP: f64 = 0.08;

/// Zoom change per +/- button press.
pub const DEFAULT_BUTTON_STEP: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Base URL of the render backend, without a trailing slash
    pub api_base: String,
    pub preview_debounce_ms: u64,
    pub size_debounce_ms: u64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub wheel_step: f64,
    pub button_step: f64,
    /// Fraction of the constraining viewport axis covered by the frame
    pub frame_fill: f64,
    /// Margin between the frame and the viewport edge
    pub frame_inset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            preview_debounce_ms: DEFAULT_PREVIEW_DEBOUNCE_MS,
            size_debounce_ms: DEFAULT_SIZE_DEBOUNCE_MS,
            zoom_min: DEFAULT_ZOOM_MIN,
            zoom_max: DEFAULT_ZOOM_MAX,
            wheel_step: DEFAULT_WHEEL_STEP,
            button_step: DEFAULT_BUTTON_STEP,
            frame_fill: DEFAULT_FRAME_FILL,
            frame_inset: DEFAULT_FRAME_INSET,
        }
    }
}

impl EditorConfig {
    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `PancropError::InvalidConfig` if:
    /// - `api_base` is empty
    /// - `zoom_min` is below 1 (the image would no longer cover the frame)
    /// - `zoom_max` is below `zoom_min`
    /// - `frame_fill` is outside `(0, 1]`
    /// - `frame_inset` or a zoom step is negative or not finite
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| {
            tracing::warn!(reason = %msg, "rejecting editor configuration");
            Err(PancropError::InvalidConfig(msg))
        };

        if self.api_base.trim().is_empty() {
            return fail("apiBase must not be empty".to_string());
        }
        if !(self.zoom_min.is_finite() && self.zoom_min >= 1.0) {
            return fail(format!("zoomMin must be >= 1, got {}", self.zoom_min));
        }
        if !(self.zoom_max.is_finite() && self.zoom_max >= self.zoom_min) {
            return fail(format!(
                "zoomMax ({}) must not be below zoomMin ({})",
                self.zoom_max, self.zoom_min
            ));
        }
        if !(self.frame_fill > 0.0 && self.frame_fill <= 1.0) {
            return fail(format!("frameFill must be in (0, 1], got {}", self.frame_fill));
        }
        if !(self.frame_inset.is_finite() && self.frame_inset >= 0.0) {
            return fail(format!("frameInset must be >= 0, got {}", self.frame_inset));
        }
        for (name, step) in [("wheelStep", self.wheel_step), ("buttonStep", self.button_step)] {
            if !(step.is_finite() && step >= 0.0) {
                return fail(format!("{} must be >= 0, got {}", name, step));
            }
        }
        Ok(())
    }

    pub fn frame_params(&self) -> FrameParams {
        FrameParams {
            fill: self.frame_fill,
            inset: self.frame_inset,
        }
    }

    /// Full URL for a backend endpoint.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), endpoint.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"apiBase":"https://api.example.com","zoomMax":4}"#).unwrap();
        assert_eq!(config.api_base, "https://api.example.com");
        assert_eq!(config.zoom_max, 4.0);
        assert_eq!(config.zoom_min, 1.0);
        assert_eq!(config.preview_debounce_ms, 180);
        assert_eq!(config.size_debounce_ms, 1000);
    }

    #[test]
    fn test_rejects_inverted_zoom() {
        let mut config = EditorConfig::default();
        config.zoom_min = 3.0;
        config.zoom_max = 2.0;
        assert!(matches!(config.validate(), Err(PancropError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zoom_min_below_one() {
        let config: EditorConfig = serde_json::from_str(r#"{"zoomMin":0.5}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PancropError::InvalidConfig(_))
        ));

        let config = EditorConfig {
            zoom_min: 1.0,
            zoom_max: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_frame_fill() {
        let mut config = EditorConfig::default();
        config.frame_fill = 0.0;
        assert!(config.validate().is_err());
        config.frame_fill = 1.5;
        assert!(config.validate().is_err());
        config.frame_fill = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_base() {
        let mut config = EditorConfig::default();
        config.api_base = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_inset() {
        let mut config = EditorConfig::default();
        config.frame_inset = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_url_strips_trailing_slash() {
        let mut config = EditorConfig::default();
        config.api_base = "https://api.example.com/".to_string();
        assert_eq!(
            config.endpoint_url(Endpoint::Preview),
            "https://api.example.com/api/preview"
        );
    }
}
